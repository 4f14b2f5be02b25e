//! Error types for skilllink.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkillLinkError>;

#[derive(Error, Debug)]
pub enum SkillLinkError {
    /// The request never produced a usable response (connect, timeout, body decode).
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A UI transition was rejected, e.g. confirming a rating with no level.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    LoginRejected(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl SkillLinkError {
    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network_failure",
            Self::Http { .. } => "http_error",
            Self::Validation(_) => "validation_error",
            Self::LoginRejected(_) => "login_rejected",
            Self::Config(_) | Self::MissingConfig(_) | Self::TomlParse(_) => "config_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }

    /// True for failures that originate from talking to the backend.
    #[must_use]
    pub const fn is_network_origin(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::Http { .. })
    }
}

impl From<reqwest::Error> for SkillLinkError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            SkillLinkError::NetworkFailure("down".into()).code(),
            "network_failure"
        );
        assert_eq!(
            SkillLinkError::Http {
                status: 500,
                message: "boom".into()
            }
            .code(),
            "http_error"
        );
        assert_eq!(
            SkillLinkError::Validation("pick".into()).code(),
            "validation_error"
        );
    }

    #[test]
    fn test_network_origin() {
        assert!(SkillLinkError::NetworkFailure("x".into()).is_network_origin());
        assert!(
            SkillLinkError::Http {
                status: 404,
                message: "missing".into()
            }
            .is_network_origin()
        );
        assert!(!SkillLinkError::Validation("x".into()).is_network_origin());
    }

    #[test]
    fn test_http_display() {
        let err = SkillLinkError::Http {
            status: 401,
            message: "Invalid username or password.".into(),
        };
        assert_eq!(err.to_string(), "HTTP 401: Invalid username or password.");
    }
}
