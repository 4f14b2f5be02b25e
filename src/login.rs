//! Login form submission.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::DirectoryApi;
use crate::error::SkillLinkError;
use crate::render::StatusMessage;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Login successful!";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub status: StatusMessage,
    /// Present only on success, when the backend returned one.
    pub user_id: Option<String>,
}

impl LoginOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.tone == crate::render::Tone::Success
    }
}

/// Post credentials and turn the reply into a colored status line.
///
/// Never fails: rejected credentials surface the server's message, anything
/// else the generic retry text.
pub async fn submit_login<A>(api: &A, username: &str, password: &str) -> LoginOutcome
where
    A: DirectoryApi + ?Sized,
{
    match api.login(username, password).await {
        Ok(reply) => {
            info!(username, user_id = ?reply.user_id, "login accepted");
            LoginOutcome {
                status: StatusMessage::success(
                    reply
                        .message
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                ),
                user_id: reply.user_id,
            }
        }
        Err(SkillLinkError::Http { status, message }) => {
            warn!(username, status, %message, "login rejected");
            LoginOutcome {
                status: StatusMessage::error(message),
                user_id: None,
            }
        }
        Err(err) => {
            error!(username, error = %err, "login request failed");
            LoginOutcome {
                status: StatusMessage::error(GENERIC_FAILURE_MESSAGE),
                user_id: None,
            }
        }
    }
}
