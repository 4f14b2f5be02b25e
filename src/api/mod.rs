//! SkillLink backend contract.
//!
//! Record types as the backend serves them, and the [`DirectoryApi`] seam the
//! controller talks through.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::query::SearchQuery;

pub use client::HttpDirectoryClient;

/// One student as returned by search and profile endpoints.
///
/// Every field besides `id` may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub institute_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillRating>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub branch: Option<String>,
    /// Numbers and numeric strings; anything else reads as absent.
    #[serde(default, deserialize_with = "lenient_opt_int")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRating {
    #[serde(default)]
    pub name: Option<String>,
    /// Non-numeric ratings read as 0.
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institute {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSuggestion {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id")]
    pub user_id: Option<String>,
}

#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// `POST /api/login`. Non-2xx replies surface as `SkillLinkError::Http`
    /// carrying the server's message.
    async fn login(&self, username: &str, password: &str) -> Result<LoginReply>;

    /// `GET /api/students/search?<query>`
    async fn search_students(&self, query: &SearchQuery) -> Result<Vec<UserRecord>>;

    /// `GET /api/institutes`
    async fn institutes(&self) -> Result<Vec<Institute>>;

    /// `GET /api/branches`
    async fn branches(&self) -> Result<Vec<String>>;

    /// `GET /api/skills/search?q=<query>`
    async fn search_skills(&self, query: &str) -> Result<Vec<SkillSuggestion>>;

    /// `GET /api/profile/<id>`
    async fn profile(&self, id: &str) -> Result<UserRecord>;
}

/// Integer rating from whatever JSON the backend sent.
#[must_use]
pub fn rating_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .unwrap_or_else(|| number.as_f64().map_or(0, truncate)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .unwrap_or_else(|_| text.parse::<f64>().map_or(0, truncate))
        }
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    if value.is_finite() { value as i64 } else { 0 }
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, rating_from_value))
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_id(deserializer)?.unwrap_or_default())
}

fn lenient_opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

/// Strings only; a value of any other type is dropped.
fn lenient_opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_opt_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_full() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": 1,
            "full_name": "Lakshmi Priya",
            "institute_name": "Saintgits College of Engineering",
            "image": "https://i.pravatar.cc/100?img=1",
            "year": 2,
            "branch": "Computer Science",
            "email": "lakshmi@example.com",
            "skills": [
                {"id": 1, "name": "Python", "rating": 4},
                {"id": 5, "name": "HTML", "rating": 3}
            ],
            "projects": []
        }))
        .unwrap();

        assert_eq!(record.id, "1");
        assert_eq!(record.full_name.as_deref(), Some("Lakshmi Priya"));
        assert_eq!(record.skills.len(), 2);
        assert_eq!(record.skills[0].rating, 4);
        assert_eq!(record.year, Some(2));
    }

    #[test]
    fn test_user_record_sparse() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": "42",
            "full_name": null,
            "institute_name": null,
            "skills": null
        }))
        .unwrap();

        assert_eq!(record.id, "42");
        assert!(record.full_name.is_none());
        assert!(record.image.is_none());
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_lenient_ratings() {
        let skills: Vec<SkillRating> = serde_json::from_value(json!([
            {"name": "A", "rating": "3"},
            {"name": "B", "rating": "lots"},
            {"name": "C", "rating": null},
            {"name": "D"},
            {"name": "E", "rating": 2.9}
        ]))
        .unwrap();
        let ratings: Vec<_> = skills.iter().map(|s| s.rating).collect();
        assert_eq!(ratings, [3, 0, 0, 0, 2]);
    }

    #[test]
    fn test_mistyped_optional_fields_keep_the_batch() {
        let records: Vec<UserRecord> = serde_json::from_value(json!([
            {"id": 1, "full_name": "Asha", "year": "2", "branch": "Civil"},
            {"id": 2, "full_name": "Ravi", "bio": 7, "year": "second", "branch": ["x"]},
            {"id": 3, "full_name": 99, "institute_name": {"name": "NIT"}, "image": false}
        ]))
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].year, Some(2));
        assert_eq!(records[0].branch.as_deref(), Some("Civil"));
        assert_eq!(records[1].full_name.as_deref(), Some("Ravi"));
        assert!(records[1].bio.is_none());
        assert!(records[1].year.is_none());
        assert!(records[1].branch.is_none());
        assert_eq!(records[2].id, "3");
        assert!(records[2].full_name.is_none());
        assert!(records[2].institute_name.is_none());
        assert!(records[2].image.is_none());
    }

    #[test]
    fn test_login_reply_numeric_user_id() {
        let reply: LoginReply = serde_json::from_value(json!({
            "success": true,
            "message": "Login successful!",
            "user_id": 3
        }))
        .unwrap();
        assert_eq!(reply.user_id.as_deref(), Some("3"));
        assert_eq!(reply.message.as_deref(), Some("Login successful!"));
    }
}
