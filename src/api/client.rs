//! reqwest-backed [`DirectoryApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{Result, SkillLinkError};
use crate::query::{SearchQuery, form_encode};

use super::{DirectoryApi, Institute, LoginReply, LoginRequest, SkillSuggestion, UserRecord};

pub struct HttpDirectoryClient {
    base_url: String,
    client: Client,
}

impl HttpDirectoryClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(SkillLinkError::Config(
                "api base_url is empty; set [api].base_url".to_string(),
            ));
        }
        let timeout = Duration::from_secs(timeout_secs.max(1));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SkillLinkError::Config(format!("directory http client: {err}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turn a non-2xx response into `SkillLinkError::Http`, preferring the
/// server's own `message`/`error` text.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(SkillLinkError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginReply> {
        let url = self.url("/api/login");
        debug!(%url, username, "POST");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<LoginReply>().await?)
    }

    async fn search_students(&self, query: &SearchQuery) -> Result<Vec<UserRecord>> {
        self.get_json(format!(
            "{}?{}",
            self.url("/api/students/search"),
            query.to_query_string()
        ))
        .await
    }

    async fn institutes(&self) -> Result<Vec<Institute>> {
        self.get_json(self.url("/api/institutes")).await
    }

    async fn branches(&self) -> Result<Vec<String>> {
        self.get_json(self.url("/api/branches")).await
    }

    async fn search_skills(&self, query: &str) -> Result<Vec<SkillSuggestion>> {
        self.get_json(format!(
            "{}?q={}",
            self.url("/api/skills/search"),
            form_encode(query)
        ))
        .await
    }

    async fn profile(&self, id: &str) -> Result<UserRecord> {
        self.get_json(self.url(&format!("/api/profile/{}", urlencoding::encode(id))))
            .await
    }
}
