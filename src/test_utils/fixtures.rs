//! Record builders and an in-memory [`DirectoryApi`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::api::{
    DirectoryApi, Institute, LoginReply, SkillRating, SkillSuggestion, UserRecord,
};
use crate::error::{Result, SkillLinkError};
use crate::query::SearchQuery;

#[must_use]
pub fn user_named(id: &str, name: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        full_name: Some(name.to_string()),
        ..UserRecord::default()
    }
}

#[must_use]
pub fn user_with_skills(id: &str, name: &str, institute: &str, skills: &[(&str, i64)]) -> UserRecord {
    UserRecord {
        institute_name: Some(institute.to_string()),
        skills: skills
            .iter()
            .map(|(skill, rating)| SkillRating {
                name: Some((*skill).to_string()),
                rating: *rating,
            })
            .collect(),
        ..user_named(id, name)
    }
}

/// One `search_students` call as the fake saw it.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    pub query: SearchQuery,
    pub at: Instant,
}

/// Scriptable backend. Search results are keyed by the `q` term, falling back
/// to the default user list.
#[derive(Default)]
pub struct FakeDirectory {
    users: Vec<UserRecord>,
    results_by_term: HashMap<String, Vec<UserRecord>>,
    delays: HashMap<String, Duration>,
    institutes: Vec<String>,
    branches: Vec<String>,
    skills: Vec<String>,
    accounts: Vec<(String, String, String)>,
    unreachable: bool,
    failing_facets: bool,
    search_failure: Option<(u16, String)>,
    searches: Mutex<Vec<RecordedSearch>>,
    skill_queries: Mutex<Vec<String>>,
}

impl FakeDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_users(mut self, users: Vec<UserRecord>) -> Self {
        self.users = users;
        self
    }

    #[must_use]
    pub fn with_results(mut self, term: &str, users: Vec<UserRecord>) -> Self {
        self.results_by_term.insert(term.to_string(), users);
        self
    }

    /// Delay responses to searches for `term`.
    #[must_use]
    pub fn with_delay(mut self, term: &str, delay: Duration) -> Self {
        self.delays.insert(term.to_string(), delay);
        self
    }

    #[must_use]
    pub fn with_institutes(mut self, names: &[&str]) -> Self {
        self.institutes = names.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_branches(mut self, names: &[&str]) -> Self {
        self.branches = names.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_skills(mut self, names: &[&str]) -> Self {
        self.skills = names.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_account(mut self, username: &str, password: &str, user_id: &str) -> Self {
        self.accounts.push((
            username.to_string(),
            password.to_string(),
            user_id.to_string(),
        ));
        self
    }

    /// Every call fails as if the connection were refused.
    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Answer every student search with this non-2xx status.
    #[must_use]
    pub fn failing_search(mut self, status: u16, message: &str) -> Self {
        self.search_failure = Some((status, message.to_string()));
        self
    }

    #[must_use]
    pub const fn failing_facets(mut self) -> Self {
        self.failing_facets = true;
        self
    }

    #[must_use]
    pub fn searches(&self) -> Vec<RecordedSearch> {
        self.searches
            .lock()
            .map(|searches| searches.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn skill_queries(&self) -> Vec<String> {
        self.skill_queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    fn reachable(&self) -> Result<()> {
        if self.unreachable {
            Err(SkillLinkError::NetworkFailure(
                "connection refused".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn facets_available(&self) -> Result<()> {
        self.reachable()?;
        if self.failing_facets {
            return Err(SkillLinkError::Http {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectory {
    async fn login(&self, username: &str, password: &str) -> Result<LoginReply> {
        self.reachable()?;
        self.accounts
            .iter()
            .find(|(user, pass, _)| user == username && pass == password)
            .map(|(_, _, id)| LoginReply {
                message: Some("Login successful!".to_string()),
                user_id: Some(id.clone()),
            })
            .ok_or_else(|| SkillLinkError::Http {
                status: 401,
                message: "Invalid username or password.".to_string(),
            })
    }

    async fn search_students(&self, query: &SearchQuery) -> Result<Vec<UserRecord>> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(RecordedSearch {
                query: query.clone(),
                at: Instant::now(),
            });
        }
        let term = query.get("q").unwrap_or_default();
        if let Some(delay) = self.delays.get(term) {
            tokio::time::sleep(*delay).await;
        }
        self.reachable()?;
        if let Some((status, message)) = &self.search_failure {
            return Err(SkillLinkError::Http {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self
            .results_by_term
            .get(term)
            .unwrap_or(&self.users)
            .clone())
    }

    async fn institutes(&self) -> Result<Vec<Institute>> {
        self.facets_available()?;
        Ok(self
            .institutes
            .iter()
            .zip(1..)
            .map(|(name, id)| Institute {
                id: Some(id),
                name: name.clone(),
            })
            .collect())
    }

    async fn branches(&self) -> Result<Vec<String>> {
        self.facets_available()?;
        Ok(self.branches.clone())
    }

    async fn search_skills(&self, query: &str) -> Result<Vec<SkillSuggestion>> {
        if let Ok(mut queries) = self.skill_queries.lock() {
            queries.push(query.to_string());
        }
        self.reachable()?;
        let needle = query.to_lowercase();
        Ok(self
            .skills
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(|name| SkillSuggestion { name: name.clone() })
            .collect())
    }

    async fn profile(&self, id: &str) -> Result<UserRecord> {
        self.reachable()?;
        self.users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| SkillLinkError::Http {
                status: 404,
                message: "User not found".to_string(),
            })
    }
}
