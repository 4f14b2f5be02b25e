//! Skill autosuggest.

use tracing::debug;

use crate::api::DirectoryApi;
use crate::error::Result;
use crate::filter::SkillRequirements;

/// Suggestions for `query`, minus skills already applied.
///
/// An empty query yields nothing and never reaches the backend.
pub async fn search_skills<A>(
    api: &A,
    query: &str,
    applied: &SkillRequirements,
) -> Result<Vec<String>>
where
    A: DirectoryApi + ?Sized,
{
    if query.is_empty() {
        return Ok(Vec::new());
    }
    debug!(query, "skill lookup");
    let names = api
        .search_skills(query)
        .await?
        .into_iter()
        .map(|suggestion| suggestion.name)
        .collect();
    Ok(exclude_applied(names, applied))
}

#[must_use]
pub fn exclude_applied(names: Vec<String>, applied: &SkillRequirements) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !applied.contains(name))
        .collect()
}
