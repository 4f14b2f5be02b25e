//! Search query construction.
//!
//! Wire contract with the search endpoint: facets use repeated keys
//! (`institute=A&institute=B`), skills use one comma-joined key
//! (`skills=Python:4,HTML:2`). Unrestricted facets and an empty skill map
//! are omitted entirely; `q` is always present.

use std::fmt;

use serde::Serialize;

use crate::filter::{Facet, FilterState};

/// Ordered query parameters sent verbatim to `/api/students/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

impl SearchQuery {
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }

    /// `application/x-www-form-urlencoded` form, spaces as `+`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.params.push((key.to_string(), value.into()));
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

pub struct QueryBuilder;

impl QueryBuilder {
    /// Serialize `state` plus the free-text `term` and the viewer id to exclude.
    ///
    /// Parameter order is fixed: `q`, `exclude_id`, `institute`*, `branch`*,
    /// `year`*, `skills`.
    #[must_use]
    pub fn build(state: &FilterState, term: &str, exclude_id: Option<&str>) -> SearchQuery {
        let mut query = SearchQuery::default();
        query.push("q", term);

        if let Some(id) = exclude_id {
            query.push("exclude_id", id);
        }

        for facet in Facet::ALL {
            for value in state.facet(facet).values() {
                query.push(facet.param_name(), value.as_str());
            }
        }

        if !state.skills.is_empty() {
            let joined = state
                .skills
                .iter()
                .map(|req| format!("{}:{}", req.name, req.level))
                .collect::<Vec<_>>()
                .join(",");
            query.push("skills", joined);
        }

        query
    }

    /// Build from the state's own term.
    #[must_use]
    pub fn from_state(state: &FilterState, exclude_id: Option<&str>) -> SearchQuery {
        Self::build(state, &state.term, exclude_id)
    }
}

pub(crate) fn form_encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}
