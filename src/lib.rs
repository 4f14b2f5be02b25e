//! skilllink - SkillLink directory client
//!
//! Faceted student search against the SkillLink backend: filter state,
//! query construction, result rendering and a debounced search controller.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod login;
pub mod query;
pub mod render;
pub mod search;
pub mod session;
pub mod test_utils;

pub use error::{Result, SkillLinkError};
