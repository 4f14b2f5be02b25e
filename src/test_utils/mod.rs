//! Shared test utilities for skilllink.

pub mod fixtures;
pub mod logging;
