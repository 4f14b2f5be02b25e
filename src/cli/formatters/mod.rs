//! Terminal renderings of view models.

pub mod results;

pub use results::{format_card, format_results, format_update};
