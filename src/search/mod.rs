//! Live search: debounced input, sequenced requests and the controller
//! event loop that ties filter state to backend calls.

pub mod controller;
pub mod debounce;
pub mod sequence;
pub mod suggest;

pub use controller::{ControllerUpdate, SearchController, SearchPhase, SearchSettings, UiEvent};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use sequence::{RequestSequencer, Ticket};
pub use suggest::{exclude_applied, search_skills};
