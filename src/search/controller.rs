//! Search controller event loop.
//!
//! One task owns [`FilterState`], the drawer and the rating picker. It
//! multiplexes three sources with `tokio::select!`: UI events, the debounce
//! deadline and finished backend calls. Backend calls run on a `JoinSet` and
//! come back tagged with their [`Ticket`]; anything but the newest ticket is
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::api::{DirectoryApi, UserRecord};
use crate::error::Result;
use crate::filter::{
    CheckboxView, Facet, FacetOptions, FilterAction, FilterPanel, FilterState, PanelSection,
    PickerState, SkillRatingPicker, reduce,
};
use crate::query::{QueryBuilder, SearchQuery};
use crate::render::{ResultsView, RenderOptions, StatusMessage, applied_skill_lines, render_results};

use super::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use super::sequence::{RequestSequencer, Ticket};
use super::suggest::search_skills;

pub const FACETS_FAILED_MESSAGE: &str = "Could not load filter options.";

/// Everything the user can do to the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Main search box content changed.
    Input(String),
    Toggle {
        facet: Facet,
        value: String,
        checked: bool,
    },
    /// Per-facet option search box changed.
    OptionSearch {
        facet: Facet,
        text: String,
    },
    SkillSearch(String),
    PickSkill(String),
    SelectLevel(u8),
    ConfirmSkill,
    CancelSkill,
    RemoveSkill(String),
    OpenPanel,
    ClosePanel,
    ToggleSection(PanelSection),
    Apply,
    Clear,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "detail")]
pub enum SearchPhase {
    Idle,
    Loading,
    Success(usize),
    Error(String),
}

/// A view change for whoever renders the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "update", content = "data")]
pub enum ControllerUpdate {
    Results(ResultsView),
    Suggestions(Vec<String>),
    FacetOptions(FacetOptions),
    Checkboxes {
        facet: Facet,
        boxes: Vec<CheckboxView>,
    },
    Picker {
        state: PickerState,
        message: String,
    },
    AppliedSkills(Vec<String>),
    Filters(FilterState),
    Panel {
        open: bool,
        expanded: Vec<PanelSection>,
    },
    Status(StatusMessage),
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    /// Logged-in viewer, hidden from their own results.
    pub exclude_id: Option<String>,
    pub years: Vec<String>,
    pub render: RenderOptions,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            exclude_id: None,
            years: ["1", "2", "3", "4"].iter().map(ToString::to_string).collect(),
            render: RenderOptions::default(),
        }
    }
}

enum Completion {
    Search(Ticket, Result<Vec<UserRecord>>),
    Suggestions(Ticket, Result<Vec<String>>),
    Facets(Result<(Vec<String>, Vec<String>)>),
}

pub struct SearchController<A: DirectoryApi + 'static> {
    api: Arc<A>,
    settings: SearchSettings,
    filters: FilterState,
    panel: FilterPanel,
    picker: SkillRatingPicker,
    options: FacetOptions,
    phase: SearchPhase,
    debouncer: Debouncer,
    searches: RequestSequencer,
    suggestions: RequestSequencer,
    in_flight: JoinSet<Completion>,
    updates: UnboundedSender<ControllerUpdate>,
    last_query: Option<SearchQuery>,
}

impl<A: DirectoryApi + 'static> SearchController<A> {
    pub fn new(
        api: Arc<A>,
        settings: SearchSettings,
        updates: UnboundedSender<ControllerUpdate>,
    ) -> Self {
        let options = FacetOptions {
            years: settings.years.clone(),
            ..FacetOptions::default()
        };
        Self {
            api,
            debouncer: Debouncer::new(settings.debounce),
            settings,
            filters: FilterState::new(),
            panel: FilterPanel::new(),
            picker: SkillRatingPicker::new(),
            options,
            phase: SearchPhase::Idle,
            searches: RequestSequencer::new(),
            suggestions: RequestSequencer::new(),
            in_flight: JoinSet::new(),
            updates,
            last_query: None,
        }
    }

    /// Drive the page until `Shutdown` arrives, or until the event channel
    /// closes and every pending debounce and request has settled.
    pub async fn run(mut self, mut events: UnboundedReceiver<UiEvent>) -> Self {
        self.initialize();
        let mut events_open = true;

        loop {
            if !events_open && !self.debouncer.is_armed() && self.in_flight.is_empty() {
                break;
            }

            let debounce = self.debouncer.wait();
            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(UiEvent::Shutdown) => {
                        debug!("shutdown requested");
                        break;
                    }
                    Some(event) => self.handle_event(event),
                    None => events_open = false,
                },
                () = debounce, if self.debouncer.is_armed() => {
                    debug!("debounce elapsed");
                    self.issue_search();
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok(completion) => self.complete(completion),
                        Err(err) => error!(error = %err, "request task failed"),
                    }
                }
            }
        }

        self.in_flight.abort_all();
        self
    }

    /// Load facet options and issue the unfiltered first search.
    pub fn initialize(&mut self) {
        let api = Arc::clone(&self.api);
        self.in_flight.spawn(async move {
            let (institutes, branches) = tokio::join!(api.institutes(), api.branches());
            Completion::Facets(institutes.and_then(|institutes| {
                Ok((
                    institutes.into_iter().map(|inst| inst.name).collect(),
                    branches?,
                ))
            }))
        });
        self.issue_search();
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Input(text) => {
                self.filters = reduce(std::mem::take(&mut self.filters), FilterAction::SetTerm(text));
                self.debouncer.touch();
            }
            UiEvent::Toggle {
                facet,
                value,
                checked,
            } => {
                self.apply_action(FilterAction::Toggle {
                    facet,
                    value,
                    checked,
                });
                self.emit_checkboxes(facet);
            }
            UiEvent::OptionSearch { facet, text } => {
                self.panel.set_option_query(facet, text);
                self.emit_checkboxes(facet);
            }
            UiEvent::SkillSearch(text) => self.lookup_skills(text),
            UiEvent::PickSkill(name) => {
                self.picker.open(name);
                self.emit_picker();
            }
            UiEvent::SelectLevel(level) => {
                if let Err(err) = self.picker.select_level(level) {
                    warn!(error = %err, "rating rejected");
                    self.emit(ControllerUpdate::Status(StatusMessage::error(err.to_string())));
                }
                self.emit_picker();
            }
            UiEvent::ConfirmSkill => self.confirm_skill(),
            UiEvent::CancelSkill => {
                self.picker.cancel();
                self.emit_picker();
            }
            UiEvent::RemoveSkill(name) => {
                self.apply_action(FilterAction::RemoveSkill(name));
                self.emit_applied_skills();
            }
            UiEvent::OpenPanel => {
                self.panel.open();
                self.emit_panel();
            }
            UiEvent::ClosePanel => {
                self.panel.close();
                self.emit_panel();
            }
            UiEvent::ToggleSection(section) => {
                self.panel.toggle_section(section);
                self.emit_panel();
            }
            UiEvent::Apply => {
                self.issue_search();
                self.panel.close();
                self.emit_panel();
            }
            UiEvent::Clear => self.clear(),
            UiEvent::Shutdown => debug!("shutdown outside the event loop ignored"),
        }
    }

    fn apply_action(&mut self, action: FilterAction) {
        self.filters = reduce(std::mem::take(&mut self.filters), action);
        self.emit(ControllerUpdate::Filters(self.filters.clone()));
    }

    fn confirm_skill(&mut self) {
        match self.picker.confirm(&mut self.filters) {
            Ok(requirement) => {
                info!(skill = %requirement.name, level = requirement.level.get(), "skill filter applied");
                self.suggestions.issue();
                self.panel.clear_skill_search();
                self.emit(ControllerUpdate::Suggestions(Vec::new()));
                self.emit(ControllerUpdate::Filters(self.filters.clone()));
                self.emit_applied_skills();
            }
            Err(err) => {
                warn!(error = %err, "skill filter not applied");
                self.emit(ControllerUpdate::Status(StatusMessage::error(err.to_string())));
            }
        }
        self.emit_picker();
    }

    fn clear(&mut self) {
        self.apply_action(FilterAction::Clear);
        self.panel.reset_inputs();
        self.picker.cancel();
        self.suggestions.issue();

        for facet in Facet::ALL {
            self.emit_checkboxes(facet);
        }
        self.emit(ControllerUpdate::Suggestions(Vec::new()));
        self.emit_applied_skills();
        self.issue_search();
    }

    fn lookup_skills(&mut self, text: String) {
        self.panel.set_skill_query(text.clone());
        let ticket = self.suggestions.issue();

        if text.is_empty() {
            self.panel.set_suggestions(Vec::new());
            self.emit(ControllerUpdate::Suggestions(Vec::new()));
            return;
        }

        let api = Arc::clone(&self.api);
        let applied = self.filters.skills.clone();
        self.in_flight.spawn(async move {
            let outcome = search_skills(api.as_ref(), &text, &applied).await;
            Completion::Suggestions(ticket, outcome)
        });
    }

    /// Send the current state to the backend now, superseding any pending
    /// debounce and any request still in flight.
    pub fn issue_search(&mut self) {
        self.debouncer.cancel();
        let ticket = self.searches.issue();
        let query = QueryBuilder::from_state(&self.filters, self.settings.exclude_id.as_deref());
        debug!(seq = ticket.get(), query = %query, "search issued");

        self.phase = SearchPhase::Loading;
        self.emit(ControllerUpdate::Results(ResultsView::Loading));
        self.last_query = Some(query.clone());

        let api = Arc::clone(&self.api);
        self.in_flight.spawn(async move {
            let outcome = api.search_students(&query).await;
            Completion::Search(ticket, outcome)
        });
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Search(ticket, outcome) => {
                if !self.searches.is_current(ticket) {
                    debug!(
                        seq = ticket.get(),
                        latest = self.searches.latest(),
                        "stale search response dropped"
                    );
                    return;
                }
                match outcome {
                    Ok(users) => {
                        debug!(seq = ticket.get(), results = users.len(), "search complete");
                        self.phase = SearchPhase::Success(users.len());
                        let view = render_results(&users, &self.settings.render);
                        self.emit(ControllerUpdate::Results(view));
                    }
                    Err(err) => {
                        error!(seq = ticket.get(), error = %err, "search request failed");
                        self.phase = SearchPhase::Error(err.to_string());
                        self.emit(ControllerUpdate::Results(ResultsView::Error));
                    }
                }
            }
            Completion::Suggestions(ticket, outcome) => {
                if !self.suggestions.is_current(ticket) {
                    debug!(seq = ticket.get(), "stale skill suggestions dropped");
                    return;
                }
                match outcome {
                    Ok(names) => {
                        self.panel.set_suggestions(names.clone());
                        self.emit(ControllerUpdate::Suggestions(names));
                    }
                    Err(err) => {
                        error!(error = %err, "skill lookup failed");
                        self.emit(ControllerUpdate::Status(StatusMessage::error(
                            crate::render::ERROR_MESSAGE,
                        )));
                    }
                }
            }
            Completion::Facets(outcome) => match outcome {
                Ok((institutes, branches)) => {
                    info!(
                        institutes = institutes.len(),
                        branches = branches.len(),
                        "filter options loaded"
                    );
                    self.options.institutes = institutes;
                    self.options.branches = branches;
                    self.emit(ControllerUpdate::FacetOptions(self.options.clone()));
                    for facet in Facet::ALL {
                        self.emit_checkboxes(facet);
                    }
                }
                Err(err) => {
                    error!(error = %err, "filter options failed to load");
                    self.emit(ControllerUpdate::Status(StatusMessage::error(
                        FACETS_FAILED_MESSAGE,
                    )));
                }
            },
        }
    }

    fn emit(&self, update: ControllerUpdate) {
        // A closed receiver only means nobody is rendering any more.
        let _ = self.updates.send(update);
    }

    fn emit_checkboxes(&self, facet: Facet) {
        self.emit(ControllerUpdate::Checkboxes {
            facet,
            boxes: self.checkboxes(facet),
        });
    }

    fn emit_picker(&self) {
        self.emit(ControllerUpdate::Picker {
            state: self.picker.state().clone(),
            message: self.picker.message().to_string(),
        });
    }

    fn emit_applied_skills(&self) {
        self.emit(ControllerUpdate::AppliedSkills(applied_skill_lines(
            &self.filters.skills,
        )));
    }

    fn emit_panel(&self) {
        self.emit(ControllerUpdate::Panel {
            open: self.panel.is_open(),
            expanded: self.panel.expanded().collect(),
        });
    }

    #[must_use]
    pub fn checkboxes(&self, facet: Facet) -> Vec<CheckboxView> {
        self.panel.checkboxes(facet, &self.filters, &self.options)
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub const fn panel(&self) -> &FilterPanel {
        &self.panel
    }

    #[must_use]
    pub const fn picker(&self) -> &SkillRatingPicker {
        &self.picker
    }

    #[must_use]
    pub const fn options(&self) -> &FacetOptions {
        &self.options
    }

    #[must_use]
    pub const fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    #[must_use]
    pub const fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    #[must_use]
    pub const fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
