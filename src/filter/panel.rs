//! Filter drawer: open/closed, accordion sections, option search boxes and
//! the skill suggestion list.
//!
//! Checkbox states are derived from [`FilterState`] on every render, so a
//! reset of the state can never leave a stale checked box behind.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{ALL_VALUE, Facet, FilterState, visible_options};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelSection {
    Institute,
    Branch,
    Year,
    Skills,
}

impl From<Facet> for PanelSection {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::Institute => Self::Institute,
            Facet::Branch => Self::Branch,
            Facet::Year => Self::Year,
        }
    }
}

/// Selectable values for each facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub institutes: Vec<String>,
    pub branches: Vec<String>,
    pub years: Vec<String>,
}

impl FacetOptions {
    #[must_use]
    pub fn for_facet(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Institute => &self.institutes,
            Facet::Branch => &self.branches,
            Facet::Year => &self.years,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxView {
    pub value: String,
    pub checked: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterPanel {
    open: bool,
    expanded: BTreeSet<PanelSection>,
    option_queries: BTreeMap<Facet, String>,
    skill_query: String,
    suggestions: Vec<String>,
}

impl FilterPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flip an accordion section, returning whether it is now expanded.
    pub fn toggle_section(&mut self, section: PanelSection) -> bool {
        if self.expanded.remove(&section) {
            false
        } else {
            self.expanded.insert(section);
            true
        }
    }

    #[must_use]
    pub fn is_expanded(&self, section: PanelSection) -> bool {
        self.expanded.contains(&section)
    }

    pub fn expanded(&self) -> impl Iterator<Item = PanelSection> + '_ {
        self.expanded.iter().copied()
    }

    pub fn set_option_query(&mut self, facet: Facet, text: impl Into<String>) {
        self.option_queries.insert(facet, text.into());
    }

    #[must_use]
    pub fn option_query(&self, facet: Facet) -> &str {
        self.option_queries.get(&facet).map_or("", String::as_str)
    }

    pub fn set_skill_query(&mut self, text: impl Into<String>) {
        self.skill_query = text.into();
    }

    #[must_use]
    pub fn skill_query(&self) -> &str {
        &self.skill_query
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Empty the skill search box and its suggestion list.
    pub fn clear_skill_search(&mut self) {
        self.skill_query.clear();
        self.suggestions.clear();
    }

    /// Reset every text input in the drawer.
    pub fn reset_inputs(&mut self) {
        self.option_queries.clear();
        self.clear_skill_search();
    }

    /// Checkbox list for one facet: the `all` box first, then every option.
    ///
    /// Options not matching the facet's search box are hidden; the `all`
    /// box is hidden whenever a search is active.
    #[must_use]
    pub fn checkboxes(
        &self,
        facet: Facet,
        state: &FilterState,
        options: &FacetOptions,
    ) -> Vec<CheckboxView> {
        let selection = state.facet(facet);
        let query = self.option_query(facet);
        let all_options = options.for_facet(facet);
        let shown: BTreeSet<&str> = visible_options(all_options, query).into_iter().collect();

        let mut boxes = Vec::with_capacity(all_options.len() + 1);
        boxes.push(CheckboxView {
            value: ALL_VALUE.to_string(),
            checked: selection.is_all(),
            visible: query.is_empty(),
        });
        boxes.extend(
            all_options
                .iter()
                .filter(|option| option.as_str() != ALL_VALUE)
                .map(|option| CheckboxView {
                    value: option.clone(),
                    checked: selection.is_checked(option),
                    visible: shown.contains(option.as_str()),
                }),
        );
        boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterAction, reduce};

    fn options() -> FacetOptions {
        FacetOptions {
            institutes: vec!["IIT Bombay".into(), "NIT Calicut".into()],
            branches: vec!["Computer Science".into(), "Electronics".into()],
            years: vec!["1".into(), "2".into()],
        }
    }

    #[test]
    fn test_checkboxes_follow_state() {
        let panel = FilterPanel::new();
        let state = reduce(
            FilterState::new(),
            FilterAction::Toggle {
                facet: Facet::Institute,
                value: "NIT Calicut".into(),
                checked: true,
            },
        );
        let boxes = panel.checkboxes(Facet::Institute, &state, &options());
        let checked: Vec<_> = boxes
            .iter()
            .filter(|b| b.checked)
            .map(|b| b.value.as_str())
            .collect();
        assert_eq!(checked, ["NIT Calicut"]);

        let cleared = reduce(state, FilterAction::Clear);
        let boxes = panel.checkboxes(Facet::Institute, &cleared, &options());
        let checked: Vec<_> = boxes
            .iter()
            .filter(|b| b.checked)
            .map(|b| b.value.as_str())
            .collect();
        assert_eq!(checked, [ALL_VALUE]);
    }

    #[test]
    fn test_option_search_hides_non_matching() {
        let mut panel = FilterPanel::new();
        panel.set_option_query(Facet::Branch, "elec");
        let boxes = panel.checkboxes(Facet::Branch, &FilterState::new(), &options());
        let visible: Vec<_> = boxes
            .iter()
            .filter(|b| b.visible)
            .map(|b| b.value.as_str())
            .collect();
        assert_eq!(visible, ["Electronics"]);
    }

    #[test]
    fn test_reset_inputs() {
        let mut panel = FilterPanel::new();
        panel.set_option_query(Facet::Institute, "iit");
        panel.set_skill_query("py");
        panel.set_suggestions(vec!["Python".into()]);
        panel.reset_inputs();
        assert_eq!(panel.option_query(Facet::Institute), "");
        assert_eq!(panel.skill_query(), "");
        assert!(panel.suggestions().is_empty());
    }

    #[test]
    fn test_accordion_toggle() {
        let mut panel = FilterPanel::new();
        assert!(panel.toggle_section(PanelSection::Skills));
        assert!(panel.is_expanded(PanelSection::Skills));
        assert!(!panel.toggle_section(PanelSection::Skills));
        assert!(!panel.is_expanded(PanelSection::Skills));
    }
}
