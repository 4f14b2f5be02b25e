//! Faceted filter state.
//!
//! Holds the facet selections (institute, branch, year), the per-skill
//! minimum rating requirements and the free-text term. All transitions go
//! through [`reduce`] so they can be exercised without any UI wiring.

pub mod panel;
pub mod picker;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, SkillLinkError};

pub use panel::{CheckboxView, FacetOptions, FilterPanel, PanelSection};
pub use picker::{PickerState, SkillRatingPicker};

/// Value of the pseudo-option meaning "no restriction on this facet".
pub const ALL_VALUE: &str = "all";

/// A filter dimension with a closed set of selectable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Institute,
    Branch,
    Year,
}

impl Facet {
    pub const ALL: [Self; 3] = [Self::Institute, Self::Branch, Self::Year];

    /// Query parameter name used on the search endpoint.
    #[must_use]
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Institute => "institute",
            Self::Branch => "branch",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

impl FromStr for Facet {
    type Err = SkillLinkError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "institute" => Ok(Self::Institute),
            "branch" => Ok(Self::Branch),
            "year" => Ok(Self::Year),
            other => Err(SkillLinkError::Validation(format!(
                "unknown facet {other} (expected institute|branch|year)"
            ))),
        }
    }
}

/// Selection for one facet: unrestricted, or an ordered set of values.
///
/// `Values` is never empty; the last deselection falls back to `All`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum FacetSelection {
    #[default]
    All,
    Values(Vec<String>),
}

impl FacetSelection {
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Concrete values in selection order (empty for `All`).
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Values(values) => values,
        }
    }

    /// Whether the checkbox for `value` is checked.
    #[must_use]
    pub fn is_checked(&self, value: &str) -> bool {
        if value == ALL_VALUE {
            return self.is_all();
        }
        self.values().iter().any(|v| v == value)
    }

    /// Apply a checkbox change for `value`.
    pub fn toggle(&mut self, value: &str, checked: bool) {
        if value == ALL_VALUE {
            // Unchecking "all" with nothing else selected leaves it checked.
            if checked {
                *self = Self::All;
            }
            return;
        }

        let mut values = match std::mem::take(self) {
            Self::All => Vec::new(),
            Self::Values(values) => values,
        };
        if checked {
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        } else {
            values.retain(|v| v != value);
        }
        *self = if values.is_empty() {
            Self::All
        } else {
            Self::Values(values)
        };
    }
}

const LEVEL_LABELS: [&str; 5] = [
    "Beginner",
    "Have experience",
    "Intermediate",
    "Well experienced",
    "Expert",
];

/// Minimum proficiency level, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SkillLevel(u8);

impl SkillLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(SkillLinkError::Validation(format!(
                "skill level must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Human label shown in the rating modal and the applied-filters list.
    #[must_use]
    pub const fn label(self) -> &'static str {
        LEVEL_LABELS[(self.0 - 1) as usize]
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = SkillLinkError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillRequirement {
    pub name: String,
    pub level: SkillLevel,
}

/// Skill name to minimum level, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillRequirements {
    entries: Vec<SkillRequirement>,
}

impl SkillRequirements {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or update; an existing key keeps its position.
    pub fn set(&mut self, name: impl Into<String>, level: SkillLevel) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.level = level;
            return;
        }
        self.entries.push(SkillRequirement { name, level });
    }

    pub fn remove(&mut self, name: &str) -> Option<SkillLevel> {
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index).level)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<SkillLevel> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.level)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillRequirement> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything the search endpoint filters on, plus the free-text term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub institute: FacetSelection,
    pub branch: FacetSelection,
    pub year: FacetSelection,
    pub skills: SkillRequirements,
    pub term: String,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn facet(&self, facet: Facet) -> &FacetSelection {
        match facet {
            Facet::Institute => &self.institute,
            Facet::Branch => &self.branch,
            Facet::Year => &self.year,
        }
    }

    pub fn facet_mut(&mut self, facet: Facet) -> &mut FacetSelection {
        match facet {
            Facet::Institute => &mut self.institute,
            Facet::Branch => &mut self.branch,
            Facet::Year => &mut self.year,
        }
    }

    pub fn toggle_facet_value(&mut self, facet: Facet, value: &str, checked: bool) {
        self.facet_mut(facet).toggle(value, checked);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A discrete user action on the filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Toggle {
        facet: Facet,
        value: String,
        checked: bool,
    },
    SetTerm(String),
    SetSkill {
        name: String,
        level: SkillLevel,
    },
    RemoveSkill(String),
    Clear,
}

/// Pure transition function: current state and an action in, next state out.
#[must_use]
pub fn reduce(mut state: FilterState, action: FilterAction) -> FilterState {
    match action {
        FilterAction::Toggle {
            facet,
            value,
            checked,
        } => state.toggle_facet_value(facet, &value, checked),
        FilterAction::SetTerm(term) => state.term = term,
        FilterAction::SetSkill { name, level } => state.skills.set(name, level),
        FilterAction::RemoveSkill(name) => {
            state.skills.remove(&name);
        }
        FilterAction::Clear => state.clear(),
    }
    state
}

/// Options whose text contains `needle`, case-insensitively.
///
/// The `all` pseudo-option is never part of a filtered listing.
#[must_use]
pub fn visible_options<'a>(options: &'a [String], needle: &str) -> Vec<&'a str> {
    let needle = needle.to_lowercase();
    options
        .iter()
        .map(String::as_str)
        .filter(|option| *option != ALL_VALUE)
        .filter(|option| option.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(facet: Facet, value: &str, checked: bool) -> FilterAction {
        FilterAction::Toggle {
            facet,
            value: value.to_string(),
            checked,
        }
    }

    #[test]
    fn test_selecting_value_clears_all() {
        let state = reduce(FilterState::new(), toggle(Facet::Institute, "IIT Bombay", true));
        assert_eq!(
            state.institute,
            FacetSelection::Values(vec!["IIT Bombay".to_string()])
        );
        assert!(!state.institute.is_checked(ALL_VALUE));
        assert!(state.branch.is_all());
    }

    #[test]
    fn test_deselecting_last_value_reverts_to_all() {
        let state = reduce(FilterState::new(), toggle(Facet::Branch, "Mechanical", true));
        let state = reduce(state, toggle(Facet::Branch, "Mechanical", false));
        assert!(state.branch.is_all());
        assert!(state.branch.is_checked(ALL_VALUE));
    }

    #[test]
    fn test_checking_all_drops_concrete_values() {
        let state = reduce(FilterState::new(), toggle(Facet::Year, "2", true));
        let state = reduce(state, toggle(Facet::Year, "3", true));
        let state = reduce(state, toggle(Facet::Year, ALL_VALUE, true));
        assert!(state.year.is_all());
        assert!(!state.year.is_checked("2"));
    }

    #[test]
    fn test_unchecking_all_keeps_all() {
        let state = reduce(FilterState::new(), toggle(Facet::Year, ALL_VALUE, false));
        assert!(state.year.is_all());
    }

    #[test]
    fn test_selection_order_preserved_without_duplicates() {
        let mut selection = FacetSelection::All;
        selection.toggle("NIT Calicut", true);
        selection.toggle("IIT Bombay", true);
        selection.toggle("NIT Calicut", true);
        assert_eq!(selection.values(), ["NIT Calicut", "IIT Bombay"]);
    }

    #[test]
    fn test_skill_levels_and_labels() {
        assert!(SkillLevel::new(0).is_err());
        assert!(SkillLevel::new(6).is_err());
        let labels: Vec<_> = (1..=5)
            .map(|n| SkillLevel::new(n).unwrap().label())
            .collect();
        assert_eq!(
            labels,
            [
                "Beginner",
                "Have experience",
                "Intermediate",
                "Well experienced",
                "Expert"
            ]
        );
    }

    #[test]
    fn test_skill_requirements_insertion_order() {
        let mut skills = SkillRequirements::new();
        skills.set("Python", SkillLevel::new(4).unwrap());
        skills.set("HTML", SkillLevel::new(2).unwrap());
        skills.set("Python", SkillLevel::new(5).unwrap());
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Python", "HTML"]);
        assert_eq!(skills.get("Python").map(SkillLevel::get), Some(5));
        assert_eq!(skills.remove("HTML").map(SkillLevel::get), Some(2));
        assert!(!skills.contains("HTML"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = reduce(FilterState::new(), toggle(Facet::Institute, "CET", true));
        state = reduce(state, FilterAction::SetTerm("ali".into()));
        state = reduce(
            state,
            FilterAction::SetSkill {
                name: "Java".into(),
                level: SkillLevel::new(3).unwrap(),
            },
        );
        assert!(!state.is_default());
        let state = reduce(state, FilterAction::Clear);
        assert!(state.is_default());
    }

    #[test]
    fn test_visible_options_case_insensitive() {
        let options = vec![
            "IIT Bombay".to_string(),
            "NIT Calicut".to_string(),
            "Saintgits College of Engineering".to_string(),
        ];
        assert_eq!(visible_options(&options, "it"), options.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(visible_options(&options, "CALI"), ["NIT Calicut"]);
        assert!(visible_options(&options, "xyz").is_empty());
    }

    #[test]
    fn test_facet_parse() {
        assert_eq!("Institute".parse::<Facet>().unwrap(), Facet::Institute);
        assert_eq!(" year ".parse::<Facet>().unwrap(), Facet::Year);
        assert!("skill".parse::<Facet>().is_err());
    }
}
