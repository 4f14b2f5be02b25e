//! Skill rating modal.
//!
//! `Closed -> Open(skill, pending) -> Closed`. Only one skill is rated at a
//! time; opening again replaces the target.

use serde::Serialize;

use crate::error::{Result, SkillLinkError};

use super::{FilterState, SkillLevel, SkillRequirement};

pub const MISSING_LEVEL_PROMPT: &str = "Please select a minimum skill level (1-5).";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum PickerState {
    #[default]
    Closed,
    Open {
        skill: String,
        pending: Option<SkillLevel>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillRatingPicker {
    state: PickerState,
    message: String,
}

impl SkillRatingPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, skill: impl Into<String>) {
        self.state = PickerState::Open {
            skill: skill.into(),
            pending: None,
        };
        self.message.clear();
    }

    pub fn select_level(&mut self, level: u8) -> Result<SkillLevel> {
        let PickerState::Open { pending, .. } = &mut self.state else {
            return Err(SkillLinkError::Validation(
                "no skill is being rated".to_string(),
            ));
        };
        let level = SkillLevel::new(level)?;
        *pending = Some(level);
        self.message = format!("Minimum Level: {}", level.label());
        Ok(level)
    }

    /// Commit the pending level into `filters` and close.
    ///
    /// Without a selected level the picker stays open and the prompt is
    /// returned as a validation error.
    pub fn confirm(&mut self, filters: &mut FilterState) -> Result<SkillRequirement> {
        let PickerState::Open { skill, pending } = &self.state else {
            return Err(SkillLinkError::Validation(
                "no skill is being rated".to_string(),
            ));
        };
        let Some(level) = *pending else {
            return Err(SkillLinkError::Validation(MISSING_LEVEL_PROMPT.to_string()));
        };

        let requirement = SkillRequirement {
            name: skill.clone(),
            level,
        };
        filters.skills.set(requirement.name.clone(), level);
        self.close();
        Ok(requirement)
    }

    /// Cancel button or a click outside the modal surface.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = PickerState::Closed;
        self.message.clear();
    }

    #[must_use]
    pub const fn state(&self) -> &PickerState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open { .. })
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match &self.state {
            PickerState::Open { skill, .. } => Some(skill),
            PickerState::Closed => None,
        }
    }

    #[must_use]
    pub const fn pending(&self) -> Option<SkillLevel> {
        match &self.state {
            PickerState::Open { pending, .. } => *pending,
            PickerState::Closed => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
