//! Search results and controller updates for the terminal.

use console::style;

use crate::filter::{CheckboxView, PickerState};
use crate::render::{
    APPLIED_SKILLS_TITLE, CardView, NO_SKILLS_MESSAGE, ResultsView, StatusMessage, Tone,
};
use crate::search::ControllerUpdate;

#[must_use]
pub fn format_card(card: &CardView) -> String {
    let mut out = format!(
        "{}  {}\n",
        style(&card.name).bold(),
        style(format!("#{}", card.id)).dim()
    );
    if card.skills.is_empty() {
        out.push_str(&format!("  {}\n", style(NO_SKILLS_MESSAGE).dim()));
    }
    let width = card
        .skills
        .iter()
        .map(|skill| skill.name.chars().count())
        .max()
        .unwrap_or(0);
    for skill in &card.skills {
        out.push_str(&format!(
            "  {:width$}  {}\n",
            skill.name,
            style(&skill.stars).yellow()
        ));
    }
    out.push_str(&format!("  {}\n", style(&card.location).dim()));
    out
}

#[must_use]
pub fn format_results(view: &ResultsView) -> String {
    match view {
        ResultsView::Cards(cards) => cards
            .iter()
            .map(format_card)
            .collect::<Vec<_>>()
            .join("\n"),
        ResultsView::Error => view
            .message()
            .map(|text| style(text).red().to_string())
            .unwrap_or_default(),
        ResultsView::Loading | ResultsView::Empty => view
            .message()
            .map(|text| style(text).dim().to_string())
            .unwrap_or_default(),
    }
}

#[must_use]
pub fn format_status(status: &StatusMessage) -> String {
    match status.tone {
        Tone::Success => style(&status.text).green().to_string(),
        Tone::Error => style(&status.text).red().to_string(),
        Tone::Info => status.text.clone(),
    }
}

fn format_checkboxes(boxes: &[CheckboxView]) -> String {
    boxes
        .iter()
        .filter(|checkbox| checkbox.visible)
        .map(|checkbox| {
            let mark = if checkbox.checked { "x" } else { " " };
            format!("[{mark}] {}", checkbox.value)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// One printable block per update; `None` for updates with nothing to show.
#[must_use]
pub fn format_update(update: &ControllerUpdate) -> Option<String> {
    match update {
        ControllerUpdate::Results(view) => Some(format_results(view)),
        ControllerUpdate::Suggestions(names) if names.is_empty() => None,
        ControllerUpdate::Suggestions(names) => {
            Some(format!("Suggestions: {}", names.join(", ")))
        }
        ControllerUpdate::FacetOptions(options) => Some(format!(
            "Loaded {} institutes, {} branches",
            options.institutes.len(),
            options.branches.len()
        )),
        ControllerUpdate::Checkboxes { facet, boxes } => {
            Some(format!("{facet}: {}", format_checkboxes(boxes)))
        }
        ControllerUpdate::Picker { state, message } => match state {
            PickerState::Closed => None,
            PickerState::Open { skill, .. } if message.is_empty() => {
                Some(format!("Rate {skill}: choose a minimum level with :level 1-5"))
            }
            PickerState::Open { skill, .. } => Some(format!("Rate {skill}: {message}")),
        },
        ControllerUpdate::AppliedSkills(lines) => {
            Some(format!("{APPLIED_SKILLS_TITLE}: {}", lines.join(", ")))
        }
        ControllerUpdate::Filters(_) => None,
        ControllerUpdate::Panel { open, expanded } => {
            let state = if *open { "open" } else { "closed" };
            if expanded.is_empty() {
                Some(format!("Filters {state}"))
            } else {
                let sections = expanded
                    .iter()
                    .map(|section| format!("{section:?}").to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("Filters {state} (expanded: {sections})"))
            }
        }
        ControllerUpdate::Status(status) => Some(format_status(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Facet, PanelSection};
    use crate::render::{RenderOptions, render_results};
    use crate::test_utils::fixtures::{user_named, user_with_skills};

    fn plain() {
        console::set_colors_enabled(false);
    }

    #[test]
    fn test_card_lists_skills_with_stars() {
        plain();
        let user = user_with_skills("1", "Lakshmi Priya", "Saintgits", &[("Python", 4), ("HTML", 3)]);
        let view = render_results(&[user], &RenderOptions::default());
        let text = format_results(&view);
        assert!(text.contains("Lakshmi Priya"));
        assert!(text.contains("Python  ★★★★☆"));
        assert!(text.contains("HTML    ★★★☆☆"));
        assert!(text.contains("Saintgits"));
    }

    #[test]
    fn test_card_without_skills() {
        plain();
        let view = render_results(&[user_named("2", "Miza")], &RenderOptions::default());
        assert!(format_results(&view).contains(NO_SKILLS_MESSAGE));
    }

    #[test]
    fn test_placeholder_states() {
        plain();
        assert_eq!(format_results(&ResultsView::Empty), "No users found matching your criteria.");
        assert_eq!(format_results(&ResultsView::Error), "Error communicating with server.");
    }

    #[test]
    fn test_update_lines() {
        plain();
        let boxes = vec![
            CheckboxView {
                value: "all".into(),
                checked: true,
                visible: true,
            },
            CheckboxView {
                value: "CET".into(),
                checked: false,
                visible: true,
            },
            CheckboxView {
                value: "IIT".into(),
                checked: false,
                visible: false,
            },
        ];
        assert_eq!(
            format_update(&ControllerUpdate::Checkboxes {
                facet: Facet::Institute,
                boxes
            })
            .unwrap(),
            "institute: [x] all  [ ] CET"
        );
        assert_eq!(
            format_update(&ControllerUpdate::Panel {
                open: true,
                expanded: vec![PanelSection::Skills]
            })
            .unwrap(),
            "Filters open (expanded: skills)"
        );
        assert!(format_update(&ControllerUpdate::Suggestions(Vec::new())).is_none());
        assert_eq!(
            format_update(&ControllerUpdate::AppliedSkills(vec!["None".into()])).unwrap(),
            "Applied Skill Filters: None"
        );
    }
}
