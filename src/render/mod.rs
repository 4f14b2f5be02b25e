//! Result rendering.
//!
//! Records become view models first ([`CardView`], [`ResultsView`]) so the
//! terminal formatter and robot output share them. HTML output goes through
//! [`escape_html`] for every interpolated value.

use serde::Serialize;

use crate::api::UserRecord;
use crate::config::RenderConfig;
use crate::filter::SkillRequirements;

pub const FULL_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';
pub const MAX_STARS: i64 = 5;

pub const LOADING_MESSAGE: &str = "Searching...";
pub const EMPTY_MESSAGE: &str = "No users found matching your criteria.";
pub const ERROR_MESSAGE: &str = "Error communicating with server.";
pub const NO_SKILLS_MESSAGE: &str = "No skills listed.";
pub const UNKNOWN_USER: &str = "Unknown User";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const UNKNOWN_SKILL: &str = "Unknown Skill";
pub const APPLIED_SKILLS_TITLE: &str = "Applied Skill Filters";
pub const NO_APPLIED_SKILLS: &str = "None";

/// Escape text for use in HTML content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Five glyphs: `rating` filled then the rest empty. Clamped to 0..=5.
#[must_use]
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_STARS);
    (0..MAX_STARS)
        .map(|i| if i < filled { FULL_STAR } else { EMPTY_STAR })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub placeholder_avatar: String,
    pub profile_page: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            placeholder_avatar: config.placeholder_avatar.clone(),
            profile_page: config.profile_page.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillBadge {
    pub name: String,
    pub rating: i64,
    pub stars: String,
}

/// One student card with every default already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: String,
    pub href: String,
    pub avatar: String,
    pub name: String,
    pub location: String,
    pub skills: Vec<SkillBadge>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|text| !text.is_empty())
}

impl CardView {
    #[must_use]
    pub fn from_user(user: &UserRecord, options: &RenderOptions) -> Self {
        let skills = user
            .skills
            .iter()
            .map(|skill| {
                let rating = skill.rating.clamp(0, MAX_STARS);
                SkillBadge {
                    name: non_empty(skill.name.as_ref())
                        .unwrap_or(UNKNOWN_SKILL)
                        .to_string(),
                    rating,
                    stars: stars(rating),
                }
            })
            .collect();

        Self {
            id: user.id.clone(),
            href: format!(
                "{}?id={}",
                options.profile_page,
                urlencoding::encode(&user.id)
            ),
            avatar: non_empty(user.image.as_ref())
                .unwrap_or(&options.placeholder_avatar)
                .to_string(),
            name: non_empty(user.full_name.as_ref())
                .unwrap_or(UNKNOWN_USER)
                .to_string(),
            location: non_empty(user.institute_name.as_ref())
                .unwrap_or(UNKNOWN_LOCATION)
                .to_string(),
            skills,
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            r#"<a class="student-link" href="{}">"#,
            escape_html(&self.href)
        ));
        html.push_str(r#"<div class="student-card"><div class="card-header">"#);
        html.push_str(&format!(
            r#"<img src="{}" alt="{}" class="profile-pic"><h3>{}</h3></div>"#,
            escape_html(&self.avatar),
            escape_html(&self.name),
            escape_html(&self.name)
        ));
        if self.skills.is_empty() {
            html.push_str(&format!(
                r#"<p class="no-skills">{NO_SKILLS_MESSAGE}</p>"#
            ));
        }
        for skill in &self.skills {
            html.push_str(&format!(
                r#"<div class="skill-item"><strong>{}</strong><span class="star-rating">{}</span></div>"#,
                escape_html(&skill.name),
                skill.stars
            ));
        }
        html.push_str(&format!(
            "<small>{}</small></div></a>",
            escape_html(&self.location)
        ));
        html
    }
}

/// What the results area shows. Exactly one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "cards")]
pub enum ResultsView {
    Loading,
    Empty,
    Error,
    Cards(Vec<CardView>),
}

impl ResultsView {
    /// Placeholder text for the non-card states.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_MESSAGE),
            Self::Empty => Some(EMPTY_MESSAGE),
            Self::Error => Some(ERROR_MESSAGE),
            Self::Cards(_) => None,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    #[must_use]
    pub fn cards(&self) -> &[CardView] {
        match self {
            Self::Cards(cards) => cards,
            _ => &[],
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Cards(cards) => cards.iter().map(CardView::to_html).collect(),
            Self::Error => format!(r#"<p class="empty-state error">{ERROR_MESSAGE}</p>"#),
            Self::Loading => format!(r#"<p class="empty-state">{LOADING_MESSAGE}</p>"#),
            Self::Empty => format!(r#"<p class="empty-state">{EMPTY_MESSAGE}</p>"#),
        }
    }
}

#[must_use]
pub fn render_results(users: &[UserRecord], options: &RenderOptions) -> ResultsView {
    if users.is_empty() {
        return ResultsView::Empty;
    }
    ResultsView::Cards(
        users
            .iter()
            .map(|user| CardView::from_user(user, options))
            .collect(),
    )
}

/// Label for the profile page header.
#[must_use]
pub fn profile_header_label(user: &UserRecord) -> &str {
    non_empty(user.institute_name.as_ref()).unwrap_or(UNKNOWN_LOCATION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub tone: Tone,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Info,
            text: text.into(),
        }
    }
}

/// Lines of the applied-skill list, e.g. `Python (Well experienced+)`.
#[must_use]
pub fn applied_skill_lines(skills: &SkillRequirements) -> Vec<String> {
    if skills.is_empty() {
        return vec![NO_APPLIED_SKILLS.to_string()];
    }
    skills
        .iter()
        .map(|req| format!("{} ({}+)", req.name, req.level.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SkillRating;
    use crate::filter::SkillLevel;

    fn user(id: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            ..UserRecord::default()
        }
    }

    #[test]
    fn test_stars_counts() {
        for rating in [0, 1, 3, 5] {
            let glyphs = stars(rating);
            assert_eq!(glyphs.chars().count(), 5);
            assert_eq!(
                glyphs.chars().filter(|c| *c == FULL_STAR).count(),
                usize::try_from(rating).unwrap()
            );
        }
    }

    #[test]
    fn test_stars_clamped() {
        assert_eq!(stars(-2), "☆☆☆☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn test_card_defaults() {
        let mut record = user("7");
        record.full_name = Some(String::new());
        record.skills = vec![SkillRating {
            name: None,
            rating: 3,
        }];
        let card = CardView::from_user(&record, &RenderOptions::default());

        assert_eq!(card.name, UNKNOWN_USER);
        assert_eq!(card.location, UNKNOWN_LOCATION);
        assert_eq!(card.avatar, "placeholder-avatar.png");
        assert_eq!(card.href, "user-profile.html?id=7");
        assert_eq!(card.skills[0].name, UNKNOWN_SKILL);
        assert_eq!(card.skills[0].stars, "★★★☆☆");
    }

    #[test]
    fn test_card_without_skills_shows_notice() {
        let card = CardView::from_user(&user("1"), &RenderOptions::default());
        assert!(card.to_html().contains(NO_SKILLS_MESSAGE));
    }

    #[test]
    fn test_html_is_escaped() {
        let mut record = user("1\"><script>");
        record.full_name = Some("<b>Mallory</b> & co".into());
        record.institute_name = Some("O'Reilly Institute".into());
        record.image = Some("x\" onerror=\"alert(1)".into());
        record.skills = vec![SkillRating {
            name: Some("<img src=x>".into()),
            rating: 2,
        }];

        let html = CardView::from_user(&record, &RenderOptions::default()).to_html();
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img src=x>"));
        assert!(!html.contains("onerror=\"alert"));
        assert!(html.contains("&lt;b&gt;Mallory&lt;/b&gt; &amp; co"));
        assert!(html.contains("O&#39;Reilly Institute"));
    }

    #[test]
    fn test_render_results_states() {
        let options = RenderOptions::default();
        assert_eq!(render_results(&[], &options), ResultsView::Empty);
        assert_eq!(
            ResultsView::Empty.message(),
            Some("No users found matching your criteria.")
        );
        assert_eq!(ResultsView::Loading.message(), Some("Searching..."));

        let view = render_results(&[user("1"), user("2")], &options);
        assert_eq!(view.cards().len(), 2);
        assert!(view.message().is_none());
    }

    #[test]
    fn test_error_view_is_distinguished() {
        let html = ResultsView::Error.to_html();
        assert!(html.contains("error"));
        assert!(html.contains(ERROR_MESSAGE));
        assert!(ResultsView::Error.is_error());
    }

    #[test]
    fn test_profile_header_label() {
        let mut record = user("4");
        assert_eq!(profile_header_label(&record), UNKNOWN_LOCATION);
        record.institute_name = Some("CET".into());
        assert_eq!(profile_header_label(&record), "CET");
    }

    #[test]
    fn test_applied_skill_lines() {
        let mut skills = SkillRequirements::new();
        assert_eq!(applied_skill_lines(&skills), ["None"]);
        skills.set("Python", SkillLevel::new(4).unwrap());
        assert_eq!(applied_skill_lines(&skills), ["Python (Well experienced+)"]);
    }
}
