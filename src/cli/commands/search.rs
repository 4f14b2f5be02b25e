//! skilllink search - One-shot faceted student search

use clap::Args;
use serde::Serialize;
use tracing::{debug, error};

use crate::api::DirectoryApi;
use crate::app::AppContext;
use crate::cli::formatters::format_results;
use crate::cli::output::{OutputMode, emit_json, robot_ok};
use crate::error::Result;
use crate::filter::{Facet, FilterAction, FilterState, SkillLevel, SkillRequirement, reduce};
use crate::query::QueryBuilder;
use crate::render::{ResultsView, render_results};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text term matched by the backend
    #[arg(default_value = "")]
    pub query: String,

    /// Restrict to an institute (repeatable)
    #[arg(long)]
    pub institute: Vec<String>,

    /// Restrict to a branch (repeatable)
    #[arg(long)]
    pub branch: Vec<String>,

    /// Restrict to a year of study (repeatable)
    #[arg(long)]
    pub year: Vec<String>,

    /// Minimum skill rating as NAME:LEVEL, level 1-5 (repeatable)
    #[arg(long = "skill", value_name = "NAME:LEVEL", value_parser = parse_skill_filter)]
    pub skills: Vec<SkillRequirement>,

    /// Do not hide the logged-in user from results
    #[arg(long)]
    pub include_self: bool,

    /// Print card markup instead of terminal output
    #[arg(long)]
    pub html: bool,
}

impl SearchArgs {
    /// Replay the flags through the same transitions the filter panel uses.
    #[must_use]
    pub fn filter_state(&self) -> FilterState {
        let toggles = [
            (Facet::Institute, &self.institute),
            (Facet::Branch, &self.branch),
            (Facet::Year, &self.year),
        ]
        .into_iter()
        .flat_map(|(facet, values)| {
            values.iter().map(move |value| FilterAction::Toggle {
                facet,
                value: value.clone(),
                checked: true,
            })
        });
        let skills = self.skills.iter().map(|req| FilterAction::SetSkill {
            name: req.name.clone(),
            level: req.level,
        });

        std::iter::once(FilterAction::SetTerm(self.query.clone()))
            .chain(toggles)
            .chain(skills)
            .fold(FilterState::new(), reduce)
    }
}

/// `NAME:LEVEL`; the name may itself contain colons.
pub fn parse_skill_filter(raw: &str) -> std::result::Result<SkillRequirement, String> {
    let (name, level) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:LEVEL, got {raw}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing skill name in {raw}"));
    }
    let level = level
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("level must be a number from 1 to 5, got {level}"))?;
    let level = SkillLevel::new(level).map_err(|err| err.to_string())?;
    Ok(SkillRequirement {
        name: name.to_string(),
        level,
    })
}

#[derive(Serialize)]
struct SearchReport<'a> {
    query: String,
    count: usize,
    results: &'a ResultsView,
}

pub async fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let client = ctx.api_client()?;
    let state = args.filter_state();
    let exclude_id = ctx.exclude_id(args.include_self)?;
    let query = QueryBuilder::from_state(&state, exclude_id.as_deref());
    debug!(query = %query, "search issued");
    if ctx.verbosity > 0 && ctx.output_mode() == OutputMode::Human {
        eprintln!("GET /api/students/search?{query}");
    }

    let users = match client.search_students(&query).await {
        Ok(users) => users,
        Err(err) => {
            error!(error = %err, "search request failed");
            if ctx.output_mode() == OutputMode::Human {
                println!("{}", format_results(&ResultsView::Error));
            }
            return Err(err);
        }
    };

    let view = render_results(&users, &ctx.render_options());
    match ctx.output_mode() {
        OutputMode::Robot => emit_json(&robot_ok(SearchReport {
            query: query.to_query_string(),
            count: users.len(),
            results: &view,
        })),
        OutputMode::Human if args.html => {
            println!("{}", view.to_html());
            Ok(())
        }
        OutputMode::Human => {
            println!("{}", format_results(&view));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FacetSelection;

    #[test]
    fn test_parse_skill_filter() {
        let req = parse_skill_filter("Python:4").unwrap();
        assert_eq!(req.name, "Python");
        assert_eq!(req.level.get(), 4);

        let req = parse_skill_filter("C++:2").unwrap();
        assert_eq!(req.name, "C++");

        let req = parse_skill_filter("Node.js: 5").unwrap();
        assert_eq!(req.level.get(), 5);

        assert!(parse_skill_filter("Python").is_err());
        assert!(parse_skill_filter("Python:6").is_err());
        assert!(parse_skill_filter(":3").is_err());
    }

    #[test]
    fn test_flags_become_filter_state() {
        let args = SearchArgs {
            query: "ali".into(),
            institute: vec!["IIT".into()],
            branch: Vec::new(),
            year: vec!["3".into(), "1".into()],
            skills: vec![parse_skill_filter("Python:4").unwrap()],
            include_self: false,
            html: false,
        };
        let state = args.filter_state();
        assert_eq!(state.term, "ali");
        assert_eq!(state.institute, FacetSelection::Values(vec!["IIT".into()]));
        assert!(state.branch.is_all());
        assert_eq!(state.year.values(), ["3", "1"]);
        assert_eq!(state.skills.get("Python").map(SkillLevel::get), Some(4));

        let query = QueryBuilder::from_state(&state, None);
        assert_eq!(
            query.to_query_string(),
            "q=ali&institute=IIT&year=3&year=1&skills=Python%3A4"
        );
    }
}
