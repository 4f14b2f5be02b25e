//! skilllink facets - List filter options

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::api::DirectoryApi;
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputMode, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::filter::{Facet, FacetOptions, visible_options};

#[derive(Args, Debug)]
pub struct FacetsArgs {
    /// Only show options containing this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Serialize)]
struct FacetsReport<'a> {
    institute: Vec<&'a str>,
    branch: Vec<&'a str>,
    year: Vec<&'a str>,
}

pub async fn run(ctx: &AppContext, args: &FacetsArgs) -> Result<()> {
    let client = ctx.api_client()?;
    let (institutes, branches) = tokio::join!(client.institutes(), client.branches());
    let options = FacetOptions {
        institutes: institutes?.into_iter().map(|inst| inst.name).collect(),
        branches: branches?,
        years: ctx.config.facets.years.clone(),
    };
    info!(
        institutes = options.institutes.len(),
        branches = options.branches.len(),
        "filter options loaded"
    );

    let needle = args.filter.as_deref().unwrap_or("");
    let shown = |facet: Facet| visible_options(options.for_facet(facet), needle);
    let report = FacetsReport {
        institute: shown(Facet::Institute),
        branch: shown(Facet::Branch),
        year: shown(Facet::Year),
    };

    match ctx.output_mode() {
        OutputMode::Robot => emit_json(&robot_ok(&report)),
        OutputMode::Human => {
            let mut layout = HumanLayout::new();
            for (title, values) in [
                ("Institutes", &report.institute),
                ("Branches", &report.branch),
                ("Years", &report.year),
            ] {
                layout.section(title);
                if values.is_empty() {
                    layout.push_line("(none)");
                }
                for value in values {
                    layout.bullet(value);
                }
                layout.blank();
            }
            emit_human(layout);
            Ok(())
        }
    }
}
