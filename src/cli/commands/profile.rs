//! skilllink profile - Show one student

use clap::Args;
use serde::Serialize;

use crate::api::DirectoryApi;
use crate::app::AppContext;
use crate::cli::formatters::format_card;
use crate::cli::output::{HumanLayout, OutputMode, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::render::{CardView, profile_header_label};

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Student id
    pub id: String,
}

#[derive(Serialize)]
struct ProfileReport<'a> {
    header: &'a str,
    card: CardView,
    branch: Option<&'a str>,
    year: Option<i64>,
    bio: Option<&'a str>,
}

pub async fn run(ctx: &AppContext, args: &ProfileArgs) -> Result<()> {
    let client = ctx.api_client()?;
    let user = client.profile(&args.id).await?;
    let report = ProfileReport {
        header: profile_header_label(&user),
        card: CardView::from_user(&user, &ctx.render_options()),
        branch: user.branch.as_deref(),
        year: user.year,
        bio: user.bio.as_deref(),
    };

    match ctx.output_mode() {
        OutputMode::Robot => emit_json(&robot_ok(&report)),
        OutputMode::Human => {
            let mut layout = HumanLayout::new();
            layout.title(report.header);
            layout.push_line(format_card(&report.card));
            if let Some(branch) = report.branch {
                layout.kv("Branch", branch);
            }
            if let Some(year) = report.year {
                layout.kv("Year", &year.to_string());
            }
            if let Some(bio) = report.bio {
                layout.kv("Bio", bio);
            }
            emit_human(layout);
            Ok(())
        }
    }
}
