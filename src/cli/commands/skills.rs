//! skilllink skills - Skill name suggestions

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{OutputMode, emit_json, robot_ok};
use crate::error::Result;
use crate::filter::SkillRequirements;
use crate::search::search_skills;

#[derive(Args, Debug)]
pub struct SkillsArgs {
    /// Partial skill name
    #[arg(default_value = "")]
    pub query: String,
}

pub async fn run(ctx: &AppContext, args: &SkillsArgs) -> Result<()> {
    let client = ctx.api_client()?;
    let names = search_skills(&client, &args.query, &SkillRequirements::new()).await?;

    match ctx.output_mode() {
        OutputMode::Robot => emit_json(&robot_ok(&names)),
        OutputMode::Human => {
            for name in &names {
                println!("{name}");
            }
            Ok(())
        }
    }
}
