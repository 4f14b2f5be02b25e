//! skilllink login - Authenticate and record the session

use clap::Args;

use crate::app::AppContext;
use crate::cli::formatters::results::format_status;
use crate::cli::output::{OutputMode, emit_json, robot_ok};
use crate::error::{Result, SkillLinkError};
use crate::login::submit_login;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    pub username: String,

    /// Account password
    #[arg(long, env = "SKILLLINK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(ctx: &AppContext, args: &LoginArgs) -> Result<()> {
    let client = ctx.api_client()?;
    let outcome = submit_login(&client, &args.username, &args.password).await;

    if !outcome.succeeded() {
        return Err(SkillLinkError::LoginRejected(outcome.status.text));
    }
    if let Some(user_id) = &outcome.user_id {
        ctx.session.record_login(user_id)?;
    }

    match ctx.output_mode() {
        OutputMode::Robot => emit_json(&robot_ok(&outcome)),
        OutputMode::Human => {
            println!("{}", format_status(&outcome.status));
            Ok(())
        }
    }
}
