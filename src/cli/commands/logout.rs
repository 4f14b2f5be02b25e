//! skilllink logout - Forget the recorded user

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{OutputMode, emit_robot, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

#[derive(Serialize)]
struct LogoutReport {
    logged_out: bool,
}

pub fn run(ctx: &AppContext, _args: &LogoutArgs) -> Result<()> {
    let logged_out = ctx.session.clear()?;

    match ctx.output_mode() {
        OutputMode::Robot => {
            let response = robot_ok(LogoutReport { logged_out });
            let response = if logged_out {
                response
            } else {
                response.with_warning("no user was logged in")
            };
            emit_robot(&response)
        }
        OutputMode::Human => {
            if logged_out {
                println!("Logged out.");
            } else {
                println!("No user was logged in.");
            }
            Ok(())
        }
    }
}
