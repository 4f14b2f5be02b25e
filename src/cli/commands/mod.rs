//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod browse;
pub mod facets;
pub mod login;
pub mod logout;
pub mod profile;
pub mod search;
pub mod skills;

use crate::app::AppContext;
use crate::error::Result;

/// Dispatch on a fresh multi-threaded runtime.
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match command {
            Commands::Login(args) => login::run(ctx, args).await,
            Commands::Logout(args) => logout::run(ctx, args),
            Commands::Search(args) => search::run(ctx, args).await,
            Commands::Facets(args) => facets::run(ctx, args).await,
            Commands::Skills(args) => skills::run(ctx, args).await,
            Commands::Profile(args) => profile::run(ctx, args).await,
            Commands::Browse(args) => browse::run(ctx, args).await,
        }
    })
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and remember the user id for later searches
    Login(login::LoginArgs),

    /// Forget the logged-in user
    Logout(logout::LogoutArgs),

    /// Search students once and print the results
    Search(search::SearchArgs),

    /// List institute, branch and year filter options
    Facets(facets::FacetsArgs),

    /// Suggest skill names for a partial query
    Skills(skills::SkillsArgs),

    /// Show one student's profile card
    Profile(profile::ProfileArgs),

    /// Interactive search session driven by stdin
    Browse(browse::BrowseArgs),
}
