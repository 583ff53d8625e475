//! PathFind CLI - Browse and save bookmarks from the command line

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use pathfind_core::share::SaveOptions;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::{run_list, ListOptions};
use crate::commands::save::run_save;
use crate::commands::tags::{run_collections, run_tags};
use crate::commands::toggle::{run_toggle, ToggleFlag};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "pathfind=info".parse::<tracing_subscriber::filter::Directive>() {
        env_filter = env_filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Some(Commands::List {
            filter,
            sort,
            search,
            tag,
            collection,
            pages,
            nsfw,
            json,
        }) => {
            let options = ListOptions {
                filter: filter.into(),
                sort: sort.into(),
                search,
                tag,
                collection,
                pages,
                nsfw,
                json,
            };
            run_list(options, profile).await?;
        }
        Some(Commands::Delete { id }) => run_delete(&id, profile).await?,
        Some(Commands::Archive { id }) => run_toggle(ToggleFlag::Archived, &id, profile).await?,
        Some(Commands::ReadLater { id }) => {
            run_toggle(ToggleFlag::ReadLater, &id, profile).await?;
        }
        Some(Commands::Tags { json }) => run_tags(json, profile).await?,
        Some(Commands::Collections { json }) => run_collections(json, profile).await?,
        Some(Commands::Save {
            input,
            title,
            tags,
            read_later,
        }) => {
            let options = SaveOptions {
                title,
                tags,
                read_later,
            };
            run_save(&input, options, profile).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Config { command }) => run_config(command, profile)?,
        Some(Commands::Auth { command }) => run_auth(command, profile).await?,
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
