use std::env;

use pathfind_core::config::normalize_server_url;
use pathfind_core::presentation::NsfwDisplayMode;

use crate::auth::open_session;
use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, normalize_text_option, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            server_url,
            nsfw_display,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            server_url,
            nsfw_display,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    server_url: Option<String>,
    nsfw_display: Option<NsfwDisplayMode>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_server_url = config
        .profile(&profile_name)
        .and_then(|profile| profile.server_url());

    let merged_server_url = resolve_server_url(
        server_url,
        env::var("PATHFIND_SERVER_URL").ok(),
        existing_server_url,
    )?;

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(url) = merged_server_url {
        profile.server_url = Some(url);
    }
    if let Some(mode) = nsfw_display {
        profile.nsfw_display = Some(mode);
    }
    let ready = profile.server_url().is_some();

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    if ready {
        println!("Run `pathfind auth login --api-key <key>` to sign in.");
    } else {
        println!("Profile '{profile_name}' is missing: server_url");
    }

    Ok(())
}

/// Explicit flag, then environment, then the stored value; validated when set.
pub fn resolve_server_url(
    explicit: Option<String>,
    from_env: Option<String>,
    existing: Option<String>,
) -> Result<Option<String>, CliError> {
    normalize_text_option(explicit)
        .or_else(|| normalize_text_option(from_env))
        .or(existing)
        .map(normalize_server_url)
        .transpose()
        .map_err(|error| CliError::Config(error.to_string()))
}

fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let path = default_config_path().map_err(CliError::Config)?;

    println!("config:       {}", path.display());
    println!("profile:      {profile_name}");
    let Some(profile) = config.profile(&profile_name) else {
        println!("Profile '{profile_name}' is not configured.");
        return Ok(());
    };
    println!(
        "server_url:   {}",
        profile.server_url().as_deref().unwrap_or("(unset)")
    );
    println!("nsfw_display: {}", profile.nsfw_display());
    let signed_in = open_session(&profile_name).is_authenticated();
    println!("signed_in:    {signed_in}");
    Ok(())
}
