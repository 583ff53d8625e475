use pathfind_core::session::Credentials;
use pathfind_core::BookmarkService;

use crate::auth::open_session;
use crate::cli::AuthCommands;
use crate::commands::common::open_service;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;

    match command {
        AuthCommands::Login { profile, api_key } => {
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let server_url = config
                .profile(&profile_name)
                .and_then(|profile| profile.server_url())
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "Profile '{profile_name}' is not configured. Run `pathfind config init --profile {profile_name} --server-url <url>` first."
                    ))
                })?;
            let credentials = Credentials::new(server_url, api_key)?;

            // Verify the key before storing it.
            let (_, service) = open_service(&credentials)?;
            service
                .fetch_tags()
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;

            let mut session = open_session(&profile_name);
            session
                .sign_in(credentials)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            tracing::info!(profile = %profile_name, "Stored API key");
            println!("Signed in profile '{profile_name}'");
            Ok(())
        }
        AuthCommands::Status { profile } => {
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let session = open_session(&profile_name);
            match session.credentials() {
                Some(credentials) => println!(
                    "Profile '{}' is signed in to {}",
                    profile_name,
                    credentials.server_url()
                ),
                None => println!("Profile '{profile_name}' is not signed in."),
            }
            Ok(())
        }
        AuthCommands::Logout { profile } => {
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let mut session = open_session(&profile_name);
            session
                .sign_out()
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
