use pathfind_core::share::{extract_shared_link, save_shared_link, SaveOptions};

use crate::commands::common::{
    open_service, read_piped_stdin, resolve_profile, shared_items_from_text, short_id,
};
use crate::error::CliError;

pub async fn run_save(
    input_parts: &[String],
    options: SaveOptions,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let text = resolve_save_input(input_parts, read_piped_stdin)?;
    let link = extract_shared_link(&shared_items_from_text(&text))
        .ok_or_else(|| CliError::NoUrlFound(text.clone()))?;

    let resolved = resolve_profile(global_profile)?;
    let (_, service) = open_service(&resolved.credentials)?;
    let saved = save_shared_link(&service, &link, options).await?;

    println!("{}  {}", short_id(&saved.id), saved.url);
    Ok(())
}

/// Arguments win; stdin is read only when none were given.
pub fn resolve_save_input(
    input_parts: &[String],
    read_stdin: impl FnOnce() -> Result<Option<String>, CliError>,
) -> Result<String, CliError> {
    let joined = input_parts.join(" ");
    if !joined.trim().is_empty() {
        return Ok(joined.trim().to_string());
    }
    read_stdin()?.ok_or(CliError::NothingToSave)
}
