use crate::commands::common::{
    ensure_store_ok, find_bookmark, normalize_bookmark_identifier, open_store, resolve_profile,
};
use crate::error::CliError;

pub async fn run_delete(id: &str, global_profile: Option<&str>) -> Result<(), CliError> {
    let normalized_id = normalize_bookmark_identifier(id)?;
    let resolved = resolve_profile(global_profile)?;
    let mut store = open_store(&resolved)?;
    let bookmark = find_bookmark(&mut store, &normalized_id).await?;

    store.delete_bookmark(&bookmark.id).await;
    ensure_store_ok(&store)?;
    println!("{}", bookmark.id);
    Ok(())
}
