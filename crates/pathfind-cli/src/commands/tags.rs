use pathfind_core::presentation::tag_color;

use crate::commands::common::{ensure_store_ok, open_store, resolve_profile};
use crate::error::CliError;

pub async fn run_tags(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let resolved = resolve_profile(global_profile)?;
    let mut store = open_store(&resolved)?;
    store.load_tags().await;
    ensure_store_ok(&store)?;

    let tags = &store.state().tags;
    if as_json {
        println!("{}", serde_json::to_string_pretty(tags)?);
    } else {
        for tag in tags {
            println!(
                "{}  #{:<24}  {}",
                tag_color(&tag.name).to_hex(),
                tag.name,
                tag.bookmark_count
            );
        }
    }
    Ok(())
}

pub async fn run_collections(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let resolved = resolve_profile(global_profile)?;
    let mut store = open_store(&resolved)?;
    store.load_collections().await;
    ensure_store_ok(&store)?;

    let collections = &store.state().collections;
    if as_json {
        println!("{}", serde_json::to_string_pretty(collections)?);
    } else {
        for collection in collections {
            let count = collection
                .bookmark_count
                .map_or_else(String::new, |count| count.to_string());
            println!("{:<12}  {:<32}  {count}", collection.id, collection.name);
        }
    }
    Ok(())
}
