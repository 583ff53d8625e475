use pathfind_core::{Bookmark, BookmarkListStore, BookmarkService};

use crate::commands::common::{
    ensure_store_ok, find_bookmark, normalize_bookmark_identifier, open_store, resolve_profile,
    short_id,
};
use crate::error::CliError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToggleFlag {
    Archived,
    ReadLater,
}

impl ToggleFlag {
    const fn label(self) -> &'static str {
        match self {
            Self::Archived => "archived",
            Self::ReadLater => "read later",
        }
    }

    const fn is_set(self, bookmark: &Bookmark) -> bool {
        match self {
            Self::Archived => bookmark.is_archived,
            Self::ReadLater => bookmark.is_read_later,
        }
    }
}

pub async fn run_toggle(
    flag: ToggleFlag,
    id: &str,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let normalized_id = normalize_bookmark_identifier(id)?;
    let resolved = resolve_profile(global_profile)?;
    let mut store = open_store(&resolved)?;
    let bookmark = find_bookmark(&mut store, &normalized_id).await?;

    let now_set = toggle_flag(&mut store, flag, &bookmark).await?;
    let state = if now_set { "on" } else { "off" };
    println!("{} {} {state}", short_id(&bookmark.id), flag.label());
    Ok(())
}

/// Flip `flag` through the store and report the server's new value.
pub async fn toggle_flag<S: BookmarkService + ?Sized>(
    store: &mut BookmarkListStore<S>,
    flag: ToggleFlag,
    bookmark: &Bookmark,
) -> Result<bool, CliError> {
    match flag {
        ToggleFlag::Archived => store.toggle_archive(bookmark).await,
        ToggleFlag::ReadLater => store.toggle_read_later(bookmark).await,
    }
    ensure_store_ok(store)?;

    Ok(store
        .bookmarks()
        .iter()
        .find(|entry| entry.id == bookmark.id)
        .map_or(!flag.is_set(bookmark), |entry| flag.is_set(entry)))
}
