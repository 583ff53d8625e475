use chrono::Utc;
use pathfind_core::presentation::NsfwDisplayMode;
use pathfind_core::{BookmarkFilter, BookmarkSort, FilterScope};

use crate::commands::common::{
    bookmark_to_list_item, ensure_store_ok, format_bookmark_lines, load_pages, open_store,
    resolve_profile, BookmarkListItem, CliStore,
};
use crate::error::CliError;

pub struct ListOptions {
    pub filter: BookmarkFilter,
    pub sort: BookmarkSort,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub collection: Option<String>,
    pub pages: u32,
    pub nsfw: Option<NsfwDisplayMode>,
    pub json: bool,
}

/// Tag or collection scope; the collection name is looked up for display.
async fn resolve_scope(
    store: &mut CliStore,
    options: &ListOptions,
) -> Result<Option<FilterScope>, CliError> {
    if let Some(tag) = &options.tag {
        return Ok(Some(FilterScope::Tag(
            tag.trim_start_matches('#').to_string(),
        )));
    }
    let Some(id) = &options.collection else {
        return Ok(None);
    };

    store.load_collections().await;
    ensure_store_ok(store)?;
    let name = store
        .state()
        .collections
        .iter()
        .find(|collection| collection.id == *id)
        .map_or_else(|| id.clone(), |collection| collection.name.clone());
    Ok(Some(FilterScope::Collection {
        id: id.clone(),
        name,
    }))
}

pub async fn run_list(options: ListOptions, global_profile: Option<&str>) -> Result<(), CliError> {
    let resolved = resolve_profile(global_profile)?;
    let mut store = open_store(&resolved)?;
    let scope = resolve_scope(&mut store, &options).await?;
    let mut store = store.with_query(
        options.filter,
        scope,
        options.sort,
        options.search.clone().unwrap_or_default(),
    );
    load_pages(&mut store, options.pages).await?;

    let now = Utc::now();
    let mode = options.nsfw.unwrap_or_else(|| resolved.profile.nsfw_display());
    let visible = store.visible_bookmarks(mode);

    if options.json {
        let items = visible
            .iter()
            .map(|bookmark| {
                bookmark_to_list_item(bookmark, resolved.credentials.server_url(), now)
            })
            .collect::<Vec<BookmarkListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let state = store.state();
    let scope_label = store
        .active_filter_description()
        .unwrap_or_else(|| state.filter.label().to_string());
    println!(
        "{} | {} | {} of {} bookmarks (page {}/{})",
        scope_label,
        state.sort.label(),
        visible.len(),
        state.total,
        state.current_page,
        state.total_pages
    );
    for line in format_bookmark_lines(&visible, mode, now) {
        println!("{line}");
    }
    if store.has_more_pages() {
        println!("More available: pass --pages {}", state.current_page + 1);
    }

    Ok(())
}
