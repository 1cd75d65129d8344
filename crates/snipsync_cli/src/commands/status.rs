//! Status command implementation.

use snipsync_engine::{SyncBackend, SyncConfig};
use snipsync_store::{keys, SnippetFilter, SnippetStore};

/// Runs the status command.
pub fn run(store: &SnippetStore) -> Result<(), Box<dyn std::error::Error>> {
    let active = store.active(&SnippetFilter::all()).len();
    let trashed = store.trashed().len();
    let universe = store.all_including_deleted().len();

    println!("snippets: {active} active, {trashed} in trash, {universe} total");

    let config = SyncConfig::load(store);
    let backend = match &config.backend {
        SyncBackend::None => "none".to_owned(),
        SyncBackend::Webdav(webdav) => format!("webdav ({})", webdav.url),
        SyncBackend::Googledrive => "googledrive".to_owned(),
    };
    println!("backend: {backend}");

    match store
        .get_setting(keys::LAST_SYNCED_AT)
        .and_then(|v| v.as_i64())
    {
        Some(ms) => println!("last synced: {ms} (epoch ms)"),
        None => println!("last synced: never"),
    }
    if let Some(etag) = &config.last_remote_etag {
        println!("remote token: {etag}");
    }
    Ok(())
}
