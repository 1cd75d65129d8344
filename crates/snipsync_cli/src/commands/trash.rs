//! Trash lifecycle commands: rm, restore, purge, empty-trash, sweep.

use snipsync_protocol::SnippetId;
use snipsync_store::SnippetStore;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Moves a snippet to the trash.
pub fn rm(store: &SnippetStore, id: &str) -> CommandResult {
    store.soft_delete(&SnippetId::from(id))?;
    println!("moved {id} to trash");
    Ok(())
}

/// Restores a snippet from the trash.
pub fn restore(store: &SnippetStore, id: &str) -> CommandResult {
    store.restore(&SnippetId::from(id))?;
    println!("restored {id}");
    Ok(())
}

/// Schedules a snippet for permanent removal.
pub fn purge(store: &SnippetStore, id: &str) -> CommandResult {
    store.purge(&SnippetId::from(id))?;
    println!("purged {id}");
    Ok(())
}

/// Purges everything currently in the trash.
pub fn empty(store: &SnippetStore) -> CommandResult {
    let count = store.purge_trashed()?;
    println!("purged {count} snippet(s)");
    Ok(())
}

/// Hard-deletes purged snippets past the retention window.
pub fn sweep(store: &SnippetStore) -> CommandResult {
    let count = store.sweep_expired(store.now_ms())?;
    println!("swept {count} snippet(s)");
    Ok(())
}
