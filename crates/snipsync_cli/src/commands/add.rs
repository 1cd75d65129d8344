//! Add command implementation.

use snipsync_protocol::SnippetKind;
use snipsync_store::{NewSnippet, SnippetStore};

/// Runs the add command.
pub fn run(
    store: &SnippetStore,
    text: &str,
    url: Option<String>,
    web: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = if web { SnippetKind::Web } else { SnippetKind::Note };
    let snippet = store.save(NewSnippet {
        kind,
        text: text.to_owned(),
        url,
    })?;

    println!("saved {}", snippet.id);
    if let Some(domain) = &snippet.domain {
        println!("  from {domain}");
    }
    Ok(())
}
