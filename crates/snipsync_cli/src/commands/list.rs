//! List command implementation.

use snipsync_protocol::Snippet;
use snipsync_store::{SnippetFilter, SnippetStore};

/// Runs the list command.
pub fn run(
    store: &SnippetStore,
    trash: bool,
    search: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snippets = if trash {
        store.trashed()
    } else {
        let filter = match search {
            Some(term) => SnippetFilter::search(term),
            None => SnippetFilter::all(),
        };
        store.active(&filter)
    };

    if snippets.is_empty() {
        println!("(empty)");
        return Ok(());
    }
    for snippet in &snippets {
        print_line(snippet);
    }
    Ok(())
}

fn print_line(snippet: &Snippet) {
    let origin = snippet.domain.as_deref().unwrap_or("-");
    println!("{}  [{}]  {}", snippet.id, origin, snippet.text);
}
