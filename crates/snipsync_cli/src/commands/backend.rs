//! Backend selection command.

use clap::Subcommand;
use snipsync_engine::{SyncBackend, SyncConfig};
use snipsync_store::SnippetStore;
use snipsync_transport::WebDavConfig;

/// Sync backend choices.
#[derive(Subcommand)]
pub enum BackendCommand {
    /// Disable sync
    None,

    /// Sync against a generic WebDAV share
    Webdav {
        /// Base URL of the share
        url: String,

        /// Basic auth username
        #[arg(long)]
        username: String,

        /// Basic auth password
        #[arg(long)]
        password: String,
    },

    /// Sync against a Google Drive application folder
    Googledrive,
}

/// Runs the backend command.
pub fn run(
    store: &SnippetStore,
    backend: BackendCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = match backend {
        BackendCommand::None => SyncBackend::None,
        BackendCommand::Webdav {
            url,
            username,
            password,
        } => SyncBackend::Webdav(WebDavConfig {
            url,
            username,
            password,
        }),
        BackendCommand::Googledrive => SyncBackend::Googledrive,
    };

    // Switching backends starts over: the old change token is meaningless
    // against a different remote.
    let config = SyncConfig {
        backend,
        last_remote_etag: None,
    };
    config.save(store)?;

    println!("backend configured");
    Ok(())
}
