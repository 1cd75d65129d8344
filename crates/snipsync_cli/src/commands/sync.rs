//! Sync command implementation.

use snipsync_engine::{SyncBackend, SyncConfig, SyncOptions, SyncReport};
use snipsync_store::SnippetStore;
use snipsync_transport::{ReqwestClient, TokenProvider};

/// Environment variable holding a pre-negotiated Drive bearer token.
const DRIVE_TOKEN_VAR: &str = "SNIPSYNC_DRIVE_TOKEN";

/// Token source for the Drive backend.
///
/// The CLI has no browser to drive an interactive OAuth flow, so it
/// expects the host environment to supply a token the way the extension
/// host would cache one.
struct EnvToken;

impl TokenProvider for EnvToken {
    fn token(&self) -> Result<String, String> {
        std::env::var(DRIVE_TOKEN_VAR)
            .map_err(|_| format!("set {DRIVE_TOKEN_VAR} to a valid Drive bearer token"))
    }
}

/// Runs the sync command against the configured backend.
pub fn run(store: &SnippetStore) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::load(store);
    let options = SyncOptions::default();

    let report = match &config.backend {
        SyncBackend::None => {
            return Err("no sync backend configured (see `snipsync backend`)".into());
        }
        SyncBackend::Webdav(webdav) => {
            let client = ReqwestClient::new()?;
            snipsync_engine::sync_webdav(store, client, webdav, options)
        }
        SyncBackend::Googledrive => {
            let client = ReqwestClient::new()?;
            snipsync_engine::sync_google_drive(store, client, EnvToken, options)
        }
    };

    print_report(&report);
    if report.success {
        Ok(())
    } else {
        Err("sync failed".into())
    }
}

fn print_report(report: &SyncReport) {
    if report.success {
        println!(
            "sync complete: {} record(s) merged, {} swept",
            report.merged_records, report.swept_records
        );
    } else {
        println!(
            "sync failed: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
}
