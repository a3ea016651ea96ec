//! Language server integration for php-cs-fixer.
//!
//! Maps document lifecycle notifications onto dry-run checks of the external
//! fixer (debounced per document for change events) and serves formatting
//! requests by running the fixer in place.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tower_lsp_server::{Client, LspService, Server};

use crate::config::Settings;
use crate::runner::FixerRunner;

mod conversions;
mod debounce;
mod documents;
mod handlers;
mod server;

use debounce::Debouncer;

/// Language id checks and formatting are restricted to.
pub(crate) const PHP_LANGUAGE_ID: &str = "php";

/// Quiet period a document must see after a change before it is checked.
pub(crate) const DEBOUNCE_DELAY: Duration = Duration::from_millis(1000);

/// State kept per open document.
#[derive(Debug, Clone)]
pub(crate) struct DocumentState {
    pub(crate) text: String,
    pub(crate) language_id: String,
}

/// The php-cs-fixer language server.
///
/// All state is shared behind `Arc` so lifecycle handlers can hand clones to
/// spawned check tasks; the struct itself is cheap to clone.
#[derive(Clone)]
pub struct FixerLsp {
    pub(crate) client: Client,
    /// Settings snapshot, replaced wholesale on configuration changes
    pub(crate) settings: Arc<RwLock<Settings>>,
    pub(crate) workspace_root: Arc<Mutex<Option<PathBuf>>>,
    /// Open documents; membership doubles as the result-validity check for
    /// in-flight checks racing a close
    // Use String keys since Uri doesn't implement Hash in all versions
    pub(crate) documents: Arc<Mutex<HashMap<String, DocumentState>>>,
    pub(crate) runner: Arc<FixerRunner>,
    pub(crate) debouncer: Arc<Debouncer>,
}

impl FixerLsp {
    pub fn new(client: Client) -> Self {
        let settings = Arc::new(RwLock::new(Settings::default()));
        let workspace_root = Arc::new(Mutex::new(None));
        let runner = Arc::new(FixerRunner::new(
            Arc::clone(&settings),
            Arc::clone(&workspace_root),
        ));

        Self {
            client,
            settings,
            workspace_root,
            documents: Arc::new(Mutex::new(HashMap::new())),
            runner,
            debouncer: Arc::new(Debouncer::new(DEBOUNCE_DELAY)),
        }
    }
}

/// Serve the language server over stdio.
pub async fn run() -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(FixerLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
