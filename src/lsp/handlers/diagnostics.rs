//! Dry-run checks and diagnostic publication.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::*;

use crate::config::Settings;
use crate::diff::Issue;
use crate::lsp::{DocumentState, PHP_LANGUAGE_ID};
use crate::runner::FixerRunner;

use super::super::conversions::issue_to_diagnostic;

/// What a completed check run decided.
#[derive(Debug)]
pub(crate) enum CheckOutcome {
    /// Diagnostics disabled, document ineligible, or not open: silent no-op
    Skipped,
    /// The fixer could not be invoked; existing diagnostics stay untouched
    Failed(String),
    /// The document closed while the check was in flight; result dropped
    Discarded,
    /// Issues to publish wholesale (empty clears the entry)
    Publish(Vec<Issue>),
}

/// Run a dry-run check for `uri` and decide what to do with the result.
///
/// Eligibility is re-evaluated here rather than at scheduling time so that a
/// configuration change landing between the two is honored. Membership in the
/// document map is checked again after the process completes: a result for a
/// closed document must never repopulate its diagnostics.
pub(crate) async fn run_check(
    documents: &Arc<Mutex<HashMap<String, DocumentState>>>,
    settings: &Arc<RwLock<Settings>>,
    runner: &FixerRunner,
    uri: &str,
) -> CheckOutcome {
    if !settings.read().await.enable_diagnostics {
        return CheckOutcome::Skipped;
    }

    run_check_now(documents, runner, uri).await
}

/// Like [`run_check`] but without the `enableDiagnostics` gate, for the
/// explicit check command: a user-requested check must report honestly even
/// when background diagnostics are turned off.
pub(crate) async fn run_check_now(
    documents: &Arc<Mutex<HashMap<String, DocumentState>>>,
    runner: &FixerRunner,
    uri: &str,
) -> CheckOutcome {
    let language_id = {
        let documents = documents.lock().await;
        match documents.get(uri) {
            Some(state) => state.language_id.clone(),
            None => return CheckOutcome::Skipped,
        }
    };
    if language_id != PHP_LANGUAGE_ID {
        return CheckOutcome::Skipped;
    }

    let Ok(parsed) = uri.parse::<Uri>() else {
        return CheckOutcome::Skipped;
    };
    // Unsaved and virtual buffers have no on-disk file to check.
    // to_file_path only decodes the path component and does not reject other
    // schemes, so the scheme must be filtered explicitly.
    if parsed.scheme().as_str() != "file" {
        return CheckOutcome::Skipped;
    }
    let Some(path) = parsed.to_file_path() else {
        return CheckOutcome::Skipped;
    };

    let result = match runner.check(&path).await {
        Ok(result) => result,
        Err(e) => return CheckOutcome::Failed(e.to_string()),
    };

    if !documents.lock().await.contains_key(uri) {
        return CheckOutcome::Discarded;
    }

    CheckOutcome::Publish(result.issues)
}

/// Check a document and publish the outcome to the client.
pub(crate) async fn check_and_publish(
    client: Client,
    documents: Arc<Mutex<HashMap<String, DocumentState>>>,
    settings: Arc<RwLock<Settings>>,
    runner: Arc<FixerRunner>,
    uri: String,
) {
    match run_check(&documents, &settings, &runner, &uri).await {
        CheckOutcome::Skipped => {}
        CheckOutcome::Discarded => {
            log::debug!("Dropping check result for closed document {}", uri);
        }
        CheckOutcome::Failed(message) => {
            log::error!("Check failed for {}: {}", uri, message);
            client
                .show_message(MessageType::ERROR, format!("php-cs-fixer: {}", message))
                .await;
        }
        CheckOutcome::Publish(issues) => {
            let Ok(parsed) = uri.parse::<Uri>() else {
                return;
            };
            let diagnostics = issues.iter().map(issue_to_diagnostic).collect();
            client.publish_diagnostics(parsed, diagnostics, None).await;
        }
    }
}
