//! workspace/executeCommand handlers.
//!
//! Two user-facing commands mirror the editor-extension surface: apply the
//! fixer to a document, and run a one-off check that reports an issue count.

use std::collections::HashMap;

use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;

use crate::lsp::{FixerLsp, PHP_LANGUAGE_ID};

use super::{diagnostics, formatting};

pub(crate) const CMD_FIX: &str = "advancedPhpCsFixer.fix";
pub(crate) const CMD_CHECK_FILE: &str = "advancedPhpCsFixer.checkFile";

pub(crate) fn all() -> Vec<String> {
    vec![CMD_FIX.to_string(), CMD_CHECK_FILE.to_string()]
}

/// Pull the target document URI out of the command arguments.
fn target_uri(params: &ExecuteCommandParams) -> Option<Uri> {
    params
        .arguments
        .first()
        .and_then(|value| value.as_str())
        .and_then(|s| s.parse().ok())
}

pub(crate) async fn execute(
    lsp: &FixerLsp,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    let command = params.command.clone();

    let Some(uri) = target_uri(&params) else {
        lsp.client
            .show_message(
                MessageType::ERROR,
                format!("{}: no document specified", command),
            )
            .await;
        return Ok(None);
    };

    let language_id = {
        let documents = lsp.documents.lock().await;
        documents.get(&uri.to_string()).map(|d| d.language_id.clone())
    };
    let Some(language_id) = language_id else {
        lsp.client
            .show_message(
                MessageType::ERROR,
                format!("{}: document is not open", command),
            )
            .await;
        return Ok(None);
    };
    if language_id != PHP_LANGUAGE_ID {
        lsp.client
            .show_message(
                MessageType::ERROR,
                "This command only works with PHP files".to_string(),
            )
            .await;
        return Ok(None);
    }

    match command.as_str() {
        CMD_FIX => fix_document(lsp, uri).await,
        CMD_CHECK_FILE => check_document(lsp, uri).await,
        other => {
            log::warn!("Unknown command: {}", other);
            Ok(None)
        }
    }
}

/// Run the fixer and apply the resulting edit through the client.
async fn fix_document(lsp: &FixerLsp, uri: Uri) -> Result<Option<serde_json::Value>> {
    match formatting::apply_fix(&lsp.documents, &lsp.settings, &lsp.runner, &uri).await {
        Ok(Some(edit)) => {
            let mut changes = HashMap::new();
            changes.insert(uri, vec![edit]);

            let applied = lsp
                .client
                .apply_edit(WorkspaceEdit {
                    changes: Some(changes),
                    ..Default::default()
                })
                .await;

            match applied {
                Ok(response) if response.applied => {
                    lsp.client
                        .show_message(
                            MessageType::INFO,
                            "php-cs-fixer applied successfully".to_string(),
                        )
                        .await;
                }
                Ok(response) => {
                    log::warn!("Client rejected fix edit: {:?}", response.failure_reason);
                }
                Err(e) => {
                    log::error!("applyEdit request failed: {}", e);
                }
            }
        }
        Ok(None) => {
            lsp.client
                .show_message(
                    MessageType::INFO,
                    "php-cs-fixer applied successfully".to_string(),
                )
                .await;
        }
        Err(message) => {
            lsp.client
                .show_message(MessageType::ERROR, format!("Error: {}", message))
                .await;
        }
    }

    Ok(None)
}

/// Run an immediate check and report the issue count.
///
/// Unlike background diagnostics this is not gated by `enableDiagnostics`;
/// the user asked for this check explicitly.
async fn check_document(lsp: &FixerLsp, uri: Uri) -> Result<Option<serde_json::Value>> {
    let outcome = diagnostics::run_check_now(&lsp.documents, &lsp.runner, &uri.to_string()).await;

    match outcome {
        diagnostics::CheckOutcome::Publish(issues) if !issues.is_empty() => {
            lsp.client
                .show_message(
                    MessageType::INFO,
                    format!("Found {} code style issue(s)", issues.len()),
                )
                .await;
        }
        diagnostics::CheckOutcome::Publish(_) => {
            lsp.client
                .show_message(MessageType::INFO, "No code style issues found".to_string())
                .await;
        }
        diagnostics::CheckOutcome::Skipped => {
            // Open and PHP were vetted above; skipped here means no file on disk
            lsp.client
                .show_message(
                    MessageType::ERROR,
                    "Document has no file on disk to check".to_string(),
                )
                .await;
        }
        diagnostics::CheckOutcome::Failed(message) => {
            lsp.client
                .show_message(MessageType::ERROR, format!("Error: {}", message))
                .await;
        }
        diagnostics::CheckOutcome::Discarded => {}
    }

    Ok(None)
}
