//! Full-document formatting via the fixer's in-place mode.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp_server::Client;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::*;

use crate::config::Settings;
use crate::lsp::DocumentState;
use crate::runner::FixerRunner;

use super::super::conversions::full_document_range;

/// Run the fixer in place and derive at most one full-document edit.
///
/// The buffer is persisted to disk first so the fixer operates on exactly what
/// the editor shows. Errors carry a user-facing message; the caller decides
/// how to surface it. A byte-identical round trip yields no edit.
pub(crate) async fn apply_fix(
    documents: &Arc<Mutex<HashMap<String, DocumentState>>>,
    settings: &Arc<RwLock<Settings>>,
    runner: &FixerRunner,
    uri: &Uri,
) -> std::result::Result<Option<TextEdit>, String> {
    if !settings.read().await.enable_formatting {
        return Err("Formatting is disabled by configuration".to_string());
    }

    // to_file_path only decodes the path component and does not reject other
    // schemes; without this gate an untitled buffer would be written to a
    // relative path in the server's cwd
    if uri.scheme().as_str() != "file" {
        return Err("Document is not a file on disk".to_string());
    }
    let Some(path) = uri.to_file_path() else {
        return Err("Document is not a file on disk".to_string());
    };

    let text = {
        let documents = documents.lock().await;
        match documents.get(&uri.to_string()) {
            Some(state) => state.text.clone(),
            None => return Err(format!("Document is not open: {}", uri.as_str())),
        }
    };

    tokio::fs::write(&path, &text)
        .await
        .map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;

    let result = runner
        .fix(&path)
        .await
        .map_err(|e| e.to_string())?;

    if !result.success {
        return Err(format!("php-cs-fixer failed: {}", result.output));
    }

    let fixed = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to re-read {}: {}", path.display(), e))?;

    if fixed == text {
        return Ok(None);
    }

    Ok(Some(TextEdit {
        range: full_document_range(&text),
        new_text: fixed,
    }))
}

/// Handle textDocument/formatting.
pub(crate) async fn format_document(
    client: &Client,
    documents: Arc<Mutex<HashMap<String, DocumentState>>>,
    settings: Arc<RwLock<Settings>>,
    runner: Arc<FixerRunner>,
    params: DocumentFormattingParams,
) -> Result<Option<Vec<TextEdit>>> {
    let uri = params.text_document.uri;

    match apply_fix(&documents, &settings, &runner, &uri).await {
        Ok(Some(edit)) => Ok(Some(vec![edit])),
        Ok(None) => Ok(None),
        Err(message) => {
            log::error!("Formatting failed for {}: {}", uri.as_str(), message);
            client.show_message(MessageType::ERROR, message).await;
            Ok(None)
        }
    }
}
