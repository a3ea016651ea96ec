//! Document lifecycle handling.
//!
//! Open and save trigger an immediate check; changes are debounced per
//! document; close drops the document's state, its pending check, and its
//! published diagnostics.

use std::sync::Arc;

use tower_lsp_server::ls_types::*;

use super::handlers::diagnostics::check_and_publish;
use crate::lsp::{DocumentState, FixerLsp};

/// Kick off an immediate, non-debounced check.
fn spawn_check(lsp: &FixerLsp, uri: String) {
    let client = lsp.client.clone();
    let documents = Arc::clone(&lsp.documents);
    let settings = Arc::clone(&lsp.settings);
    let runner = Arc::clone(&lsp.runner);

    tokio::spawn(async move {
        check_and_publish(client, documents, settings, runner, uri).await;
    });
}

pub(crate) async fn did_open(lsp: &FixerLsp, params: DidOpenTextDocumentParams) {
    let uri = params.text_document.uri.to_string();

    lsp.documents.lock().await.insert(
        uri.clone(),
        DocumentState {
            text: params.text_document.text,
            language_id: params.text_document.language_id,
        },
    );

    log::debug!("Opened document: {}", uri);
    spawn_check(lsp, uri);
}

pub(crate) async fn did_change(lsp: &FixerLsp, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri.to_string();

    // FULL sync: the last change event carries the whole document
    {
        let mut documents = lsp.documents.lock().await;
        let Some(state) = documents.get_mut(&uri) else {
            return;
        };
        if let Some(change) = params.content_changes.into_iter().next_back() {
            state.text = change.text;
        }
    }

    let client = lsp.client.clone();
    let documents = Arc::clone(&lsp.documents);
    let settings = Arc::clone(&lsp.settings);
    let runner = Arc::clone(&lsp.runner);
    let check_uri = uri.clone();

    lsp.debouncer
        .schedule(&uri, async move {
            check_and_publish(client, documents, settings, runner, check_uri).await;
        })
        .await;
}

pub(crate) async fn did_save(lsp: &FixerLsp, params: DidSaveTextDocumentParams) {
    let uri = params.text_document.uri.to_string();

    // The saved file now matches the buffer; check it right away
    if lsp.documents.lock().await.contains_key(&uri) {
        spawn_check(lsp, uri);
    }
}

pub(crate) async fn did_close(lsp: &FixerLsp, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri.to_string();

    lsp.debouncer.cancel(&uri).await;
    lsp.documents.lock().await.remove(&uri);

    // Clear diagnostics unconditionally; the removal above makes any
    // in-flight check result a no-op
    lsp.client
        .publish_diagnostics(params.text_document.uri, vec![], None)
        .await;

    log::debug!("Closed document: {}", uri);
}
