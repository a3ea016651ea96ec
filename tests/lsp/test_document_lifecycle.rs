//! Tests for document open/change/close tracking.

use super::helpers::*;

const CONTENT: &str = "<?php\necho  1;\n";

#[tokio::test]
async fn test_open_then_format_round_trips() {
    let project = TestProject::new(CONTENT, NOOP_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, CONTENT, "php").await;

    // Clean file: the fixer reports no changes, so no edit comes back
    let edits = server.format_document(&project.uri).await;
    assert!(edits.is_none());
}

#[tokio::test]
async fn test_formatting_a_closed_document_yields_no_edit() {
    let project = TestProject::new(CONTENT, NOOP_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, CONTENT, "php").await;
    server.close_document(&project.uri).await;

    let edits = server.format_document(&project.uri).await;
    assert!(edits.is_none());
}

#[tokio::test]
async fn test_change_replaces_buffer_content() {
    // The fixer does nothing, so formatting writes the buffer to disk and
    // reads the same bytes back; the on-disk file tells us which buffer
    // content the server held
    let project = TestProject::new(CONTENT, NOOP_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, CONTENT, "php").await;
    server
        .change_document(&project.uri, "<?php\n// edited\n")
        .await;

    let edits = server.format_document(&project.uri).await;
    assert!(edits.is_none());
    assert_eq!(
        std::fs::read_to_string(&project.php_file).unwrap(),
        "<?php\n// edited\n"
    );
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let project = TestProject::new(CONTENT, NOOP_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;
    server.open_document(&project.uri, CONTENT, "php").await;

    let result = server
        .execute_command(
            "advancedPhpCsFixer.doesNotExist",
            vec![serde_json::json!(project.uri.clone())],
        )
        .await;
    assert!(result.is_none());
}

#[tokio::test]
async fn test_check_command_on_unopened_document() {
    let project = TestProject::new(CONTENT, NOOP_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    // Not opened: the command reports a document-not-open error, distinct
    // from the wrong-language rejection, and returns nothing
    let result = server
        .execute_command(
            "advancedPhpCsFixer.checkFile",
            vec![serde_json::json!(project.uri.clone())],
        )
        .await;
    assert!(result.is_none());
}
