//! Tests for the formatting path end to end.

use super::helpers::*;
use tower_lsp_server::ls_types::*;

const DIRTY: &str = "<?php\necho  1;\n";

/// Fixer body that rewrites the target file and reports success with the
/// nonzero exit the real tool uses when it changed something.
const REWRITING_FIXER: &str = r#"printf '<?php\necho 1;\n' > "$2"
echo '{"files":[{"name":"subject.php"}],"time":{"total":0.1}}'
exit 8"#;

#[tokio::test]
async fn test_formatting_returns_full_document_edit() {
    let project = TestProject::new(DIRTY, REWRITING_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, DIRTY, "php").await;

    let edits = server.format_document(&project.uri).await.unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_text, "<?php\necho 1;\n");
    assert_eq!(
        edits[0].range.start,
        Position {
            line: 0,
            character: 0
        }
    );
    // DIRTY has two lines and a trailing newline
    assert_eq!(
        edits[0].range.end,
        Position {
            line: 2,
            character: 0
        }
    );
}

#[tokio::test]
async fn test_formatting_is_idempotent() {
    let project = TestProject::new(DIRTY, REWRITING_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, DIRTY, "php").await;

    let edits = server.format_document(&project.uri).await.unwrap();
    let fixed = edits[0].new_text.clone();

    // Apply the edit the way a client would, then format again
    server.change_document(&project.uri, &fixed).await;
    let second = server.format_document(&project.uri).await;
    assert!(second.is_none());
}

#[tokio::test]
async fn test_formatting_failure_leaves_document_alone() {
    let project = TestProject::new(
        DIRTY,
        "echo 'PHP Parse error: unexpected token' >&2\nexit 1",
    );
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, DIRTY, "php").await;

    let edits = server.format_document(&project.uri).await;
    assert!(edits.is_none());
    // The buffer content persisted to disk is all that happened
    assert_eq!(std::fs::read_to_string(&project.php_file).unwrap(), DIRTY);
}

#[tokio::test]
async fn test_fix_command_rejects_non_php_documents() {
    let project = TestProject::new(DIRTY, REWRITING_FIXER);
    let server = TestLspServer::new();
    server.initialize_with_fixer(&project.fixer).await;

    server.open_document(&project.uri, DIRTY, "html").await;

    let result = server
        .execute_command(
            "advancedPhpCsFixer.fix",
            vec![serde_json::json!(project.uri.clone())],
        )
        .await;
    assert!(result.is_none());

    // The fixer must not have touched the file
    assert_eq!(std::fs::read_to_string(&project.php_file).unwrap(), DIRTY);
}
