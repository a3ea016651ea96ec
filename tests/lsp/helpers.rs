//! Test helpers for LSP integration testing
//!
//! This module provides utilities to test LSP functionality in-memory
//! without spawning the binary or dealing with stdio protocol.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tower_lsp_server::ls_types::*;
use tower_lsp_server::{LanguageServer, LspService};

use php_cs_fixer_lsp::lsp::FixerLsp;

/// Test harness wrapping a `FixerLsp` created via `LspService::new`,
/// the same construction path production uses.
pub struct TestLspServer {
    lsp: FixerLsp,
}

impl TestLspServer {
    pub fn new() -> Self {
        // The service closure owns the server; stash a clone for the tests
        let stash: Arc<Mutex<Option<FixerLsp>>> = Arc::new(Mutex::new(None));
        let stash_clone = Arc::clone(&stash);

        let (_service, _socket) = LspService::new(move |client| {
            let lsp = FixerLsp::new(client);
            *stash_clone.lock().unwrap() = Some(lsp.clone());
            lsp
        });

        let lsp = stash
            .lock()
            .unwrap()
            .take()
            .expect("FixerLsp should have been initialized");

        Self { lsp }
    }

    /// Initialize the server, pointing `executablePath` at the given fixer.
    pub async fn initialize_with_fixer(&self, fixer: &Path) {
        let options = serde_json::json!({
            "executablePath": fixer.to_string_lossy(),
        });

        let params = InitializeParams {
            initialization_options: Some(options),
            ..Default::default()
        };

        self.lsp.initialize(params).await.unwrap();
    }

    /// Simulate `textDocument/didOpen`.
    pub async fn open_document(&self, uri: &str, content: &str, language_id: &str) {
        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.parse().unwrap(),
                language_id: language_id.to_string(),
                version: 0,
                text: content.to_string(),
            },
        };

        self.lsp.did_open(params).await;
    }

    /// Simulate `textDocument/didClose`.
    pub async fn close_document(&self, uri: &str) {
        let params = DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier {
                uri: uri.parse().unwrap(),
            },
        };

        self.lsp.did_close(params).await;
    }

    /// Simulate `textDocument/didChange` with FULL sync.
    pub async fn change_document(&self, uri: &str, content: &str) {
        let params = DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.parse().unwrap(),
                version: 1,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: content.to_string(),
            }],
        };

        self.lsp.did_change(params).await;
    }

    /// Simulate `textDocument/formatting`. Returns the edits, if any.
    pub async fn format_document(&self, uri: &str) -> Option<Vec<TextEdit>> {
        let params = DocumentFormattingParams {
            text_document: TextDocumentIdentifier {
                uri: uri.parse().unwrap(),
            },
            options: FormattingOptions {
                tab_size: 4,
                insert_spaces: true,
                ..Default::default()
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        };

        self.lsp.formatting(params).await.unwrap()
    }

    /// Simulate `workspace/executeCommand`.
    pub async fn execute_command(
        &self,
        command: &str,
        arguments: Vec<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        let params = ExecuteCommandParams {
            command: command.to_string(),
            arguments,
            work_done_progress_params: WorkDoneProgressParams::default(),
        };

        self.lsp.execute_command(params).await.unwrap()
    }
}

/// A workspace directory with one PHP file and a fake fixer script.
pub struct TestProject {
    _dir: tempfile::TempDir,
    pub php_file: PathBuf,
    pub uri: String,
    pub fixer: PathBuf,
}

impl TestProject {
    /// `fixer_body` is shell code; the target file path is `$2`.
    pub fn new(content: &str, fixer_body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();

        let php_file = dir.path().join("subject.php");
        std::fs::write(&php_file, content).unwrap();
        let uri = format!("file://{}", php_file.display());

        let fixer = dir.path().join("fake-fixer");
        let mut file = std::fs::File::create(&fixer).unwrap();
        writeln!(file, "#!/bin/sh\n{}", fixer_body).unwrap();
        drop(file);
        std::fs::set_permissions(&fixer, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            _dir: dir,
            php_file,
            uri,
            fixer,
        }
    }
}

/// Fixer body that reports a completed run with no changes.
pub const NOOP_FIXER: &str = r#"echo '{"files":[],"time":{"total":0.1}}'"#;
