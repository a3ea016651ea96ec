//! Editor integration for [php-cs-fixer](https://cs.symfony.com/).
//!
//! The crate never inspects or rewrites PHP itself; all rewriting authority
//! belongs to the external tool. It invokes the fixer on open/change/save,
//! reconstructs per-line issues from the tool's diff/JSON output, and serves
//! the fixer's in-place mode as a document-formatting edit over LSP.

pub mod config;
pub mod diff;
pub mod lsp;
pub mod runner;

pub use config::Settings;
pub use diff::{Issue, Severity};
pub use runner::{FixerRunner, RunResult, RunnerError};
