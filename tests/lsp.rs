//! LSP Integration Tests
//!
//! These tests validate multi-step LSP protocol flows using an in-memory
//! test harness. They complement the unit tests in handler modules by
//! testing realistic workflows (open→format→close) against a stand-in
//! fixer script instead of a real php-cs-fixer install.

mod lsp {
    pub(super) mod helpers;
    pub(super) mod test_document_lifecycle;
    pub(super) mod test_formatting;
}
