//! Conversions between fixer issues and LSP protocol types.

use tower_lsp_server::ls_types::*;

use crate::diff::{Issue, Severity};

/// Source tag attached to every published diagnostic.
pub(crate) const DIAGNOSTIC_SOURCE: &str = "advanced-php-cs-fixer";

/// Convert a fixer issue to an LSP diagnostic.
///
/// Issue lines are 1-based; the range spans from the issue column to the end
/// of the line (`u32::MAX` as the end-of-line sentinel, which clients clamp).
pub(crate) fn issue_to_diagnostic(issue: &Issue) -> Diagnostic {
    let line = issue.line.saturating_sub(1);

    let severity = match issue.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: Range {
            start: Position {
                line,
                character: issue.column,
            },
            end: Position {
                line,
                character: u32::MAX,
            },
        },
        severity: Some(severity),
        code: issue.rule.clone().map(NumberOrString::String),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: issue.message.clone(),
        ..Default::default()
    }
}

/// Range covering the entire document, for a full replacement edit.
pub(crate) fn full_document_range(text: &str) -> Range {
    let line = text.matches('\n').count() as u32;
    let last_line = text.rsplit('\n').next().unwrap_or("");
    let character = last_line.chars().map(|c| c.len_utf16()).sum::<usize>() as u32;

    Range {
        start: Position {
            line: 0,
            character: 0,
        },
        end: Position { line, character },
    }
}
