//! php-cs-fixer output parsing.
//!
//! The fixer's `--format=json` mode reports which rules applied and a unified
//! diff per file, but no structured per-line locations. Line attribution is
//! reconstructed by replaying the diff's hunk bookkeeping the way a diff-apply
//! tool would: context and removal lines advance the pre-image cursor,
//! insertion lines do not.
//!
//! This module is the strict parser boundary for the tool's output: text in,
//! structured issues (or an empty list with a logged warning) out. Nothing in
//! here returns an error to the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Label used when the fixer reports a diff without naming any applied rules.
const FALLBACK_RULE_LABEL: &str = "code_style";

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,\d+)? \+(\d+)(?:,\d+)? @@").expect("hunk header pattern is valid")
});

/// Severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single style issue recovered from the fixer's diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// 1-based line in the pre-image of the diff
    pub line: u32,
    /// 0-based column; diff output carries no column data, so always 0
    pub column: u32,
    pub message: String,
    pub severity: Severity,
    /// First applied fixer name, if the tool reported one
    pub rule: Option<String>,
}

/// JSON envelope printed by `php-cs-fixer --format=json`.
#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    files: Vec<FileReport>,
}

#[derive(Debug, Deserialize)]
struct FileReport {
    #[serde(default)]
    diff: Option<String>,
    #[serde(default, rename = "appliedFixers")]
    applied_fixers: Vec<String>,
}

/// Extract the outermost `{...}` span from free-form tool output.
///
/// The fixer may prepend deprecation notices or append timing lines around the
/// JSON object, so the span runs from the first `{` to the last `}`.
fn extract_json_object(output: &str) -> Option<&str> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&output[start..=end])
}

/// Parse raw fixer output into issues.
///
/// Output without a decodable JSON object, or with an envelope that does not
/// match the expected shape, yields an empty list. Parse problems are logged,
/// never surfaced as errors.
pub fn parse_output(output: &str) -> Vec<Issue> {
    let Some(json) = extract_json_object(output) else {
        return Vec::new();
    };

    let report: Report = match serde_json::from_str(json) {
        Ok(report) => report,
        Err(e) => {
            log::warn!("Failed to parse php-cs-fixer output: {}", e);
            return Vec::new();
        }
    };

    let mut issues = Vec::new();
    for file in &report.files {
        if let Some(diff) = &file.diff
            && !diff.is_empty()
        {
            issues.extend(parse_diff(diff, &file.applied_fixers));
        }
    }

    issues
}

/// Walk a unified diff and emit one issue per removed line.
///
/// The hunk header resets the cursor to the pre-image start line; every line
/// that is not an addition advances it. Removal lines (other than the `---`
/// file marker) are reported at the cursor position before it advances.
fn parse_diff(diff: &str, applied_fixers: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut current_line: u32 = 0;

    let rules_text = if applied_fixers.is_empty() {
        FALLBACK_RULE_LABEL.to_string()
    } else {
        applied_fixers.join(", ")
    };

    for line in diff.lines() {
        if let Some(caps) = HUNK_HEADER.captures(line) {
            // Group 1 always matches digits; out-of-range values mean a
            // diff we cannot attribute, so keep the cursor where it was
            if let Ok(start) = caps[1].parse::<u32>() {
                current_line = start;
            }
            continue;
        }

        if line.starts_with('-') && !line.starts_with("---") {
            issues.push(Issue {
                line: current_line,
                column: 0,
                message: format!("php-cs-fixer: {}", rules_text),
                severity: Severity::Warning,
                rule: applied_fixers.first().cloned(),
            });
        }

        if !line.starts_with('+') {
            current_line += 1;
        }
    }

    issues
}

/// Decide whether fix-mode output looks like a successful run.
///
/// php-cs-fixer exits nonzero when it changed files, so the exit code alone
/// cannot distinguish "fixed things" from "broke down". A JSON object carrying
/// a `files` or `time` key means the tool ran to completion.
pub fn is_success_report(output: &str) -> bool {
    let Some(json) = extract_json_object(output) else {
        return false;
    };

    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => value.get("files").is_some() || value.get("time").is_some(),
        Err(_) => false,
    }
}
