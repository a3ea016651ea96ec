//! External php-cs-fixer process invocation.
//!
//! This module builds and spawns the fixer command line for the two supported
//! modes (dry-run check and in-place fix) and normalizes the captured output.
//! The fixer uses nonzero exit codes to signal "issues found", so exit status
//! is never conflated with logical failure here; the only hard error is a
//! spawn failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::{Mutex, RwLock};

use crate::config::Settings;
use crate::diff::{self, Issue};

/// Errors from invoking the external fixer.
#[derive(Debug)]
pub enum RunnerError {
    /// Fixer executable not found or failed to spawn
    SpawnFailed { command: String, source: std::io::Error },
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpawnFailed { command, source } => {
                write!(f, "failed to run {}: {}", command, source)
            }
        }
    }
}

impl std::error::Error for RunnerError {}

/// Normalized result of one fixer invocation.
///
/// Produced once per spawn and handed to the caller; nothing is cached or
/// persisted across invocations.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Logical success; for fix mode this may be true despite a nonzero exit
    pub success: bool,
    /// Raw captured output (stdout, or stderr when stdout is empty)
    pub output: String,
    /// Issues recovered from the output diff (check mode only)
    pub issues: Vec<Issue>,
}

/// Build the argument vector for a fixer invocation.
///
/// Flag order matches the tool's documented invocation: mode flags first, then
/// `--config` (only when a config file resolved), then `--allow-risky=yes`,
/// with `--format=json` always last.
pub fn build_args(
    file: &Path,
    dry_run: bool,
    config_path: Option<&Path>,
    allow_risky: bool,
) -> Vec<String> {
    let mut args = vec!["fix".to_string(), file.to_string_lossy().into_owned()];

    if dry_run {
        args.push("--dry-run".to_string());
        args.push("--diff".to_string());
        args.push("--verbose".to_string());
    }

    if let Some(config) = config_path {
        args.push(format!("--config={}", config.display()));
    }

    if allow_risky {
        args.push("--allow-risky=yes".to_string());
    }

    args.push("--format=json".to_string());
    args
}

/// Spawns php-cs-fixer against on-disk files.
///
/// Holds a shared snapshot of the settings and the workspace root; the
/// snapshot is replaced wholesale when the client pushes new configuration, so
/// each invocation reads the state current at that moment.
pub struct FixerRunner {
    settings: Arc<RwLock<Settings>>,
    workspace_root: Arc<Mutex<Option<PathBuf>>>,
}

impl FixerRunner {
    pub fn new(
        settings: Arc<RwLock<Settings>>,
        workspace_root: Arc<Mutex<Option<PathBuf>>>,
    ) -> Self {
        Self {
            settings,
            workspace_root,
        }
    }

    /// Dry-run check of a file. Issues are recovered from the diff output;
    /// `success` reflects the process exit status (false means the fixer
    /// found something to fix, not that the run broke).
    pub async fn check(&self, file: &Path) -> Result<RunResult, RunnerError> {
        let (executable, args) = self.assemble(file, true).await;
        let (status_ok, output) = self.spawn(&executable, &args).await?;

        let issues = diff::parse_output(&output);
        Ok(RunResult {
            success: status_ok,
            output,
            issues,
        })
    }

    /// In-place fix of a file. A nonzero exit with a success-shaped JSON body
    /// still counts as success, matching the tool's exit-code conventions.
    pub async fn fix(&self, file: &Path) -> Result<RunResult, RunnerError> {
        let (executable, args) = self.assemble(file, false).await;
        let (status_ok, output) = self.spawn(&executable, &args).await?;

        let success = status_ok || diff::is_success_report(&output);
        Ok(RunResult {
            success,
            output,
            issues: Vec::new(),
        })
    }

    async fn assemble(&self, file: &Path, dry_run: bool) -> (String, Vec<String>) {
        let settings = self.settings.read().await.clone();
        let workspace_root = self.workspace_root.lock().await.clone();

        let config_path = settings.resolve_config_path(workspace_root.as_deref());
        let args = build_args(file, dry_run, config_path.as_deref(), settings.allow_risky);

        (settings.executable_path, args)
    }

    async fn spawn(&self, executable: &str, args: &[String]) -> Result<(bool, String), RunnerError> {
        log::debug!("Invoking fixer: {} {}", executable, args.join(" "));

        let output = Command::new(executable)
            .args(args)
            .output()
            .await
            .map_err(|source| RunnerError::SpawnFailed {
                command: executable.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            log::debug!(
                "Fixer exited with {:?}: {}",
                output.status.code(),
                if stderr.is_empty() { &stdout } else { &stderr }
            );
        }

        // The tool writes its JSON report to stdout; stderr only matters when
        // stdout is empty (missing binary wrappers, PHP fatals)
        let text = if stdout.is_empty() { stderr } else { stdout };
        Ok((output.status.success(), text))
    }
}
