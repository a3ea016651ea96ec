use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::sync::{Mutex, RwLock};

use php_cs_fixer_lsp::diff::Severity;
use php_cs_fixer_lsp::{FixerRunner, RunnerError, Settings};

mod cli;
use cli::{Cli, Commands};

/// Build one-shot settings from CLI flags, anchored at the target file's
/// directory so config discovery behaves like the server's workspace lookup.
fn runner_for(cli: &Cli, file: &Path) -> FixerRunner {
    let mut settings = Settings::default();
    if let Some(executable) = &cli.executable {
        settings.executable_path = executable.clone();
    }
    if let Some(config) = &cli.config {
        settings.config_path = config.to_string_lossy().into_owned();
    }
    settings.allow_risky = cli.allow_risky;

    let root = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok());

    FixerRunner::new(
        Arc::new(RwLock::new(settings)),
        Arc::new(Mutex::new(root)),
    )
}

fn print_issues(file: &PathBuf, issues: &[php_cs_fixer_lsp::Issue]) {
    let file_name = file.display();

    for issue in issues {
        let severity_str = match issue.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",     // red
            Severity::Warning => "\x1b[33mwarning\x1b[0m", // yellow
        };

        match &issue.rule {
            Some(rule) => println!(
                "{severity_str}[{}]: {} at {}:{}:{}",
                rule, issue.message, file_name, issue.line, issue.column
            ),
            None => println!(
                "{severity_str}: {} at {}:{}:{}",
                issue.message, file_name, issue.line, issue.column
            ),
        }
    }

    println!("\nFound {} issue(s)", issues.len());
}

fn exit_with(err: RunnerError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(2);
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Lsp => {
            // LSP needs tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async { php_cs_fixer_lsp::lsp::run().await })?;
            Ok(())
        }
        Commands::Check { file } => {
            let runner = runner_for(&cli, file);
            let rt = tokio::runtime::Runtime::new()?;
            let result = match rt.block_on(runner.check(file)) {
                Ok(result) => result,
                Err(e) => exit_with(e),
            };

            if result.issues.is_empty() {
                println!("No code style issues found");
                return Ok(());
            }

            print_issues(file, &result.issues);
            std::process::exit(1);
        }
        Commands::Fix { file } => {
            let runner = runner_for(&cli, file);
            let rt = tokio::runtime::Runtime::new()?;
            let result = match rt.block_on(runner.fix(file)) {
                Ok(result) => result,
                Err(e) => exit_with(e),
            };

            if !result.success {
                eprintln!("php-cs-fixer failed:\n{}", result.output);
                std::process::exit(1);
            }

            println!("Fixed {}", file.display());
            Ok(())
        }
    }
}
