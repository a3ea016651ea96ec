use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "php-cs-fixer-lsp")]
#[command(author, version)]
#[command(about = "A language server and CLI wrapper around php-cs-fixer")]
#[command(
    long_about = "php-cs-fixer-lsp integrates the php-cs-fixer code style tool with LSP-capable \
    editors. It runs the fixer in dry-run mode as you type and publishes the would-be changes as \
    diagnostics, and serves the fixer's in-place mode as document formatting."
)]
#[command(after_help = "\
EXAMPLES:

    # Start the language server (stdio)
    php-cs-fixer-lsp lsp

    # Check a file once and print its style issues
    php-cs-fixer-lsp check src/Kernel.php

    # Fix a file in place
    php-cs-fixer-lsp fix src/Kernel.php

CONFIGURATION:

Without --config, a config file is discovered next to the target file (or in
the workspace root when running as a server), trying in order:
  .php-cs-fixer.php, .php-cs-fixer.dist.php, .php-cs.php, .php-cs.dist.php")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path or name of the php-cs-fixer executable
    #[arg(long, global = true, env = "PHP_CS_FIXER_PATH")]
    pub executable: Option<String>,

    /// Path to a php-cs-fixer config file
    #[arg(long, global = true)]
    #[arg(help = "Path to a php-cs-fixer configuration file")]
    pub config: Option<PathBuf>,

    /// Pass --allow-risky=yes to the fixer
    #[arg(long, global = true)]
    pub allow_risky: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Language Server Protocol server
    #[command(
        long_about = "Start the LSP server for editor integration. The server communicates via \
        stdin/stdout and is typically launched automatically by your editor's LSP client."
    )]
    Lsp,
    /// Check a file and print its code style issues
    Check {
        /// PHP file to check
        file: PathBuf,
    },
    /// Fix a file in place
    Fix {
        /// PHP file to fix
        file: PathBuf,
    },
}
