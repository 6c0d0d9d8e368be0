//! # VFS Console
//!
//! Main entry point for the `vfs` command.

use clap::Parser;
use env_logger::Env;
use services_namespace::{NamespaceConfig, NamespaceService};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process;
use vfs_console::{run, Console};

/// Block-backed virtual filesystem console
#[derive(Debug, Parser)]
#[command(
    name = "vfs",
    version,
    about = "Block-backed virtual filesystem console",
    long_about = None
)]
struct Cli {
    /// Store root holding one directory per user (overrides VFS_ROOT)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Execute commands from a script file instead of standard input
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Log every storage step
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let service = NamespaceService::new(build_config(&cli)).unwrap_or_else(|e| {
        eprintln!("Failed to open store: {}", e);
        process::exit(1);
    });
    let mut console = Console::new(service);

    let stdout = io::stdout();
    let mut output = stdout.lock();
    let result = match &cli.script {
        Some(path) => {
            let file = File::open(path).unwrap_or_else(|e| {
                eprintln!("Failed to read script {}: {}", path.display(), e);
                process::exit(1);
            });
            run(&mut console, BufReader::new(file), &mut output, false)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            run(&mut console, stdin.lock(), &mut output, interactive)
        }
    };

    if let Err(e) = result {
        eprintln!("Input error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}

/// Defaults, then `VFS_ROOT`, then `--root`
fn build_config(cli: &Cli) -> NamespaceConfig {
    let mut config = NamespaceConfig::from_env();
    if let Some(root) = &cli.root {
        config.store_root = root.clone();
    }
    config
}
