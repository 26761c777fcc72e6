//! Project automation tasks.
//!
//! Run via `cargo xtask <command>`.

use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Command line interface for the `xtask` helper.
#[derive(Debug, Parser)]
#[command(name = "xtask")]
struct Cli {
    /// Task to run.
    #[command(subcommand)]
    command: CommandName,
}

/// Supported automation commands.
#[derive(Debug, Subcommand)]
enum CommandName {
    /// Format the workspace and run the linter.
    Tidy,
    /// Run tests using cargo nextest.
    Test,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

/// Dispatch the selected `xtask` command.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let sh = repo_shell()?;

    match cli.command {
        CommandName::Tidy => {
            format_workspace(&sh)?;
            cmd!(
                sh,
                "cargo clippy -q --fix --all --all-targets --all-features --allow-dirty --tests --examples"
            )
            .run()?;
            format_workspace(&sh)
        }
        CommandName::Test => {
            cmd!(sh, "cargo nextest run --all").run()?;
            // nextest does not run doctests.
            cmd!(sh, "cargo test --doc --all").run()?;
            Ok(())
        }
    }
}

/// Format the workspace, preferring a nightly rustfmt config when present.
fn format_workspace(sh: &Shell) -> Result<()> {
    let config = sh.current_dir().join("rustfmt-nightly.toml");
    if config.is_file() {
        cmd!(sh, "cargo +nightly fmt --all -- --config-path {config}").run()?;
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
    }
    Ok(())
}

/// Shell rooted at the workspace root, one level above this crate.
fn repo_shell() -> Result<Shell> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("xtask crate must live at <repo>/xtask")?
        .to_path_buf();
    let sh = Shell::new()?;
    sh.change_dir(root);
    Ok(sh)
}
