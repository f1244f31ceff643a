//! obsreview: review a plan or note in the browser before it goes ahead.
//!
//!   obsreview                  # plan review, hook event on stdin
//!   obsreview annotate note.md # collect feedback on a file
//!   obsreview check-path PATH  # test a save path against ALLOWED_SAVE_PATHS

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use obsreview::browser::{BrowserLauncher, NoBrowser, SystemBrowser};
use obsreview::cli::{self, GateArgs};
use obsreview::server::ReviewInterrupted;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "obsreview",
    version,
    about = "Review agent plans and Markdown notes in your browser",
    long_about = "Serves a note on a local port, waits for you to approve or\n\
                  deny it, and prints the decision for the calling hook.\n\n\
                  With no subcommand, reads a PermissionRequest hook event\n\
                  from stdin and reviews its plan."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    gate: GateArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Review the plan in the hook event on stdin (the default)
    Plan,

    /// Collect feedback on a Markdown file
    #[command(visible_alias = "nota")]
    Annotate {
        /// File to review
        file: String,
    },

    /// Check a path against the save rules without writing anything
    CheckPath {
        path: String,
    },
}

#[tokio::main]
async fn main() {
    // stdout carries the decision; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("obsreview=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let config = cli.gate.into_config();
    let launcher: Box<dyn BrowserLauncher + Send + Sync> = if config.open_browser {
        Box::new(SystemBrowser)
    } else {
        Box::new(NoBrowser)
    };

    let result = match cli.command {
        None | Some(Commands::Plan) => {
            cli::plan::run_plan(tokio::io::stdin(), &config, launcher.as_ref())
                .await
                .and_then(|output| output.to_json_line().context("Failed to encode decision"))
        }
        Some(Commands::Annotate { file }) => {
            cli::annotate::run_annotate(&file, &config, launcher.as_ref()).await
        }
        Some(Commands::CheckPath { path }) => {
            cli::check::run_check_path(&path, &config.allowed_save_paths).map(|_| String::new())
        }
    };

    match result {
        Ok(line) if line.is_empty() => {}
        Ok(line) => println!("{line}"),
        // No decision to report: the calling tool falls back to its own prompt.
        Err(e) if e.downcast_ref::<ReviewInterrupted>().is_some() => {
            eprintln!("  {} {}", "■".yellow(), e);
        }
        Err(e) => {
            eprintln!();
            eprintln!("  {} {}", "✗".red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  {} {}", "caused by:".dimmed(), cause);
            }
            eprintln!();
            std::process::exit(1);
        }
    }
}
