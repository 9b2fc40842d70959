//! Mediafiler CLI - Media listing with reversible archive and delete marks
//!
//! Mediafiler serves the media files of a few directories as a web page.
//! Viewers mark files as archived or deleted; marks stay reversible until
//! the grace period passes.
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve two directories, archiving into ~/archive
//! mediafiler serve -a ~/archive ~/videos /mnt/recordings
//!
//! # Browse the server from another terminal
//! mediafiler browse http://192.168.1.5:5555
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

use anyhow::Result;
use clap::Parser;

mod commands;
pub mod ui;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Browse(args) => commands::browse::run(args).await,
        Command::Config(args) => commands::config::run(args).await,
        Command::Completions(args) => commands::completions::run(args.action),
    };

    if let Err(e) = &result {
        if let Some(hint) = e
            .downcast_ref::<mediafiler_core::Error>()
            .and_then(mediafiler_core::Error::suggestion)
        {
            eprintln!();
            eprintln!("{hint}");
            eprintln!();
        }
    }
    result
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mediafiler=info,mediafiler_core=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
