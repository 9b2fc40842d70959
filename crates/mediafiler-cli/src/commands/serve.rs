//! Serve command implementation.

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use mediafiler_core::config::{parse_duration, Config};
use mediafiler_core::library::{normalize_suffixes, parse_suffixes, Library};
use mediafiler_core::reaper::{self, Reaper};
use mediafiler_core::web::{AppState, WebServer, WebServerConfig};
use mediafiler_core::Error;

use super::ServeArgs;
use crate::ui::{format_grace, AddressBox};

/// Run the serve command.
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = apply_args(super::load_config(), args)?;
    let library_config = config.library;

    let marks = reaper::discover(&library_config.dirs, SystemTime::now())?;
    let marks = Arc::new(Mutex::new(marks));

    let mut library = Library::new(
        library_config.dirs,
        normalize_suffixes(&library_config.suffixes),
    );
    library.refresh()?;
    let file_count = library.files().len();

    if let Some(archive_dir) = &library_config.archive_dir {
        std::fs::create_dir_all(archive_dir).with_context(|| {
            format!("Failed to create archive directory: {}", archive_dir.display())
        })?;
    }

    let grace = config.reaper.grace_period;
    let reaper = Reaper::new(library_config.archive_dir.clone(), grace);
    let reaper_task = tokio::spawn(reaper.run(marks.clone()));

    let state = AppState::new(library, marks, library_config.archive_dir);
    let server = WebServer::new(WebServerConfig::from(&config.web), state);

    let addresses = server.addresses();
    let footer = format!("{file_count} files, marks reversible for {}", format_grace(grace));
    println!();
    println!("Mediafiler v{}", mediafiler_core::VERSION);
    println!("{}", "-".repeat(45));
    AddressBox::new(&addresses).with_footer(&footer).display();
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let served = server.run(async {
        let _ = tokio::signal::ctrl_c().await;
    });

    tokio::select! {
        result = served => result?,
        joined = reaper_task => {
            let reason = joined.err().map_or_else(|| "stopped".to_string(), |e| e.to_string());
            anyhow::bail!("Reaper task ended unexpectedly: {reason}");
        }
    }

    Ok(())
}

/// Override `config` with whatever was given on the command line.
fn apply_args(mut config: Config, args: ServeArgs) -> Result<Config> {
    if !args.dirs.is_empty() {
        config.library.dirs = args.dirs;
    }
    if config.library.dirs.is_empty() {
        return Err(Error::NoDirectories.into());
    }
    if let Some(suffixes) = args.suffixes {
        config.library.suffixes = parse_suffixes(&suffixes);
    }
    if args.archive_dir.is_some() {
        config.library.archive_dir = args.archive_dir;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if args.localhost_only {
        config.web.localhost_only = true;
    }
    if let Some(grace) = args.grace {
        config.reaper.grace_period = parse_duration(&grace)
            .with_context(|| format!("Invalid grace period '{grace}'. Use formats like '30s' or '11m'"))?;
    }

    config.validate()?;
    Ok(config)
}
