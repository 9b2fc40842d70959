//! CLI command definitions and handlers.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Load configuration with graceful fallback to defaults.
///
/// This function should be used by all commands to load the user's configuration.
/// If the config file doesn't exist or can't be parsed, it falls back to defaults.
pub fn load_config() -> mediafiler_core::config::Config {
    match mediafiler_core::config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring configuration: {e}");
            mediafiler_core::config::Config::default()
        }
    }
}

pub mod browse;
pub mod completions;
pub mod config;
pub mod serve;

/// Mediafiler - Media listing with reversible archive and delete marks
#[derive(Parser)]
#[command(name = "mediafiler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Serve directories and finish marks after the grace period
    Serve(ServeArgs),

    /// Browse a running server from the terminal
    Browse(BrowseArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the serve command
#[derive(Parser)]
pub struct ServeArgs {
    /// Directories to list (defaults to `library.dirs` from the config)
    pub dirs: Vec<PathBuf>,

    /// Comma separated file suffixes to list (e.g., mp4,mkv)
    #[arg(short = 'f', long)]
    pub suffixes: Option<String>,

    /// Directory archived files are moved to
    #[arg(short, long)]
    pub archive_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind to localhost only
    #[arg(long)]
    pub localhost_only: bool,

    /// How long marks stay reversible (e.g., 30s, 11m)
    #[arg(short, long)]
    pub grace: Option<String>,
}

/// Arguments for the browse command
#[derive(Parser)]
pub struct BrowseArgs {
    /// Base URL of the server (e.g., http://192.168.1.5:5555)
    pub url: String,
}

/// Arguments for the config command
#[derive(Parser)]
pub struct ConfigArgs {
    /// Only print the configuration file path
    #[arg(long)]
    pub path: bool,

    /// Output in JSON format
    #[arg(long, conflicts_with = "path")]
    pub json: bool,
}

/// Arguments for the completions command
#[derive(Parser)]
pub struct CompletionsArgs {
    /// Completions subcommand
    #[command(subcommand)]
    pub action: CompletionsAction,
}

/// Completions subcommands
#[derive(Subcommand, Clone, Copy)]
pub enum CompletionsAction {
    /// Install shell completions (auto-detects shell)
    Install {
        /// Override shell detection
        #[arg(long, value_enum)]
        shell: Option<ShellType>,
    },

    /// Uninstall shell completions
    Uninstall {
        /// Override shell detection
        #[arg(long, value_enum)]
        shell: Option<ShellType>,
    },

    /// Generate completions and print to stdout (for manual installation)
    Generate {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: ShellType,
    },
}

/// Supported shell types for completions
#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from([
            "mediafiler",
            "serve",
            "-f",
            "mp4,webm",
            "-a",
            "/srv/archive",
            "--grace",
            "30s",
            "/srv/a",
            "/srv/b",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.dirs, vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]);
        assert_eq!(args.suffixes.as_deref(), Some("mp4,webm"));
        assert_eq!(args.archive_dir, Some(PathBuf::from("/srv/archive")));
        assert_eq!(args.grace.as_deref(), Some("30s"));
        assert_eq!(args.port, None);
        assert!(!args.localhost_only);
    }

    #[test]
    fn test_config_path_conflicts_with_json() {
        assert!(Cli::try_parse_from(["mediafiler", "config", "--path", "--json"]).is_err());
    }
}
