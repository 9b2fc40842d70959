//! Shell completions generation and installation.

use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{bail, Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use super::{Cli, CompletionsAction, ShellType};

const BIN_NAME: &str = "mediafiler";

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Self::Bash,
            ShellType::Zsh => Self::Zsh,
            ShellType::Fish => Self::Fish,
            ShellType::PowerShell => Self::PowerShell,
            ShellType::Elvish => Self::Elvish,
        }
    }
}

impl ShellType {
    fn from_program(name: &str) -> Option<Self> {
        let program = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let program = program.trim_end_matches(".exe").to_lowercase();
        match program.as_str() {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            "pwsh" | "powershell" => Some(Self::PowerShell),
            "elvish" => Some(Self::Elvish),
            _ => None,
        }
    }
}

/// Run the completions command.
pub fn run(action: CompletionsAction) -> Result<()> {
    match action {
        CompletionsAction::Install { shell } => install(resolve_shell(shell)?),
        CompletionsAction::Uninstall { shell } => uninstall(resolve_shell(shell)?),
        CompletionsAction::Generate { shell } => {
            generate(Shell::from(shell), &mut Cli::command(), BIN_NAME, &mut io::stdout());
            Ok(())
        }
    }
}

fn render(shell: ShellType) -> Result<String> {
    let mut buf = Vec::new();
    generate(Shell::from(shell), &mut Cli::command(), BIN_NAME, &mut buf);
    String::from_utf8(buf).context("completions are not valid UTF-8")
}

fn resolve_shell(shell: Option<ShellType>) -> Result<ShellType> {
    if let Some(shell) = shell {
        return Ok(shell);
    }
    let program = env::var("SHELL").context(
        "Could not detect shell from $SHELL environment variable.\n\
         Use --shell to specify your shell manually.",
    )?;
    match ShellType::from_program(&program) {
        Some(shell) => Ok(shell),
        None => bail!(
            "Unknown shell: {program}\n\
             Supported shells: bash, zsh, fish, powershell, elvish\n\
             Use --shell to specify your shell manually."
        ),
    }
}

fn env_dir(var: &str, home: &Path, fallback: &str) -> PathBuf {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map_or_else(|| home.join(fallback), PathBuf::from)
}

/// Where completions for `shell` live under `home`.
fn completions_path(shell: ShellType, home: &Path) -> PathBuf {
    match shell {
        ShellType::Bash => env_dir("XDG_DATA_HOME", home, ".local/share")
            .join("bash-completion/completions")
            .join(BIN_NAME),
        ShellType::Zsh => env_dir("XDG_DATA_HOME", home, ".local/share")
            .join("zsh/site-functions")
            .join(format!("_{BIN_NAME}")),
        ShellType::Fish => env_dir("XDG_CONFIG_HOME", home, ".config")
            .join("fish/completions")
            .join(format!("{BIN_NAME}.fish")),
        ShellType::PowerShell if cfg!(windows) => home
            .join("Documents/PowerShell/Modules/MediafilerCompletion/MediafilerCompletion.psm1"),
        ShellType::PowerShell => home
            .join(".config/powershell/Microsoft.PowerShell_profile.d")
            .join(format!("{BIN_NAME}.ps1")),
        ShellType::Elvish => home.join(".elvish/lib").join(format!("{BIN_NAME}.elv")),
    }
}

fn home_dir() -> Result<PathBuf> {
    env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .context("Could not determine home directory")
}

fn install(shell: ShellType) -> Result<()> {
    let path = completions_path(shell, &home_dir()?);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, render(shell)?)
        .with_context(|| format!("Failed to write completions to: {}", path.display()))?;

    println!("✓ Installed {shell:?} completions to: {}", path.display());
    println!();
    println!("{}", activation_hint(shell, &path));
    Ok(())
}

fn uninstall(shell: ShellType) -> Result<()> {
    let path = completions_path(shell, &home_dir()?);

    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("Failed to remove: {}", path.display()))?;
        println!("✓ Removed {shell:?} completions from: {}", path.display());
    } else {
        println!("No completions file found at: {}", path.display());
    }
    Ok(())
}

fn activation_hint(shell: ShellType, path: &Path) -> String {
    match shell {
        ShellType::Bash => format!(
            "Restart your shell or run:\n  source {}",
            path.display()
        ),
        ShellType::Zsh => format!(
            "Make sure {} is in your fpath, then run: exec zsh",
            path.parent().unwrap_or(path).display()
        ),
        ShellType::Fish => "Completions will be available in new shell sessions.".to_string(),
        ShellType::PowerShell => format!(
            "Add this to your PowerShell profile:\n  Import-Module {}",
            path.display()
        ),
        ShellType::Elvish => format!("Add this to your ~/.elvish/rc.elv:\n  use {BIN_NAME}"),
    }
}
