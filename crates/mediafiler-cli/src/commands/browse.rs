//! Browse command implementation.
//!
//! Lists the files of a running server and lets the user flip the archived
//! and deleted flags of each entry. The browser owns the entry states; the
//! server only ever hears about a flip through a notification.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use mediafiler_core::clipboard::{copy_link, NativeClipboard};
use mediafiler_core::listing::{self, Listing, ListingEntry};
use mediafiler_core::toggle::{EntryFlag, EntryStates, HttpNotifier, Notifier, ToggleOutcome};

use super::BrowseArgs;
use crate::ui::{style_marker, truncate_string};

const TITLE_WIDTH: usize = 48;

/// How long quitting waits for marks that are still being sent.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Run the browse command.
pub async fn run(args: BrowseArgs) -> Result<()> {
    let client = reqwest::Client::new();
    let base = args.url.trim_end_matches('/').to_string();

    let mut browser = Browser::new(base.clone(), HttpNotifier::with_client(client.clone()));
    browser.load(fetch(&client, &base).await?);
    browser.print();
    print_help();

    let result = prompt(&mut browser, &client, &base).await;

    let notifier = browser.states.notifier();
    if notifier.pending() > 0 {
        println!("  Sending pending marks...");
    }
    if !notifier.flush(DRAIN_TIMEOUT).await {
        eprintln!("  Some marks may not have reached {base}");
    }
    result
}

async fn prompt(
    browser: &mut Browser<HttpNotifier>,
    client: &reqwest::Client,
    base: &str,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  > ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_input(&line) {
            Some(Input::Quit) => break,
            Some(Input::Help) => print_help(),
            Some(Input::Reload) => {
                browser.load(fetch(client, base).await?);
                browser.print();
            }
            Some(Input::Toggle(flag, n)) => match browser.toggle(n, flag) {
                Err(msg) => println!("  {msg}"),
                Ok(ToggleOutcome::Ignored) => {
                    println!("  #{n} is marked {}; undo that first", flag.other());
                }
                Ok(_) => browser.print(),
            },
            Some(Input::Copy(n)) => match browser.link(n) {
                Some(link) => copy_to_clipboard(&link),
                None => println!("  No entry #{n}"),
            },
            Some(Input::Open(n)) => match browser.link(n) {
                Some(link) => {
                    if let Err(e) = open::that(&link) {
                        println!("  Failed to open {link}: {e}");
                    }
                }
                None => println!("  No entry #{n}"),
            },
            None if line.trim().is_empty() => {}
            None => println!("  Unknown command, 'h' for help"),
        }
    }

    Ok(())
}

async fn fetch(client: &reqwest::Client, base: &str) -> Result<Listing> {
    listing::fetch(client, base)
        .await
        .with_context(|| format!("Failed to fetch the listing from {base}"))
}

fn copy_to_clipboard(link: &str) {
    let copied = match NativeClipboard::new() {
        Ok(mut clipboard) => copy_link(&mut clipboard, link),
        Err(e) => {
            tracing::debug!("Clipboard unavailable: {}", e);
            false
        }
    };
    if copied {
        println!("  Copied {link}");
    } else {
        println!("  Could not copy {link}");
    }
}

fn print_help() {
    println!();
    println!("  a N  toggle archived    d N  toggle deleted");
    println!("  c N  copy link          o N  open link");
    println!("  r    reload             q    quit");
    println!();
}

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle(EntryFlag, usize),
    Copy(usize),
    Open(usize),
    Reload,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let mut words = line.split_whitespace();
    let cmd = words.next()?.to_ascii_lowercase();
    let arg = words.next().and_then(|w| w.parse::<usize>().ok());
    if words.next().is_some() {
        return None;
    }

    match (cmd.as_str(), arg) {
        ("a" | "archive", Some(n)) => Some(Input::Toggle(EntryFlag::Archived, n)),
        ("d" | "delete", Some(n)) => Some(Input::Toggle(EntryFlag::Deleted, n)),
        ("c" | "copy", Some(n)) => Some(Input::Copy(n)),
        ("o" | "open", Some(n)) => Some(Input::Open(n)),
        ("r" | "reload", None) => Some(Input::Reload),
        ("h" | "help" | "?", None) => Some(Input::Help),
        ("q" | "quit", None) => Some(Input::Quit),
        _ => None,
    }
}

/// The rendered listing of one server.
struct Browser<N> {
    base: String,
    listing: Listing,
    states: EntryStates<N>,
}

impl<N: Notifier> Browser<N> {
    fn new(base: String, notifier: N) -> Self {
        Self {
            base,
            listing: Listing {
                archive_enabled: false,
                files: Vec::new(),
            },
            states: EntryStates::new(notifier),
        }
    }

    /// Replace the listing; every entry starts with both flags unset.
    fn load(&mut self, listing: Listing) {
        self.states.clear();
        for entry in &listing.files {
            self.states.render(entry.id.clone());
        }
        self.listing = listing;
    }

    /// Entries are numbered from 1.
    fn entry(&self, n: usize) -> Option<&ListingEntry> {
        n.checked_sub(1).and_then(|i| self.listing.files.get(i))
    }

    fn link(&self, n: usize) -> Option<String> {
        self.entry(n).map(|e| e.link(&self.base))
    }

    fn toggle(&mut self, n: usize, flag: EntryFlag) -> std::result::Result<ToggleOutcome, String> {
        if flag == EntryFlag::Archived && !self.listing.archive_enabled {
            return Err("Archiving is not enabled on this server".to_string());
        }
        let Some(entry) = self.entry(n) else {
            return Err(format!("No entry #{n}"));
        };
        let id = entry.id.clone();
        let url = entry.notify_url(&self.base, flag.action());
        Ok(self.states.toggle(&id, flag, flag.other(), &url))
    }

    fn lines(&self) -> Vec<String> {
        self.listing
            .files
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{}{:>3}  {:<width$}  {}",
                    style_marker(self.states.style(&entry.id)),
                    i + 1,
                    truncate_string(&entry.title, TITLE_WIDTH),
                    entry.modified.format("%Y-%m-%d %H:%M"),
                    width = TITLE_WIDTH
                )
            })
            .collect()
    }

    fn print(&self) {
        println!();
        println!("{} ({} files)", self.base, self.listing.files.len());
        println!("{}", "─".repeat(72));
        if self.listing.files.is_empty() {
            println!("  (nothing listed)");
        }
        for line in self.lines() {
            println!("{line}");
        }
        println!("{}", "─".repeat(72));
    }
}
