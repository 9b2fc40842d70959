//! UI utilities for the Mediafiler CLI.

use std::time::Duration;

use mediafiler_core::toggle::EntryStyle;

const BOX_WIDTH: usize = 41;

/// A formatted box listing the addresses a server is reachable at.
pub struct AddressBox<'a> {
    addresses: &'a [String],
    footer: Option<&'a str>,
}

impl<'a> AddressBox<'a> {
    /// Create a new address box.
    #[must_use]
    pub const fn new(addresses: &'a [String]) -> Self {
        Self {
            addresses,
            footer: None,
        }
    }

    /// Add a footer line below the addresses.
    #[must_use]
    pub const fn with_footer(mut self, footer: &'a str) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Display the box to stdout.
    pub fn display(&self) {
        println!("  ┌{}┐", "─".repeat(BOX_WIDTH));
        println!("  │{}│", " ".repeat(BOX_WIDTH));
        for addr in self.addresses {
            println!("  │{}│", center_in_box(addr, BOX_WIDTH));
        }
        println!("  │{}│", " ".repeat(BOX_WIDTH));

        if let Some(footer) = self.footer {
            println!("  │{}│", center_in_box(footer, BOX_WIDTH));
            println!("  │{}│", " ".repeat(BOX_WIDTH));
        }

        println!("  └{}┘", "─".repeat(BOX_WIDTH));
    }
}

fn center_in_box(content: &str, width: usize) -> String {
    let content_len = content.chars().count();
    let padding = width.saturating_sub(content_len);
    let left = padding / 2;
    let right = padding - left;
    format!("{}{}{}", " ".repeat(left), content, " ".repeat(right))
}

/// Format a grace period the way it is written in the config ("11m", "90s").
pub fn format_grace(grace: Duration) -> String {
    let secs = grace.as_secs();
    if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Marker printed in front of an entry for its style.
pub const fn style_marker(style: EntryStyle) -> &'static str {
    match style {
        EntryStyle::Normal => "  ",
        EntryStyle::Archived => "A ",
        EntryStyle::Deleted => "D ",
    }
}

/// Truncate a string to fit within a maximum width.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
