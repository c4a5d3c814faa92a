//! Report line colors, named after the Catppuccin palette.
//!
//! Plain ANSI colors only, so the output reads the same in any terminal.

use colored::{ColoredString, Colorize};

/// Palette accessors for anything string-like.
pub trait CatppuccinExt {
    fn ctp_red(&self) -> ColoredString;
    fn peach(&self) -> ColoredString;
    fn ctp_yellow(&self) -> ColoredString;
    fn ctp_green(&self) -> ColoredString;
    fn overlay0(&self) -> ColoredString;
}

impl<S: AsRef<str>> CatppuccinExt for S {
    // API errors
    fn ctp_red(&self) -> ColoredString {
        self.as_ref().bright_red()
    }

    // Transport/protocol failures; dimmer than the syncing yellow
    fn peach(&self) -> ColoredString {
        self.as_ref().yellow()
    }

    // Still syncing
    fn ctp_yellow(&self) -> ColoredString {
        self.as_ref().bright_yellow()
    }

    // Live
    fn ctp_green(&self) -> ColoredString {
        self.as_ref().bright_green()
    }

    // Timestamps
    fn overlay0(&self) -> ColoredString {
        self.as_ref().bright_black()
    }
}
