//! services/client/src/adapters/terminal.rs
//!
//! A `UiShell` for the command line: routes become a status line, dialogs are
//! printed as blocks of text, and confirmations are read from stdin.

use myflix_core::domain::{Dialog, Route};
use myflix_core::ports::UiShell;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct TerminalShell {
    /// Answer every confirmation with "yes" without prompting.
    pub assume_yes: bool,
}

impl TerminalShell {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Renders a dialog the way the terminal shows it.
pub fn render_dialog(dialog: &Dialog) -> String {
    match dialog {
        Dialog::Genre { name, description } => format!("Genre: {}\n\n{}", name, description),
        Dialog::Director { name, bio, birth } => {
            let born = birth.as_deref().unwrap_or("unknown");
            format!("Director: {}\nBorn: {}\n\n{}", name, born, bio)
        }
        Dialog::Synopsis { title, description } => format!("{}\n\n{}", title, description),
        Dialog::UpdateProfile => "Update profile".to_string(),
        Dialog::Registration => "Sign up".to_string(),
        Dialog::Login => "Log in".to_string(),
    }
}

impl UiShell for TerminalShell {
    fn navigate(&self, route: Route) {
        debug!(route = route.name(), "Navigating");
        println!("-> {}", route.name());
    }

    fn open_dialog(&self, dialog: Dialog) {
        let width = dialog.width() as usize / 10;
        let rule = "-".repeat(width);
        println!("{}\n{}\n{}", rule, render_dialog(&dialog), rule);
    }

    fn notify(&self, message: &str, action: &str, duration: Duration) {
        debug!(duration_ms = duration.as_millis() as u64, "Notification");
        println!("{} [{}]", message, action);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        // Blocks the calling worker thread. The binary runs one command and
        // nothing else is in flight while it waits for an answer.
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}
