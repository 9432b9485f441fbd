//! Styled terminal output utilities.

use std::io::{self, BufRead, Write};

use keel_migrate::{Confirm, Reporter, TableDiff};
use owo_colors::OwoColorize;

/// Print a header/title
pub fn header(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
    println!("{}", "─".repeat(text.len()).dimmed());
    println!();
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a success message
pub fn success(text: &str) {
    println!("{} {}", "✔".green().bold(), text.green());
}

/// Print an info message
pub fn info(text: &str) {
    println!("{} {}", "ℹ".blue().bold(), text);
}

/// Print a warning message
pub fn warn(text: &str) {
    println!("{} {}", "⚠".yellow().bold(), text.yellow());
}

/// Print an error message
pub fn error(text: &str) {
    eprintln!("{} {}", "✖".red().bold(), text.red());
}

/// Print a progress line
pub fn progress(text: &str) {
    println!("{} {}", "…".dimmed(), text.dimmed());
}

/// Print a newline
pub fn newline() {
    println!();
}

/// Describe one table's planned fields
pub fn table_line(table: &TableDiff) -> String {
    let fields: Vec<&str> = table.field_names().collect();
    format!("-> {} fields on {} table.", fields.join(", "), table.table)
}

/// Ask for confirmation on stdin
pub fn confirm(prompt: &str) -> bool {
    confirm_from(prompt, &mut io::stdin().lock())
}

fn confirm_from(prompt: &str, input: &mut impl BufRead) -> bool {
    print!("{} {} ", prompt, "[y/N]".dimmed());
    io::stdout().flush().ok();

    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirmation port backed by the terminal.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn ask(&mut self, question: &str) -> bool {
        confirm(question)
    }
}

/// Progress port that prints styled lines.
#[derive(Debug, Default)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn start(&mut self, message: &str) {
        progress(message);
    }

    fn stop(&mut self) {}

    fn info(&mut self, message: &str) {
        info(message);
    }

    fn warn(&mut self, message: &str) {
        warn(message);
    }

    fn table_change(&mut self, table: &TableDiff) {
        println!("  {}", table_line(table).bright_white());
    }
}
