use std::sync::OnceLock;

use colored::Colorize;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Suppress everything but errors for the rest of the process.
pub fn set_quiet(quiet: bool) {
    let _ = QUIET.set(quiet);
}

pub fn is_quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}

/// Print a success message.
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !is_quiet() {
        println!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if !is_quiet() {
        println!("\n{}", msg.bold());
    }
}

/// Print a plain detail line.
pub fn line(msg: &str) {
    if !is_quiet() {
        println!("{msg}");
    }
}
