//! Shared CLI helpers — banner and response printing.

use colored::Colorize;

/// Print an agent response to stdout.
pub fn print_response(response: &str) {
    println!();
    println!("{}", "🧠 Mnemo".cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(tool_count: usize) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🧠 Mnemo".cyan().bold(), version.dimmed());
    println!(
        "{}",
        format!("{tool_count} tools available. Type a message, or \"exit\" to quit.").dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}
