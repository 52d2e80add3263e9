// file: src/utils/logging.rs
// description: tracing subscriber setup and colored console messages for the drafter cli

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set. Logs go to stderr so the
/// wizard prompts and the final artifact path stay readable on stdout.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    // a second init in the same process (tests) is not an error
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

/// A wizard question with its pre-filled answer in brackets.
pub fn format_prompt(question: &str, default: &str) -> String {
    format!("{} [{}]: ", question.bold(), default.dimmed())
}

/// A wizard section banner.
pub fn format_heading(title: &str) -> String {
    format!("\n{}", format!("--- {} ---", title).cyan().bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_text_without_color() {
        colored::control::set_override(false);

        assert_eq!(format_success("saved"), "✓ saved");
        assert_eq!(format_step(2, 4, "Drafting"), "[2/4] Drafting");
        assert_eq!(format_prompt("PI Name", "Unknown PI"), "PI Name [Unknown PI]: ");
        assert_eq!(format_heading("Lifecycle"), "\n--- Lifecycle ---");

        colored::control::unset_override();
    }
}
