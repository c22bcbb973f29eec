//! Styled diagnostics on stderr. The tree itself goes through
//! [`crate::render::TreeRenderer`].

use colored::Colorize;
use lb_core::Styler;

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Styler for the tree, following the terminal's color support
/// (`NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE`, tty detection).
pub fn terminal_styler() -> Styler {
    Styler::new(colored::control::SHOULD_COLORIZE.should_colorize())
}
