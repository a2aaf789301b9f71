//! Terminal output
//!
//! Data rows go to stdout uncolored so they pipe cleanly; diagnostics go to
//! stderr. `colored` honors NO_COLOR and CLICOLOR_FORCE by itself.

use std::fmt::Display;

use colored::Colorize;

/// Print an error with a red bold prefix to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Bold cyan title above a block of rows
pub fn header(title: &str) {
    println!("{}", title.cyan().bold());
}

/// One uncolored row per item
pub fn rows<S: AsRef<str>>(rows: &[S]) {
    for row in rows {
        println!("{}", row.as_ref());
    }
}
