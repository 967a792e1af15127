//! Colored console output

use colored::Colorize;
use tm_core::Reporter;

/// Prints progress to the terminal: steps in blue, successes in green,
/// warnings in yellow on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn step(&self, message: &str) {
        println!("{}", message.blue().bold());
    }

    fn success(&self, message: &str) {
        println!("{}", message.green().bold());
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", message.yellow().bold());
    }
}
