//! User-facing console output
//!
//! Styled status lines for the CLI. Library code reports through the
//! [`Console`] trait so callers can route diagnostics elsewhere.

use console::style;

/// Sink for the human-readable lines an export or config load produces.
pub trait Console {
    /// Report a completed step
    fn success(&self, message: &str);

    /// Report a failure that was swallowed at an operation boundary
    fn error(&self, message: &str);

    /// Report something worth noticing that is not a failure
    fn warning(&self, message: &str);
}

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print an exported artifact location
    pub fn artifact(&self, format: &str, location: &str) {
        if !self.quiet {
            println!(
                "  {} {:<5} {}",
                style("•").cyan(),
                style(format).bold(),
                style(location).underlined()
            );
        }
    }

    /// Print a count/summary with enhanced styling
    pub fn count(&self, icon: &str, message: &str, count: usize) {
        if !self.quiet {
            println!(
                "{} {} {}",
                style(icon).cyan().bold(),
                style(message).bold(),
                style(format!("({})", count)).dim()
            );
        }
    }
}

impl Console for Output {
    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), style(message).green());
        }
    }

    fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), style(message).red().bold());
    }

    fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }
}

/// Console that drops everything, for callers that only want the result.
pub struct Silent;

impl Console for Silent {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
}
