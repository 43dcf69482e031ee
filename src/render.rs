//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction that allows
//! for different output styles. The default implementation streams raw
//! fragments to stdout with optional ANSI styling; markup-oriented sinks
//! (a web view, a test harness) can instead consume the re-rendered
//! markup pushed after every fragment.

use std::io::{self, Stdout, Write};

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Markup sinks that replace the displayed message on every fragment
pub trait Renderer: Send {
    /// Print a chunk of response text.
    ///
    /// This is called incrementally with each fragment as it is streamed
    /// from the API.
    fn print_fragment(&mut self, text: &str);

    /// Receive the full formatted markup of the reply so far.
    ///
    /// Called after every fragment with the formatter's output over the
    /// whole accumulated text. Stream-oriented sinks may ignore this.
    fn render_markup(&mut self, markup: &str) {
        _ = markup;
    }

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called after every transcript mutation so the view can keep the
    /// latest message visible.
    fn scroll_to_latest(&mut self) {}

    /// Called when a response is complete.
    ///
    /// Used to ensure proper newlines and cleanup after streaming.
    fn finish_response(&mut self);
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer outputs text directly to stdout, flushing after each
/// fragment so streamed content appears immediately.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
        }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_fragment(&mut self, text: &str) {
        print!("{text}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("\n{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            eprintln!("\nError: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn finish_response(&mut self) {
        println!();
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }
}
