//! Terminal rendering of suite output

use console::{Style, Term};
use routecheck::{Reporter, Tally, Tone};
use std::io::Write;
use std::time::Duration;

/// Renders suite output with `console` styling. Writes to stdout by default.
#[derive(Debug)]
pub struct ConsoleReporter<W = Term> {
    out: W,
    /// Whether to use colors and glyphs
    pub use_color: bool,
    /// Quiet mode: only failures are printed
    pub quiet: bool,
    mid_fragment: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ConsoleReporter {
    /// Create a new reporter on stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self::with_writer(Term::stdout(), use_color, quiet)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Create a reporter writing to `out`
    pub const fn with_writer(out: W, use_color: bool, quiet: bool) -> Self {
        Self {
            out,
            use_color,
            quiet,
            mid_fragment: false,
        }
    }

    /// The underlying writer
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Text for one line, or `None` when quiet mode hides it
    #[must_use]
    pub fn render(&self, tone: Tone, message: &str) -> Option<String> {
        if self.quiet && tone != Tone::Failure {
            return None;
        }

        let trimmed = message.trim_start();
        let indent = &message[..message.len() - trimmed.len()];
        let prefix = match (tone, self.use_color) {
            (Tone::Success, true) => Some(tone_style(tone).bold().apply_to("✓").to_string()),
            (Tone::Failure, true) => Some(tone_style(tone).bold().apply_to("✗").to_string()),
            (Tone::Warning, true) => Some(tone_style(tone).bold().apply_to("⚠").to_string()),
            (Tone::Success, false) => Some("PASS".to_string()),
            (Tone::Failure, false) => Some("FAIL".to_string()),
            (Tone::Warning, false) => Some("WARN".to_string()),
            _ => None,
        };
        let body = if self.use_color {
            tone_style(tone).apply_to(trimmed).to_string()
        } else {
            trimmed.to_string()
        };

        Some(match prefix {
            Some(prefix) => format!("{indent}{prefix} {body}"),
            None => format!("{indent}{body}"),
        })
    }

    /// One-line result shown in quiet mode, where the full summary is hidden
    pub fn quiet_summary(&mut self, tally: &Tally, duration: Duration) {
        if !self.quiet {
            return;
        }
        let status = if tally.all_passed() { "PASSED" } else { "FAILED" };
        let status = if self.use_color {
            let style = if tally.all_passed() {
                tone_style(Tone::Success)
            } else {
                tone_style(Tone::Failure)
            };
            style.bold().apply_to(status).to_string()
        } else {
            status.to_string()
        };
        let _ = writeln!(
            self.out,
            "{status} {} tests in {:.2}s ({} passed, {} failed)",
            tally.total(),
            duration.as_secs_f64(),
            tally.passed,
            tally.failed
        );
    }
}

fn tone_style(tone: Tone) -> Style {
    let style = Style::new().force_styling(true);
    match tone {
        Tone::Plain => style,
        Tone::Success => style.green(),
        Tone::Failure => style.red(),
        Tone::Warning | Tone::Notice => style.yellow(),
        Tone::Info => style.cyan(),
        Tone::Heading => style.bold(),
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn line(&mut self, tone: Tone, message: &str) {
        if let Some(text) = self.render(tone, message) {
            let _ = writeln!(self.out, "{text}");
        }
    }

    fn inline(&mut self, tone: Tone, text: &str) {
        if let Some(text) = self.render(tone, text) {
            let _ = write!(self.out, "{text}");
            let _ = self.out.flush();
            self.mid_fragment = true;
        }
    }

    fn fragment(&mut self, text: &str) {
        if self.quiet {
            return;
        }
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
        self.mid_fragment = true;
    }

    fn end_fragments(&mut self) {
        if self.mid_fragment {
            let _ = writeln!(self.out);
            self.mid_fragment = false;
        }
    }
}
