//! Output seam between the cases and whatever renders them.
//!
//! Cases never print directly; they describe each line with a [`Tone`] and
//! the reporter decides on color and glyphs. The CLI renders to the
//! terminal, tests use [`MemoryReporter`].

/// Width of section rules and banners.
pub const RULE_WIDTH: usize = 60;

/// Presentation class of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Uncolored text
    Plain,
    /// Check passed (green)
    Success,
    /// Check failed (red)
    Failure,
    /// Non-fatal problem (yellow)
    Warning,
    /// Metadata such as model names and token counts (cyan)
    Info,
    /// Model output and hints (yellow)
    Notice,
    /// Titles (bold)
    Heading,
}

/// Sink for everything a suite run prints.
pub trait Reporter {
    /// Print one complete line.
    fn line(&mut self, tone: Tone, message: &str);

    /// Start a line without terminating it; fragments continue it.
    fn inline(&mut self, tone: Tone, text: &str);

    /// Print a streamed content fragment without a line break.
    fn fragment(&mut self, text: &str);

    /// Terminate a run of fragments.
    fn end_fragments(&mut self);

    /// Print a section header framed by rules.
    fn section(&mut self, title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.line(Tone::Plain, "");
        self.line(Tone::Plain, &rule);
        self.line(Tone::Heading, title);
        self.line(Tone::Plain, &rule);
    }

    /// Print a success line.
    fn success(&mut self, message: &str) {
        self.line(Tone::Success, message);
    }

    /// Print a failure line.
    fn failure(&mut self, message: &str) {
        self.line(Tone::Failure, message);
    }

    /// Print a warning line.
    fn warning(&mut self, message: &str) {
        self.line(Tone::Warning, message);
    }

    /// Print an info line.
    fn info(&mut self, message: &str) {
        self.line(Tone::Info, message);
    }

    /// Print a notice line.
    fn notice(&mut self, message: &str) {
        self.line(Tone::Notice, message);
    }
}

/// One captured line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// Tone the line was printed with
    pub tone: Tone,
    /// Line text
    pub text: String,
}

/// Reporter that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Vec<ReportLine>,
    fragments: Vec<String>,
    streamed: String,
}

impl MemoryReporter {
    /// Create an empty reporter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All complete lines in print order
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// Fragments in arrival order
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Everything printed through [`Reporter::fragment`], concatenated
    pub fn streamed(&self) -> &str {
        &self.streamed
    }

    /// Lines printed with the given tone
    pub fn with_tone(&self, tone: Tone) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.tone == tone)
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Whether any line with `tone` contains `needle`
    pub fn contains(&self, tone: Tone, needle: &str) -> bool {
        self.with_tone(tone).iter().any(|l| l.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn line(&mut self, tone: Tone, message: &str) {
        self.lines.push(ReportLine {
            tone,
            text: message.to_string(),
        });
    }

    fn inline(&mut self, tone: Tone, text: &str) {
        self.line(tone, text);
    }

    fn fragment(&mut self, text: &str) {
        self.fragments.push(text.to_string());
        self.streamed.push_str(text);
    }

    fn end_fragments(&mut self) {}
}
