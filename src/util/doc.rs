use crate::classify::Severity;
use crate::ui::theme;

/// Visual role of a piece of report text. Mapped to colours only at output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Bold,
    Accent,
    Dim,
    Level(Severity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
}

impl Segment {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Segment { text: text.into(), tone }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }

    pub fn level(text: impl Into<String>, sev: Severity) -> Self {
        Self::new(text, Tone::Level(sev))
    }
}

pub type DocLine = Vec<Segment>;

/// A rendered report: lines of styled segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    lines: Vec<DocLine>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: DocLine) {
        self.lines.push(line);
    }

    pub fn text(&mut self, s: impl Into<String>) {
        self.lines.push(vec![Segment::plain(s)]);
    }

    pub fn heading(&mut self, s: impl Into<String>) {
        self.lines.push(vec![Segment::new(s, Tone::Bold)]);
    }

    pub fn notice(&mut self, s: impl Into<String>) {
        self.lines.push(vec![Segment::level(s, Severity::Warning)]);
    }

    pub fn blank(&mut self) {
        self.lines.push(Vec::new());
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = DocLine>) {
        self.lines.extend(lines);
    }

    pub fn lines(&self) -> &[DocLine] {
        &self.lines
    }

    /// Text for a terminal or a pipe. Without colour the output carries no
    /// escape sequences.
    pub fn to_ansi(&self, color: bool) -> String {
        let mut out = String::new();
        for line in &self.lines {
            for seg in line {
                match theme::term_style(seg.tone).filter(|_| color) {
                    Some(style) => out.push_str(&style.apply(seg.text.as_str()).to_string()),
                    None        => out.push_str(&seg.text),
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn to_plain(&self) -> String {
        self.to_ansi(false)
    }
}

/// Visible width of a run of segments.
pub fn width(segs: &[Segment]) -> usize {
    segs.iter().map(|s| s.text.chars().count()).sum()
}
