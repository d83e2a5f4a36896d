use crate::transcribe::to_ascii;
use line_span::LineSpanExt;
use std::{
    fs, io,
    ops::Range,
    path::Path,
};

/// Proof text together with the byte ranges of its lines. Blank lines are
/// not part of the proof and are skipped, so raw line `i` is the `i`-th
/// non-blank line.
#[derive(Debug, Clone)]
pub struct ProofSource {
    origin: String,
    text: String,
    lines: Vec<Range<usize>>,
}

impl ProofSource {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text
            .line_spans()
            .filter(|line| !line.as_str().trim().is_empty())
            .map(|line| line.start()..line.end())
            .collect();

        Self {
            origin: origin.into(),
            text,
            lines,
        }
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path.display().to_string(), text))
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, raw_line: usize) -> Option<&str> {
        self.lines.get(raw_line).map(|r| &self.text[r.clone()])
    }

    /// Byte range of a raw line. Lines past the end map to the empty range at
    /// the end of the text.
    pub fn line_range(&self, raw_line: usize) -> Range<usize> {
        self.lines
            .get(raw_line)
            .cloned()
            .unwrap_or(self.text.len()..self.text.len())
    }

    /// The lines in the ASCII notation the parser reads.
    pub fn ascii_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|r| to_ascii(&self.text[r.clone()]))
            .collect()
    }
}
