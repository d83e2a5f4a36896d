use crate::{
    parse::{Citation, ParseErrorKind, ParsedLine, parse_line},
    semant::{ArgumentLibrary, CheckErrorKind},
    source::ProofSource,
    transcribe::to_ascii,
    verify::{ErrorKind, VerificationError},
};
use annotate_snippets::{Level, Message, Renderer, Snippet};
use rustc_hash::FxHashMap;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Diagnostic {
    title: String,
    parts: Vec<DiagnosticPart>,
    help: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum DiagnosticPart {
    Error(String, Range<usize>),
    Info(String, Range<usize>),
}

impl Diagnostic {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            parts: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn with_error(mut self, msg: &str, span: Range<usize>) -> Self {
        self.parts.push(DiagnosticPart::Error(msg.to_string(), span));
        self
    }

    pub fn with_info(mut self, msg: &str, span: Range<usize>) -> Self {
        self.parts.push(DiagnosticPart::Info(msg.to_string(), span));
        self
    }

    pub fn with_help(mut self, msg: &str) -> Self {
        self.help.push(msg.to_string());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parts(&self) -> &[DiagnosticPart] {
        &self.parts
    }

    pub fn to_message<'a>(&'a self, source: &'a ProofSource) -> Message<'a> {
        let mut msg = Level::Error.title(&self.title);

        if !self.parts.is_empty() {
            let mut snippet = Snippet::source(source.text())
                .origin(source.origin())
                .fold(true);

            for part in &self.parts {
                snippet = match part {
                    DiagnosticPart::Error(m, span) => {
                        snippet.annotation(Level::Error.span(span.clone()).label(m))
                    }
                    DiagnosticPart::Info(m, span) => {
                        snippet.annotation(Level::Info.span(span.clone()).label(m))
                    }
                };
            }

            msg = msg.snippet(snippet);
        }

        for help in &self.help {
            msg = msg.footer(Level::Help.title(help));
        }

        msg
    }

    pub fn render(&self, source: &ProofSource, renderer: &Renderer) -> String {
        renderer.render(self.to_message(source)).to_string()
    }

    /// Describe a failed verification against the text it came from.
    pub fn from_error(
        err: &VerificationError,
        source: &ProofSource,
        library: &ArgumentLibrary,
    ) -> Self {
        let span = source.line_range(err.raw_line);
        let diag = Diagnostic::new(&err.kind.to_string());

        match &err.kind {
            ErrorKind::Parse(kind) => parse_diagnostic(diag, kind, err, source, span),
            ErrorKind::Check(kind) => check_diagnostic(diag, kind, err, source, library, span),
        }
    }
}

fn parse_diagnostic(
    diag: Diagnostic,
    kind: &ParseErrorKind,
    err: &VerificationError,
    source: &ProofSource,
    span: Range<usize>,
) -> Diagnostic {
    let at_end = err.raw_line >= source.len();
    let at_separator = matches!(err.line, Some(ParsedLine::Separator { .. }));

    match kind {
        ParseErrorKind::ParserError(ctx) => {
            // Columns refer to the ASCII line, so they only carry over when
            // the line was already ASCII.
            let line = source.line(err.raw_line).unwrap_or_default();
            let span = if to_ascii(line) == line && ctx.place() <= line.len() {
                let at = span.start + ctx.place();
                at..(at + 1).min(span.end).max(at)
            } else {
                span
            };
            diag.with_error(&ctx.to_string(), span)
        }
        ParseErrorKind::ExpectedSeparator if at_end => diag
            .with_error("the proof ends here", span)
            .with_help("an assumption `A` is followed by a separator such as `||-`"),
        ParseErrorKind::ExpectedSeparatorOrPremise if at_end => diag
            .with_error("the proof ends here", span)
            .with_help("the premises are closed with the separator `|-`"),
        ParseErrorKind::ExpectedSeparator => diag
            .with_error("expected a separator here", span)
            .with_help("an assumption `A` is followed by a separator such as `||-`"),
        ParseErrorKind::InvalidDepth => {
            let label = match &err.line {
                Some(ParsedLine::Step(step)) => format!("this line is at depth {}", step.depth),
                _ => "unexpected depth".to_string(),
            };
            diag.with_error(&label, span)
        }
        ParseErrorKind::InvalidArgumentName(_) if at_separator => diag
            .with_error("separator without an assumption", span)
            .with_help("an assumption `A` is followed by a separator such as `||-`"),
        ParseErrorKind::InvalidArgumentName(name) => diag
            .with_error(&format!("unknown rule `{name}`"), span)
            .with_help("`natded rules` lists the available rules"),
        _ => diag.with_error("", span),
    }
}

fn check_diagnostic(
    diag: Diagnostic,
    kind: &CheckErrorKind,
    err: &VerificationError,
    source: &ProofSource,
    library: &ArgumentLibrary,
    span: Range<usize>,
) -> Diagnostic {
    match kind {
        CheckErrorKind::InvalidNumbering { expected } => {
            diag.with_error(&format!("expected line {}", expected + 1), span)
        }
        CheckErrorKind::InaccessiblePremise(citation) => {
            let mut diag = diag.with_error("cited here", span);
            for raw in cited_raw_lines(source, *citation) {
                diag = diag.with_info("this line is not in scope", source.line_range(raw));
            }
            diag
        }
        CheckErrorKind::InvalidArgumentApplication { rule, error } => {
            let mut diag = diag.with_error(&error.to_string(), span);
            if let Some(step) = err.step() {
                for &citation in &step.rule.premises {
                    for raw in cited_raw_lines(source, citation) {
                        diag = diag.with_info("cited premise", source.line_range(raw));
                    }
                }
            }
            for template in library.get(*rule) {
                diag = diag.with_help(&format!("`{rule}` applies as {template}"));
            }
            diag
        }
        CheckErrorKind::InvalidPremise(_) => diag.with_error("premise introduced here", span),
        CheckErrorKind::MissingExpectedConclusion(_) if source.is_empty() => diag,
        CheckErrorKind::MissingExpectedConclusion(_) => {
            diag.with_error("the proof ends here", span)
        }
    }
}

/// Raw lines of the steps a citation points at: the line itself, or the two
/// ends of a range.
fn cited_raw_lines(source: &ProofSource, citation: Citation) -> Vec<usize> {
    let numbered = numbered_lines(source);
    let ends = match citation {
        Citation::Line(line) => vec![line],
        Citation::Range(start, end) if start == end => vec![start],
        Citation::Range(start, end) => vec![start, end],
    };
    ends.into_iter()
        .filter_map(|line| numbered.get(&line).copied())
        .collect()
}

/// The raw line of each numbered step, first occurrence winning.
fn numbered_lines(source: &ProofSource) -> FxHashMap<usize, usize> {
    let mut numbered = FxHashMap::default();
    for (raw, text) in source.ascii_lines().iter().enumerate() {
        if let Ok(ParsedLine::Step(step)) = parse_line(text, raw) {
            numbered.entry(step.line).or_insert(raw);
        }
    }
    numbered
}

pub fn print_error(err: &VerificationError, source: &ProofSource, library: &ArgumentLibrary) {
    let diag = Diagnostic::from_error(err, source, library);
    println!("{}", diag.render(source, &Renderer::styled()));
}
