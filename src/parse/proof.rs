use crate::{
    parse::{line::parse_line, stream::ParseErrorCtx},
    semant::ArgumentLibrary,
    sentence::Sentence,
    strings::{ASSUMPTION_RULE, PREMISE_RULE, SEPARATOR},
    verify::VerificationError,
};
use itertools::Itertools;
use log::{debug, trace};
use std::fmt;
use thiserror::Error;
use ustr::Ustr;

/// A line or sub-proof cited by a rule. Line numbers are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Citation {
    Line(usize),
    Range(usize, usize),
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Citation::Line(line) => write!(f, "{}", line + 1),
            Citation::Range(start, end) => write!(f, "{}-{}", start + 1, end + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCitation {
    pub name: Ustr,
    pub premises: Vec<Citation>,
}

impl RuleCitation {
    pub fn new(name: Ustr, premises: Vec<Citation>) -> Self {
        Self { name, premises }
    }

    /// `V`, introducing a premise of the whole proof.
    pub fn is_premise(&self) -> bool {
        self.name == *PREMISE_RULE
    }

    /// `A`, opening a sub-proof.
    pub fn is_assumption(&self) -> bool {
        self.name == *ASSUMPTION_RULE
    }
}

impl fmt::Display for RuleCitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.premises.is_empty() {
            write!(f, "({})", self.premises.iter().join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    /// Index of the text line the step was read from.
    pub raw_line: usize,
    /// The step's own 0-based line number as written.
    pub line: usize,
    /// Sub-proof nesting, 1 at the outermost level.
    pub depth: usize,
    pub sentence: Sentence,
    pub rule: RuleCitation,
}

impl fmt::Display for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {} {}",
            "|".repeat(self.depth),
            self.line + 1,
            self.sentence,
            self.rule
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Separator { depth: usize },
    Step(ProofStep),
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedLine::Separator { depth } => {
                write!(f, "{}{}", "|".repeat(depth.saturating_sub(1)), *SEPARATOR)
            }
            ParsedLine::Step(step) => write!(f, "{step}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("a sub-proof must be opened exactly one level deeper than the line before it")]
    InvalidDepth,
    #[error("expected a premise `V` or the separator `|-`")]
    ExpectedSeparatorOrPremise,
    #[error("expected the separator `|-`")]
    ExpectedSeparator,
    #[error("expected a premise `V` before the separator")]
    ExpectedPremise,
    #[error("expected an assumption `A` to open a sub-proof")]
    ExpectedAssumption,
    #[error("`{0}` is not the name of a rule")]
    InvalidArgumentName(Ustr),
    #[error("malformed line: {0}")]
    ParserError(ParseErrorCtx),
}

/// A parsed proof: premises followed by the body, sub-proofs flattened with
/// their depth recorded on each step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof {
    steps: Vec<ProofStep>,
}

impl Proof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn premises(&self) -> impl Iterator<Item = &ProofStep> {
        self.steps.iter().filter(|s| s.rule.is_premise())
    }

    /// Print the proof back to line notation, separators included.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let header = self.premises().count();

        for step in &self.steps[..header] {
            lines.push(step.to_string());
        }
        lines.push(ParsedLine::Separator { depth: 1 }.to_string());

        for step in &self.steps[header..] {
            lines.push(step.to_string());
            if step.rule.is_assumption() {
                lines.push(ParsedLine::Separator { depth: step.depth }.to_string());
            }
        }

        lines
    }
}

/// Parse proof text into steps, enforcing the block discipline:
///
/// - premises `V` at depth 1, then a separator;
/// - in the body, a line deeper than the step before it must be an
///   assumption `A` exactly one level deeper, followed by a separator;
/// - every other body line must cite a rule of `library`.
pub fn parse_proof<S: AsRef<str>>(
    lines: &[S],
    library: &ArgumentLibrary,
) -> Result<Proof, VerificationError> {
    let parser = ProofParser {
        lines,
        index: 0,
        steps: Vec::new(),
        library,
    };
    parser.parse()
}

struct ProofParser<'a, S> {
    lines: &'a [S],
    index: usize,
    steps: Vec<ProofStep>,
    library: &'a ArgumentLibrary,
}

impl<S: AsRef<str>> ProofParser<'_, S> {
    fn next_line(&mut self) -> Result<Option<ParsedLine>, VerificationError> {
        let lines = self.lines;
        let Some(text) = lines.get(self.index) else {
            return Ok(None);
        };
        let raw_line = self.index;
        self.index += 1;

        let line = parse_line(text.as_ref(), raw_line).map_err(|e| {
            VerificationError::parse(ParseErrorKind::ParserError(e.ctx().clone()), raw_line, None)
        })?;
        trace!("line {raw_line}: {line:?}");

        Ok(Some(line))
    }

    fn error(&self, kind: ParseErrorKind, line: ParsedLine) -> VerificationError {
        VerificationError::parse(kind, self.index - 1, Some(line))
    }

    fn error_at_end(&self, kind: ParseErrorKind) -> VerificationError {
        VerificationError::parse(kind, self.lines.len(), None)
    }

    fn parse(mut self) -> Result<Proof, VerificationError> {
        self.parse_premises()?;
        self.parse_body()?;

        debug!("parsed {} proof steps", self.steps.len());
        Ok(Proof::new(self.steps))
    }

    fn parse_premises(&mut self) -> Result<(), VerificationError> {
        loop {
            let step = match self.next_line()? {
                None => return Err(self.error_at_end(ParseErrorKind::ExpectedSeparatorOrPremise)),
                Some(ParsedLine::Separator { .. }) => return Ok(()),
                Some(ParsedLine::Step(step)) => step,
            };

            if step.rule.is_premise() {
                if step.depth != 1 {
                    return Err(self.error(ParseErrorKind::InvalidDepth, ParsedLine::Step(step)));
                }
                self.steps.push(step);
            } else if step.rule.is_assumption() {
                return Err(self.error(ParseErrorKind::ExpectedPremise, ParsedLine::Step(step)));
            } else {
                return Err(self.error(
                    ParseErrorKind::ExpectedSeparatorOrPremise,
                    ParsedLine::Step(step),
                ));
            }
        }
    }

    fn parse_body(&mut self) -> Result<(), VerificationError> {
        while let Some(line) = self.next_line()? {
            let step = match line {
                ParsedLine::Step(step) => step,
                separator @ ParsedLine::Separator { .. } => {
                    let kind = ParseErrorKind::InvalidArgumentName(*SEPARATOR);
                    return Err(self.error(kind, separator));
                }
            };

            let current_depth = self.steps.last().map_or(1, |s| s.depth);

            if step.depth > current_depth {
                self.parse_assumption(step, current_depth)?;
            } else if step.rule.is_premise()
                || step.rule.is_assumption()
                || !self.library.contains(step.rule.name)
            {
                let kind = ParseErrorKind::InvalidArgumentName(step.rule.name);
                return Err(self.error(kind, ParsedLine::Step(step)));
            } else {
                self.steps.push(step);
            }
        }

        Ok(())
    }

    fn parse_assumption(
        &mut self,
        step: ProofStep,
        current_depth: usize,
    ) -> Result<(), VerificationError> {
        if !step.rule.is_assumption() {
            return Err(self.error(ParseErrorKind::ExpectedAssumption, ParsedLine::Step(step)));
        }
        if step.depth != current_depth + 1 {
            return Err(self.error(ParseErrorKind::InvalidDepth, ParsedLine::Step(step)));
        }
        self.steps.push(step);

        match self.next_line()? {
            Some(ParsedLine::Separator { .. }) => Ok(()),
            Some(line) => Err(self.error(ParseErrorKind::ExpectedSeparator, line)),
            None => Err(self.error_at_end(ParseErrorKind::ExpectedSeparator)),
        }
    }
}
