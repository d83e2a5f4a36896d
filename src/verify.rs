//! The verification entry point: parse proof text, then check it.

use crate::{
    parse::{ParseErrorKind, ParsedLine, Proof, ProofStep, parse_proof},
    semant::{ArgumentLibrary, CheckErrorKind, check_steps},
    sentence::Sentence,
};
use log::debug;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Parse(ParseErrorKind),
    Check(CheckErrorKind),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parse(kind) => write!(f, "{kind}"),
            ErrorKind::Check(kind) => write!(f, "{kind}"),
        }
    }
}

/// The first problem found in a proof, located at an input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {}: {}", .raw_line + 1, .kind)]
pub struct VerificationError {
    pub kind: ErrorKind,
    /// Index of the offending input line. Equal to the number of lines when
    /// the text ended too early.
    pub raw_line: usize,
    /// The offending line, when it could be parsed.
    pub line: Option<ParsedLine>,
}

impl VerificationError {
    pub fn parse(kind: ParseErrorKind, raw_line: usize, line: Option<ParsedLine>) -> Self {
        Self {
            kind: ErrorKind::Parse(kind),
            raw_line,
            line,
        }
    }

    /// A check failure at `step`. Without a step the error sits on the first
    /// line.
    pub fn check(kind: CheckErrorKind, step: Option<&ProofStep>) -> Self {
        Self {
            kind: ErrorKind::Check(kind),
            raw_line: step.map_or(0, |s| s.raw_line),
            line: step.cloned().map(ParsedLine::Step),
        }
    }

    pub fn step(&self) -> Option<&ProofStep> {
        match &self.line {
            Some(ParsedLine::Step(step)) => Some(step),
            _ => None,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse(_))
    }
}

/// Restrictions a proof has to meet beyond being valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Every premise `V` has to be one of these.
    pub allowed_premises: Option<Vec<Sentence>>,
    /// Has to be stated by some step.
    pub expected_conclusion: Option<Sentence>,
}

/// Verify proof text given one entry per line.
///
/// Lines must already use the ASCII connectives; see
/// [`crate::transcribe::to_ascii`].
pub fn check_proof<S: AsRef<str>>(
    lines: &[S],
    library: &ArgumentLibrary,
    options: &CheckOptions,
) -> Result<Proof, VerificationError> {
    let proof = parse_proof(lines, library)?;
    debug!("checking {} steps", proof.len());
    check_steps(&proof, library, options)?;
    Ok(proof)
}
