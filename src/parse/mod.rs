//! Proof text parsing.
//!
//! Sentences and proof lines are read character by character with the
//! backtracking [`stream::Stream`]. [`parse_proof`] then assembles the lines
//! into a [`Proof`], checking the premise/separator/sub-proof layout.

mod line;
mod proof;
mod sentence;
pub mod stream;

pub use line::parse_line;
pub use proof::{Citation, ParseErrorKind, ParsedLine, Proof, ProofStep, RuleCitation, parse_proof};
pub use sentence::Variables;

use crate::{
    parse::stream::{ParseResult, Stream},
    sentence::Sentence,
};

/// Parse a whole string with `f`, allowing surrounding whitespace.
fn parse_all<T>(text: &str, f: impl FnOnce(&mut Stream) -> ParseResult<T>) -> ParseResult<T> {
    let mut s = Stream::new(text);
    let res = f(&mut s)?;
    s.skip_whitespace();
    s.expect_eof()?;
    Ok(res)
}

/// A ground sentence in the strict grammar: every binary connective is
/// parenthesised.
pub fn parse_sentence(text: &str) -> ParseResult<Sentence> {
    parse_all(text, |s| sentence::sentence(s, Variables::Forbidden))
}

/// A ground sentence whose outermost parentheses may be left out.
pub fn parse_top_sentence(text: &str) -> ParseResult<Sentence> {
    parse_all(text, |s| sentence::top_sentence(s, Variables::Forbidden))
}

/// A rule pattern. Uppercase letters are schema variables.
pub fn parse_pattern(text: &str) -> ParseResult<Sentence> {
    parse_all(text, |s| sentence::sentence(s, Variables::Allowed))
}
