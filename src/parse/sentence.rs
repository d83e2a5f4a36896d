use crate::{
    parse::stream::{ParseErrorCtxHolder, ParseResult, Stream},
    sentence::{BinOp, Sentence},
};

/// Whether uppercase letters are read as schema variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variables {
    Forbidden,
    Allowed,
}

/// `atom | '!' sentence | '(' sentence op sentence ')'`, with free whitespace
/// between tokens.
pub fn sentence(s: &mut Stream, vars: Variables) -> ParseResult<Sentence> {
    s.skip_whitespace();

    match s.peek() {
        Some('!') => {
            s.pop();
            let operand = s.commit(|s| sentence(s, vars))?;
            Ok(Sentence::not(operand))
        }
        Some('(') => {
            s.pop();
            s.commit(|s| {
                let lhs = sentence(s, vars)?;
                s.skip_whitespace();
                let op = bin_op(s)?;
                let rhs = sentence(s, vars)?;
                s.skip_whitespace();
                s.expect_char(')')?;
                Ok(Sentence::binary(op, lhs, rhs))
            })
        }
        Some(c) if c.is_ascii_lowercase() => {
            s.pop();
            Ok(Sentence::atom(c))
        }
        Some(c) if c.is_ascii_uppercase() && vars == Variables::Allowed => {
            s.pop();
            Ok(Sentence::var(c))
        }
        _ => s.fail().ctx_expect_desc("a sentence"),
    }
}

pub fn bin_op(s: &mut Stream) -> ParseResult<BinOp> {
    for op in BinOp::ALL {
        if s.expect_str(op.symbol()).is_ok() {
            return Ok(op);
        }
    }

    s.fail().ctx_expect_desc("a connective")
}

/// A sentence whose outermost binary connective may be written without
/// parentheses, as proof lines allow: `p -> (q -> p)`.
pub fn top_sentence(s: &mut Stream, vars: Variables) -> ParseResult<Sentence> {
    let lhs = sentence(s, vars)?;

    let op = s.fallible(|s| {
        s.skip_whitespace();
        bin_op(s)
    });

    match op {
        Ok(op) => {
            let rhs = s.commit(|s| sentence(s, vars))?;
            Ok(Sentence::binary(op, lhs, rhs))
        }
        Err(_) => Ok(lhs),
    }
}
