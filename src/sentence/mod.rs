//! Propositional sentences.
//!
//! A [`Sentence`] is an immutable tree over single-letter atoms, negation and
//! the four binary connectives. Argument templates use the same tree with
//! schema variables (single uppercase letters) standing in for whole
//! sub-sentences.

mod eval;
pub mod models;

pub use eval::Interpretation;

use crate::strings::symbols;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinOp {
    And,
    Or,
    Follows,
    Equivalent,
}

impl BinOp {
    pub const ALL: [BinOp; 4] = [BinOp::Equivalent, BinOp::Follows, BinOp::And, BinOp::Or];

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => symbols::AND,
            BinOp::Or => symbols::OR,
            BinOp::Follows => symbols::FOLLOWS,
            BinOp::Equivalent => symbols::EQUIVALENT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Follows => "follows",
            BinOp::Equivalent => "equivalent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sentence {
    /// A propositional letter such as `p`.
    Atom(char),
    /// A schema variable such as `A`. Only appears in argument templates.
    Var(char),
    Not(Box<Sentence>),
    Binary(BinOp, Box<Sentence>, Box<Sentence>),
}

impl Sentence {
    pub fn atom(letter: char) -> Self {
        debug_assert!(letter.is_ascii_lowercase());
        Sentence::Atom(letter)
    }

    pub fn var(name: char) -> Self {
        debug_assert!(name.is_ascii_uppercase());
        Sentence::Var(name)
    }

    pub fn not(operand: Sentence) -> Self {
        Sentence::Not(Box::new(operand))
    }

    pub fn binary(op: BinOp, lhs: Sentence, rhs: Sentence) -> Self {
        Sentence::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Sentence, rhs: Sentence) -> Self {
        Self::binary(BinOp::And, lhs, rhs)
    }

    pub fn or(lhs: Sentence, rhs: Sentence) -> Self {
        Self::binary(BinOp::Or, lhs, rhs)
    }

    pub fn implies(lhs: Sentence, rhs: Sentence) -> Self {
        Self::binary(BinOp::Follows, lhs, rhs)
    }

    pub fn equivalent(lhs: Sentence, rhs: Sentence) -> Self {
        Self::binary(BinOp::Equivalent, lhs, rhs)
    }

    pub fn is_implication(&self) -> bool {
        matches!(self, Sentence::Binary(BinOp::Follows, _, _))
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::Atom(letter) | Sentence::Var(letter) => write!(f, "{letter}"),
            Sentence::Not(operand) => write!(f, "{}{operand}", symbols::NOT),
            Sentence::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}
