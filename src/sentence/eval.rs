use super::{BinOp, Sentence};
use itertools::Itertools;
use std::{collections::BTreeMap, fmt};

/// An assignment of truth values to letters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation {
    values: BTreeMap<char, bool>,
}

impl Interpretation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, letter: char, value: bool) -> Self {
        self.values.insert(letter, value);
        self
    }

    pub fn insert(&mut self, letter: char, value: bool) {
        self.values.insert(letter, value);
    }

    pub fn get(&self, letter: char) -> Option<bool> {
        self.values.get(&letter).copied()
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, bool)> + '_ {
        self.values.iter().map(|(&l, &v)| (l, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(char, bool)> for Interpretation {
    fn from_iter<I: IntoIterator<Item = (char, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self
            .iter()
            .map(|(l, v)| format!("{l}={}", if v { "T" } else { "F" }))
            .join(", ");
        write!(f, "{{{values}}}")
    }
}

impl Sentence {
    /// Truth value of the sentence under `interpretation`.
    ///
    /// Panics if a letter of the sentence is not assigned or if the sentence
    /// still contains schema variables.
    pub fn evaluate(&self, interpretation: &Interpretation) -> bool {
        match self {
            Sentence::Atom(letter) => interpretation
                .get(*letter)
                .unwrap_or_else(|| panic!("letter `{letter}` is not interpreted")),
            Sentence::Var(name) => panic!("cannot evaluate schema variable `{name}`"),
            Sentence::Not(operand) => !operand.evaluate(interpretation),
            Sentence::Binary(op, lhs, rhs) => {
                let lhs = lhs.evaluate(interpretation);
                let rhs = rhs.evaluate(interpretation);
                match op {
                    BinOp::And => lhs && rhs,
                    BinOp::Or => lhs || rhs,
                    BinOp::Follows => !lhs || rhs,
                    BinOp::Equivalent => lhs == rhs,
                }
            }
        }
    }
}
