//! Matching rule patterns against concrete sentences.

use crate::{
    semant::library::{ArgumentTemplate, PremiseRole},
    sentence::Sentence,
};
use std::borrow::Cow;
use thiserror::Error;

/// Values of schema variables.
pub type Substitution = im::HashMap<char, Sentence>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MatchError {
    #[error("the connectives do not match")]
    IncompatibleOperators,
    #[error("a schema variable would stand for two different sentences")]
    IncompatibleMapping,
    #[error("the rule takes a different number of premises")]
    InvalidArgumentUsage,
    #[error("the cited lines do not fit the rule")]
    ArgumentDoesNotMatch,
}

/// A cited premise as the matcher sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Premise<'a> {
    /// A single line.
    Sentence(&'a Sentence),
    /// A sub-proof: its assumption first, then the lines at the assumption's
    /// depth.
    Subproof(Vec<&'a Sentence>),
}

/// The most general substitution turning `pattern` into `sentence`.
pub fn match_sentence(pattern: &Sentence, sentence: &Sentence) -> Result<Substitution, MatchError> {
    match (pattern, sentence) {
        (Sentence::Var(var), _) => Ok(Substitution::unit(*var, sentence.clone())),
        (Sentence::Atom(p), Sentence::Atom(s)) if p == s => Ok(Substitution::new()),
        (Sentence::Not(p), Sentence::Not(s)) => match_sentence(p, s),
        (Sentence::Binary(p_op, p_lhs, p_rhs), Sentence::Binary(s_op, s_lhs, s_rhs))
            if p_op == s_op =>
        {
            let lhs = match_sentence(p_lhs, s_lhs)?;
            let rhs = match_sentence(p_rhs, s_rhs)?;
            join(&lhs, &rhs)
        }
        _ => Err(MatchError::IncompatibleOperators),
    }
}

/// Merge two substitutions, failing if they bind a variable differently.
pub fn join(lhs: &Substitution, rhs: &Substitution) -> Result<Substitution, MatchError> {
    let mut joined = lhs.clone();
    for (var, value) in rhs.iter() {
        match lhs.get(var) {
            Some(bound) if bound != value => return Err(MatchError::IncompatibleMapping),
            Some(_) => {}
            None => {
                joined.insert(*var, value.clone());
            }
        }
    }
    Ok(joined)
}

/// Check one template against cited premises and a conclusion.
///
/// Object premises and the conclusion fix part of the substitution. Each meta
/// premise is then matched against `assumption -> line` for every line of its
/// sub-proof, and the application holds if one choice of line per meta
/// premise agrees on all variables.
pub fn match_argument(
    template: &ArgumentTemplate,
    premises: &[Premise],
    conclusion: &Sentence,
) -> Result<Substitution, MatchError> {
    let premises = padded(template, premises)?;

    let mut fixed = match_sentence(template.conclusion(), conclusion)
        .map_err(|_| MatchError::ArgumentDoesNotMatch)?;
    let mut subproofs = Vec::new();

    for (pattern, premise) in template.premises().iter().zip(premises.iter()) {
        match (pattern.role, premise) {
            (PremiseRole::Object, Premise::Sentence(sentence)) => {
                fixed = match_sentence(&pattern.pattern, sentence)
                    .and_then(|m| join(&fixed, &m))
                    .map_err(|_| MatchError::ArgumentDoesNotMatch)?;
            }
            (PremiseRole::Meta, Premise::Subproof(lines)) => {
                subproofs.push((&pattern.pattern, lines.as_slice()));
            }
            _ => return Err(MatchError::ArgumentDoesNotMatch),
        }
    }

    let witnesses = subproofs
        .into_iter()
        .map(|(pattern, lines)| witnesses(pattern, lines, &fixed))
        .collect::<Vec<_>>();

    common_witness(&fixed, &witnesses).ok_or(MatchError::ArgumentDoesNotMatch)
}

/// Fill a short premise list up to the template's arity by repeating the last
/// premise, for templates that allow it.
fn padded<'p, 'a>(
    template: &ArgumentTemplate,
    premises: &'p [Premise<'a>],
) -> Result<Cow<'p, [Premise<'a>]>, MatchError> {
    let arity = template.arity();

    if premises.len() == arity {
        return Ok(Cow::Borrowed(premises));
    }

    if template.repeats_last_premise()
        && premises.len() < arity
        && let Some(last) = premises.last()
    {
        let mut padded = premises.to_vec();
        padded.resize(arity, last.clone());
        return Ok(Cow::Owned(padded));
    }

    Err(MatchError::InvalidArgumentUsage)
}

/// Substitutions under which `pattern` matches an implication synthesised from
/// the sub-proof and agrees with `fixed`.
fn witnesses(pattern: &Sentence, lines: &[&Sentence], fixed: &Substitution) -> Vec<Substitution> {
    let Some(&assumption) = lines.first() else {
        return Vec::new();
    };

    lines
        .iter()
        .filter_map(|&line| {
            let implication = Sentence::implies(assumption.clone(), line.clone());
            match_sentence(pattern, &implication)
                .and_then(|m| join(fixed, &m))
                .ok()
        })
        .collect()
}

/// Pick one witness per meta premise so that all of them join.
fn common_witness(fixed: &Substitution, witnesses: &[Vec<Substitution>]) -> Option<Substitution> {
    let Some((first, rest)) = witnesses.split_first() else {
        return Some(fixed.clone());
    };

    first
        .iter()
        .filter_map(|w| join(fixed, w).ok())
        .find_map(|joined| common_witness(&joined, rest))
}
