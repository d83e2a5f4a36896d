//! Truth-table enumeration.

use super::{Interpretation, Sentence};

/// The letters of `sentence`, sorted and without duplicates.
pub fn letters(sentence: &Sentence) -> Vec<char> {
    fn visit(s: &Sentence, out: &mut Vec<char>) {
        match s {
            Sentence::Atom(letter) => out.push(*letter),
            Sentence::Var(_) => {}
            Sentence::Not(operand) => visit(operand, out),
            Sentence::Binary(_, lhs, rhs) => {
                visit(lhs, out);
                visit(rhs, out);
            }
        }
    }

    let mut out = Vec::new();
    visit(sentence, &mut out);
    out.sort_unstable();
    out.dedup();
    out
}

/// Every interpretation of `letters`. The first letter varies slowest and
/// `true` comes before `false`.
pub fn enumerate_interpretations(letters: &[char]) -> Vec<Interpretation> {
    letters.iter().fold(vec![Interpretation::new()], |acc, &letter| {
        acc.into_iter()
            .flat_map(|i| [i.clone().with(letter, true), i.with(letter, false)])
            .collect()
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Models {
    pub satisfying: Vec<Interpretation>,
    pub falsifying: Vec<Interpretation>,
}

/// Split all interpretations of the letters of `sentence` by the truth value
/// they give it.
pub fn all_models(sentence: &Sentence) -> Models {
    let mut models = Models::default();
    for i in enumerate_interpretations(&letters(sentence)) {
        if sentence.evaluate(&i) {
            models.satisfying.push(i);
        } else {
            models.falsifying.push(i);
        }
    }
    models
}

pub fn is_tautology(sentence: &Sentence) -> bool {
    all_models(sentence).falsifying.is_empty()
}

/// Whether every interpretation satisfying all `premises` satisfies
/// `conclusion`.
pub fn entails(premises: &[Sentence], conclusion: &Sentence) -> bool {
    let mut all = premises.iter().flat_map(letters).collect::<Vec<_>>();
    all.extend(letters(conclusion));
    all.sort_unstable();
    all.dedup();

    enumerate_interpretations(&all)
        .iter()
        .filter(|i| premises.iter().all(|p| p.evaluate(i)))
        .all(|i| conclusion.evaluate(i))
}
