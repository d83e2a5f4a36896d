use crate::{
    parse::{Citation, Proof, ProofStep},
    semant::{
        library::ArgumentLibrary,
        unify::{MatchError, Premise},
    },
    sentence::Sentence,
    verify::{CheckOptions, VerificationError},
};
use log::{debug, trace};
use thiserror::Error;
use ustr::Ustr;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckErrorKind {
    #[error("this line should be numbered {}", .expected + 1)]
    InvalidNumbering { expected: usize },
    #[error("line {0} cannot be cited from here")]
    InaccessiblePremise(Citation),
    #[error("`{rule}` does not justify this line: {error}")]
    InvalidArgumentApplication { rule: Ustr, error: MatchError },
    #[error("`{0}` is not one of the allowed premises")]
    InvalidPremise(Sentence),
    #[error("the proof never concludes `{0}`")]
    MissingExpectedConclusion(Sentence),
}

/// Run the checking passes in order, stopping at the first failure.
pub fn check_steps(
    proof: &Proof,
    library: &ArgumentLibrary,
    options: &CheckOptions,
) -> Result<(), VerificationError> {
    let steps = proof.steps();

    check_numbering(steps)?;
    check_accessibility(steps)?;
    if let Some(allowed) = &options.allowed_premises {
        check_allowed_premises(steps, allowed)?;
    }
    check_arguments(steps, library)?;
    if let Some(conclusion) = &options.expected_conclusion {
        check_expected_conclusion(steps, conclusion)?;
    }

    debug!("all {} steps check out", steps.len());
    Ok(())
}

fn check_numbering(steps: &[ProofStep]) -> Result<(), VerificationError> {
    for (i, step) in steps.iter().enumerate() {
        if step.line != i {
            return Err(VerificationError::check(
                CheckErrorKind::InvalidNumbering { expected: i },
                Some(step),
            ));
        }
    }
    Ok(())
}

/// Whether step `line` is visible from step `at`: every step in between is
/// at least as deep, so no sub-proof containing `line` has closed.
fn line_accessible(steps: &[ProofStep], at: usize, line: usize) -> bool {
    line < at
        && steps[line..=at]
            .iter()
            .all(|s| s.depth >= steps[line].depth)
}

/// Whether the sub-proof `start..=end` is visible from step `at`: it is opened
/// by an assumption one level deeper than `at`, stays at or below that depth,
/// and every step from its start up to `at` is inside the scope of `at`.
fn range_accessible(steps: &[ProofStep], at: usize, start: usize, end: usize) -> bool {
    if start > end || end >= at || !steps[start].rule.is_assumption() {
        return false;
    }

    let scope = steps[at].depth;
    let depth = steps[start].depth;
    depth == scope + 1
        && steps[start..=end].iter().all(|s| s.depth >= depth)
        && steps[end + 1..=at].iter().all(|s| s.depth >= scope)
}

fn check_accessibility(steps: &[ProofStep]) -> Result<(), VerificationError> {
    for (at, step) in steps.iter().enumerate() {
        for &citation in &step.rule.premises {
            let accessible = match citation {
                Citation::Line(line) => line_accessible(steps, at, line),
                Citation::Range(start, end) => range_accessible(steps, at, start, end),
            };

            if !accessible {
                return Err(VerificationError::check(
                    CheckErrorKind::InaccessiblePremise(citation),
                    Some(step),
                ));
            }
        }
    }
    Ok(())
}

fn check_allowed_premises(steps: &[ProofStep], allowed: &[Sentence]) -> Result<(), VerificationError> {
    for step in steps.iter().filter(|s| s.rule.is_premise()) {
        if !allowed.contains(&step.sentence) {
            return Err(VerificationError::check(
                CheckErrorKind::InvalidPremise(step.sentence.clone()),
                Some(step),
            ));
        }
    }
    Ok(())
}

/// The sentences a citation contributes. A sub-proof contributes its
/// assumption and the steps at the assumption's depth.
fn premise(steps: &[ProofStep], citation: Citation) -> Premise<'_> {
    match citation {
        Citation::Line(line) => Premise::Sentence(&steps[line].sentence),
        Citation::Range(start, end) => {
            let depth = steps[start].depth;
            Premise::Subproof(
                steps[start..=end]
                    .iter()
                    .filter(|s| s.depth == depth)
                    .map(|s| &s.sentence)
                    .collect(),
            )
        }
    }
}

fn check_arguments(steps: &[ProofStep], library: &ArgumentLibrary) -> Result<(), VerificationError> {
    for step in steps {
        if step.rule.is_premise() || step.rule.is_assumption() {
            continue;
        }

        let premises = step
            .rule
            .premises
            .iter()
            .map(|&c| premise(steps, c))
            .collect::<Vec<_>>();

        match library.check(step.rule.name, &premises, &step.sentence) {
            Ok(substitution) => trace!("line {}: {} with {substitution:?}", step.line + 1, step.rule),
            Err(error) => {
                return Err(VerificationError::check(
                    CheckErrorKind::InvalidArgumentApplication {
                        rule: step.rule.name,
                        error,
                    },
                    Some(step),
                ));
            }
        }
    }
    Ok(())
}

/// Some step, at any depth, has to state the conclusion.
fn check_expected_conclusion(
    steps: &[ProofStep],
    conclusion: &Sentence,
) -> Result<(), VerificationError> {
    if steps.iter().any(|s| s.sentence == *conclusion) {
        Ok(())
    } else {
        Err(VerificationError::check(
            CheckErrorKind::MissingExpectedConclusion(conclusion.clone()),
            steps.last(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parse::parse_sentence,
        verify::{ErrorKind, check_proof},
    };

    fn s(text: &str) -> Sentence {
        parse_sentence(text).unwrap()
    }

    fn check_with(lines: &[&str], options: &CheckOptions) -> Result<Proof, VerificationError> {
        check_proof(lines, &ArgumentLibrary::builtin(), options)
    }

    fn check(lines: &[&str]) -> Result<Proof, VerificationError> {
        check_with(lines, &CheckOptions::default())
    }

    fn check_err(lines: &[&str]) -> (CheckErrorKind, usize) {
        let err = check(lines).unwrap_err();
        match err.kind {
            ErrorKind::Check(kind) => (kind, err.raw_line),
            ErrorKind::Parse(kind) => panic!("unexpected parse error {kind:?}"),
        }
    }

    const NESTED: [&str; 20] = [
        "|1 p V",
        "|2 q V",
        "|-",
        "|3 p & q +K(1,2)",
        "|| 4 r A",
        "||-",
        "|| 5 q R(2)",
        "|6 r->q +I(4-5)",
        "|7 ( p & q ) +K(1,2)",
        "|| 8 r A",
        "||-",
        "||| 9 s A",
        "|||-",
        "||| 10 p & q R(3)",
        "|||| 11 t A",
        "||||-",
        "|||| 12 s R(9)",
        "|||13 t->s +I(11-12)",
        "||14 s -> (t -> s) +I(9-13)",
        "|15 r -> (s -> (t -> s)) +I(8-14)",
    ];

    #[test]
    fn accepts_nested_proof() {
        let proof = check(&NESTED).unwrap();
        assert_eq!(proof.len(), 15);
    }

    #[test]
    fn accepts_proof_without_premises() {
        assert!(check(&["|-", "|1 p -> p T", "|2 q -> (p -> p) VEQ(1)"]).is_ok());
        assert!(check(&["|-", "||1 p A", "||-", "|2 p -> p +I(1-1)"]).is_ok());
    }

    #[test]
    fn accepts_reductio_and_disjunction_proof() {
        let proof = [
            "|-",
            "|1 q -> q T",
            "||2 !q A",
            "||-",
            "|||3 r & q A",
            "|||-",
            "|||4 q -K(3)",
            "|||5 !q R(2)",
            "||6 !(r&q) RAA(3-5)",
            "|7 !q -> !(r&q) +I(2-6)",
            "|8 q | !(r&q) +A(1,7)",
            "|9 p | (q | !(r&q)) +A(8)",
        ];
        assert!(check(&proof).is_ok());
    }

    #[test]
    fn accepts_disjunction_elimination_with_subproofs() {
        let proof = [
            "|1 p | q V",
            "|2 r V",
            "|-",
            "||3 p A",
            "||-",
            "||4 r R(2)",
            "||5 q A",
            "||-",
            "||6 r R(2)",
            "|7 r -A(1, 3-4, 5-6)",
        ];
        // The second sub-proof needs a line at depth 1 before it opens.
        assert!(check(&proof).is_err());

        let proof = [
            "|1 p | q V",
            "|2 r V",
            "|-",
            "||3 p A",
            "||-",
            "||4 r R(2)",
            "|5 p -> r +I(3-4)",
            "||6 q A",
            "||-",
            "||7 r R(2)",
            "|8 r -A(1, 3-4, 6-7)",
        ];
        assert!(check(&proof).is_ok());
    }

    #[test]
    fn numbering() {
        let (kind, raw) = check_err(&["|1 p V", "|2 q V", "|-", "|4 (p & q) +K(1,2)", "|5 p R(1)"]);
        assert_eq!(kind, CheckErrorKind::InvalidNumbering { expected: 2 });
        assert_eq!(raw, 3);
    }

    #[test]
    fn ancestor_lines_are_accessible() {
        assert!(
            check(&[
                "|1 p V",
                "|2 q V",
                "|-",
                "|3 (p & q) +K(1,2)",
                "|4 (q & p) +K(2,1)",
                "||5 r A",
                "||-",
                "||6 (q & p) R(4)",
            ])
            .is_ok()
        );
    }

    #[test]
    fn closed_subproof_lines_are_not_accessible() {
        let (kind, raw) = check_err(&[
            "|1 p V",
            "|-",
            "||2 q A",
            "||-",
            "||3 q R(2)",
            "|4 q -> q +I(2-3)",
            "|5 q R(3)",
        ]);
        assert_eq!(kind, CheckErrorKind::InaccessiblePremise(Citation::Line(2)));
        assert_eq!(raw, 6);
    }

    #[test]
    fn later_lines_are_not_accessible() {
        let (kind, _) = check_err(&["|1 p V", "|-", "|2 p R(3)", "|3 p R(1)"]);
        assert_eq!(kind, CheckErrorKind::InaccessiblePremise(Citation::Line(2)));
        let (kind, _) = check_err(&["|1 p V", "|-", "|2 p R(2)"]);
        assert_eq!(kind, CheckErrorKind::InaccessiblePremise(Citation::Line(1)));
    }

    #[test]
    fn subproof_ranges() {
        // Citing an open sub-proof from inside it.
        let (kind, _) = check_err(&["|-", "||1 p A", "||-", "||2 (p -> p) +I(1-1)"]);
        assert_eq!(
            kind,
            CheckErrorKind::InaccessiblePremise(Citation::Range(0, 0))
        );

        // A range that does not start at an assumption.
        let (kind, _) = check_err(&[
            "|1 p V",
            "|-",
            "||2 q A",
            "||-",
            "||3 q R(2)",
            "|4 p -> q +I(1-3)",
        ]);
        assert_eq!(
            kind,
            CheckErrorKind::InaccessiblePremise(Citation::Range(0, 2))
        );

        // A range reaching out of its sub-proof.
        let (kind, _) = check_err(&[
            "|-",
            "||1 q A",
            "||-",
            "||2 q R(1)",
            "|3 q -> q +I(1-2)",
            "|4 q -> q +I(1-3)",
        ]);
        assert_eq!(
            kind,
            CheckErrorKind::InaccessiblePremise(Citation::Range(0, 2))
        );

        // A sub-proof of a sub-proof that has since closed.
        let (kind, _) = check_err(&[
            "|-",
            "||1 p A",
            "||-",
            "|||2 q A",
            "|||-",
            "|||3 q R(2)",
            "||4 q -> q +I(2-3)",
            "|5 p -> (q -> q) +I(1-4)",
            "|6 q -> q +I(2-3)",
        ]);
        assert_eq!(
            kind,
            CheckErrorKind::InaccessiblePremise(Citation::Range(1, 2))
        );
    }

    #[test]
    fn closed_subproof_cannot_be_cited_from_a_sibling() {
        let (kind, raw) = check_err(&[
            "|-",
            "||1 p A",
            "||-",
            "||2 p R(1)",
            "|3 p -> p +I(1-2)",
            "||4 q A",
            "||-",
            "||5 p -> p +I(1-2)",
            "|6 q -> (p -> p) +I(4-5)",
        ]);
        assert_eq!(
            kind,
            CheckErrorKind::InaccessiblePremise(Citation::Range(0, 1))
        );
        assert_eq!(raw, 7);

        // The same sub-proof cited from the scope it closed into.
        assert!(
            check(&[
                "|-",
                "||1 p A",
                "||-",
                "||2 p R(1)",
                "|3 p -> p +I(1-2)",
                "||4 q A",
                "||-",
                "||5 p -> p R(3)",
                "|6 q -> (p -> p) +I(4-5)",
                "|7 p -> p +I(1-2)",
            ])
            .is_ok()
        );
    }

    #[test]
    fn invalid_rule_application() {
        let (kind, raw) = check_err(&["|1 p V", "|2 q V", "|-", "|3 (p | q) +K(1,2)"]);
        assert_eq!(
            kind,
            CheckErrorKind::InvalidArgumentApplication {
                rule: Ustr::from("+K"),
                error: MatchError::ArgumentDoesNotMatch,
            }
        );
        assert_eq!(raw, 3);

        let (kind, _) = check_err(&["|1 p V", "|-", "|2 (p & p) +K(1)"]);
        assert_eq!(
            kind,
            CheckErrorKind::InvalidArgumentApplication {
                rule: Ustr::from("+K"),
                error: MatchError::InvalidArgumentUsage,
            }
        );
    }

    #[test]
    fn deeper_lines_do_not_count_towards_implication_introduction() {
        assert!(
            check(&[
                "|1 q V",
                "|-",
                "||2 p A",
                "||-",
                "|||3 r A",
                "|||-",
                "|||4 q R(1)",
                "||5 r -> q +I(3-4)",
                "||6 q R(1)",
                "|7 p -> q +I(2-6)",
            ])
            .is_ok()
        );

        let (kind, _) = check_err(&[
            "|1 q V",
            "|-",
            "||2 p A",
            "||-",
            "|||3 r A",
            "|||-",
            "|||4 q R(1)",
            "||5 r -> q +I(3-4)",
            "|6 p -> q +I(2-5)",
        ]);
        assert!(matches!(kind, CheckErrorKind::InvalidArgumentApplication { .. }));
    }

    #[test]
    fn allowed_premises() {
        let options = CheckOptions {
            allowed_premises: Some(vec![s("q")]),
            ..CheckOptions::default()
        };
        let err = check_with(&["|1 p V", "|-", "|2 p R(1)"], &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Check(CheckErrorKind::InvalidPremise(s("p"))));
        assert_eq!(err.raw_line, 0);

        let options = CheckOptions {
            allowed_premises: Some(vec![s("q"), s("p")]),
            ..CheckOptions::default()
        };
        assert!(check_with(&["|1 p V", "|-", "|2 p R(1)"], &options).is_ok());
    }

    #[test]
    fn expected_conclusion() {
        let lines = ["|1 p V", "|2 q V", "|-", "|3 (q & p) +K(2,1)"];

        let options = CheckOptions {
            expected_conclusion: Some(s("(p & q)")),
            ..CheckOptions::default()
        };
        let err = check_with(&lines, &options).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Check(CheckErrorKind::MissingExpectedConclusion(s("(p & q)")))
        );
        assert_eq!(err.raw_line, 3);

        let options = CheckOptions {
            expected_conclusion: Some(s("(q & p)")),
            ..CheckOptions::default()
        };
        assert!(check_with(&lines, &options).is_ok());
    }

    #[test]
    fn conclusion_may_be_reached_inside_a_subproof() {
        let options = CheckOptions {
            expected_conclusion: Some(s("q")),
            ..CheckOptions::default()
        };
        let lines = ["|1 q V", "|-", "||2 p A", "||-", "||3 q R(1)"];
        assert!(check_with(&lines, &options).is_ok());

        let lines = ["|-", "||1 q A", "||-", "||2 q R(1)"];
        assert!(check_with(&lines, &options).is_ok());

        let options = CheckOptions {
            expected_conclusion: Some(s("p")),
            ..CheckOptions::default()
        };
        let err = check_with(&lines, &options).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::Check(CheckErrorKind::MissingExpectedConclusion(s("p")))
        );
        assert_eq!(err.raw_line, 3);
    }

    #[test]
    fn passes_run_in_order() {
        // Bad numbering and a bad rule: numbering is reported.
        let (kind, _) = check_err(&["|1 p V", "|-", "|3 q R(1)"]);
        assert_eq!(kind, CheckErrorKind::InvalidNumbering { expected: 1 });

        // Inaccessible premise and a bad rule: accessibility is reported.
        let (kind, _) = check_err(&["|1 p V", "|-", "|2 q R(2)"]);
        assert!(matches!(kind, CheckErrorKind::InaccessiblePremise(_)));
    }
}
