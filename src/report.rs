use crate::{
    parse::Proof,
    sentence::Sentence,
    transcribe::Notation,
    util::{
        ansi::{ANSI_BOLD, ANSI_GRAY, ANSI_GREEN, ANSI_RED, ANSI_RESET},
        plural,
    },
};
use itertools::Itertools;
use ustr::Ustr;

/// Counts describing a verified proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofSummary {
    pub steps: usize,
    pub premises: usize,
    pub subproofs: usize,
    pub max_depth: usize,
    /// Rules applied, each once, in order of first use.
    pub rules: Vec<Ustr>,
    /// The last line outside every sub-proof.
    pub conclusion: Option<Sentence>,
}

pub fn summarize(proof: &Proof) -> ProofSummary {
    let steps = proof.steps();

    ProofSummary {
        steps: steps.len(),
        premises: proof.premises().count(),
        subproofs: steps.iter().filter(|s| s.rule.is_assumption()).count(),
        max_depth: steps.iter().map(|s| s.depth).max().unwrap_or(1),
        rules: steps
            .iter()
            .filter(|s| !s.rule.is_premise() && !s.rule.is_assumption())
            .map(|s| s.rule.name)
            .unique()
            .collect(),
        conclusion: steps
            .iter()
            .rev()
            .find(|s| s.depth == 1)
            .map(|s| s.sentence.clone()),
    }
}

pub fn display_report(proof: &Proof, notation: Notation, run: Option<usize>) {
    let summary = summarize(proof);

    if let Some(run) = run {
        println!("{ANSI_GRAY}check #{run}{ANSI_RESET}");
    }

    println!(
        " {ANSI_GREEN}✓{ANSI_RESET} {ANSI_BOLD}{}{ANSI_RESET} step{} verified ({} premise{}, {} sub-proof{}, depth {}).",
        summary.steps,
        plural(summary.steps),
        summary.premises,
        plural(summary.premises),
        summary.subproofs,
        plural(summary.subproofs),
        summary.max_depth,
    );

    if let Some(conclusion) = &summary.conclusion {
        println!("   concludes {ANSI_BOLD}{}{ANSI_RESET}", notation.sentence(conclusion));
    }
    if !summary.rules.is_empty() {
        println!("   rules used: {}", summary.rules.iter().join(", "));
    }
}

pub fn display_failure(run: Option<usize>) {
    if let Some(run) = run {
        println!("{ANSI_GRAY}check #{run}{ANSI_RESET}");
    }
    println!(" {ANSI_RED}✗{ANSI_RESET} {ANSI_BOLD}the proof is not valid{ANSI_RESET}");
}
