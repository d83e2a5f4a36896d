use crate::{
    cli::{CliError, sentence_arg},
    config::NatdedConfig,
    sentence::{
        Sentence,
        models::{all_models, enumerate_interpretations, letters},
    },
    transcribe::Notation,
    util::{
        ansi::{ANSI_BOLD, ANSI_GREEN, ANSI_RED, ANSI_RESET},
        plural,
    },
};
use argh::FromArgs;
use std::path::PathBuf;

/// Print the truth table of a sentence.
#[derive(FromArgs)]
#[argh(subcommand, name = "models")]
pub struct ModelsCommand {
    /// the sentence, in ASCII or Unicode notation.
    #[argh(positional)]
    sentence: String,

    /// path to natded.toml config file.
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

pub fn run_models(cmd: ModelsCommand) -> Result<(), CliError> {
    let config = NatdedConfig::discover(cmd.config.as_deref())?;
    let sentence = sentence_arg(&cmd.sentence)?;

    for row in truth_table(&sentence, config.notation()) {
        println!("{row}");
    }

    let models = all_models(&sentence);
    let count = models.satisfying.len();
    println!();
    if models.falsifying.is_empty() {
        println!("{ANSI_GREEN}{ANSI_BOLD}tautology{ANSI_RESET}");
    } else if count == 0 {
        println!("{ANSI_RED}{ANSI_BOLD}contradiction{ANSI_RESET}");
    } else {
        println!("{ANSI_BOLD}{count}{ANSI_RESET} model{}", plural(count));
    }
    Ok(())
}

fn truth_table(sentence: &Sentence, notation: Notation) -> Vec<String> {
    let letters = letters(sentence);
    let mut rows = vec![format!(
        "{} | {}",
        letters.iter().map(char::to_string).collect::<Vec<_>>().join(" "),
        notation.sentence(sentence)
    )];

    for interpretation in enumerate_interpretations(&letters) {
        let values = interpretation
            .iter()
            .map(|(_, value)| truth(value))
            .collect::<Vec<_>>()
            .join(" ");
        rows.push(format!("{values} | {}", truth(sentence.evaluate(&interpretation))));
    }

    rows
}

fn truth(value: bool) -> &'static str {
    if value { "T" } else { "F" }
}
