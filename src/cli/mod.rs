use crate::{
    cli::{
        check_command::{CheckCommand, run_check},
        init_command::{InitCommand, run_init},
        models_command::{ModelsCommand, run_models},
        rules_command::{RulesCommand, run_rules},
    },
    config::ConfigError,
    parse::{parse_top_sentence, stream::ParseErrorCtx},
    sentence::Sentence,
    transcribe::to_ascii,
    util::ansi::{ANSI_BOLD, ANSI_RED, ANSI_RESET},
};
use argh::FromArgs;
use std::{io, path::PathBuf};
use thiserror::Error;

mod check_command;
mod init_command;
mod models_command;
mod rules_command;

/// Check natural-deduction proofs in propositional logic.
#[derive(FromArgs)]
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Check(CheckCommand),
    Rules(RulesCommand),
    Models(ModelsCommand),
    Init(InitCommand),
}

pub fn run_cli() {
    let args: Args = argh::from_env();

    let res = match args.command {
        Command::Check(cmd) => run_check(cmd),
        Command::Rules(cmd) => run_rules(cmd),
        Command::Models(cmd) => run_models(cmd),
        Command::Init(cmd) => run_init(cmd),
    };

    if let Err(err) = res {
        eprintln!("{ANSI_RED}{ANSI_BOLD}error:{ANSI_RESET} {err}");
        std::process::exit(2);
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not access `{}`: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),
    #[error("`{0}` is not a sentence: {1}")]
    Sentence(String, ParseErrorCtx),
    #[error("could not watch for changes: {0}")]
    Watch(#[from] notify::Error),
    #[error("directory `{}` already exists", .0.display())]
    AlreadyExists(PathBuf),
}

/// Read a sentence given on the command line, in either notation.
fn sentence_arg(text: &str) -> Result<Sentence, CliError> {
    parse_top_sentence(&to_ascii(text))
        .map_err(|e| CliError::Sentence(text.to_string(), e.ctx().clone()))
}
