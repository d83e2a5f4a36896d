use crate::{
    cli::{CliError, sentence_arg},
    config::NatdedConfig,
    diagnostics::print_error,
    report::{display_failure, display_report},
    semant::ArgumentLibrary,
    source::ProofSource,
    transcribe::Notation,
    verify::{CheckOptions, check_proof},
};
use argh::FromArgs;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use log::info;
use notify::Watcher;
use std::{io, path::PathBuf, sync::mpsc};

/// Verify a proof file.
#[derive(FromArgs)]
#[argh(subcommand, name = "check")]
pub struct CheckCommand {
    /// the proof to check.
    #[argh(positional)]
    file: PathBuf,

    /// a premise the proof may introduce. Repeat for several; without any,
    /// every premise is allowed.
    #[argh(option, short = 'p')]
    premise: Vec<String>,

    /// the sentence the proof has to conclude.
    #[argh(option, short = 'g')]
    conclusion: Option<String>,

    /// path to natded.toml config file.
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// continually recheck on file changes.
    #[argh(switch, short = 'w')]
    watch: bool,
}

pub fn run_check(cmd: CheckCommand) -> Result<(), CliError> {
    let config = NatdedConfig::discover(cmd.config.as_deref())?;
    let library = config.library()?;

    let options = CheckOptions {
        allowed_premises: if cmd.premise.is_empty() {
            None
        } else {
            Some(
                cmd.premise
                    .iter()
                    .map(|p| sentence_arg(p))
                    .collect::<Result<_, _>>()?,
            )
        },
        expected_conclusion: cmd.conclusion.as_deref().map(sentence_arg).transpose()?,
    };

    if cmd.watch {
        let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&cmd.file, notify::RecursiveMode::NonRecursive)?;

        for i in 1.. {
            let _ = rx.try_iter().count();

            // Clear the screen to print the new result
            _ = execute!(io::stdout(), Clear(ClearType::Purge), MoveTo(0, 0));

            match ProofSource::read(&cmd.file) {
                Ok(source) => {
                    check(&source, &library, &options, config.notation(), Some(i));
                }
                Err(e) => eprintln!("{}", CliError::Io(cmd.file.clone(), e)),
            }

            loop {
                match rx.recv() {
                    Ok(Ok(e)) if matches!(e.kind, notify::EventKind::Access(_)) => continue,
                    Ok(Ok(_)) => break,
                    Ok(Err(e)) => return Err(e.into()),
                    // The watcher is gone.
                    Err(_) => return Ok(()),
                }
            }
        }

        Ok(())
    } else {
        let source =
            ProofSource::read(&cmd.file).map_err(|e| CliError::Io(cmd.file.clone(), e))?;

        if !check(&source, &library, &options, config.notation(), None) {
            std::process::exit(1)
        }
        Ok(())
    }
}

fn check(
    source: &ProofSource,
    library: &ArgumentLibrary,
    options: &CheckOptions,
    notation: Notation,
    run: Option<usize>,
) -> bool {
    info!("checking {} ({} lines)", source.origin(), source.len());

    match check_proof(&source.ascii_lines(), library, options) {
        Ok(proof) => {
            display_report(&proof, notation, run);
            true
        }
        Err(err) => {
            display_failure(run);
            println!();
            print_error(&err, source, library);
            false
        }
    }
}
