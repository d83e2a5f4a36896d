use crate::{
    cli::CliError,
    config::NatdedConfig,
    semant::ArgumentLibrary,
    transcribe::Notation,
    util::ansi::{ANSI_BOLD, ANSI_GRAY, ANSI_RESET},
};
use argh::FromArgs;
use std::path::PathBuf;

/// List the rules proofs may cite.
#[derive(FromArgs)]
#[argh(subcommand, name = "rules")]
pub struct RulesCommand {
    /// path to natded.toml config file.
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

pub fn run_rules(cmd: RulesCommand) -> Result<(), CliError> {
    let config = NatdedConfig::discover(cmd.config.as_deref())?;
    let library = config.library()?;

    for line in rule_lines(&library, config.notation()) {
        println!("{line}");
    }
    Ok(())
}

fn rule_lines(library: &ArgumentLibrary, notation: Notation) -> Vec<String> {
    library
        .names()
        .iter()
        .flat_map(|&name| {
            let header = format!("{ANSI_BOLD}{name}{ANSI_RESET}");
            let forms = library.get(name).iter().map(move |template| {
                let premises = template
                    .premises()
                    .iter()
                    .map(|p| notation.text(&p.to_string()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let repeat = if template.repeats_last_premise() {
                    format!(" {ANSI_GRAY}(last premise may repeat){ANSI_RESET}")
                } else {
                    String::new()
                };
                format!(
                    "    {} {ANSI_GRAY}{}{ANSI_RESET} {premises} => {}{repeat}",
                    template.kind(),
                    template.arity(),
                    notation.sentence(template.conclusion()),
                )
            });
            std::iter::once(header).chain(forms)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_header_per_rule() {
        let library = ArgumentLibrary::builtin();
        let lines = rule_lines(&library, Notation::Unicode);
        let headers = lines.iter().filter(|l| !l.starts_with("    ")).count();
        assert_eq!(headers, library.names().len());
        assert_eq!(lines.len(), headers + library.iter().count());
        assert!(lines.iter().any(|l| l.contains("(A ∧ B)")));
    }
}
