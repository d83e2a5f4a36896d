use crate::{
    cli::CliError,
    strings::{CONFIG_FILE, PROOF_EXTENSION},
    util::ansi::{ANSI_BOLD, ANSI_GREEN, ANSI_RESET},
};
use argh::FromArgs;
use std::{fs, path::PathBuf};

const CONFIG_CONTENT: &str = r#"[display]
# Print sentences with ¬ ∧ ∨ → ↔ instead of ! & | -> <->.
unicode = false

# [rules]
# path = "rules.toml"
"#;

const SAMPLE_PROOF: &str = "|1 p -> q V
|2 q -> r V
|-
||3 p A
||-
||4 q -I(1,3)
||5 r -I(2,4)
|6 p -> r +I(3-5)
";

/// Create a directory with a config file and a sample proof.
#[derive(FromArgs)]
#[argh(subcommand, name = "init")]
pub struct InitCommand {
    /// the directory to create
    #[argh(positional)]
    name: String,
}

pub fn run_init(cmd: InitCommand) -> Result<(), CliError> {
    let dir = PathBuf::from(&cmd.name);

    if dir.exists() {
        return Err(CliError::AlreadyExists(dir));
    }

    fs::create_dir(&dir).map_err(|e| CliError::Io(dir.clone(), e))?;

    let config_path = dir.join(CONFIG_FILE.as_str());
    fs::write(&config_path, CONFIG_CONTENT).map_err(|e| CliError::Io(config_path.clone(), e))?;

    let proof_path = dir.join("example").with_extension(PROOF_EXTENSION.as_str());
    fs::write(&proof_path, SAMPLE_PROOF).map_err(|e| CliError::Io(proof_path.clone(), e))?;

    println!(
        "{ANSI_GREEN}{ANSI_BOLD}Created{ANSI_RESET} '{}'. Try `natded check {}`.",
        cmd.name,
        proof_path.display()
    );

    Ok(())
}
