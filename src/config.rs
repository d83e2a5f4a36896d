use crate::{
    semant::{ArgumentLibrary, LibraryError},
    strings::CONFIG_FILE,
    transcribe::Notation,
};
use log::debug;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Search for natded.toml starting from the current directory and moving up
/// the directory tree.
pub fn find_config_file() -> Result<PathBuf, ConfigError> {
    let current_dir =
        env::current_dir().map_err(|e| ConfigError::IoError(PathBuf::from("."), e))?;

    let start_dir = current_dir
        .canonicalize()
        .map_err(|e| ConfigError::IoError(current_dir.to_path_buf(), e))?;

    let mut current = start_dir.as_path();

    loop {
        let candidate = current.join(CONFIG_FILE.as_str());
        if candidate.exists() {
            return Ok(candidate);
        }

        current = match current.parent() {
            Some(parent) => parent,
            None => return Err(ConfigError::NotFound),
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct NatdedConfig {
    rules_path: Option<PathBuf>,
    unicode: bool,
}

impl NatdedConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config = Self::from_toml(&contents)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;

        // Rule paths are relative to the config file.
        let dir = path.parent().unwrap_or(Path::new("."));
        Ok(Self {
            rules_path: config.rules_path.map(|p| dir.join(p)),
            ..config
        })
    }

    fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        let file: NatdedConfigFile = toml::from_str(contents)?;
        Ok(Self {
            rules_path: file.rules.and_then(|r| r.path),
            unicode: file.display.and_then(|d| d.unicode).unwrap_or(false),
        })
    }

    /// The given config file, else the nearest natded.toml, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match find_config_file() {
                Ok(path) => path,
                Err(ConfigError::NotFound) => {
                    debug!("no {} found, using defaults", *CONFIG_FILE);
                    return Ok(Self::default());
                }
                Err(e) => return Err(e),
            },
        };

        debug!("using config {}", path.display());
        Self::from_file(&path)
    }

    pub fn rules_path(&self) -> Option<&Path> {
        self.rules_path.as_deref()
    }

    pub fn notation(&self) -> Notation {
        Notation::from_unicode_flag(self.unicode)
    }

    /// The configured rule library, or the built-in one.
    pub fn library(&self) -> Result<ArgumentLibrary, ConfigError> {
        match &self.rules_path {
            Some(path) => Ok(ArgumentLibrary::from_file(path)?),
            None => Ok(ArgumentLibrary::builtin()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NatdedConfigFile {
    rules: Option<RulesConfig>,
    display: Option<DisplayConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesConfig {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplayConfig {
    unicode: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {} found", *CONFIG_FILE)]
    NotFound,
    #[error("could not read `{}`", .0.display())]
    IoError(PathBuf, #[source] std::io::Error),
    #[error("invalid config `{}`: {}", .0.display(), .1)]
    ParseError(PathBuf, toml::de::Error),
    #[error(transparent)]
    Library(#[from] LibraryError),
}
