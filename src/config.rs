//! JSON option tables.
//!
//! A table describes the program, the empty-input policy and the options:
//!
//! ```json
//! {
//!   "program": {"name": "Optimiser", "version": "0.0.1"},
//!   "options": [
//!     {"long": "optimise", "format": "n", "required": true},
//!     {"short": "f", "long": "file", "format": "s", "required": true, "default": true}
//!   ]
//! }
//! ```

use crate::help::ProgramInfo;
use crate::option::{ArgValue, CmdOption};
use crate::registry::EmptyInputPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading an option table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for a single option.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionConfig {
    /// Short name without the dash (e.g., "f" for -f)
    pub short: Option<String>,
    /// Long name without the dashes (e.g., "file" for --file)
    pub long: Option<String>,
    /// Help text for this option
    pub help: Option<String>,
    /// Argument format such as "s" or "n-s"
    pub format: Option<String>,
    /// Declared argument count; inferred from `format` when omitted
    pub nargs: Option<u32>,
    /// Whether this option must be given
    #[serde(default)]
    pub required: bool,
    /// Whether this option receives bare tokens
    #[serde(default)]
    pub default: bool,
    /// Default argument values (strings or integers)
    pub default_args: Option<Vec<ArgValue>>,
}

impl OptionConfig {
    /// The declared argument count, or the count a well-formed format implies.
    pub fn effective_nargs(&self) -> u32 {
        match (self.nargs, self.format.as_deref()) {
            (Some(n), _) => n,
            (None, Some(format)) => ((format.chars().count() + 1) / 2) as u32,
            (None, None) => 0,
        }
    }

    /// Build the option record described by this entry.
    pub fn to_option(&self) -> CmdOption {
        let mut option = CmdOption::new();
        if let Some(ref short) = self.short {
            option = option.short(short.clone());
        }
        if let Some(ref long) = self.long {
            option = option.long(long.clone());
        }
        if let Some(ref help) = self.help {
            option = option.help(help.clone());
        }
        match self.format {
            Some(ref format) => option = option.format(format.clone(), self.effective_nargs()),
            None => option.arg_count = self.effective_nargs(),
        }
        if self.required {
            option = option.required();
        }
        if self.default {
            option = option.default_option();
        }
        if let Some(ref values) = self.default_args {
            option = option.default_args(values.clone());
        }
        option
    }
}

/// Top-level option table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Program metadata shown in help
    pub program: Option<ProgramInfo>,
    /// How an empty argument list is treated
    #[serde(default)]
    pub empty_input: EmptyInputPolicy,
    /// List of option configurations
    #[serde(default)]
    pub options: Vec<OptionConfig>,
}

impl Config {
    /// Parse a JSON string into a Config.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build option records in table order, ready for registration.
    pub fn build_options(&self) -> Vec<CmdOption> {
        self.options.iter().map(OptionConfig::to_option).collect()
    }

    pub fn program_info(&self) -> Option<ProgramInfo> {
        self.program.clone()
    }
}
