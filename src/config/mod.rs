pub mod cli;
pub mod input;

use crate::core::{ConfigProvider, MalformedDatePolicy};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_optional_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::Path;

pub const DEFAULT_INPUT: &str = "in.csv";
pub const DEFAULT_OUTPUT: &str = "out.csv";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "export-cleanup")]
#[command(about = "Reduces a customer export CSV to the fixed import schema")]
pub struct CliConfig {
    /// Source CSV; prompted for when omitted
    pub input: Option<String>,

    /// Destination file [default: out.csv next to the program]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Drop rows with an unreadable birthday instead of failing the run
    #[arg(long)]
    pub skip_malformed_dates: bool,

    /// Exit without waiting for ENTER
    #[arg(long)]
    pub no_pause: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn date_policy(&self) -> MalformedDatePolicy {
        if self.skip_malformed_dates {
            MalformedDatePolicy::SkipRow
        } else {
            MalformedDatePolicy::Abort
        }
    }

    /// Combines the arguments with the input path chosen by the operator.
    pub fn resolve(&self, input_path: &Path, program_dir: &Path) -> ExportConfig {
        let output_path = match &self.output {
            Some(path) => path.clone(),
            None => program_dir.join(DEFAULT_OUTPUT).to_string_lossy().into_owned(),
        };

        ExportConfig {
            input_path: input_path.to_string_lossy().into_owned(),
            output_path,
            date_policy: self.date_policy(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_optional_path("input", self.input.as_deref())?;
        validate_optional_path("output", self.output.as_deref())?;
        Ok(())
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub input_path: String,
    pub output_path: String,
    pub date_policy: MalformedDatePolicy,
}

impl ConfigProvider for ExportConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn date_policy(&self) -> MalformedDatePolicy {
        self.date_policy
    }
}
