use crate::{executors::Tools, grid::ParameterGrid};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::Error,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, warn};

// check if a file is executable
pub fn check_executable(path: &Path) -> Result<bool, ConfigErrors> {
    if !path.is_file() {
        Err(ConfigErrors::FileNotFound(path.to_path_buf()))
    } else {
        match File::open(path).map(|file| file.metadata()) {
            Ok(Ok(metadata)) => Ok((metadata.mode() & 0o111) != 0),
            Ok(Err(e)) | Err(e) => Err(ConfigErrors::Io(e)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),
    #[error("Failed to read file")]
    Io(#[from] Error),
    #[error("Failed to parse config")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// subsampling rates, the outer axis of the sweep
    #[serde(default = "default_scaled")]
    pub scaled: Vec<u64>,
    /// k-mer lengths, the inner axis of the sweep
    #[serde(default = "default_kmer_sizes")]
    pub kmer_sizes: Vec<u32>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// location of the result store
    #[serde(default = "default_records_path")]
    pub records: PathBuf,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    #[serde(default = "default_reference")]
    pub reference: ToolConfig,
    #[serde(default = "default_candidate")]
    pub candidate: ToolConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    // either a bare name looked up in PATH or a path to the executable
    pub exec: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scaled: default_scaled(),
            kmer_sizes: default_kmer_sizes(),
            seed: default_seed(),
            records: default_records_path(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            reference: default_reference(),
            candidate: default_candidate(),
        }
    }
}

impl SweepConfig {
    /// load a config from a yaml file, missing fields fall back to their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        if !path.is_file() {
            return Err(ConfigErrors::FileNotFound(path.to_path_buf()));
        }

        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }

    pub fn grid(&self) -> ParameterGrid {
        ParameterGrid::new(self.scaled.clone(), self.kmer_sizes.clone())
    }

    pub fn reference(&self) -> Tools {
        Tools::Sourmash {
            exec: self.tools.reference.exec.clone(),
        }
    }

    pub fn candidate(&self) -> Tools {
        Tools::FracKmc {
            exec: self.tools.candidate.exec.clone(),
        }
    }

    /// returns true if any error was found
    pub fn preflight_checks(&self) -> bool {
        // attempt to catch all errors instead of piece-by-piece to make debugging easier for users
        let mut contains_error = false;

        if self.scaled.is_empty() || self.kmer_sizes.is_empty() {
            warn!("One of the sweep axes is empty, no tool will be run");
        }

        if self.scaled.contains(&0) {
            error!("scaled must only contain positive values");
            contains_error = true;
        }

        if self.kmer_sizes.contains(&0) {
            error!("kmer_sizes must only contain positive values");
            contains_error = true;
        }

        for (name, tool) in [
            ("reference", &self.tools.reference),
            ("candidate", &self.tools.candidate),
        ] {
            // bare names are resolved through PATH once the tool is launched
            if tool.exec.components().count() < 2 {
                debug!(
                    "tools.{name}.exec ({}) will be resolved through PATH",
                    tool.exec.to_string_lossy()
                );
                continue;
            }

            match check_executable(&tool.exec) {
                Ok(true) => {}
                Ok(false) => {
                    error!(
                        "Tool {name} target {} is not executable",
                        tool.exec.to_string_lossy()
                    );
                    contains_error = true;
                }
                Err(e) => {
                    error!(
                        "Failed to determine if tools.{name}.exec ({}) is an executable: {e}",
                        tool.exec.to_string_lossy()
                    );
                    contains_error = true;
                }
            }
        }

        contains_error
    }
}

fn default_scaled() -> Vec<u64> {
    vec![1, 10, 100, 1000, 10000, 100000]
}

fn default_kmer_sizes() -> Vec<u32> {
    vec![21, 31, 41, 51, 61, 71]
}

fn default_seed() -> u64 {
    42
}

fn default_records_path() -> PathBuf {
    PathBuf::from("records")
}

fn default_reference() -> ToolConfig {
    ToolConfig {
        exec: PathBuf::from("sourmash"),
    }
}

fn default_candidate() -> ToolConfig {
    ToolConfig {
        exec: PathBuf::from("fracKmcSketch"),
    }
}
