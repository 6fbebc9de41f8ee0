pub mod local;

use crate::grid::GridPoint;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub use local::{invoke, Invocation};

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Empty command line")]
    EmptyCommand,
    #[error("Failed to launch {exec:?}")]
    Launch {
        exec: OsString,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to wait for {exec:?}")]
    Wait {
        exec: OsString,
        #[source]
        source: std::io::Error,
    },
}

/// Inputs shared by every invocation of a sweep
#[derive(Debug, Clone)]
pub struct SketchContext<'a> {
    pub input: &'a Path,
    pub seed: u64,
}

/// The sketching tools under comparison.
/// Every variant knows its own command grammar, so the sweep only ever sees `invoke`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tools {
    /// `sourmash sketch dna -p k=<k>,scaled=<s> -o <out> <input>`
    Sourmash { exec: PathBuf },
    /// `fracKmcSketch <input> <out> --ksize <k> --scaled <s> --seed <seed>`
    FracKmc { exec: PathBuf },
}

impl Tools {
    /// prefix of the duration column in the result store
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sourmash { .. } => "sourmash",
            Self::FracKmc { .. } => "frackmc",
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Sourmash { .. } => "sm",
            Self::FracKmc { .. } => "fk",
        }
    }

    fn exec(&self) -> &Path {
        match self {
            Self::Sourmash { exec } | Self::FracKmc { exec } => exec,
        }
    }

    /// Sketch output next to the input, unique per (tool, grid point)
    pub fn sketch_path(&self, input: &Path, point: &GridPoint) -> PathBuf {
        let mut name = input.as_os_str().to_owned();
        name.push(format!(
            "_sketch_{}_k_{}_s_{}.sig",
            self.tag(),
            point.kmer_size,
            point.scaled
        ));

        PathBuf::from(name)
    }

    pub fn command(&self, point: &GridPoint, context: &SketchContext) -> Vec<OsString> {
        let output = self.sketch_path(context.input, point).into_os_string();
        let input = context.input.as_os_str().to_owned();
        let exec = self.exec().as_os_str().to_owned();

        match self {
            Self::Sourmash { .. } => vec![
                exec,
                "sketch".into(),
                "dna".into(),
                "-p".into(),
                format!("k={},scaled={}", point.kmer_size, point.scaled).into(),
                "-o".into(),
                output,
                input,
            ],
            Self::FracKmc { .. } => vec![
                exec,
                input,
                output,
                "--ksize".into(),
                point.kmer_size.to_string().into(),
                "--scaled".into(),
                point.scaled.to_string().into(),
                "--seed".into(),
                context.seed.to_string().into(),
            ],
        }
    }

    pub fn invoke(
        &self,
        point: &GridPoint,
        context: &SketchContext,
    ) -> Result<Invocation, ExecutorError> {
        invoke(&self.command(point, context))
    }
}
