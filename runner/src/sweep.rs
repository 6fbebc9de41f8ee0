use crate::{
    config::SweepConfig,
    database::{Header, RecordSession, ResultTable, StoreError, TimingResult},
    executors::{ExecutorError, SketchContext, Tools},
    grid::{GridPoint, ParameterGrid},
};
use std::{ffi::OsString, path::Path};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Failed to run {tool} for {point}")]
    Executor {
        tool: &'static str,
        point: GridPoint,
        #[source]
        source: ExecutorError,
    },
    #[error("Failed to store results")]
    Store(#[from] StoreError),
}

/// Sequential sweep of both tools over a parameter grid
#[derive(Debug, Clone)]
pub struct Sweep<'a> {
    pub grid: ParameterGrid,
    pub reference: Tools,
    pub candidate: Tools,
    pub context: SketchContext<'a>,
}

impl<'a> Sweep<'a> {
    pub fn new(
        input: &'a Path,
        grid: ParameterGrid,
        seed: u64,
        reference: Tools,
        candidate: Tools,
    ) -> Self {
        Self {
            grid,
            reference,
            candidate,
            context: SketchContext { input, seed },
        }
    }

    pub fn from_config(input: &'a Path, config: &SweepConfig) -> Self {
        Self::new(
            input,
            config.grid(),
            config.seed,
            config.reference(),
            config.candidate(),
        )
    }

    pub fn header(&self) -> Header {
        Header::new(&self.reference, &self.candidate)
    }

    /// command lines of the reference and the candidate for a single point
    pub fn commands(&self, point: &GridPoint) -> [Vec<OsString>; 2] {
        [
            self.reference.command(point, &self.context),
            self.candidate.command(point, &self.context),
        ]
    }

    /// Run every grid point, reference first, and append each row to `session` as soon as
    /// both durations are known.
    ///
    /// A launch failure aborts the sweep, rows stored before it stay in the session.
    #[instrument(skip_all, level = "info")]
    pub fn run(&self, session: &mut RecordSession) -> Result<ResultTable, SweepError> {
        let total = self.grid.len();
        let mut table = ResultTable::new(self.header());

        for (index, point) in self.grid.iter().enumerate() {
            info!("Running {point} ({}/{total})", index + 1);

            let reference = self.measure(&self.reference, &point)?;
            let candidate = self.measure(&self.candidate, &point)?;

            let result = TimingResult {
                point,
                reference_seconds: reference,
                candidate_seconds: candidate,
            };

            session.append(&result)?;
            table.push(result);
        }

        info!("Done with processing");

        Ok(table)
    }

    /// Run the sweep into a fresh result store at `path`
    pub fn run_to(&self, path: &Path) -> Result<ResultTable, SweepError> {
        RecordSession::scoped(path, &self.header(), |session| self.run(session))
    }

    fn measure(&self, tool: &Tools, point: &GridPoint) -> Result<f64, SweepError> {
        tool.invoke(point, &self.context)
            .map(|invocation| invocation.seconds())
            .map_err(|source| SweepError::Executor {
                tool: tool.name(),
                point: *point,
                source,
            })
    }
}
