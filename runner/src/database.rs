pub mod records;

use crate::{executors::Tools, grid::GridPoint};
use std::path::PathBuf;
use thiserror::Error;

pub use records::{read_all, RecordSession};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the result store at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed result store")]
    Csv(#[from] csv::Error),
    #[error("Line {line} is blank")]
    BlankLine { line: u64 },
    #[error("Line {line}: expected 4 columns, found {found}")]
    ColumnCount { line: u64, found: usize },
    #[error("Line {line}: {message}")]
    InvalidValue { line: u64, message: String },
}

/// Measured durations of both tools for a single grid point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingResult {
    pub point: GridPoint,
    pub reference_seconds: f64,
    pub candidate_seconds: f64,
}

/// The four column names of the result store, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header(pub [String; 4]);

impl Header {
    pub fn new(reference: &Tools, candidate: &Tools) -> Self {
        Self([
            "kmer_size".to_owned(),
            "scaled".to_owned(),
            format!("{}_time", reference.name()),
            format!("{}_time", candidate.name()),
        ])
    }

    pub fn reference(&self) -> &str {
        &self.0[2]
    }

    pub fn candidate(&self) -> &str {
        &self.0[3]
    }
}

/// Rows of a single sweep in sweep order
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub header: Header,
    pub rows: Vec<TimingResult>,
}

impl ResultTable {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, result: TimingResult) {
        self.rows.push(result);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimingResult> {
        self.rows.iter()
    }
}
