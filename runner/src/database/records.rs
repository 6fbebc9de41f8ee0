use super::{Header, ResultTable, StoreError, TimingResult};
use crate::grid::GridPoint;
use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::{debug, error, info};

const COLUMNS: usize = 4;

/// Write session over the result store.
///
/// The file is truncated and the header written on `create`, every row is flushed as soon as
/// it is appended. `close` reports flush errors, dropping an unclosed session still flushes.
#[derive(Debug)]
pub struct RecordSession {
    writer: Writer<File>,
    path: PathBuf,
    rows: usize,
    closed: bool,
}

impl RecordSession {
    pub fn create(path: &Path, header: &Header) -> Result<Self, StoreError> {
        let file = File::create(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer.write_record(&header.0)?;
        writer.flush().map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = ?path, "Opened result store");

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
            closed: false,
        })
    }

    /// Open a session, hand it to `f` and close it again on every exit path of `f`
    pub fn scoped<T, E, F>(path: &Path, header: &Header, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut RecordSession) -> Result<T, E>,
    {
        let mut session = Self::create(path, header)?;

        match f(&mut session) {
            Ok(value) => {
                session.close()?;

                Ok(value)
            }
            Err(error) => {
                if let Err(close_error) = session.close() {
                    error!(error = ?close_error, "Failed to close result store after an error");
                }

                Err(error)
            }
        }
    }

    pub fn append(&mut self, result: &TimingResult) -> Result<(), StoreError> {
        self.writer.serialize((
            result.point.kmer_size,
            result.point.scaled,
            result.reference_seconds,
            result.candidate_seconds,
        ))?;
        self.writer.flush().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.rows += 1;

        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// flush and close the underlying file, returns the number of rows written
    pub fn close(mut self) -> Result<usize, StoreError> {
        self.closed = true;

        self.writer.flush().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        info!(path = ?self.path, "Stored {} rows", self.rows);

        Ok(self.rows)
    }
}

impl Drop for RecordSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        match self.writer.flush() {
            Ok(()) => debug!(path = ?self.path, "Flushed result store on drop"),
            Err(error) => error!(error = ?error, "Failed to flush result store"),
        }
    }
}

/// Read a whole result store back.
///
/// The header names are kept as is, every data line has to hold exactly four unquoted fields
/// with positive integer parameters and finite, non-negative durations. Blank lines are rejected.
pub fn read_all(path: &Path) -> Result<ResultTable, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // the csv reader skips empty lines on its own
    if let Some(index) = contents.lines().position(str::is_empty) {
        return Err(StoreError::BlankLine {
            line: index as u64 + 1,
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(contents.as_bytes());

    let header = reader.headers()?.clone();
    if header.len() != COLUMNS {
        return Err(StoreError::ColumnCount {
            line: 1,
            found: header.len(),
        });
    }

    let mut table = ResultTable::new(Header(
        [&header[0], &header[1], &header[2], &header[3]].map(str::to_owned),
    ));

    for record in reader.records() {
        table.push(parse_row(&record?)?);
    }

    debug!(path = ?path, "Read {} rows", table.len());

    Ok(table)
}

fn parse_row(record: &StringRecord) -> Result<TimingResult, StoreError> {
    let line = record.position().map_or(0, |position| position.line());

    if record.len() != COLUMNS {
        return Err(StoreError::ColumnCount {
            line,
            found: record.len(),
        });
    }

    let (kmer_size, scaled, reference_seconds, candidate_seconds): (u32, u64, f64, f64) =
        record.deserialize(None)?;

    if kmer_size == 0 || scaled == 0 {
        return Err(StoreError::InvalidValue {
            line,
            message: "kmer_size and scaled must be positive".to_owned(),
        });
    }

    for seconds in [reference_seconds, candidate_seconds] {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(StoreError::InvalidValue {
                line,
                message: format!("duration {seconds} is not a finite, non-negative number"),
            });
        }
    }

    Ok(TimingResult {
        point: GridPoint { kmer_size, scaled },
        reference_seconds,
        candidate_seconds,
    })
}
