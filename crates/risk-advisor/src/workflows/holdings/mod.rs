//! Holdings CSV import: turns a broker or market-data export into an instrument universe.

mod mapping;
mod normalizer;
mod parser;

use crate::workflows::profiling::{Instrument, InstrumentSource, SourceError};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum HoldingsImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingSymbol { line: u64 },
    InvalidYield { symbol: String, value: String },
}

impl std::fmt::Display for HoldingsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingsImportError::Io(err) => write!(f, "failed to read holdings export: {}", err),
            HoldingsImportError::Csv(err) => write!(f, "invalid holdings CSV data: {}", err),
            HoldingsImportError::MissingSymbol { line } => {
                write!(f, "holdings row on line {} has no symbol", line)
            }
            HoldingsImportError::InvalidYield { symbol, value } => {
                write!(f, "holding '{}' has a non-numeric yield '{}'", symbol, value)
            }
        }
    }
}

impl std::error::Error for HoldingsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HoldingsImportError::Io(err) => Some(err),
            HoldingsImportError::Csv(err) => Some(err),
            HoldingsImportError::MissingSymbol { .. }
            | HoldingsImportError::InvalidYield { .. } => None,
        }
    }
}

impl From<std::io::Error> for HoldingsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HoldingsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct HoldingsImporter;

impl HoldingsImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Instrument>, HoldingsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Expects `Symbol`, `Rating` and `Yield` columns; an optional `Bucket` column
    /// overrides the bucket derived from the rating.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Instrument>, HoldingsImportError> {
        parser::parse_instruments(reader)
    }
}

/// Instrument source backed by a holdings CSV that is re-read on every request, so a
/// refreshed export is picked up without restarting.
#[derive(Debug, Clone)]
pub struct CsvInstrumentSource {
    path: PathBuf,
}

impl CsvInstrumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InstrumentSource for CsvInstrumentSource {
    fn universe(&self) -> Result<Vec<Instrument>, SourceError> {
        HoldingsImporter::from_path(&self.path)
            .map_err(|err| SourceError::Unavailable(err.to_string()))
    }
}
