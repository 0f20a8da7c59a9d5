use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::config::NullConfig;
use crate::{DataError, Result};

/// CSV file holding one or more numeric sample columns
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    headers: Vec<String>,
}

impl CsvSource {
    /// Open a CSV file with a header row
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        Ok(Self { path, headers })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read one numeric column, dropping cells `nulls` marks as missing
    pub fn column(&self, name: &str, nulls: &NullConfig) -> Result<Vec<f64>> {
        let file = File::open(&self.path)?;
        let values = Self::read_column_from(file, name, nulls)?;
        info!(
            path = %self.path.display(),
            column = name,
            count = values.len(),
            "Loaded sample column"
        );
        Ok(values)
    }

    /// Open `path` and read column `name`
    pub fn read_column(path: impl AsRef<Path>, name: &str, nulls: &NullConfig) -> Result<Vec<f64>> {
        Self::open(path)?.column(name, nulls)
    }

    /// Read column `name` from any CSV stream with a header row
    pub fn read_column_from<R: Read>(input: R, name: &str, nulls: &NullConfig) -> Result<Vec<f64>> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);
        let idx = reader
            .headers()?
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;

        let mut values = Vec::new();
        let mut skipped = 0usize;
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let cell = record.get(idx).unwrap_or("");
            match nulls.parse_cell(cell) {
                None => skipped += 1,
                Some(Ok(v)) if v.is_finite() => values.push(v),
                Some(Ok(_)) | Some(Err(_)) => {
                    return Err(DataError::NotNumeric {
                        column: name.to_string(),
                        row,
                        value: cell.to_string(),
                    })
                }
            }
        }

        if values.is_empty() {
            return Err(DataError::EmptyColumn(name.to_string()));
        }
        if skipped > 0 {
            warn!(column = name, skipped, "Dropped missing cells");
        }
        Ok(values)
    }
}
