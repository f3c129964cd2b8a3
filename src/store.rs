use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;

use crate::models::{FoodEntry, ParseError};

/// Append-only flat-file store for food entries, one CSV line per entry.
/// The backing file is created lazily on first append.
pub struct LogStore {
    path: PathBuf,
}

/// Result of a full-file load: decoded entries in file order, plus the
/// lines that failed to decode. One corrupt line never invalidates the log.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entries: Vec<FoodEntry>,
    pub skipped: Vec<SkippedLine>,
}

/// A line that could not be decoded and was skipped during load.
#[derive(Debug)]
pub struct SkippedLine {
    pub line_number: usize,
    pub content: String,
    pub reason: ParseError,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads every entry from the backing file, in file order. A missing
    /// file yields an empty report. Lines that fail to decode are recorded
    /// in the report and skipped; blank lines are ignored.
    pub fn load_all(&self) -> Result<LoadReport, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(LoadReport::default());
            }
            Err(e) => return Err(StoreError::Read(self.path.clone(), e)),
        };

        let reader = BufReader::new(file);
        let mut report = LoadReport::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| StoreError::Read(self.path.clone(), e))?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<FoodEntry>() {
                Ok(entry) => report.entries.push(entry),
                Err(reason) => {
                    tracing::warn!(
                        "Skipping corrupted line {} in {}: {}",
                        idx + 1,
                        self.path.display(),
                        reason
                    );
                    report.skipped.push(SkippedLine {
                        line_number: idx + 1,
                        content: line,
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Appends one encoded entry to the end of the backing file, creating
    /// the file (and its parent directory) if absent.
    pub fn append(&self, entry: &FoodEntry) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Write(self.path.clone(), e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::Write(self.path.clone(), e))?;

        writeln!(file, "{}", entry.to_line())
            .map_err(|e| StoreError::Write(self.path.clone(), e))?;

        Ok(())
    }
}

#[derive(Debug)]
pub enum StoreError {
    Read(PathBuf, std::io::Error),
    Write(PathBuf, std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Read(path, e) => {
                write!(f, "Failed to read log file '{}': {}", path.display(), e)
            }
            StoreError::Write(path, e) => {
                write!(f, "Failed to write log file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StoreError {}
