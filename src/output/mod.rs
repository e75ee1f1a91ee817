use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::plan::FormattedEntry;

pub mod csv_file;
pub mod ics;
pub mod markdown;

pub use csv_file::write_csv;
pub use ics::write_ics;
pub use markdown::write_markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputErrorKind {
    AlreadyExists,
    Io,
    Serialization,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("refusing to overwrite existing file {}", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize CSV row")]
    Csv(#[from] ::csv::Error),
}

impl OutputError {
    pub fn kind(&self) -> OutputErrorKind {
        match self {
            OutputError::AlreadyExists { .. } => OutputErrorKind::AlreadyExists,
            OutputError::Io { .. } => OutputErrorKind::Io,
            OutputError::Csv(_) => OutputErrorKind::Serialization,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        OutputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Output flavours the index can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ics,
    Markdown,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Ics => "ics",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn write<P: AsRef<Path>>(&self, entries: &[FormattedEntry], path: P) -> OutputResult<()> {
        match self {
            OutputFormat::Ics => write_ics(entries, path),
            OutputFormat::Markdown => write_markdown(entries, path),
            OutputFormat::Csv => write_csv(entries, path),
        }
    }
}

/// Opens `path` for writing, failing if anything already lives there.
pub(crate) fn create_output(path: &Path) -> OutputResult<BufWriter<File>> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => OutputError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => OutputError::io(path, source),
        })?;
    Ok(BufWriter::new(file))
}
