use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::{create_output, OutputError, OutputResult};
use crate::calendar::DATE_FORMAT;
use crate::plan::FormattedEntry;

#[derive(Serialize)]
struct EntryCsvRecord {
    date: String,
    season: String,
    season_week: u32,
    weekday: String,
    cue: String,
    references: String,
    tags: String,
}

impl From<&FormattedEntry> for EntryCsvRecord {
    fn from(entry: &FormattedEntry) -> Self {
        Self {
            date: entry.key.date().format(DATE_FORMAT).to_string(),
            season: entry.key.season().label().to_string(),
            season_week: entry.key.season_week(),
            weekday: entry.key.weekday().label().to_string(),
            cue: entry.cue.clone(),
            references: entry.rendered_references().join("; "),
            tags: entry.tags.as_deref().unwrap_or_default().join(";"),
        }
    }
}

/// Writes one row per entry with a header line.
pub fn write_csv<P: AsRef<Path>>(entries: &[FormattedEntry], path: P) -> OutputResult<()> {
    let path = path.as_ref();
    let mut writer = ::csv::Writer::from_writer(create_output(path)?);
    for entry in entries {
        writer.serialize(EntryCsvRecord::from(entry))?;
    }
    writer
        .flush()
        .map_err(|source| OutputError::io(path, source))?;
    info!(path = %path.display(), rows = entries.len(), "wrote CSV file");
    Ok(())
}
