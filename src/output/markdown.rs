use std::io::Write;
use std::path::Path;
use tracing::info;

use super::{create_output, OutputError, OutputResult};
use crate::calendar::DATE_FORMAT;
use crate::plan::FormattedEntry;

const HEADER: [&str; 6] = [
    "Date",
    "Season",
    "Season Week",
    "Weekday",
    "Cue",
    "RB References",
];

fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn row(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

fn render_table(entries: &[FormattedEntry]) -> String {
    let mut out = row(&HEADER.map(String::from));
    out.push_str(&row(&HEADER.map(|_| "---".to_string())));

    for entry in entries {
        let cells = [
            entry.key.date().format(DATE_FORMAT).to_string(),
            entry.key.season().label().to_string(),
            entry.key.season_week().to_string(),
            entry.key.weekday().label().to_string(),
            cell(&entry.cue),
            cell(&entry.rendered_references().join("; ")),
        ];
        out.push_str(&row(&cells));
    }
    out
}

/// Writes the entries as a single Markdown table.
pub fn write_markdown<P: AsRef<Path>>(entries: &[FormattedEntry], path: P) -> OutputResult<()> {
    let path = path.as_ref();
    let mut writer = create_output(path)?;
    writer
        .write_all(render_table(entries).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|source| OutputError::io(path, source))?;
    info!(path = %path.display(), rows = entries.len(), "wrote Markdown table");
    Ok(())
}
