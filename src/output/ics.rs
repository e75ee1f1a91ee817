use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::{create_output, OutputError, OutputResult};
use crate::plan::FormattedEntry;

const PRODUCT_ID: &str = "-//liturgical-index//lti//EN";
const MAX_LINE_OCTETS: usize = 75;

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Folds a content line to 75 octets, continuation lines start with a space.
fn fold_line(line: &str, out: &mut String) {
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out.push_str("\r\n");
}

fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn event_uid(entry: &FormattedEntry) -> String {
    format!(
        "{}-{}-{}",
        entry.key.season().key(),
        entry.key.season_week(),
        compact_date(entry.key.date())
    )
}

fn event_description(entry: &FormattedEntry) -> String {
    let mut description = format!("{}\n\nRB references:\n", entry.cue);
    for reference in &entry.rb {
        description.push_str(&format!("- {reference}\n"));
    }
    description
}

fn render_calendar(entries: &[FormattedEntry], stamp: NaiveDateTime) -> String {
    let stamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut out = String::new();

    fold_line("BEGIN:VCALENDAR", &mut out);
    fold_line("VERSION:2.0", &mut out);
    fold_line(&format!("PRODID:{PRODUCT_ID}"), &mut out);
    fold_line("CALSCALE:GREGORIAN", &mut out);
    fold_line("METHOD:PUBLISH", &mut out);

    for entry in entries {
        let date = entry.key.date();
        // All-day events end on the following day (exclusive).
        let end = date.succ_opt().unwrap_or(date);

        fold_line("BEGIN:VEVENT", &mut out);
        fold_line(&format!("UID:{}", event_uid(entry)), &mut out);
        fold_line(&format!("DTSTAMP:{stamp}"), &mut out);
        fold_line(&format!("DTSTART;VALUE=DATE:{}", compact_date(date)), &mut out);
        fold_line(&format!("DTEND;VALUE=DATE:{}", compact_date(end)), &mut out);
        fold_line(&format!("SUMMARY:{}", escape_text(&entry.cue)), &mut out);
        fold_line(
            &format!("DESCRIPTION:{}", escape_text(&event_description(entry))),
            &mut out,
        );
        fold_line("END:VEVENT", &mut out);
    }

    fold_line("END:VCALENDAR", &mut out);
    out
}

/// Writes one all-day event per entry as an iCalendar file.
pub fn write_ics<P: AsRef<Path>>(entries: &[FormattedEntry], path: P) -> OutputResult<()> {
    let path = path.as_ref();
    let mut writer = create_output(path)?;
    let calendar = render_calendar(entries, Utc::now().naive_utc());
    writer
        .write_all(calendar.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|source| OutputError::io(path, source))?;
    info!(path = %path.display(), events = entries.len(), "wrote iCalendar file");
    Ok(())
}
