use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;
use tracing::trace;

use crate::day::{DayKey, Season, Weekday};
use crate::plan::{FormattedEntry, Plan, PlanEntry};
use crate::reference::ReferenceError;

/// Which rule of the table produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSource {
    Weekday(Season, Weekday),
    Fallback(Season),
    Defaults,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Weekday(season, weekday) => {
                write!(f, "season {} weekday {}", season.key(), weekday.key())
            }
            RuleSource::Fallback(season) => write!(f, "season {} fallback", season.key()),
            RuleSource::Defaults => f.write_str("defaults"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    InvalidEntry,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to expand {rule} for {date}")]
    InvalidEntry {
        date: NaiveDate,
        rule: RuleSource,
        #[source]
        source: ReferenceError,
    },
}

impl CompileError {
    pub fn kind(&self) -> CompileErrorKind {
        match self {
            CompileError::InvalidEntry { .. } => CompileErrorKind::InvalidEntry,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Picks the rule that applies to `key`: the season's weekday entry, then
/// its fallback, then the plan defaults.
pub fn matching_rule<'a>(key: &DayKey, plan: &'a Plan) -> (RuleSource, &'a PlanEntry) {
    let season = key.season();
    let Some(season_plan) = plan.season(season) else {
        return (RuleSource::Defaults, plan.defaults());
    };

    if let Some(entry) = season_plan.weekday(key.weekday()) {
        return (RuleSource::Weekday(season, key.weekday()), entry);
    }
    if let Some(fallback) = season_plan.fallback() {
        return (RuleSource::Fallback(season), fallback);
    }
    (RuleSource::Defaults, plan.defaults())
}

pub fn resolve_with_source(key: &DayKey, plan: &Plan) -> CompileResult<(RuleSource, FormattedEntry)> {
    let (rule, entry) = matching_rule(key, plan);
    trace!(date = %key.date(), %rule, "resolved plan rule");
    let formatted = entry
        .expand(key)
        .map_err(|source| CompileError::InvalidEntry {
            date: key.date(),
            rule,
            source,
        })?;
    Ok((rule, formatted))
}

pub fn resolve(key: &DayKey, plan: &Plan) -> CompileResult<FormattedEntry> {
    resolve_with_source(key, plan).map(|(_, entry)| entry)
}
