use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use crate::calendar::{CalendarError, LiturgicalCalendar};
use crate::compile::{resolve_with_source, CompileError, RuleSource};
use crate::day::{Season, Tradition};
use crate::output::OutputError;
use crate::plan::{FormattedEntry, Plan, PlanError};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("unknown index scope '{0}' (expected 'annual' or a season key)")]
    InvalidScope(String),
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Which days of a year a build covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexScope {
    #[default]
    Annual,
    Season(Season),
}

impl IndexScope {
    pub fn includes(&self, season: Season) -> bool {
        match self {
            IndexScope::Annual => true,
            IndexScope::Season(scoped) => *scoped == season,
        }
    }
}

impl fmt::Display for IndexScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexScope::Annual => f.write_str("annual"),
            IndexScope::Season(season) => f.write_str(season.key()),
        }
    }
}

impl FromStr for IndexScope {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if key == "annual" {
            return Ok(IndexScope::Annual);
        }
        Season::from_key(&key)
            .map(IndexScope::Season)
            .ok_or_else(|| IndexError::InvalidScope(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub year: i32,
    pub scope: IndexScope,
    pub entry_count: usize,
    pub per_season: BTreeMap<Season, usize>,
    pub weekday_rules: usize,
    pub fallback_rules: usize,
    pub default_rules: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl BuildSummary {
    fn record(&mut self, rule: RuleSource, entry: &FormattedEntry) {
        let date = entry.key.date();
        self.entry_count += 1;
        *self.per_season.entry(entry.key.season()).or_default() += 1;
        match rule {
            RuleSource::Weekday(..) => self.weekday_rules += 1,
            RuleSource::Fallback(_) => self.fallback_rules += 1,
            RuleSource::Defaults => self.default_rules += 1,
        }
        self.first_date = Some(self.first_date.map_or(date, |first| first.min(date)));
        self.last_date = Some(self.last_date.map_or(date, |last| last.max(date)));
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("year={}", self.year));
        parts.push(format!("scope={}", self.scope));
        parts.push(format!("entries={}", self.entry_count));
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            parts.push(format!("range={first}..{last}"));
        }
        parts.push(format!("weekday={}", self.weekday_rules));
        parts.push(format!("fallback={}", self.fallback_rules));
        parts.push(format!("defaults={}", self.default_rules));
        if !self.per_season.is_empty() {
            let seasons = self
                .per_season
                .iter()
                .map(|(season, count)| format!("{}:{count}", season.key()))
                .collect::<Vec<_>>()
                .join(" ");
            parts.push(format!("seasons=[{seasons}]"));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuild {
    pub entries: Vec<FormattedEntry>,
    pub summary: BuildSummary,
}

/// Pairs a calendar with a validated plan and resolves days against it.
#[derive(Debug, Clone)]
pub struct LiturgicalIndex {
    calendar: LiturgicalCalendar,
    plan: Plan,
}

impl LiturgicalIndex {
    pub fn new(tradition: Tradition, plan: Plan) -> Self {
        Self {
            calendar: LiturgicalCalendar::new(tradition),
            plan,
        }
    }

    pub fn calendar(&self) -> &LiturgicalCalendar {
        &self.calendar
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn entry_for(&self, date: NaiveDate) -> IndexResult<FormattedEntry> {
        let key = self.calendar.classify(date)?;
        let (_, entry) = resolve_with_source(&key, &self.plan)?;
        Ok(entry)
    }

    /// Resolves every day of `year` that falls inside `scope`, in date order.
    pub fn build(&self, year: i32, scope: IndexScope) -> IndexResult<IndexBuild> {
        let mut summary = BuildSummary {
            year,
            scope,
            ..BuildSummary::default()
        };
        let mut entries = Vec::new();

        for key in self.calendar.year_calendar(year)? {
            if !scope.includes(key.season()) {
                continue;
            }
            let (rule, entry) = resolve_with_source(&key, &self.plan)?;
            summary.record(rule, &entry);
            entries.push(entry);
        }

        debug!(year, %scope, entries = entries.len(), "resolved index entries");
        info!(summary = %summary.to_cli_summary(), "index built");
        Ok(IndexBuild { entries, summary })
    }
}
