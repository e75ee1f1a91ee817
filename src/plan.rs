use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::day::{DayKey, Season, Weekday};
use crate::reference::{RbRef, ReferenceError, ReferenceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanErrorKind {
    Read,
    Write,
    Parse,
    InvalidEntry,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write plan file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse plan as YAML")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse plan as JSON")]
    Json(#[from] serde_json::Error),
    #[error("unsupported plan file extension for {} (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("invalid plan entry: {message}")]
    InvalidEntry {
        message: String,
        #[source]
        source: Option<ReferenceError>,
    },
}

impl PlanError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlanError::InvalidEntry {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> PlanErrorKind {
        match self {
            PlanError::Read { .. } => PlanErrorKind::Read,
            PlanError::Write { .. } => PlanErrorKind::Write,
            PlanError::Yaml(_) | PlanError::Json(_) | PlanError::UnsupportedFormat { .. } => {
                PlanErrorKind::Parse
            }
            PlanError::InvalidEntry { .. } => PlanErrorKind::InvalidEntry,
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

/// One rule of the table: a cue and the references to read with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub cue: String,
    #[serde(default)]
    pub rb: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl PlanEntry {
    pub fn new<I, S>(cue: impl Into<String>, rb: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cue: cue.into(),
            rb: rb.into_iter().map(Into::into).collect(),
            tags: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Parses every reference string, stopping at the first failure.
    pub fn parse_references(&self) -> ReferenceResult<Vec<RbRef>> {
        self.rb.iter().map(|raw| RbRef::parse(raw)).collect()
    }

    /// Expands this entry for `key`. No partial entry is produced.
    pub fn expand(&self, key: &DayKey) -> ReferenceResult<FormattedEntry> {
        Ok(FormattedEntry {
            key: key.clone(),
            cue: self.cue.clone(),
            rb: self.parse_references()?,
            tags: self.tags.clone(),
        })
    }
}

/// Rules for one season: per-weekday entries plus an optional fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonPlan {
    weekdays: BTreeMap<Weekday, PlanEntry>,
    fallback: Option<PlanEntry>,
}

impl SeasonPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekday(mut self, weekday: Weekday, entry: PlanEntry) -> Self {
        self.weekdays.insert(weekday, entry);
        self
    }

    pub fn with_fallback(mut self, entry: PlanEntry) -> Self {
        self.fallback = Some(entry);
        self
    }

    pub fn weekday(&self, weekday: Weekday) -> Option<&PlanEntry> {
        self.weekdays.get(&weekday)
    }

    pub fn weekdays(&self) -> &BTreeMap<Weekday, PlanEntry> {
        &self.weekdays
    }

    pub fn fallback(&self) -> Option<&PlanEntry> {
        self.fallback.as_ref()
    }
}

/// Descriptive fields carried by a plan document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub work: String,
    #[serde(default)]
    pub witness: String,
}

/// The rule table consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    metadata: PlanMetadata,
    defaults: PlanEntry,
    seasons: BTreeMap<Season, SeasonPlan>,
}

impl Plan {
    pub fn new(defaults: PlanEntry) -> Self {
        Self {
            metadata: PlanMetadata::default(),
            defaults,
            seasons: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: PlanMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_season(mut self, season: Season, plan: SeasonPlan) -> Self {
        self.seasons.insert(season, plan);
        self
    }

    pub fn metadata(&self) -> &PlanMetadata {
        &self.metadata
    }

    pub fn defaults(&self) -> &PlanEntry {
        &self.defaults
    }

    pub fn season(&self, season: Season) -> Option<&SeasonPlan> {
        self.seasons.get(&season)
    }

    pub fn seasons(&self) -> &BTreeMap<Season, SeasonPlan> {
        &self.seasons
    }
}

/// A resolved day: its classification plus the expanded rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedEntry {
    pub key: DayKey,
    pub cue: String,
    pub rb: Vec<RbRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl FormattedEntry {
    pub fn rendered_references(&self) -> Vec<String> {
        self.rb.iter().map(ToString::to_string).collect()
    }
}
