use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical separator for verse ranges in rendered references.
pub const EN_DASH: char = '–';
const EM_DASH: char = '—';

/// Chapters in the Rule, not counting the prologue.
pub const CHAPTER_COUNT: u8 = 73;

const WORK_PREFIX: &str = "RB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceErrorKind {
    Parse,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("failed to parse RB reference '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("RB reference '{input}' failed validation: {reason}")]
    Validation { input: String, reason: String },
}

impl ReferenceError {
    fn parse(input: &str, reason: impl Into<String>) -> Self {
        ReferenceError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    fn validation(input: &str, reason: impl Into<String>) -> Self {
        ReferenceError::Validation {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ReferenceErrorKind {
        match self {
            ReferenceError::Parse { .. } => ReferenceErrorKind::Parse,
            ReferenceError::Validation { .. } => ReferenceErrorKind::Validation,
        }
    }

    /// The reference string that was rejected.
    pub fn input(&self) -> &str {
        match self {
            ReferenceError::Parse { input, .. } | ReferenceError::Validation { input, .. } => input,
        }
    }
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RbKind {
    Prologue,
    Chapter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RbSection {
    Prologue,
    Chapter(u8),
}

/// Inclusive verse range; `end` is `None` for a single verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseRange {
    start: u32,
    end: Option<u32>,
}

impl VerseRange {
    /// Builds a range, collapsing `end == start` to a single verse.
    pub fn new(start: u32, end: Option<u32>) -> Result<Self, String> {
        if start < 1 {
            return Err("start verse must be at least 1".to_string());
        }
        match end {
            Some(end) if end < start => Err(format!(
                "end verse {end} cannot be less than start verse {start}"
            )),
            Some(end) if end == start => Ok(Self { start, end: None }),
            end => Ok(Self { start, end }),
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> Option<u32> {
        self.end
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}{}{}", self.start, EN_DASH, end),
            None => write!(f, "{}", self.start),
        }
    }
}

/// A citation into the Rule of Benedict: the prologue or a chapter,
/// optionally narrowed to verses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RbRef {
    section: RbSection,
    verses: Option<VerseRange>,
}

impl RbRef {
    pub fn parse(input: &str) -> ReferenceResult<Self> {
        let parts: Vec<&str> = input.split(' ').collect();
        if parts.len() < 2 || parts[0] != WORK_PREFIX {
            return Err(ReferenceError::parse(input, "expected 'RB' followed by a section"));
        }

        match parts.as_slice() {
            [_, section] => {
                if section.starts_with("Prol") {
                    return Err(ReferenceError::parse(
                        input,
                        "prologue references must include a verse range",
                    ));
                }
                Self::parse_chapter(input, section)
            }
            [_, marker, verses] => {
                if *marker != "Prol." && *marker != "Prol" {
                    return Err(ReferenceError::parse(input, "expected 'Prol.' before verses"));
                }
                let verses = parse_verse_range(input, verses)?;
                Ok(Self {
                    section: RbSection::Prologue,
                    verses: Some(verses),
                })
            }
            _ => Err(ReferenceError::parse(input, "too many space-separated parts")),
        }
    }

    fn parse_chapter(input: &str, token: &str) -> ReferenceResult<Self> {
        let segments: Vec<&str> = token.split('.').collect();
        let (chapter, verses) = match segments.as_slice() {
            [chapter] => (*chapter, None),
            [chapter, verses] => (*chapter, Some(*verses)),
            _ => {
                return Err(ReferenceError::parse(
                    input,
                    "chapter references take the form <chapter>[.<verses>]",
                ));
            }
        };

        let chapter = parse_positive(input, chapter)?;
        if chapter > u32::from(CHAPTER_COUNT) {
            return Err(ReferenceError::validation(
                input,
                format!("chapter must be between 1 and {CHAPTER_COUNT}"),
            ));
        }
        let verses = verses
            .map(|token| parse_verse_range(input, token))
            .transpose()?;

        Ok(Self {
            // bounded by CHAPTER_COUNT above
            section: RbSection::Chapter(chapter as u8),
            verses,
        })
    }

    pub fn section(&self) -> RbSection {
        self.section
    }

    pub fn kind(&self) -> RbKind {
        match self.section {
            RbSection::Prologue => RbKind::Prologue,
            RbSection::Chapter(_) => RbKind::Chapter,
        }
    }

    pub fn chapter(&self) -> Option<u8> {
        match self.section {
            RbSection::Prologue => None,
            RbSection::Chapter(number) => Some(number),
        }
    }

    pub fn verses(&self) -> Option<VerseRange> {
        self.verses
    }
}

fn parse_verse_range(input: &str, token: &str) -> ReferenceResult<VerseRange> {
    let normalized: String = token
        .chars()
        .map(|c| if c == '-' || c == EM_DASH { EN_DASH } else { c })
        .collect();
    let bounds: Vec<&str> = normalized.split(EN_DASH).collect();

    let (start, end) = match bounds.as_slice() {
        [start] => (parse_positive(input, start)?, None),
        [start, end] => (parse_positive(input, start)?, Some(parse_positive(input, end)?)),
        _ => {
            return Err(ReferenceError::parse(
                input,
                format!("invalid verse range '{token}'"),
            ));
        }
    };

    VerseRange::new(start, end).map_err(|reason| ReferenceError::validation(input, reason))
}

fn parse_positive(input: &str, token: &str) -> ReferenceResult<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReferenceError::parse(
            input,
            format!("'{token}' is not a number"),
        ));
    }
    let value: u32 = token
        .parse()
        .map_err(|_| ReferenceError::parse(input, format!("'{token}' is out of range")))?;
    if value == 0 {
        return Err(ReferenceError::validation(
            input,
            format!("'{token}' must be at least 1"),
        ));
    }
    Ok(value)
}

impl fmt::Display for RbRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.section, self.verses) {
            (RbSection::Prologue, Some(verses)) => write!(f, "{WORK_PREFIX} Prol. {verses}"),
            // unreachable through the parser, kept total for Display
            (RbSection::Prologue, None) => write!(f, "{WORK_PREFIX} Prol."),
            (RbSection::Chapter(chapter), Some(verses)) => {
                write!(f, "{WORK_PREFIX} {chapter}.{verses}")
            }
            (RbSection::Chapter(chapter), None) => write!(f, "{WORK_PREFIX} {chapter}"),
        }
    }
}

impl FromStr for RbRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RbRef {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RbRef> for String {
    fn from(value: RbRef) -> Self {
        value.to_string()
    }
}
