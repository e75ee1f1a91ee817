use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{CalendarError, CalendarResult};

/// Calendar traditions the engine knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tradition {
    Roman,
}

impl Tradition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tradition::Roman => "roman",
        }
    }
}

impl fmt::Display for Tradition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tradition {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roman" => Ok(Tradition::Roman),
            _ => Err(CalendarError::UnsupportedTradition(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Advent,
    Christmastide,
    Epiphanytide,
    Lent,
    Triduum,
    Eastertide,
    Ordinary,
}

impl Season {
    pub const ALL: [Season; 7] = [
        Season::Advent,
        Season::Christmastide,
        Season::Epiphanytide,
        Season::Lent,
        Season::Triduum,
        Season::Eastertide,
        Season::Ordinary,
    ];

    /// Key used in plan documents and event identifiers.
    pub fn key(&self) -> &'static str {
        match self {
            Season::Advent => "advent",
            Season::Christmastide => "christmastide",
            Season::Epiphanytide => "epiphanytide",
            Season::Lent => "lent",
            Season::Triduum => "triduum",
            Season::Eastertide => "eastertide",
            Season::Ordinary => "ordinary",
        }
    }

    /// Human-readable name written by the output formats.
    pub fn label(&self) -> &'static str {
        match self {
            Season::Advent => "Advent",
            Season::Christmastide => "Christmastide",
            Season::Epiphanytide => "Epiphanytide",
            Season::Lent => "Lent",
            Season::Triduum => "Paschal Triduum",
            Season::Eastertide => "Eastertide",
            Season::Ordinary => "Ordinary Time",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|season| season.key() == key)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "sun")]
    Sunday,
    #[serde(rename = "mon")]
    Monday,
    #[serde(rename = "tue")]
    Tuesday,
    #[serde(rename = "wed")]
    Wednesday,
    #[serde(rename = "thu")]
    Thursday,
    #[serde(rename = "fri")]
    Friday,
    #[serde(rename = "sat")]
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Weekday::Sunday => "sun",
            Weekday::Monday => "mon",
            Weekday::Tuesday => "tue",
            Weekday::Wednesday => "wed",
            Weekday::Thursday => "thu",
            Weekday::Friday => "fri",
            Weekday::Saturday => "sat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|weekday| weekday.key() == key)
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Liturgical classification of a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayKey {
    date: NaiveDate,
    tradition: Tradition,
    season: Season,
    season_week: u32,
    weekday: Weekday,
}

impl DayKey {
    pub fn new(
        date: NaiveDate,
        tradition: Tradition,
        season: Season,
        season_week: u32,
        weekday: Weekday,
    ) -> CalendarResult<Self> {
        if season_week < 1 {
            return Err(CalendarError::Validation(format!(
                "season week for {date} must be at least 1 (got {season_week})"
            )));
        }
        Ok(Self {
            date,
            tradition,
            season,
            season_week,
            weekday,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tradition(&self) -> Tradition {
        self.tradition
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn season_week(&self) -> u32 {
        self.season_week
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}
