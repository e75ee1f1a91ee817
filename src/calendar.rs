use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::calculations::easter::{MovableFeasts, first_sunday_of_advent};
use crate::day::{DayKey, Season, Tradition, Weekday};

/// Calendar-exchange date format used at every boundary of the engine.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarErrorKind {
    ParseDate,
    UnsupportedTradition,
    Validation,
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("failed to parse date '{input}' (expected YYYY-MM-DD)")]
    ParseDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("unsupported calendar tradition '{0}'")]
    UnsupportedTradition(String),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl CalendarError {
    pub fn kind(&self) -> CalendarErrorKind {
        match self {
            CalendarError::ParseDate { .. } => CalendarErrorKind::ParseDate,
            CalendarError::UnsupportedTradition(_) => CalendarErrorKind::UnsupportedTradition,
            CalendarError::Validation(_) => CalendarErrorKind::Validation,
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Named movable feasts reported by [`LiturgicalCalendar::holidays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Holiday {
    AshWednesday,
    HolyThursday,
    GoodFriday,
    EasterSunday,
    EasterMonday,
    Pentecost,
}

impl Holiday {
    pub const ALL: [Holiday; 6] = [
        Holiday::AshWednesday,
        Holiday::HolyThursday,
        Holiday::GoodFriday,
        Holiday::EasterSunday,
        Holiday::EasterMonday,
        Holiday::Pentecost,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Holiday::AshWednesday => "Ash Wednesday",
            Holiday::HolyThursday => "Holy Thursday",
            Holiday::GoodFriday => "Good Friday",
            Holiday::EasterSunday => "Easter Sunday",
            Holiday::EasterMonday => "Easter Monday",
            Holiday::Pentecost => "Pentecost",
        }
    }

    fn date_in(&self, feasts: &MovableFeasts) -> NaiveDate {
        match self {
            Holiday::AshWednesday => feasts.ash_wednesday,
            Holiday::HolyThursday => feasts.holy_thursday,
            Holiday::GoodFriday => feasts.good_friday,
            Holiday::EasterSunday => feasts.easter_sunday,
            Holiday::EasterMonday => feasts.easter_monday,
            Holiday::Pentecost => feasts.pentecost,
        }
    }
}

pub fn parse_date(input: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| CalendarError::ParseDate {
        input: input.to_string(),
        source,
    })
}

pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday().into()
}

/// Season containing `date`, decided month by month.
pub fn classify_season(date: NaiveDate) -> CalendarResult<Season> {
    let feasts = MovableFeasts::for_year(date.year())?;
    let day = date.day();

    let season = match date.month() {
        11 => {
            if date >= first_sunday_of_advent(date.year())? {
                Season::Advent
            } else {
                Season::Ordinary
            }
        }
        12 => {
            if day >= 25 {
                Season::Christmastide
            } else if date >= first_sunday_of_advent(date.year())? {
                Season::Advent
            } else {
                // Advent can open as late as December 3
                Season::Ordinary
            }
        }
        1 => {
            if day < 6 {
                Season::Christmastide
            } else {
                Season::Epiphanytide
            }
        }
        2 => {
            if feasts.ash_wednesday.month() == 2 && date >= feasts.ash_wednesday {
                Season::Lent
            } else {
                Season::Epiphanytide
            }
        }
        // Pentecost falls as late as June 13
        3..=6 => {
            if date < feasts.ash_wednesday {
                Season::Epiphanytide
            } else if date < feasts.holy_thursday {
                Season::Lent
            } else if date < feasts.easter_sunday {
                Season::Triduum
            } else if date <= feasts.pentecost {
                Season::Eastertide
            } else {
                Season::Ordinary
            }
        }
        _ => Season::Ordinary,
    };
    Ok(season)
}

/// First day of the instance of `season` that contains `date`.
///
/// Ordinary Time always starts the day after Pentecost of `date`'s year,
/// so a date in the weeks before Lent resolves to a start after itself.
pub fn season_start_date(date: NaiveDate, season: Season) -> CalendarResult<NaiveDate> {
    let year = date.year();
    let fixed = |month: u32, day: u32, year: i32| {
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            CalendarError::Validation(format!("year {year} is outside the supported date range"))
        })
    };

    match season {
        Season::Advent => first_sunday_of_advent(year),
        Season::Christmastide => {
            if date.month() == 12 {
                fixed(12, 25, year)
            } else {
                fixed(12, 25, year - 1)
            }
        }
        Season::Epiphanytide => fixed(1, 6, year),
        Season::Lent => Ok(MovableFeasts::for_year(year)?.ash_wednesday),
        Season::Triduum => Ok(MovableFeasts::for_year(year)?.holy_thursday),
        Season::Eastertide => Ok(MovableFeasts::for_year(year)?.easter_sunday),
        Season::Ordinary => Ok(MovableFeasts::for_year(year)?.pentecost + Duration::days(1)),
    }
}

pub fn season_week(date: NaiveDate, season: Season) -> CalendarResult<u32> {
    let start = season_start_date(date, season)?;
    let days = (date - start).num_days();
    if days < 0 {
        return Err(CalendarError::Validation(format!(
            "date {date} is before the start of {} ({start})",
            season.label()
        )));
    }
    let week = 1 + days / 7;
    u32::try_from(week)
        .map_err(|_| CalendarError::Validation(format!("season week {week} is out of range")))
}

/// Classifies a `YYYY-MM-DD` date string under the named tradition.
pub fn classify_day(date: &str, tradition: &str) -> CalendarResult<DayKey> {
    let tradition: Tradition = tradition.parse()?;
    let date = parse_date(date)?;
    LiturgicalCalendar::new(tradition).classify(date)
}

/// Every day of `year` under the named tradition, in date order.
pub fn year_calendar(year: i32, tradition: &str) -> CalendarResult<Vec<DayKey>> {
    LiturgicalCalendar::for_tradition(tradition)?.year_calendar(year)
}

pub fn holidays(year: i32, tradition: &str) -> CalendarResult<BTreeMap<Holiday, DayKey>> {
    LiturgicalCalendar::for_tradition(tradition)?.holidays(year)
}

/// Liturgical calendar engine for one tradition.
///
/// Holds no state beyond the tradition; every query is computed from the
/// date alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiturgicalCalendar {
    tradition: Tradition,
}

impl Default for LiturgicalCalendar {
    fn default() -> Self {
        Self::new(Tradition::Roman)
    }
}

impl LiturgicalCalendar {
    pub fn new(tradition: Tradition) -> Self {
        Self { tradition }
    }

    pub fn for_tradition(name: &str) -> CalendarResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn tradition(&self) -> Tradition {
        self.tradition
    }

    pub fn classify(&self, date: NaiveDate) -> CalendarResult<DayKey> {
        match self.tradition {
            Tradition::Roman => {
                let season = classify_season(date)?;
                let week = season_week(date, season)?;
                DayKey::new(date, self.tradition, season, week, weekday_of(date))
            }
        }
    }

    pub fn classify_str(&self, date: &str) -> CalendarResult<DayKey> {
        self.classify(parse_date(date)?)
    }

    /// Every calendar date of `year`, in order.
    pub fn days_of_year(year: i32) -> CalendarResult<impl Iterator<Item = NaiveDate>> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
            CalendarError::Validation(format!("year {year} is outside the supported date range"))
        })?;
        Ok(first.iter_days().take_while(move |date| date.year() == year))
    }

    pub fn year_calendar(&self, year: i32) -> CalendarResult<Vec<DayKey>> {
        debug!(year, tradition = %self.tradition, "enumerating liturgical year");
        let days = Self::days_of_year(year)?
            .map(|date| self.classify(date))
            .collect::<CalendarResult<Vec<_>>>()?;
        debug!(year, days = days.len(), "liturgical year enumerated");
        Ok(days)
    }

    pub fn holidays(&self, year: i32) -> CalendarResult<BTreeMap<Holiday, DayKey>> {
        let feasts = MovableFeasts::for_year(year)?;
        let mut holidays = BTreeMap::new();
        for holiday in Holiday::ALL {
            holidays.insert(holiday, self.classify(holiday.date_in(&feasts))?);
        }
        Ok(holidays)
    }
}
