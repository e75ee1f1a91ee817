use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::calendar::{CalendarError, CalendarResult};

/// Offsets of the movable feasts from Easter Sunday, in days.
pub const ASH_WEDNESDAY_OFFSET: i64 = -46;
pub const HOLY_THURSDAY_OFFSET: i64 = -3;
pub const GOOD_FRIDAY_OFFSET: i64 = -2;
pub const EASTER_MONDAY_OFFSET: i64 = 1;
pub const PENTECOST_OFFSET: i64 = 49;

/// First year computed with the Gregorian rule.
const GREGORIAN_REFORM_YEAR: i32 = 1583;

/// Date of Easter Sunday for `year`.
///
/// Years from 1583 on use Butcher's Gregorian algorithm; earlier years use
/// the Julian computus. Both produce a day count `r` starting at March 1,
/// so `r > 31` lands in April. The Julian count is laid on the proleptic
/// Gregorian calendar as is, so pre-1583 dates need not fall on a Sunday.
pub fn compute_easter(year: i32) -> CalendarResult<NaiveDate> {
    let a = year.rem_euclid(19);
    let r = if year >= GREGORIAN_REFORM_YEAR {
        let b = year / 100;
        let c = year % 100;
        let d = b / 4;
        let e = b % 4;
        let f = (b + 8) / 25;
        let g = (b - f + 1) / 3;
        let h = (19 * a + b - d - g + 15) % 30;
        let i = c / 4;
        let k = c % 4;
        let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
        let m = (a + 11 * h + 22 * l) / 451;
        22 + h + l - 7 * m
    } else {
        let b = year.rem_euclid(7);
        let c = year.rem_euclid(4);
        let d = (19 * a + 15) % 30;
        let e = (2 * c + 4 * b - d + 34).rem_euclid(7);
        22 + d + e
    };

    let march_first = NaiveDate::from_ymd_opt(year, 3, 1).ok_or_else(|| {
        CalendarError::Validation(format!("year {year} is outside the supported date range"))
    })?;
    Ok(march_first + Duration::days(i64::from(r - 1)))
}

/// The movable feasts of one year, all derived from Easter Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovableFeasts {
    pub ash_wednesday: NaiveDate,
    pub holy_thursday: NaiveDate,
    pub good_friday: NaiveDate,
    pub easter_sunday: NaiveDate,
    pub easter_monday: NaiveDate,
    pub pentecost: NaiveDate,
}

impl MovableFeasts {
    pub fn for_year(year: i32) -> CalendarResult<Self> {
        let easter = compute_easter(year)?;
        Ok(Self {
            ash_wednesday: easter + Duration::days(ASH_WEDNESDAY_OFFSET),
            holy_thursday: easter + Duration::days(HOLY_THURSDAY_OFFSET),
            good_friday: easter + Duration::days(GOOD_FRIDAY_OFFSET),
            easter_sunday: easter,
            easter_monday: easter + Duration::days(EASTER_MONDAY_OFFSET),
            pentecost: easter + Duration::days(PENTECOST_OFFSET),
        })
    }
}

/// The Sunday on or after November 27, which opens Advent.
pub fn first_sunday_of_advent(year: i32) -> CalendarResult<NaiveDate> {
    let nov27 = NaiveDate::from_ymd_opt(year, 11, 27).ok_or_else(|| {
        CalendarError::Validation(format!("year {year} is outside the supported date range"))
    })?;
    let ahead = (7 - nov27.weekday().num_days_from_sunday()) % 7;
    let sunday = nov27 + Duration::days(i64::from(ahead));
    debug_assert_eq!(sunday.weekday(), Weekday::Sun);
    Ok(sunday)
}
