use std::collections::BTreeSet;

use crate::day::{Season, Weekday};
use crate::plan::{Plan, PlanEntry, PlanError, PlanResult, SeasonPlan};

fn validate_entry(entry: &PlanEntry, context: &str) -> PlanResult<()> {
    entry
        .parse_references()
        .map(|_| ())
        .map_err(|err| PlanError::InvalidEntry {
            message: format!("{context}: {err}"),
            source: Some(err),
        })
}

pub fn validate_season_plan(season: Season, plan: &SeasonPlan) -> PlanResult<()> {
    let covered = plan.weekdays().len();
    if covered == 0 && plan.fallback().is_none() {
        return Err(PlanError::invalid(format!(
            "season {} must have at least one weekday entry or a fallback",
            season.key()
        )));
    }
    if covered < Weekday::ALL.len() && plan.fallback().is_none() {
        return Err(PlanError::invalid(format!(
            "season {} must have a fallback if it does not cover all 7 weekdays",
            season.key()
        )));
    }

    for (weekday, entry) in plan.weekdays() {
        validate_entry(
            entry,
            &format!("season {} weekday {}", season.key(), weekday.key()),
        )?;
    }
    if let Some(fallback) = plan.fallback() {
        validate_entry(fallback, &format!("season {} fallback", season.key()))?;
    }
    Ok(())
}

/// Checks the whole table: defaults, every season's coverage and every
/// reference string.
pub fn validate_plan(plan: &Plan) -> PlanResult<()> {
    validate_entry(plan.defaults(), "defaults")?;
    for (season, season_plan) in plan.seasons() {
        validate_season_plan(*season, season_plan)?;
    }
    Ok(())
}

/// Builds a typed season plan from document entries, rejecting unknown
/// keys and weekdays listed twice.
pub(crate) fn season_plan_from_entries(
    season_key: &str,
    weekdays: Vec<(String, PlanEntry)>,
    fallback: Option<PlanEntry>,
) -> PlanResult<(Season, SeasonPlan)> {
    let season = Season::from_key(season_key)
        .ok_or_else(|| PlanError::invalid(format!("invalid season name: {season_key}")))?;

    if weekdays.len() > Weekday::ALL.len() {
        return Err(PlanError::invalid(format!(
            "season {season_key} cannot have more than 7 weekday entries"
        )));
    }

    let mut plan = SeasonPlan::new();
    let mut seen = BTreeSet::new();
    for (weekday_key, entry) in weekdays {
        let weekday = Weekday::from_key(&weekday_key).ok_or_else(|| {
            PlanError::invalid(format!(
                "invalid weekday '{weekday_key}' in season {season_key}"
            ))
        })?;
        if !seen.insert(weekday) {
            return Err(PlanError::invalid(format!(
                "duplicate weekday {weekday_key} in season {season_key}"
            )));
        }
        plan = plan.with_weekday(weekday, entry);
    }
    if let Some(fallback) = fallback {
        plan = plan.with_fallback(fallback);
    }

    validate_season_plan(season, &plan)?;
    Ok((season, plan))
}
