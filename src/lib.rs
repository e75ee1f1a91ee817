pub mod calculations;
pub mod calendar;
pub mod compile;
pub mod day;
pub mod index;
pub mod output;
pub mod persistence;
pub mod plan;
pub mod plan_validation;
pub mod reference;

pub use calendar::{
    classify_day, CalendarError, CalendarErrorKind, CalendarResult, Holiday, LiturgicalCalendar,
};
pub use compile::{resolve, CompileError, CompileErrorKind, RuleSource};
pub use day::{DayKey, Season, Tradition, Weekday};
pub use index::{BuildSummary, IndexBuild, IndexError, IndexResult, IndexScope, LiturgicalIndex};
pub use output::{OutputError, OutputErrorKind, OutputFormat};
pub use persistence::{load_plan, PlanFile, PlanSource};
pub use plan::{FormattedEntry, Plan, PlanEntry, PlanError, PlanErrorKind, PlanMetadata, SeasonPlan};
pub use reference::{RbRef, ReferenceError, ReferenceErrorKind};
