use liturgical_index::persistence::{
    load_plan_from_json, load_plan_from_yaml, plan_from_json_str, plan_from_yaml_str,
    save_plan_to_json, save_plan_to_yaml,
};
use liturgical_index::plan_validation::{validate_plan, validate_season_plan};
use liturgical_index::{
    load_plan, Plan, PlanEntry, PlanErrorKind, PlanFile, PlanSource, Season, SeasonPlan, Weekday,
};
use std::error::Error;
use std::fs;
use tempfile::tempdir;

const SAMPLE_YAML: &str = r#"
version: 1
work: Rule of Benedict
witness: Sample witness
defaults:
  cue: Read the day's portion
  rb: ["RB 4"]
seasons:
  lent:
    weekdays:
      wed:
        cue: Lenten Wednesday
        rb: ["RB 49.1-3"]
    fallback:
      cue: Lenten weekday
      rb: ["RB 48.1–9"]
      tags: [lent]
  ordinary:
    weekdays:
      sun: { cue: Sunday, rb: ["RB 1"] }
      mon: { cue: Monday, rb: ["RB 2"] }
      tue: { cue: Tuesday, rb: ["RB 3"] }
      wed: { cue: Wednesday, rb: ["RB 5"] }
      thu: { cue: Thursday, rb: ["RB 6"] }
      fri: { cue: Friday, rb: ["RB 7"] }
      sat: { cue: Saturday }
"#;

fn expect_invalid_json(json: &str) -> String {
    let err = plan_from_json_str(json).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::InvalidEntry, "{err}");
    err.to_string()
}

#[test]
fn parses_yaml_plan() {
    let plan = plan_from_yaml_str(SAMPLE_YAML).unwrap();
    assert_eq!(plan.metadata().version, 1);
    assert_eq!(plan.metadata().work, "Rule of Benedict");
    assert_eq!(plan.defaults().rb, vec!["RB 4"]);

    let lent = plan.season(Season::Lent).unwrap();
    assert_eq!(lent.weekdays().len(), 1);
    assert_eq!(lent.weekday(Weekday::Wednesday).unwrap().cue, "Lenten Wednesday");
    assert_eq!(
        lent.fallback().unwrap().tags,
        Some(vec!["lent".to_string()])
    );

    let ordinary = plan.season(Season::Ordinary).unwrap();
    assert_eq!(ordinary.weekdays().len(), 7);
    assert!(ordinary.fallback().is_none());
    assert!(ordinary.weekday(Weekday::Saturday).unwrap().rb.is_empty());

    assert!(plan.season(Season::Advent).is_none());
}

#[test]
fn loads_by_extension() {
    let dir = tempdir().unwrap();
    let yaml_path = dir.path().join("plan.yaml");
    let yml_path = dir.path().join("plan.yml");
    fs::write(&yaml_path, SAMPLE_YAML).unwrap();
    fs::write(&yml_path, SAMPLE_YAML).unwrap();

    let from_yaml = load_plan(&yaml_path).unwrap();
    let from_yml = load_plan(&yml_path).unwrap();
    assert_eq!(from_yaml, from_yml);
    assert_eq!(load_plan_from_yaml(&yaml_path).unwrap(), from_yaml);

    let source = PlanFile::new(&yaml_path);
    assert_eq!(source.path(), yaml_path.as_path());
    assert_eq!(source.load_plan().unwrap(), from_yaml);
}

#[test]
fn unsupported_extension_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.toml");
    fs::write(&path, SAMPLE_YAML).unwrap();
    let err = load_plan(&path).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::Parse);
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempdir().unwrap();
    let err = load_plan(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::Read);
    assert!(err.source().is_some());
}

#[test]
fn malformed_documents_are_parse_errors() {
    assert_eq!(
        plan_from_yaml_str("defaults: [not, a, mapping]").unwrap_err().kind(),
        PlanErrorKind::Parse
    );
    assert_eq!(
        plan_from_json_str("{\"seasons\": {}}").unwrap_err().kind(),
        PlanErrorKind::Parse
    );
    assert_eq!(plan_from_json_str("{").unwrap_err().kind(), PlanErrorKind::Parse);
}

#[test]
fn json_round_trip() {
    let plan = plan_from_yaml_str(SAMPLE_YAML).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");

    save_plan_to_json(&plan, &path).unwrap();
    let loaded = load_plan_from_json(&path).unwrap();
    assert_eq!(loaded, plan);
    assert_eq!(load_plan(&path).unwrap(), plan);
}

#[test]
fn yaml_round_trip() {
    let plan = plan_from_yaml_str(SAMPLE_YAML).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("saved.yaml");

    save_plan_to_yaml(&plan, &path).unwrap();
    assert_eq!(load_plan(&path).unwrap(), plan);
}

#[test]
fn incomplete_season_needs_fallback() {
    let message = expect_invalid_json(
        r#"{"defaults": {"cue": "d"},
            "seasons": {"lent": {"weekdays": {"wed": {"cue": "w"}}}}}"#,
    );
    assert!(message.contains("fallback"), "{message}");
}

#[test]
fn empty_season_is_rejected() {
    let message = expect_invalid_json(r#"{"defaults": {"cue": "d"}, "seasons": {"lent": {}}}"#);
    assert!(message.contains("at least one"), "{message}");
}

#[test]
fn duplicate_weekday_is_rejected() {
    let message = expect_invalid_json(
        r#"{"defaults": {"cue": "d"},
            "seasons": {"lent": {
                "weekdays": {"wed": {"cue": "a"}, "wed": {"cue": "b"}},
                "fallback": {"cue": "f"}}}}"#,
    );
    assert!(message.contains("duplicate weekday"), "{message}");

    let yaml = "defaults: {cue: d}\nseasons:\n  lent:\n    weekdays:\n      wed: {cue: a}\n      wed: {cue: b}\n    fallback: {cue: f}\n";
    assert!(plan_from_yaml_str(yaml).is_err());
}

#[test]
fn duplicate_season_is_rejected() {
    expect_invalid_json(
        r#"{"defaults": {"cue": "d"},
            "seasons": {"lent": {"fallback": {"cue": "a"}},
                        "lent": {"fallback": {"cue": "b"}}}}"#,
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let message = expect_invalid_json(
        r#"{"defaults": {"cue": "d"}, "seasons": {"summer": {"fallback": {"cue": "s"}}}}"#,
    );
    assert!(message.contains("summer"), "{message}");

    let message = expect_invalid_json(
        r#"{"defaults": {"cue": "d"},
            "seasons": {"lent": {"weekdays": {"funday": {"cue": "x"}}, "fallback": {"cue": "f"}}}}"#,
    );
    assert!(message.contains("funday"), "{message}");
}

#[test]
fn bad_reference_is_rejected_with_source() {
    let err = plan_from_json_str(
        r#"{"defaults": {"cue": "d", "rb": ["RB 4"]},
            "seasons": {"advent": {"fallback": {"cue": "a", "rb": ["RB 99.1"]}}}}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::InvalidEntry);
    assert!(err.to_string().contains("season advent fallback"));
    assert!(err.source().is_some());

    let err = plan_from_json_str(r#"{"defaults": {"cue": "d", "rb": ["Rule 4"]}}"#).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::InvalidEntry);
}

#[test]
fn validation_accepts_partial_with_fallback_and_full_week() {
    let partial = SeasonPlan::new()
        .with_weekday(Weekday::Sunday, PlanEntry::new("Sunday", ["RB 1"]))
        .with_fallback(PlanEntry::new("Weekday", ["RB 2"]));
    assert!(validate_season_plan(Season::Advent, &partial).is_ok());

    let full = Weekday::ALL.into_iter().fold(SeasonPlan::new(), |plan, weekday| {
        plan.with_weekday(weekday, PlanEntry::new(weekday.label(), ["RB 3"]))
    });
    assert!(validate_season_plan(Season::Ordinary, &full).is_ok());

    let plan = Plan::new(PlanEntry::new("Daily", ["RB 4"]))
        .with_season(Season::Advent, partial)
        .with_season(Season::Ordinary, full);
    assert!(validate_plan(&plan).is_ok());
}

#[test]
fn validation_rejects_programmatic_plans() {
    let sparse = SeasonPlan::new().with_weekday(Weekday::Monday, PlanEntry::new("Monday", ["RB 1"]));
    let err = validate_season_plan(Season::Lent, &sparse).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::InvalidEntry);

    let err = validate_season_plan(Season::Lent, &SeasonPlan::new()).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::InvalidEntry);

    let bad_defaults = Plan::new(PlanEntry::new("Daily", ["RB 0"]));
    assert_eq!(
        validate_plan(&bad_defaults).unwrap_err().kind(),
        PlanErrorKind::InvalidEntry
    );

    let dir = tempdir().unwrap();
    let err = save_plan_to_json(&bad_defaults, dir.path().join("bad.json")).unwrap_err();
    assert_eq!(err.kind(), PlanErrorKind::InvalidEntry);
}
