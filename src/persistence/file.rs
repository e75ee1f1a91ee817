use super::{PlanError, PlanResult};
use crate::plan::{Plan, PlanEntry, PlanMetadata};
use crate::plan_validation::{season_plan_from_entries, validate_plan};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::marker::PhantomData;
use std::path::Path;
use tracing::info;

/// On-disk shape of a plan. Map keys stay raw strings in document order
/// so unknown and repeated keys reach validation instead of being folded
/// away by the map type.
#[derive(Serialize, Deserialize)]
struct PlanDocument {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    work: String,
    #[serde(default)]
    witness: String,
    defaults: PlanEntry,
    #[serde(
        default,
        deserialize_with = "ordered_entries",
        serialize_with = "entries_as_map"
    )]
    seasons: Vec<(String, SeasonDocument)>,
}

#[derive(Serialize, Deserialize)]
struct SeasonDocument {
    #[serde(
        default,
        deserialize_with = "ordered_entries",
        serialize_with = "entries_as_map"
    )]
    weekdays: Vec<(String, PlanEntry)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fallback: Option<PlanEntry>,
}

impl PlanDocument {
    fn from_plan(plan: &Plan) -> Self {
        let metadata = plan.metadata();
        let seasons = plan
            .seasons()
            .iter()
            .map(|(season, season_plan)| {
                let weekdays = season_plan
                    .weekdays()
                    .iter()
                    .map(|(weekday, entry)| (weekday.key().to_string(), entry.clone()))
                    .collect();
                (
                    season.key().to_string(),
                    SeasonDocument {
                        weekdays,
                        fallback: season_plan.fallback().cloned(),
                    },
                )
            })
            .collect();

        Self {
            version: metadata.version,
            work: metadata.work.clone(),
            witness: metadata.witness.clone(),
            defaults: plan.defaults().clone(),
            seasons,
        }
    }

    fn into_plan(self) -> PlanResult<Plan> {
        let metadata = PlanMetadata {
            version: self.version,
            work: self.work,
            witness: self.witness,
        };
        let mut plan = Plan::new(self.defaults).with_metadata(metadata);

        let mut seen = Vec::with_capacity(self.seasons.len());
        for (season_key, document) in self.seasons {
            if seen.contains(&season_key) {
                return Err(PlanError::invalid(format!("duplicate season {season_key}")));
            }
            let (season, season_plan) =
                season_plan_from_entries(&season_key, document.weekdays, document.fallback)?;
            plan = plan.with_season(season, season_plan);
            seen.push(season_key);
        }

        validate_plan(&plan)?;
        Ok(plan)
    }
}

fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of names to entries")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

fn entries_as_map<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(entries.iter().map(|(key, value)| (key, value)))
}

fn read_plan_file(path: &Path) -> PlanResult<String> {
    fs::read_to_string(path).map_err(|source| PlanError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn plan_from_yaml_str(input: &str) -> PlanResult<Plan> {
    let document: PlanDocument = serde_yaml::from_str(input)?;
    document.into_plan()
}

pub fn plan_from_json_str(input: &str) -> PlanResult<Plan> {
    let document: PlanDocument = serde_json::from_str(input)?;
    document.into_plan()
}

pub fn load_plan_from_yaml<P: AsRef<Path>>(path: P) -> PlanResult<Plan> {
    let path = path.as_ref();
    let plan = plan_from_yaml_str(&read_plan_file(path)?)?;
    info!(path = %path.display(), seasons = plan.seasons().len(), "loaded YAML plan");
    Ok(plan)
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PlanResult<Plan> {
    let path = path.as_ref();
    let plan = plan_from_json_str(&read_plan_file(path)?)?;
    info!(path = %path.display(), seasons = plan.seasons().len(), "loaded JSON plan");
    Ok(plan)
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &Plan, path: P) -> PlanResult<()> {
    let path = path.as_ref();
    validate_plan(plan)?;
    let file = File::create(path).map_err(|source| PlanError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(file, &PlanDocument::from_plan(plan))?;
    Ok(())
}

pub fn save_plan_to_yaml<P: AsRef<Path>>(plan: &Plan, path: P) -> PlanResult<()> {
    let path = path.as_ref();
    validate_plan(plan)?;
    let file = File::create(path).map_err(|source| PlanError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::to_writer(file, &PlanDocument::from_plan(plan))?;
    Ok(())
}
