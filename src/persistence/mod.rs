use crate::Plan;
use std::path::{Path, PathBuf};

pub use crate::plan::{PlanError, PlanResult};

/// Anything that can hand the resolver a validated plan.
pub trait PlanSource {
    fn load_plan(&self) -> PlanResult<Plan>;
}

/// A plan document on disk, format picked from the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFile {
    path: PathBuf,
}

impl PlanFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlanSource for PlanFile {
    fn load_plan(&self) -> PlanResult<Plan> {
        load_plan(&self.path)
    }
}

pub fn load_plan<P: AsRef<Path>>(path: P) -> PlanResult<Plan> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => load_plan_from_yaml(path),
        Some("json") => load_plan_from_json(path),
        _ => Err(PlanError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub mod file;

pub use file::{
    load_plan_from_json, load_plan_from_yaml, plan_from_json_str, plan_from_yaml_str,
    save_plan_to_json, save_plan_to_yaml,
};
