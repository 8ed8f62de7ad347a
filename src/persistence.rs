use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::Result;
use crate::models::{LearningModule, ModuleId, Scenario, ScenarioId, User, UserId, UserProgress};
use crate::platform::Platform;

#[derive(Serialize)]
struct DocumentRef<'a> {
    users: &'a BTreeMap<UserId, User>,
    modules: &'a BTreeMap<ModuleId, LearningModule>,
    scenarios: &'a BTreeMap<ScenarioId, Scenario>,
    user_progress: &'a BTreeMap<UserId, BTreeMap<ModuleId, UserProgress>>,
}

// Entity fields are all required; only whole collections may be missing
#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    users: BTreeMap<UserId, User>,
    #[serde(default)]
    modules: BTreeMap<ModuleId, LearningModule>,
    #[serde(default)]
    scenarios: BTreeMap<ScenarioId, Scenario>,
    #[serde(default)]
    user_progress: BTreeMap<UserId, BTreeMap<ModuleId, UserProgress>>,
}

impl Platform {
    pub fn to_json(&self) -> Result<String> {
        let doc = DocumentRef {
            users: &self.users,
            modules: &self.modules,
            scenarios: &self.scenarios,
            user_progress: &self.user_progress,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json).map_err(|e| {
            error!(error = %e, "failed to parse platform data");
            e
        })?;

        let platform = Platform {
            users: doc.users,
            modules: doc.modules,
            scenarios: doc.scenarios,
            user_progress: doc.user_progress,
        };
        platform.validate().map_err(|e| {
            error!(error = %e, "rejected platform data");
            e
        })?;

        Ok(platform)
    }

    /// Writes the whole store as pretty JSON, replacing `path` atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|e| {
                error!(path = %path.display(), error = %e, "failed to save platform data");
                e
            })?;

        debug!(
            path = %path.display(),
            users = self.users.len(),
            modules = self.modules.len(),
            "saved platform data"
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to read platform data");
            e
        })?;

        let platform = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            users = platform.users.len(),
            modules = platform.modules.len(),
            "loaded platform data"
        );
        Ok(platform)
    }
}
