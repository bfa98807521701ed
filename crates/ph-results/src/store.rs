//! Run storage API.
//!
//! Layout: `<root>/<run_id>/manifest.json` and `<root>/<run_id>/result.json`.

use crate::types::RunManifest;
use crate::{ResultsError, ResultsResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store under `.pipehydra/runs` next to the scenario file.
    pub fn for_scenario(scenario_path: &Path) -> ResultsResult<Self> {
        let dir = scenario_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "scenario path has no parent directory".to_string(),
            })?;
        Self::new(dir.join(".pipehydra").join("runs"))
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        let dir = self.run_dir(run_id);
        dir.join("manifest.json").exists() && dir.join("result.json").exists()
    }

    pub fn save_run<T: Serialize>(&self, manifest: &RunManifest, result: &T) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        // result first: a manifest is only present for a complete run
        fs::write(run_dir.join("result.json"), serde_json::to_string_pretty(result)?)?;
        fs::write(run_dir.join("manifest.json"), serde_json::to_string_pretty(manifest)?)?;
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        self.read_json(run_id, "manifest.json")
    }

    pub fn load_result<T: DeserializeOwned>(&self, run_id: &str) -> ResultsResult<T> {
        self.read_json(run_id, "result.json")
    }

    fn read_json<T: DeserializeOwned>(&self, run_id: &str, file: &str) -> ResultsResult<T> {
        let path = self.run_dir(run_id).join(file);
        if !path.is_file() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_owned(),
            });
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Manifests, oldest first; `scenario` filters by scenario name.
    pub fn list_runs(&self, scenario: Option<&str>) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().to_string();
            if let Ok(manifest) = self.load_manifest(&run_id)
                && scenario.is_none_or(|name| manifest.scenario_name == name)
            {
                runs.push(manifest);
            }
        }

        runs.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
