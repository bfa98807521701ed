use serde::{Deserialize, Serialize};

pub type RunId = String;

/// Which engine operation produced a cached result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Analyze,
    Optimize,
    Sensitivity,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunKind::Analyze => "analyze",
            RunKind::Optimize => "optimize",
            RunKind::Sensitivity => "sensitivity",
        }
    }
}

impl std::fmt::Display for RunKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub kind: RunKind,
    pub scenario_name: String,
    /// RFC 3339
    pub timestamp: String,
    pub engine_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn now(run_id: RunId, kind: RunKind, scenario_name: &str, engine_version: &str) -> Self {
        Self {
            run_id,
            kind,
            scenario_name: scenario_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: engine_version.to_string(),
        }
    }
}
