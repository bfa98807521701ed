//! Content-based hashing for run IDs.

use crate::ResultsResult;
use crate::types::RunKind;
use ph_core::EngineConfig;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 over the canonical JSON of every value that determines a result.
///
/// Each part is length-prefixed so adjacent parts cannot run into each other.
pub fn compute_run_id<T: Serialize>(
    kind: RunKind,
    inputs: &T,
    config: &EngineConfig,
    engine_version: &str,
) -> ResultsResult<String> {
    let mut hasher = Sha256::new();
    let parts = [
        serde_json::to_string(&kind)?,
        serde_json::to_string(inputs)?,
        serde_json::to_string(config)?,
        engine_version.to_string(),
    ];
    for part in &parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    Ok(format!("{:x}", hasher.finalize()))
}
