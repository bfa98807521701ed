//! Scenario schema migration.
//!
//! Version 1 stored kinematic viscosity in m²/s and absolute roughness in m. Version 2 uses
//! cSt and mm.

use crate::ProjectError;
use crate::schema::Scenario;
use ph_core::units::{MM_PER_M, MM2_PER_M2};

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        1 => migrate_v1_to_v2(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v1_to_v2(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    scenario.fluid.viscosity_cst *= MM2_PER_M2;
    scenario.pipeline.roughness_mm *= MM_PER_M;
    scenario.version = 2;
    Ok(scenario)
}
