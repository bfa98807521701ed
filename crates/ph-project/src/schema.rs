//! Scenario file schema.
//!
//! One scenario describes one pipeline segment, the fluid it carries, the operating point, and
//! optionally the pump station at its head and a sensitivity study.

use ph_core::EngineConfig;
use ph_hydraulics::{
    FluidProperties, HydraulicInputs, OperatingPoint, PipeGeometry, SensitivityRequest,
};
use ph_station::{EnergyTariff, PumpFamilySpec, PumpStation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pipeline: PipeGeometry,
    pub fluid: FluidProperties,
    pub operating: OperatingPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<StationDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivityRequest>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Scenario {
    pub fn inputs(&self) -> HydraulicInputs {
        HydraulicInputs::new(
            self.pipeline.clone(),
            self.fluid.clone(),
            self.operating.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDef {
    pub family_a: PumpFamilySpec,
    pub family_b: PumpFamilySpec,
    #[serde(default)]
    pub tariff: EnergyTariff,
}

impl StationDef {
    pub fn pumps(&self) -> PumpStation {
        PumpStation::new(self.family_a.clone(), self.family_b.clone())
    }
}
