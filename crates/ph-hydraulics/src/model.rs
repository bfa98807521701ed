//! Engine inputs: pipe geometry, fluid properties and the operating point.
//!
//! All inputs are read-only snapshots in engineering units (see field docs). Derived SI
//! quantities are computed on demand; nothing is cached on the value.

use crate::error::{EngineResult, HydraulicError};
use ph_core::numeric::{Real, checked_div, ensure_non_negative, ensure_positive, fixed};
use ph_core::units::{cst_to_m2ps, km_to_m, m3ph_to_m3ps, mm_to_m};
use ph_core::ConstantTable;
use serde::{Deserialize, Serialize};

/// Single linear pipeline segment between two stations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipeGeometry {
    /// Pipeline length (km)
    pub length_km: Real,
    /// Outer diameter (mm)
    pub outer_diameter_mm: Real,
    /// Wall thickness (mm)
    pub wall_thickness_mm: Real,
    /// Absolute (equivalent) wall roughness (mm)
    pub roughness_mm: Real,
    /// End-station elevation minus start-station elevation (m). Positive is uphill.
    #[serde(default)]
    pub elevation_difference_m: Real,
}

impl PipeGeometry {
    pub fn new(
        length_km: Real,
        outer_diameter_mm: Real,
        wall_thickness_mm: Real,
        roughness_mm: Real,
        elevation_difference_m: Real,
    ) -> Self {
        Self {
            length_km,
            outer_diameter_mm,
            wall_thickness_mm,
            roughness_mm,
            elevation_difference_m,
        }
    }

    /// Geometry specified directly by its inner diameter (zero wall thickness).
    pub fn from_inner_diameter(
        length_km: Real,
        inner_diameter_mm: Real,
        roughness_mm: Real,
        elevation_difference_m: Real,
    ) -> Self {
        Self::new(
            length_km,
            inner_diameter_mm,
            Real::ZERO,
            roughness_mm,
            elevation_difference_m,
        )
    }

    /// d = D − 2δ (mm)
    pub fn inner_diameter_mm(&self) -> Real {
        self.outer_diameter_mm - self.wall_thickness_mm * Real::TWO
    }

    pub fn inner_diameter_m(&self) -> Real {
        mm_to_m(self.inner_diameter_mm())
    }

    pub fn length_m(&self) -> Real {
        km_to_m(self.length_km)
    }

    /// A = π d² / 4 (m²), unrounded.
    pub fn cross_section_area(&self, constants: &ConstantTable) -> Real {
        let d = self.inner_diameter_m();
        constants.pi * d * d / Real::from(4)
    }

    /// ε = k · e / d, both lengths in mm.
    pub fn relative_roughness(&self, constants: &ConstantTable) -> EngineResult<Real> {
        let ratio = checked_div(
            self.roughness_mm,
            self.inner_diameter_mm(),
            "relative roughness",
        )?;
        Ok(fixed(constants.roughness_factor * ratio))
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive(self.length_km, "pipeline length")?;
        ensure_positive(self.outer_diameter_mm, "outer diameter")?;
        ensure_non_negative(self.wall_thickness_mm, "wall thickness")?;
        ensure_positive(self.roughness_mm, "absolute roughness")?;
        if self.inner_diameter_mm() <= Real::ZERO {
            return Err(HydraulicError::invalid(format!(
                "wall thickness {} mm leaves no bore in a {} mm pipe",
                self.wall_thickness_mm, self.outer_diameter_mm
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidProperties {
    /// Density (kg/m³)
    pub density_kg_m3: Real,
    /// Kinematic viscosity (mm²/s, i.e. cSt)
    pub viscosity_cst: Real,
    /// Temperature at which the properties were measured (°C)
    #[serde(default)]
    pub temperature_c: Real,
}

impl FluidProperties {
    pub fn new(density_kg_m3: Real, viscosity_cst: Real, temperature_c: Real) -> Self {
        Self {
            density_kg_m3,
            viscosity_cst,
            temperature_c,
        }
    }

    /// ν in m²/s
    pub fn viscosity_m2ps(&self) -> Real {
        cst_to_m2ps(self.viscosity_cst)
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive(self.density_kg_m3, "density")?;
        ensure_positive(self.viscosity_cst, "kinematic viscosity")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Volumetric flow rate (m³/h)
    pub flow_rate_m3h: Real,
    /// Pressure at the start of the segment (MPa)
    pub inlet_pressure_mpa: Real,
}

impl OperatingPoint {
    pub fn new(flow_rate_m3h: Real, inlet_pressure_mpa: Real) -> Self {
        Self {
            flow_rate_m3h,
            inlet_pressure_mpa,
        }
    }

    pub fn flow_rate_m3ps(&self) -> Real {
        m3ph_to_m3ps(self.flow_rate_m3h)
    }

    /// Same flow, different inlet pressure.
    pub fn with_inlet_pressure(&self, inlet_pressure_mpa: Real) -> Self {
        Self {
            inlet_pressure_mpa,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        ensure_positive(self.flow_rate_m3h, "flow rate")?;
        Ok(())
    }
}

/// The full input tuple of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HydraulicInputs {
    pub geometry: PipeGeometry,
    pub fluid: FluidProperties,
    pub operating: OperatingPoint,
}

impl HydraulicInputs {
    pub fn new(geometry: PipeGeometry, fluid: FluidProperties, operating: OperatingPoint) -> Self {
        Self {
            geometry,
            fluid,
            operating,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.geometry.validate()?;
        self.fluid.validate()?;
        self.operating.validate()
    }
}
