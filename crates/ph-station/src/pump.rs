//! Pump families and the two-family station.

use crate::combination::{Combinations, PumpCombination};
use crate::error::{StationError, StationResult};
use ph_core::numeric::{Real, ensure_positive, fixed};
use serde::{Deserialize, Serialize};

/// Upper bound on installed units per family.
pub const MAX_UNITS_PER_FAMILY: u32 = 32;

/// One family of identical pumps installed at a station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PumpFamilySpec {
    pub name: String,
    /// Rated lift per running unit (m)
    pub rated_lift_m: Real,
    /// Rated power draw per running unit (kW)
    pub rated_power_kw: Real,
    pub pump_efficiency: Real,
    pub electrical_efficiency: Real,
    pub max_units: u32,
}

impl PumpFamilySpec {
    pub fn new(
        name: impl Into<String>,
        rated_lift_m: Real,
        rated_power_kw: Real,
        pump_efficiency: Real,
        electrical_efficiency: Real,
        max_units: u32,
    ) -> Self {
        Self {
            name: name.into(),
            rated_lift_m,
            rated_power_kw,
            pump_efficiency,
            electrical_efficiency,
            max_units,
        }
    }

    /// Lift delivered to the fluid by one running unit (m).
    pub fn effective_lift_m(&self) -> Real {
        self.rated_lift_m * self.pump_efficiency * self.electrical_efficiency
    }

    pub fn validate(&self) -> StationResult<()> {
        ensure_positive(self.rated_lift_m, "rated lift")?;
        ensure_positive(self.rated_power_kw, "rated power")?;
        check_efficiency(&self.name, "pump", self.pump_efficiency)?;
        check_efficiency(&self.name, "electrical", self.electrical_efficiency)?;
        if self.max_units > MAX_UNITS_PER_FAMILY {
            return Err(StationError::invalid(format!(
                "pump family '{}' lists {} units, more than {MAX_UNITS_PER_FAMILY}",
                self.name, self.max_units
            )));
        }
        Ok(())
    }
}

fn check_efficiency(family: &str, kind: &str, eta: Real) -> StationResult<()> {
    if eta <= Real::ZERO || eta > Real::ONE {
        return Err(StationError::invalid(format!(
            "pump family '{family}': {kind} efficiency must be in (0, 1], got {eta}"
        )));
    }
    Ok(())
}

/// Station with exactly two pump families.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PumpStation {
    pub family_a: PumpFamilySpec,
    pub family_b: PumpFamilySpec,
}

impl PumpStation {
    pub fn new(family_a: PumpFamilySpec, family_b: PumpFamilySpec) -> Self {
        Self { family_a, family_b }
    }

    pub fn validate(&self) -> StationResult<()> {
        self.family_a.validate()?;
        self.family_b.validate()?;
        if self.family_a.max_units == 0 && self.family_b.max_units == 0 {
            return Err(StationError::invalid(
                "station has no pump units available in either family",
            ));
        }
        Ok(())
    }

    pub fn combinations(&self) -> Combinations {
        Combinations::new(self.family_a.max_units, self.family_b.max_units)
    }

    /// Σ units × lift × ηpump × ηelec (m)
    pub fn head_added_m(&self, combo: PumpCombination) -> Real {
        fixed(
            Real::from(combo.family_a) * self.family_a.effective_lift_m()
                + Real::from(combo.family_b) * self.family_b.effective_lift_m(),
        )
    }

    /// Σ units × rated power (kW)
    pub fn power_kw(&self, combo: PumpCombination) -> Real {
        fixed(
            Real::from(combo.family_a) * self.family_a.rated_power_kw
                + Real::from(combo.family_b) * self.family_b.rated_power_kw,
        )
    }
}
