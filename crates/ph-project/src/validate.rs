//! Scenario validation.

use crate::migrate::LATEST_VERSION;
use crate::schema::Scenario;
use ph_core::{ConstantTable, Real};
use ph_hydraulics::HydraulicError;
use ph_station::StationError;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid hydraulic input: {0}")]
    Hydraulic(#[from] HydraulicError),

    #[error("Invalid station: {0}")]
    Station(#[from] StationError),
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "", "scenario name must not be empty"));
    }

    scenario.inputs().validate()?;
    validate_constants(&scenario.engine.constants)?;

    if let Some(station) = &scenario.station {
        station.pumps().validate()?;
        station.tariff.validate()?;
    }
    if let Some(request) = &scenario.sensitivity {
        request.validate()?;
    }
    Ok(())
}

fn validate_constants(t: &ConstantTable) -> Result<(), ValidationError> {
    let positive = [
        ("engine.constants.pi", t.pi),
        ("engine.constants.gravity", t.gravity),
        ("engine.constants.roughness_factor", t.roughness_factor),
        ("engine.constants.laminar_upper_re", t.laminar_upper_re),
        ("engine.constants.smooth_limit_numerator", t.smooth_limit_numerator),
        ("engine.constants.laminar.beta", t.laminar.beta),
        ("engine.constants.smooth.beta", t.smooth.beta),
        ("engine.constants.mixed.beta_base", t.mixed.beta_base),
        ("engine.constants.rough.beta_base", t.rough.beta_base),
        ("engine.constants.rough.multiplier", t.rough.multiplier),
    ];
    for (field, value) in positive {
        if value <= Real::ZERO {
            return Err(invalid(field, value, "must be positive"));
        }
    }
    if t.station_loss_factor < Real::ZERO {
        return Err(invalid(
            "engine.constants.station_loss_factor",
            t.station_loss_factor,
            "must not be negative",
        ));
    }
    if t.transition_upper_re <= t.laminar_upper_re {
        return Err(invalid(
            "engine.constants.transition_upper_re",
            t.transition_upper_re,
            "must exceed laminar_upper_re",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StationDef;
    use ph_core::EngineConfig;
    use ph_hydraulics::{FluidProperties, OperatingPoint, PipeGeometry};
    use ph_station::{EnergyTariff, PumpFamilySpec};
    use rust_decimal_macros::dec;

    fn scenario() -> Scenario {
        Scenario {
            version: LATEST_VERSION,
            name: "line".to_string(),
            description: None,
            pipeline: PipeGeometry::new(dec!(150), dec!(508), dec!(9), dec!(0.03), dec!(0)),
            fluid: FluidProperties::new(dec!(860), dec!(20), dec!(20)),
            operating: OperatingPoint::new(dec!(850), dec!(6)),
            station: None,
            sensitivity: None,
            engine: EngineConfig::default(),
        }
    }

    #[test]
    fn valid_scenario() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn future_version_rejected() {
        let mut s = scenario();
        s.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn bad_inputs_rejected() {
        let mut s = scenario();
        s.fluid.density_kg_m3 = dec!(0);
        assert!(matches!(validate_scenario(&s), Err(ValidationError::Hydraulic(_))));

        let mut s = scenario();
        s.name = "  ".to_string();
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn station_checked() {
        let mut s = scenario();
        s.station = Some(StationDef {
            family_a: PumpFamilySpec::new("A", dec!(300), dec!(900), dec!(1.2), dec!(0.95), 3),
            family_b: PumpFamilySpec::new("B", dec!(180), dec!(500), dec!(0.8), dec!(0.95), 2),
            tariff: EnergyTariff::default(),
        });
        assert!(matches!(validate_scenario(&s), Err(ValidationError::Station(_))));
    }

    #[test]
    fn constants_checked() {
        let mut s = scenario();
        s.engine.constants.transition_upper_re = dec!(1500);
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("transition_upper_re"));
    }
}
