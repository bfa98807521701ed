use crate::error::{StationError, StationResult};
use ph_core::numeric::{Real, ensure_non_negative, ensure_positive, fixed};
use ph_core::units::HOURS_PER_DAY;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Operating schedule and electricity price used to cost a pump combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyTariff {
    /// Running hours per day, in (0, 24]
    pub hours_per_day: Real,
    /// Price per kWh
    pub price_per_kwh: Real,
    #[serde(default = "default_working_days")]
    pub working_days_per_year: Real,
}

fn default_working_days() -> Real {
    dec!(350)
}

impl Default for EnergyTariff {
    fn default() -> Self {
        Self {
            hours_per_day: HOURS_PER_DAY,
            price_per_kwh: Real::ZERO,
            working_days_per_year: default_working_days(),
        }
    }
}

impl EnergyTariff {
    pub fn new(hours_per_day: Real, price_per_kwh: Real) -> Self {
        Self {
            hours_per_day,
            price_per_kwh,
            ..Self::default()
        }
    }

    pub fn with_working_days(mut self, days: Real) -> Self {
        self.working_days_per_year = days;
        self
    }

    pub fn validate(&self) -> StationResult<()> {
        ensure_positive(self.hours_per_day, "operating hours per day")?;
        if self.hours_per_day > HOURS_PER_DAY {
            return Err(StationError::invalid(format!(
                "operating hours per day {} exceed 24",
                self.hours_per_day
            )));
        }
        ensure_non_negative(self.price_per_kwh, "electricity price")?;
        ensure_positive(self.working_days_per_year, "working days per year")?;
        if self.working_days_per_year > dec!(366) {
            return Err(StationError::invalid(format!(
                "working days per year {} exceed 366",
                self.working_days_per_year
            )));
        }
        Ok(())
    }

    /// kWh per day for a constant draw.
    pub fn daily_energy_kwh(&self, power_kw: Real) -> Real {
        fixed(power_kw * self.hours_per_day)
    }

    pub fn cost(&self, energy_kwh: Real) -> Real {
        fixed(energy_kwh * self.price_per_kwh)
    }

    pub fn annualize(&self, per_day: Real) -> Real {
        fixed(per_day * self.working_days_per_year)
    }
}
