// ph-core/src/units.rs
//
// Engineering input units -> SI. The factors are exact definitions, so they live here
// rather than in the injectable `ConstantTable`.

use crate::numeric::Real;
use rust_decimal_macros::dec;

pub const SECONDS_PER_HOUR: Real = dec!(3600);
pub const HOURS_PER_DAY: Real = dec!(24);
pub const MM_PER_M: Real = dec!(1000);
pub const M_PER_KM: Real = dec!(1000);
pub const MM2_PER_M2: Real = dec!(1000000);
pub const PA_PER_MPA: Real = dec!(1000000);
pub const PERCENT: Real = dec!(100);

#[inline]
pub fn km_to_m(v: Real) -> Real {
    v * M_PER_KM
}

#[inline]
pub fn mm_to_m(v: Real) -> Real {
    v / MM_PER_M
}

#[inline]
pub fn m3ph_to_m3ps(v: Real) -> Real {
    v / SECONDS_PER_HOUR
}

/// Kinematic viscosity, mm²/s (cSt) -> m²/s.
#[inline]
pub fn cst_to_m2ps(v: Real) -> Real {
    v / MM2_PER_M2
}

#[inline]
pub fn mpa_to_pa(v: Real) -> Real {
    v * PA_PER_MPA
}

#[inline]
pub fn pa_to_mpa(v: Real) -> Real {
    v / PA_PER_MPA
}

/// Static pressure of a fluid column, `ρ g h`, in MPa.
#[inline]
pub fn head_to_mpa(head_m: Real, density: Real, gravity: Real) -> Real {
    pa_to_mpa(density * gravity * head_m)
}

/// Fluid column height equivalent to a pressure in MPa.
///
/// Callers guarantee `density * gravity` is non-zero.
#[inline]
pub fn mpa_to_head(p_mpa: Real, density: Real, gravity: Real) -> Real {
    mpa_to_pa(p_mpa) / (density * gravity)
}
