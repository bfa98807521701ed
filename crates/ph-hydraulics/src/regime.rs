//! Flow regime classification.
//!
//! Regime boundaries, in increasing Reynolds number:
//!
//! ```text
//! Laminar          Re < 2000
//! Transition       2000 ≤ Re ≤ 3000
//! HydraulicSmooth  3000 < Re < 59.5 / ε^(8/7)
//! MixedFriction    59.5 / ε^(8/7) ≤ Re < 665 − 765·lg ε
//! Rough            Re ≥ 665 − 765·lg ε
//! ```
//!
//! Reynolds number and both roughness-dependent limits are rounded to the engine's fixed
//! scale before comparison, so a value can never fall on different sides of a boundary
//! depending on which side computed it.

use crate::error::{EngineResult, HydraulicError};
use ph_core::numeric::{Real, checked_div, checked_log10, checked_pow, fixed, lerp, pow10};
use ph_core::{ConstantTable, EngineConfig, PowerLaw, TransitionPolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Regime tag, ordered by increasing Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    Laminar,
    Transition,
    HydraulicSmooth,
    MixedFriction,
    Rough,
}

impl FlowRegime {
    pub const ALL: [FlowRegime; 5] = [
        FlowRegime::Laminar,
        FlowRegime::Transition,
        FlowRegime::HydraulicSmooth,
        FlowRegime::MixedFriction,
        FlowRegime::Rough,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transition => "transition",
            FlowRegime::HydraulicSmooth => "hydraulically smooth",
            FlowRegime::MixedFriction => "mixed friction",
            FlowRegime::Rough => "rough",
        }
    }
}

impl fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified regime with its resolved coefficient payload.
///
/// `Transition` and `Rough` carry the Darcy friction factor directly: for those regimes it
/// does not follow `β·Re^(−m)` at the actual Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Laminar(PowerLaw),
    Transition {
        coeffs: PowerLaw,
        friction_factor: Real,
    },
    HydraulicSmooth(PowerLaw),
    MixedFriction(PowerLaw),
    Rough {
        coeffs: PowerLaw,
        friction_factor: Real,
    },
}

impl Regime {
    pub fn kind(&self) -> FlowRegime {
        match self {
            Regime::Laminar(_) => FlowRegime::Laminar,
            Regime::Transition { .. } => FlowRegime::Transition,
            Regime::HydraulicSmooth(_) => FlowRegime::HydraulicSmooth,
            Regime::MixedFriction(_) => FlowRegime::MixedFriction,
            Regime::Rough { .. } => FlowRegime::Rough,
        }
    }

    pub fn coefficients(&self) -> PowerLaw {
        match *self {
            Regime::Laminar(c) | Regime::HydraulicSmooth(c) | Regime::MixedFriction(c) => c,
            Regime::Transition { coeffs, .. } | Regime::Rough { coeffs, .. } => coeffs,
        }
    }

    pub fn beta(&self) -> Real {
        self.coefficients().beta
    }

    pub fn m(&self) -> Real {
        self.coefficients().m
    }

    pub fn fixed_friction_factor(&self) -> Option<Real> {
        match *self {
            Regime::Transition {
                friction_factor, ..
            }
            | Regime::Rough {
                friction_factor, ..
            } => Some(friction_factor),
            _ => None,
        }
    }
}

/// Factor turning a Leibenzon `β·Re^(−m)` into a Darcy friction factor:
/// `4^m · π^(2−m) · g / 8`. For laminar flow this maps β = 4.15 onto λ ≈ 64/Re.
pub fn darcy_conversion(m: Real, constants: &ConstantTable) -> EngineResult<Real> {
    let four_m = checked_pow(Real::from(4), m, "4^m")?;
    let pi_term = checked_pow(constants.pi, Real::TWO - m, "π^(2-m)")?;
    Ok(four_m * pi_term * constants.gravity / Real::from(8))
}

/// Darcy friction factor λ = β · Re^(−m) · `darcy_conversion(m)`.
pub fn darcy_factor(
    coeffs: PowerLaw,
    reynolds: Real,
    constants: &ConstantTable,
) -> EngineResult<Real> {
    let re_m = checked_pow(reynolds, coeffs.m, "Re^m")?;
    let scaled = checked_div(coeffs.beta, re_m, "β/Re^m")?;
    Ok(fixed(scaled * darcy_conversion(coeffs.m, constants)?))
}

/// Upper Reynolds limit of the hydraulically smooth zone, `59.5 / ε^(8/7)`.
pub fn smooth_upper_limit(eps: Real, constants: &ConstantTable) -> EngineResult<Real> {
    let denom = checked_pow(eps, constants.smooth_limit_exponent, "ε^(8/7)")?;
    Ok(fixed(checked_div(
        constants.smooth_limit_numerator,
        denom,
        "smooth limit",
    )?))
}

/// Upper Reynolds limit of the mixed-friction zone, `665 − 765·lg ε`.
pub fn mixed_upper_limit(eps: Real, constants: &ConstantTable) -> EngineResult<Real> {
    let lg = checked_log10(eps, "lg ε")?;
    Ok(fixed(
        constants.mixed_limit_intercept - constants.mixed_limit_slope * lg,
    ))
}

/// Classify a Reynolds number against relative roughness ε and resolve the regime's
/// coefficients.
pub fn classify(reynolds: Real, eps: Real, config: &EngineConfig) -> EngineResult<Regime> {
    if reynolds <= Real::ZERO {
        return Err(HydraulicError::invalid(format!(
            "Reynolds number must be positive, got {reynolds}"
        )));
    }
    if eps <= Real::ZERO {
        return Err(HydraulicError::invalid(format!(
            "relative roughness must be positive, got {eps}"
        )));
    }

    let t = &config.constants;
    let re = fixed(reynolds);

    if re < t.laminar_upper_re {
        return Ok(Regime::Laminar(t.laminar));
    }

    if re <= t.transition_upper_re {
        return match config.transition {
            TransitionPolicy::Reject => Err(HydraulicError::ModelBoundary { reynolds: re }),
            TransitionPolicy::Interpolate => interpolate_transition(re, t),
        };
    }

    if re < smooth_upper_limit(eps, t)? {
        return Ok(Regime::HydraulicSmooth(t.smooth));
    }

    // e/d, as opposed to ε = k·e/d
    let wall_ratio = checked_div(eps, t.roughness_factor, "e/d")?;

    if re < mixed_upper_limit(eps, t)? {
        let exponent = t.mixed.roughness_slope * checked_log10(wall_ratio, "lg(e/d)")?
            - t.mixed.roughness_intercept;
        let a = pow10(exponent, "mixed A")?;
        return Ok(Regime::MixedFriction(PowerLaw::new(
            fixed(t.mixed.beta_base * a),
            t.mixed.m,
        )));
    }

    let lambda = fixed(t.rough.multiplier * checked_pow(wall_ratio, t.rough.exponent, "(e/d)^p")?);
    Ok(Regime::Rough {
        coeffs: PowerLaw::new(fixed(t.rough.beta_base * lambda), Real::ZERO),
        friction_factor: lambda,
    })
}

fn interpolate_transition(re: Real, t: &ConstantTable) -> EngineResult<Regime> {
    let lower = darcy_factor(t.laminar, t.laminar_upper_re, t)?;
    let upper = darcy_factor(t.smooth, t.transition_upper_re, t)?;
    let weight = checked_div(
        re - t.laminar_upper_re,
        t.transition_upper_re - t.laminar_upper_re,
        "transition weight",
    )?;

    let lambda = fixed(lerp(lower, upper, weight));
    let m = lerp(t.laminar.m, t.smooth.m, weight);
    // β such that β·Re^(−m)·conversion(m) reproduces the interpolated λ
    let beta = checked_div(
        lambda * checked_pow(re, m, "Re^m")?,
        darcy_conversion(m, t)?,
        "transition β",
    )?;

    debug!(%re, %lambda, "transition regime: interpolated friction factor");

    Ok(Regime::Transition {
        coeffs: PowerLaw::new(fixed(beta), fixed(m)),
        friction_factor: lambda,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    const EPS: Real = dec!(0.00012245);

    #[test]
    fn laminar_boundary_follows_inequality() {
        let r = classify(dec!(1999.99999999), EPS, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::Laminar);
        assert_eq!(r.beta(), dec!(4.15));
        assert_eq!(r.m(), dec!(1));

        let r = classify(dec!(2000), EPS, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::Transition);
        let r = classify(dec!(2000.0001), EPS, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::Transition);
    }

    #[test]
    fn transition_upper_boundary_is_closed() {
        let r = classify(dec!(3000), EPS, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::Transition);
        let r = classify(dec!(3000.00000001), EPS, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::HydraulicSmooth);
        assert_eq!(r.coefficients(), PowerLaw::new(dec!(0.0246), dec!(0.25)));
    }

    #[test]
    fn sub_scale_noise_is_rounded_before_comparison() {
        // rounds to 2000.00000000
        let r = classify(dec!(1999.999999996), EPS, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::Transition);
    }

    #[test]
    fn transition_reject_policy() {
        let config = cfg().with_transition(TransitionPolicy::Reject);
        let err = classify(dec!(2500), EPS, &config).unwrap_err();
        assert!(matches!(err, HydraulicError::ModelBoundary { .. }));
        // outside the band the policy is irrelevant
        assert!(classify(dec!(1500), EPS, &config).is_ok());
        assert!(classify(dec!(3500), EPS, &config).is_ok());
    }

    #[test]
    fn transition_interpolates_between_neighbours() {
        let t = ConstantTable::default();
        let lower = darcy_factor(t.laminar, dec!(2000), &t).unwrap();
        let upper = darcy_factor(t.smooth, dec!(3000), &t).unwrap();

        let at_lower = classify(dec!(2000), EPS, &cfg()).unwrap();
        assert_eq!(at_lower.fixed_friction_factor(), Some(lower));
        let at_upper = classify(dec!(3000), EPS, &cfg()).unwrap();
        assert_eq!(at_upper.fixed_friction_factor(), Some(upper));

        let mid = classify(dec!(2500), EPS, &cfg())
            .unwrap()
            .fixed_friction_factor()
            .unwrap();
        assert!(mid > lower.min(upper) && mid < lower.max(upper));
    }

    #[test]
    fn laminar_conversion_matches_64_over_re() {
        let t = ConstantTable::default();
        let lambda = darcy_factor(t.laminar, dec!(1000), &t).unwrap();
        // 64/1000 = 0.064; β = 4.15 is a rounded constant
        assert!((lambda - dec!(0.064)).abs() < dec!(0.0002));
    }

    #[test]
    fn smooth_mixed_and_rough_zones() {
        // ε = 0.05: smooth limit ≈ 1819, mixed limit ≈ 1660
        let eps = dec!(0.05);
        let t = ConstantTable::default();
        let smooth = smooth_upper_limit(eps, &t).unwrap();
        let mixed = mixed_upper_limit(eps, &t).unwrap();
        assert!(smooth > dec!(1800) && smooth < dec!(1840), "{smooth}");
        assert!(mixed > dec!(1650) && mixed < dec!(1670), "{mixed}");

        let r = classify(dec!(5000), eps, &cfg()).unwrap();
        assert_eq!(r.kind(), FlowRegime::Rough);
        assert_eq!(r.m(), Real::ZERO);
        let lambda = r.fixed_friction_factor().unwrap();
        // 0.11 * 0.025^0.25
        assert!((lambda - dec!(0.04374)).abs() < dec!(0.0001), "{lambda}");
        assert_eq!(r.beta(), fixed(dec!(0.0826) * lambda));
    }

    #[test]
    fn mixed_zone_between_limits() {
        // ε = 0.001: smooth limit ≈ 159 800, mixed limit = 665 + 765·3 = 2960.
        // Use a table whose mixed limit sits above the smooth limit.
        let mut t = ConstantTable::default();
        t.mixed_limit_intercept = dec!(10000000);
        let config = EngineConfig::default().with_constants(t);
        let eps = dec!(0.001);
        let r = classify(dec!(500000), eps, &config).unwrap();
        assert_eq!(r.kind(), FlowRegime::MixedFriction);
        assert_eq!(r.m(), dec!(0.123));
        assert!(r.beta() > Real::ZERO && r.beta() < dec!(0.0802));
        assert!(r.fixed_friction_factor().is_none());
    }

    #[test]
    fn roughness_limits_are_exact_edges() {
        let mut t = ConstantTable::default();
        t.mixed_limit_intercept = dec!(10000000);
        let config = EngineConfig::default().with_constants(t.clone());
        let eps = dec!(0.001);
        let tick = dec!(0.00000001);

        let smooth = smooth_upper_limit(eps, &t).unwrap();
        let mixed = mixed_upper_limit(eps, &t).unwrap();
        assert!(smooth > t.transition_upper_re && smooth < mixed);

        let kind = |re: Real| classify(re, eps, &config).unwrap().kind();
        assert_eq!(kind(smooth - tick), FlowRegime::HydraulicSmooth);
        assert_eq!(kind(smooth), FlowRegime::MixedFriction);
        assert_eq!(kind(mixed - tick), FlowRegime::MixedFriction);
        assert_eq!(kind(mixed), FlowRegime::Rough);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(classify(Real::ZERO, EPS, &cfg()).unwrap_err().is_invalid_input());
        assert!(classify(dec!(-5), EPS, &cfg()).unwrap_err().is_invalid_input());
        assert!(classify(dec!(5000), Real::ZERO, &cfg()).unwrap_err().is_invalid_input());
    }

    #[test]
    fn regime_order_follows_reynolds() {
        let mut sorted = FlowRegime::ALL;
        sorted.sort();
        assert_eq!(sorted, FlowRegime::ALL);
        assert!(FlowRegime::Laminar < FlowRegime::Rough);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    proptest! {
        #[test]
        fn classification_is_total_and_monotone(
            re_a in 1u64..5_000_000u64,
            re_b in 1u64..5_000_000u64,
            eps_micro in 10u64..50_000u64,
        ) {
            let config = EngineConfig::default();
            let eps = Real::new(eps_micro as i64, 6);
            let (lo, hi) = if re_a <= re_b { (re_a, re_b) } else { (re_b, re_a) };
            let a = classify(Real::from(lo), eps, &config).unwrap();
            let b = classify(Real::from(hi), eps, &config).unwrap();
            // With a smooth limit above the mixed limit the mixed zone is empty, so the
            // regime tag never decreases as Re grows.
            prop_assert!(a.kind() <= b.kind());
            prop_assert!(a.beta() > dec!(0));
        }
    }
}
