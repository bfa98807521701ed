use crate::PhError;
use rust_decimal::prelude::*;

/// Number type used throughout the engine.
pub type Real = Decimal;

/// Fractional digits kept for every reported quantity and every regime boundary.
pub const SCALE: u32 = 8;

/// Round to the engine's fixed scale, midpoint away from zero.
pub fn fixed(v: Real) -> Real {
    v.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, PhError> {
    if v > Real::ZERO {
        Ok(v)
    } else {
        Err(PhError::NonPositive { what, value: v })
    }
}

pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, PhError> {
    if v >= Real::ZERO {
        Ok(v)
    } else {
        Err(PhError::Negative { what, value: v })
    }
}

pub fn checked_div(num: Real, den: Real, what: &'static str) -> Result<Real, PhError> {
    num.checked_div(den).ok_or(PhError::OutOfRange { what })
}

/// `base^exp` for a strictly positive base and arbitrary decimal exponent.
pub fn checked_pow(base: Real, exp: Real, what: &'static str) -> Result<Real, PhError> {
    ensure_positive(base, what)?;
    if exp.is_zero() {
        return Ok(Real::ONE);
    }
    if exp == Real::ONE {
        return Ok(base);
    }
    base.checked_powd(exp).ok_or(PhError::OutOfRange { what })
}

pub fn checked_log10(v: Real, what: &'static str) -> Result<Real, PhError> {
    ensure_positive(v, what)?;
    v.checked_log10().ok_or(PhError::OutOfRange { what })
}

/// `10^exp`.
pub fn pow10(exp: Real, what: &'static str) -> Result<Real, PhError> {
    checked_pow(Real::TEN, exp, what)
}

/// Linear interpolation `a + (b - a) * t`.
pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fixed_rounds_half_up() {
        assert_eq!(fixed(dec!(1.234567885)), dec!(1.23456789));
        assert_eq!(fixed(dec!(1.234567884)), dec!(1.23456788));
        assert_eq!(fixed(dec!(-1.234567885)), dec!(-1.23456789));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        let err = ensure_positive(Real::ZERO, "flow rate").unwrap_err();
        assert!(err.to_string().contains("flow rate"));
        assert!(ensure_positive(dec!(0.00000001), "x").is_ok());
    }

    #[test]
    fn pow_and_log_agree() {
        let v = checked_pow(dec!(2), dec!(0.5), "sqrt").unwrap();
        assert!((v - dec!(1.41421356)).abs() < dec!(0.000001));

        let l = checked_log10(dec!(1000), "log").unwrap();
        assert!((l - dec!(3)).abs() < dec!(0.000001));

        assert_eq!(checked_pow(dec!(7), Real::ZERO, "p").unwrap(), Real::ONE);
        assert!(checked_pow(Real::ZERO, dec!(0.25), "p").is_err());
    }

    #[test]
    fn pow10_matches_integer_powers() {
        let v = pow10(dec!(-2), "p").unwrap();
        assert!((v - dec!(0.01)).abs() < dec!(0.000000001));
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(dec!(1), dec!(3), Real::ZERO), dec!(1));
        assert_eq!(lerp(dec!(1), dec!(3), Real::ONE), dec!(3));
        assert_eq!(lerp(dec!(1), dec!(3), dec!(0.5)), dec!(2));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fixed_is_idempotent(mantissa in -1_000_000_000_000i64..1_000_000_000_000i64, scale in 0u32..16) {
            let v = Decimal::new(mantissa, scale);
            let once = fixed(v);
            prop_assert_eq!(fixed(once), once);
            prop_assert!(once.scale() <= SCALE);
        }
    }
}
