//! Property tests: classification totality and analysis determinism.

use ph_core::{EngineConfig, Real};
use ph_hydraulics::{
    FluidProperties, HydraulicEngine, OperatingPoint, PipeGeometry, classify,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn decimal(mantissa: u32, scale: u32) -> Real {
    Real::new(i64::from(mantissa), scale)
}

proptest! {
    #[test]
    fn every_positive_reynolds_gets_exactly_one_regime(
        re in 1u32..10_000_000u32,
        re_frac in 0u32..100_000_000u32,
        eps in 1u32..100_000u32,
    ) {
        let reynolds = Real::from(re) + decimal(re_frac, 8);
        let eps = decimal(eps, 7);
        let config = EngineConfig::default();
        let a = classify(reynolds, eps, &config).unwrap();
        let b = classify(reynolds, eps, &config).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn analysis_is_bit_identical_across_calls(
        length in 1u32..500u32,
        bore in 100u32..1200u32,
        flow in 10u32..5000u32,
        visc in 1u32..300u32,
        density in 700u32..1000u32,
        elevation in -200i32..200i32,
    ) {
        let pipe = PipeGeometry::from_inner_diameter(
            Real::from(length),
            Real::from(bore),
            dec!(0.05),
            Real::from(elevation),
        );
        let fluid = FluidProperties::new(Real::from(density), Real::from(visc), dec!(20));
        let op = OperatingPoint::new(Real::from(flow), dec!(6));

        let engine = HydraulicEngine::default();
        let first = engine.analyze(&pipe, &fluid, &op).unwrap();
        let second = engine.analyze(&pipe, &fluid, &op).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        prop_assert_eq!(first.feasible, first.outlet_pressure_mpa > Real::ZERO);
    }
}
