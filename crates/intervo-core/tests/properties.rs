//! Property-based tests for intervo-core DSP primitives.
//!
//! Filter stability, parameter smoothing convergence, and delay line
//! integrity under randomized inputs.

use intervo_core::{
    Biquad, Effect, InterpolatedDelay, SmoothedParam, StateVariableFilter, SvfMode,
    highpass_coefficients, lowpass_coefficients, peaking_eq_coefficients,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// For any valid cutoff and Q the biquad variants produce finite output
    /// for random finite input.
    #[test]
    fn biquad_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.3f32..10.0f32,
        variant in 0usize..3,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let sr = 48000.0;
        let (b0, b1, b2, a0, a1, a2) = match variant {
            0 => lowpass_coefficients(freq, q, sr),
            1 => highpass_coefficients(freq, q, sr),
            _ => peaking_eq_coefficients(freq, q, 6.0, sr),
        };
        let mut biquad = Biquad::new();
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        for &sample in &input {
            let out = biquad.process(sample);
            prop_assert!(
                out.is_finite(),
                "biquad variant {} (freq={}, q={}) produced {} for input {}",
                variant, freq, q, out, sample
            );
        }
    }

    /// The SVF stays finite for any in-range cutoff/resonance/mode.
    #[test]
    fn svf_stability(
        freq in 20.0f32..21000.0f32,
        resonance in 0.5f32..10.0f32,
        mode in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(freq);
        svf.set_resonance(resonance);
        svf.set_mode(match mode {
            0 => SvfMode::Lowpass,
            1 => SvfMode::Highpass,
            2 => SvfMode::Bandpass,
            _ => SvfMode::Notch,
        });

        // Run the random block several times to let resonance build up
        for _ in 0..8 {
            for &sample in &input {
                let out = svf.process(sample);
                prop_assert!(
                    out.is_finite(),
                    "SVF (freq={}, res={}) produced {}",
                    freq, resonance, out
                );
            }
        }
    }

    /// SmoothedParam converges toward its target within f32 precision.
    #[test]
    fn smoothed_param_convergence(
        initial in -100.0f32..100.0f32,
        target in -100.0f32..100.0f32,
    ) {
        let mut param = SmoothedParam::with_config(initial, 48000.0, 10.0);
        param.set_target(target);

        for _ in 0..10000 {
            param.advance();
        }

        // One-pole smoothing stalls when the per-sample step rounds to zero
        // in f32; allow for that precision floor.
        let precision_floor = target.abs() * f32::EPSILON / 0.002 + 1e-4;
        let diff = (param.get() - target).abs();
        prop_assert!(
            diff < precision_floor,
            "did not converge: initial={}, target={}, got={}, diff={}",
            initial, target, param.get(), diff
        );
    }

    /// Samples written to the delay line read back exactly at integer delays.
    #[test]
    fn delay_line_integrity(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
    ) {
        let mut delay = InterpolatedDelay::new(64);
        for &s in &samples {
            delay.write(s);
        }
        for (age, &expected) in samples.iter().rev().enumerate() {
            let got = delay.read(age as f32);
            prop_assert!(
                (got - expected).abs() < 1e-6,
                "delay {} read {} expected {}",
                age, got, expected
            );
        }
    }
}
