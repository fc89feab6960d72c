//! Chorus: LFO-modulated delay taps in quadrature.
//!
//! Two taps read the same pair of delay lines with LFO phases 90 degrees
//! apart, which decorrelates the channels and widens the image.

use intervo_core::{
    Effect, InterpolatedDelay, Lfo, ParamDescriptor, ParamUnit, ParameterInfo,
};

/// Center delay of the modulated taps in milliseconds.
const BASE_DELAY_MS: f32 = 15.0;

/// Peak modulation depth in milliseconds at depth = 1.
const MOD_DEPTH_MS: f32 = 8.0;

/// Maximum delay capacity in seconds.
const MAX_DELAY_S: f32 = 0.05;

/// Stereo chorus.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Rate | 0.1–10 Hz | 0.5 |
/// | 1 | Depth | 0–1 | 0.5 |
/// | 2 | Mix | 0–1 | 0.5 |
#[derive(Debug, Clone)]
pub struct Chorus {
    line_l: InterpolatedDelay,
    line_r: InterpolatedDelay,
    lfo: Lfo,
    depth: f32,
    mix: f32,
    sample_rate: f32,
}

impl Chorus {
    /// Create a slow, medium-depth chorus.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            line_l: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S),
            line_r: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S),
            lfo: Lfo::new(sample_rate, 0.5),
            depth: 0.5,
            mix: 0.5,
            sample_rate,
        }
    }

    /// Set LFO rate in Hz. Clamped to [0.1, 10].
    pub fn set_rate_hz(&mut self, rate: f32) {
        self.lfo.set_frequency(rate.clamp(0.1, 10.0));
    }

    /// Set modulation depth.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    /// Set the wet/dry mix.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl Effect for Chorus {
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        (l + r) * 0.5
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let base = BASE_DELAY_MS * self.sample_rate / 1000.0;
        let span = MOD_DEPTH_MS * self.sample_rate / 1000.0 * self.depth;

        // Quadrature taps: right reads 90 degrees ahead of left
        let mod_r = self.lfo.value_at_offset(0.25);
        let mod_l = self.lfo.advance();

        let wet_l = self.line_l.read(base + mod_l * span);
        let wet_r = self.line_r.read(base + mod_r * span);

        self.line_l.write(left);
        self.line_r.write(right);

        (
            left + (wet_l - left) * self.mix,
            right + (wet_r - right) * self.mix,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.line_l = InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S);
            self.line_r = InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S);
            self.lfo.set_sample_rate(sample_rate);
        }
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.lfo.reset();
    }
}

impl ParameterInfo for Chorus {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::freq_hz("Rate", "Rate", 0.1, 10.0, 0.5)
                    .with_unit(ParamUnit::Hertz),
            ),
            1 => Some(ParamDescriptor::custom("Depth", "Depth", 0.0, 1.0, 0.5)),
            2 => Some(ParamDescriptor::mix(0.5)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.lfo.frequency(),
            1 => self.depth,
            2 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate_hz(value),
            1 => self.set_depth(value),
            2 => self.set_mix(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_zero_dry() {
        let mut chorus = Chorus::new(48000.0);
        chorus.set_mix(0.0);
        for i in 0..1000 {
            let x = libm::sinf(i as f32 * 0.1);
            let (l, r) = chorus.process_stereo(x, x);
            assert_eq!(l, x);
            assert_eq!(r, x);
        }
    }

    #[test]
    fn test_decorrelates_channels() {
        let mut chorus = Chorus::new(48000.0);
        chorus.set_mix(1.0);
        chorus.set_depth(1.0);
        chorus.set_rate_hz(2.0);

        // Identical input on both channels; quadrature taps should make
        // the outputs differ
        let mut diff = 0.0f32;
        for i in 0..48000 {
            let x = libm::sinf(i as f32 * 0.2);
            let (l, r) = chorus.process_stereo(x, x);
            diff += (l - r).abs();
        }
        assert!(diff > 1.0, "quadrature taps should decorrelate: {diff}");
    }

    #[test]
    fn test_output_finite_and_bounded() {
        let mut chorus = Chorus::new(48000.0);
        chorus.set_depth(1.0);
        chorus.set_rate_hz(10.0);
        chorus.set_mix(1.0);

        for i in 0..100000 {
            let x = libm::sinf(i as f32 * 0.3);
            let (l, r) = chorus.process_stereo(x, x);
            assert!(l.is_finite() && r.is_finite());
            assert!(l.abs() < 3.0 && r.abs() < 3.0);
        }
    }

    #[test]
    fn test_param_clamp() {
        let mut chorus = Chorus::new(48000.0);
        chorus.set_param(0, 100.0);
        assert!((chorus.get_param(0) - 10.0).abs() < 1e-4);
        chorus.set_param(1, 2.0);
        assert_eq!(chorus.get_param(1), 1.0);
    }
}
