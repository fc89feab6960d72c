//! Waveshaping distortion with a tone control.
//!
//! `tanh(drive * 10 * in)` followed by a one-pole lowpass at
//! `200 * 10^(tone * 2.3)` Hz, then dry/wet.

use intervo_core::{Effect, OnePole, ParamDescriptor, ParameterInfo, soft_clip_exact};
use libm::powf;

/// Tone lowpass base frequency in Hz.
const TONE_BASE_HZ: f32 = 200.0;

/// Tone lowpass exponent span (base 10).
const TONE_SPAN: f32 = 2.3;

/// Drive multiplier at full drive.
const DRIVE_RANGE: f32 = 10.0;

/// Tanh waveshaper with tone filtering.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Drive | 0–1 | 0.5 |
/// | 1 | Tone | 0–1 | 0.5 |
/// | 2 | Mix | 0–1 | 1.0 |
#[derive(Debug, Clone)]
pub struct Distortion {
    drive: f32,
    tone: f32,
    mix: f32,
    tone_lp_l: OnePole,
    tone_lp_r: OnePole,
    sample_rate: f32,
}

impl Distortion {
    /// Create a distortion at moderate drive.
    pub fn new(sample_rate: f32) -> Self {
        let mut dist = Self {
            drive: 0.5,
            tone: 0.5,
            mix: 1.0,
            tone_lp_l: OnePole::new(sample_rate, 1000.0),
            tone_lp_r: OnePole::new(sample_rate, 1000.0),
            sample_rate,
        };
        dist.update_tone();
        dist
    }

    /// Set the drive amount.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(0.0, 1.0);
    }

    /// Set the tone (0 = dark, 1 = bright).
    pub fn set_tone(&mut self, tone: f32) {
        let clamped = tone.clamp(0.0, 1.0);
        if clamped != self.tone {
            self.tone = clamped;
            self.update_tone();
        }
    }

    /// Set the wet/dry mix.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    fn update_tone(&mut self) {
        let freq = TONE_BASE_HZ * powf(10.0, self.tone * TONE_SPAN);
        let freq = freq.min(self.sample_rate * 0.45);
        self.tone_lp_l.set_frequency(freq);
        self.tone_lp_r.set_frequency(freq);
    }

    #[inline]
    fn shape(&self, input: f32) -> f32 {
        // At drive = 0 the shaper degenerates to identity-ish silence;
        // keep a minimum drive so the curve always passes signal
        let amount = (self.drive * DRIVE_RANGE).max(0.1);
        soft_clip_exact(input * amount)
    }
}

impl Effect for Distortion {
    fn process(&mut self, input: f32) -> f32 {
        let wet = self.tone_lp_l.process(self.shape(input));
        input + (wet - input) * self.mix
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let wet_l = self.tone_lp_l.process(self.shape(left));
        let wet_r = self.tone_lp_r.process(self.shape(right));
        (
            left + (wet_l - left) * self.mix,
            right + (wet_r - right) * self.mix,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.tone_lp_l.set_sample_rate(sample_rate);
        self.tone_lp_r.set_sample_rate(sample_rate);
        self.update_tone();
    }

    fn reset(&mut self) {
        self.tone_lp_l.reset();
        self.tone_lp_r.reset();
    }
}

impl ParameterInfo for Distortion {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::custom("Drive", "Drive", 0.0, 1.0, 0.5)),
            1 => Some(ParamDescriptor::custom("Tone", "Tone", 0.0, 1.0, 0.5)),
            2 => Some(ParamDescriptor::mix(1.0)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.drive,
            1 => self.tone,
            2 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_drive(value),
            1 => self.set_tone(value),
            2 => self.set_mix(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_bounded() {
        let mut dist = Distortion::new(48000.0);
        dist.set_drive(1.0);
        dist.set_tone(1.0);

        for i in 0..10000 {
            let x = libm::sinf(i as f32 * 0.3) * 2.0;
            let out = dist.process(x);
            assert!((-1.5..=1.5).contains(&out), "out of range: {out}");
        }
    }

    #[test]
    fn test_drive_saturates() {
        let mut hot = Distortion::new(48000.0);
        hot.set_drive(1.0);
        hot.set_tone(1.0);

        // High drive flattens a loud sine toward a square: the average
        // absolute level rises toward 1.0
        let mut hot_avg = 0.0f32;
        for i in 0..48000 {
            let x = libm::sinf(i as f32 * 0.1) * 0.9;
            hot_avg += hot.process(x).abs();
        }
        hot_avg /= 48000.0;
        assert!(hot_avg > 0.8, "high drive should saturate: avg {hot_avg}");
    }

    #[test]
    fn test_tone_darkens() {
        let render = |tone: f32| -> f32 {
            let mut dist = Distortion::new(48000.0);
            dist.set_drive(0.8);
            dist.set_tone(tone);

            // Measure HF content as successive-sample differences
            let mut roughness = 0.0f32;
            let mut prev = 0.0f32;
            for i in 0..48000 {
                let x = libm::sinf(i as f32 * 0.5);
                let out = dist.process(x);
                roughness += (out - prev).abs();
                prev = out;
            }
            roughness
        };

        assert!(
            render(0.0) < render(1.0) * 0.8,
            "low tone should remove high frequencies"
        );
    }

    #[test]
    fn test_mix_zero_dry() {
        let mut dist = Distortion::new(48000.0);
        dist.set_mix(0.0);
        for i in 0..100 {
            let x = i as f32 * 0.003;
            assert_eq!(dist.process(x), x);
        }
    }

    #[test]
    fn test_param_clamp() {
        let mut dist = Distortion::new(48000.0);
        dist.set_param(0, 5.0);
        assert_eq!(dist.get_param(0), 1.0);
        dist.set_param(1, -1.0);
        assert_eq!(dist.get_param(1), 0.0);
    }
}
