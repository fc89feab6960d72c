//! Phaser: an LFO-swept cascade of first-order allpass filters.
//!
//! Each allpass stage flips phase around a swept corner frequency; summing
//! with the dry signal carves moving notches. Feedback from the cascade
//! output sharpens the notches into resonant peaks.

use intervo_core::{Effect, Lfo, ParamDescriptor, ParameterInfo, flush_denormal};
use libm::tanf;

/// Maximum allpass stages.
const MAX_STAGES: usize = 12;

/// Sweep range low end in Hz.
const SWEEP_LOW_HZ: f32 = 200.0;

/// Sweep range high end in Hz at full depth.
const SWEEP_HIGH_HZ: f32 = 2000.0;

/// First-order allpass section.
#[derive(Debug, Clone, Copy, Default)]
struct AllpassStage {
    x1: f32,
    y1: f32,
}

impl AllpassStage {
    /// Process with coefficient `a`: `y = a*x + x1 - a*y1`.
    #[inline]
    fn process(&mut self, input: f32, a: f32) -> f32 {
        let output = a * input + self.x1 - a * self.y1;
        self.x1 = input;
        self.y1 = flush_denormal(output);
        output
    }

    fn clear(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

/// Stereo phaser.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Rate | 0.1–10 Hz | 0.3 |
/// | 1 | Depth | 0–1 | 0.7 |
/// | 2 | Feedback | -0.9 to 0.9 | 0.3 |
/// | 3 | Stages | 2–12 | 4 |
#[derive(Debug, Clone)]
pub struct Phaser {
    stages_l: [AllpassStage; MAX_STAGES],
    stages_r: [AllpassStage; MAX_STAGES],
    lfo: Lfo,
    depth: f32,
    feedback: f32,
    num_stages: usize,
    last_out_l: f32,
    last_out_r: f32,
    sample_rate: f32,
}

impl Phaser {
    /// Create a 4-stage phaser.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages_l: [AllpassStage::default(); MAX_STAGES],
            stages_r: [AllpassStage::default(); MAX_STAGES],
            lfo: Lfo::new(sample_rate, 0.3),
            depth: 0.7,
            feedback: 0.3,
            num_stages: 4,
            last_out_l: 0.0,
            last_out_r: 0.0,
            sample_rate,
        }
    }

    /// Set LFO rate in Hz.
    pub fn set_rate_hz(&mut self, rate: f32) {
        self.lfo.set_frequency(rate.clamp(0.1, 10.0));
    }

    /// Set sweep depth.
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    /// Set feedback. Clamped to [-0.9, 0.9].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.9, 0.9);
    }

    /// Set the number of allpass stages. Clamped to [2, 12].
    pub fn set_stages(&mut self, stages: usize) {
        self.num_stages = stages.clamp(2, MAX_STAGES);
    }

    /// Allpass coefficient for the current LFO position.
    #[inline]
    fn coefficient(&self, lfo_value: f32) -> f32 {
        // Sweep from SWEEP_LOW toward SWEEP_HIGH, scaled by depth
        let sweep = (lfo_value + 1.0) * 0.5 * self.depth;
        let freq = SWEEP_LOW_HZ + (SWEEP_HIGH_HZ - SWEEP_LOW_HZ) * sweep;
        let t = tanf(core::f32::consts::PI * freq / self.sample_rate);
        (t - 1.0) / (t + 1.0)
    }
}

impl Effect for Phaser {
    fn process(&mut self, input: f32) -> f32 {
        let lfo_value = self.lfo.advance();
        let a = self.coefficient(lfo_value);

        let mut wet = input + self.last_out_l * self.feedback;
        for stage in self.stages_l.iter_mut().take(self.num_stages) {
            wet = stage.process(wet, a);
        }
        self.last_out_l = wet;

        (input + wet) * 0.5
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let lfo_value = self.lfo.advance();
        let a = self.coefficient(lfo_value);

        let mut wet_l = left + self.last_out_l * self.feedback;
        let mut wet_r = right + self.last_out_r * self.feedback;
        for i in 0..self.num_stages {
            wet_l = self.stages_l[i].process(wet_l, a);
            wet_r = self.stages_r[i].process(wet_r, a);
        }
        self.last_out_l = wet_l;
        self.last_out_r = wet_r;

        ((left + wet_l) * 0.5, (right + wet_r) * 0.5)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        for stage in &mut self.stages_l {
            stage.clear();
        }
        for stage in &mut self.stages_r {
            stage.clear();
        }
        self.last_out_l = 0.0;
        self.last_out_r = 0.0;
        self.lfo.reset();
    }
}

impl ParameterInfo for Phaser {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::freq_hz("Rate", "Rate", 0.1, 10.0, 0.3)),
            1 => Some(ParamDescriptor::custom("Depth", "Depth", 0.0, 1.0, 0.7)),
            2 => Some(ParamDescriptor::custom("Feedback", "Fdbk", -0.9, 0.9, 0.3)),
            3 => Some(ParamDescriptor::custom("Stages", "Stages", 2.0, 12.0, 4.0).with_step(2.0)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.lfo.frequency(),
            1 => self.depth,
            2 => self.feedback,
            3 => self.num_stages as f32,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_rate_hz(value),
            1 => self.set_depth(value),
            2 => self.set_feedback(value),
            3 => self.set_stages(value as usize),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_finite() {
        let mut phaser = Phaser::new(48000.0);
        phaser.set_feedback(0.9);
        phaser.set_stages(12);
        phaser.set_depth(1.0);

        for i in 0..100000 {
            let x = libm::sinf(i as f32 * 0.2);
            let (l, r) = phaser.process_stereo(x, x);
            assert!(l.is_finite() && r.is_finite());
            assert!(l.abs() < 10.0 && r.abs() < 10.0);
        }
    }

    #[test]
    fn test_alters_signal() {
        let mut phaser = Phaser::new(48000.0);
        phaser.set_rate_hz(1.0);
        phaser.set_depth(1.0);

        let mut diff = 0.0f32;
        for i in 0..48000 {
            let x = libm::sinf(i as f32 * 0.1);
            let out = phaser.process(x);
            diff += (out - x).abs();
        }
        assert!(diff > 10.0, "phaser should audibly alter the signal: {diff}");
    }

    #[test]
    fn test_stage_count_clamped() {
        let mut phaser = Phaser::new(48000.0);
        phaser.set_param(3, 100.0);
        assert_eq!(phaser.get_param(3), 12.0);
        phaser.set_param(3, 0.0);
        assert_eq!(phaser.get_param(3), 2.0);
    }

    #[test]
    fn test_param_clamp() {
        let mut phaser = Phaser::new(48000.0);
        phaser.set_param(2, 5.0);
        assert_eq!(phaser.get_param(2), 0.9);
        phaser.set_param(2, -5.0);
        assert_eq!(phaser.get_param(2), -0.9);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut phaser = Phaser::new(48000.0);
        for i in 0..1000 {
            phaser.process(libm::sinf(i as f32 * 0.1));
        }
        phaser.reset();

        // After reset with silence input, output stays silent
        for _ in 0..100 {
            assert_eq!(phaser.process(0.0), 0.0);
        }
    }
}
