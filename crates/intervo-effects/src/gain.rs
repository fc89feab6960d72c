//! Linear gain stage.

use intervo_core::{Effect, ParamDescriptor, ParameterInfo, SmoothedParam};

/// Smoothed linear gain.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Gain | 0–2 | 1.0 |
#[derive(Debug, Clone)]
pub struct Gain {
    gain: SmoothedParam,
}

impl Gain {
    /// Create a unity gain stage.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            gain: SmoothedParam::standard(1.0, sample_rate),
        }
    }

    /// Set the linear gain. Clamped to [0, 2].
    pub fn set_gain(&mut self, gain: f32) {
        self.gain.set_target(gain.clamp(0.0, 2.0));
    }

    /// Current gain target.
    pub fn gain(&self) -> f32 {
        self.gain.target()
    }
}

impl Effect for Gain {
    fn process(&mut self, input: f32) -> f32 {
        input * self.gain.advance()
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let g = self.gain.advance();
        (left * g, right * g)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.gain.snap_to_target();
    }
}

impl ParameterInfo for Gain {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::custom("Gain", "Gain", 0.0, 2.0, 1.0)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.set_gain(value);
        }
    }
}
