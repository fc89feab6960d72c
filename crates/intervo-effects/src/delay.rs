//! Stereo delay with feedback and interpolated reads.

use intervo_core::{
    Effect, InterpolatedDelay, ParamDescriptor, ParamUnit, ParameterInfo, SmoothedParam,
};

/// Maximum delay time in seconds.
const MAX_DELAY_S: f32 = 2.0;

/// Stereo feedback delay.
///
/// Delay time changes are smoothed in the sample domain, so sweeping the
/// time tape-warbles instead of clicking. BPM sync is external: the engine
/// sets the time parameter to `60 / bpm` when asked.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Time | 0–2 s | 0.25 |
/// | 1 | Feedback | 0–0.95 | 0.4 |
/// | 2 | Mix | 0–1 | 0.3 |
#[derive(Debug, Clone)]
pub struct Delay {
    line_l: InterpolatedDelay,
    line_r: InterpolatedDelay,
    /// Delay time in samples, smoothed
    time_samples: SmoothedParam,
    time_s: f32,
    feedback: f32,
    mix: f32,
    sample_rate: f32,
}

impl Delay {
    /// Create a quarter-second delay.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            line_l: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S),
            line_r: InterpolatedDelay::from_time(sample_rate, MAX_DELAY_S),
            time_samples: SmoothedParam::with_config(0.25 * sample_rate, sample_rate, 50.0),
            time_s: 0.25,
            feedback: 0.4,
            mix: 0.3,
            sample_rate,
        }
    }

    /// Set delay time in seconds. Clamped to [0, 2].
    pub fn set_time_s(&mut self, seconds: f32) {
        self.time_s = seconds.clamp(0.0, MAX_DELAY_S);
        self.time_samples.set_target(self.time_s * self.sample_rate);
    }

    /// Current delay time in seconds.
    pub fn time_s(&self) -> f32 {
        self.time_s
    }

    /// Set feedback. Clamped to [0, 0.95].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.95);
    }

    /// Set the wet/dry mix.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl Effect for Delay {
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        (l + r) * 0.5
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let delay = self.time_samples.advance();

        let wet_l = self.line_l.read(delay);
        let wet_r = self.line_r.read(delay);

        self.line_l.write(left + wet_l * self.feedback);
        self.line_r.write(right + wet_r * self.feedback);

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
            self.time_samples.set_sample_rate(sample_rate);
            self.time_samples
                .set_immediate(self.time_s * sample_rate);
        }
    }

    fn reset(&mut self) {
        self.line_l.clear();
        self.line_r.clear();
        self.time_samples.snap_to_target();
    }
}

impl ParameterInfo for Delay {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(
                ParamDescriptor::custom("Time", "Time", 0.0, MAX_DELAY_S, 0.25)
                    .with_unit(ParamUnit::Seconds),
            ),
            1 => Some(ParamDescriptor::custom("Feedback", "Fdbk", 0.0, 0.95, 0.4)),
            2 => Some(ParamDescriptor::mix(0.3)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.time_s,
            1 => self.feedback,
            2 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_time_s(value),
            1 => self.set_feedback(value),
            2 => self.set_mix(value),
            _ => {}
        }
    }
}
