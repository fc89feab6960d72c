//! Peak limiter with smooth gain reduction.

use intervo_core::{
    Effect, EnvelopeFollower, ParamDescriptor, ParameterInfo, db_to_linear,
};

/// Peak limiter.
///
/// Instant-attack peak detection on the stereo maximum; gain reduction is
/// `ceiling / peak` whenever the peak exceeds the ceiling, relaxing at the
/// release rate. Sample-peak only, no true-peak oversampling.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Ceiling | -12 to 0 dB | -0.3 |
/// | 1 | Release | 10–500 ms | 50 |
#[derive(Debug, Clone)]
pub struct Limiter {
    detector: EnvelopeFollower,
    ceiling_db: f32,
    ceiling_linear: f32,
}

impl Limiter {
    /// Create a limiter just under full scale.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            // Zero attack: the detector jumps to any new peak instantly
            detector: EnvelopeFollower::with_times(sample_rate, 0.0, 50.0),
            ceiling_db: -0.3,
            ceiling_linear: db_to_linear(-0.3),
        }
    }

    /// Set the output ceiling in dB.
    pub fn set_ceiling_db(&mut self, db: f32) {
        self.ceiling_db = db.clamp(-12.0, 0.0);
        self.ceiling_linear = db_to_linear(self.ceiling_db);
    }

    /// Set the release time in milliseconds.
    pub fn set_release_ms(&mut self, ms: f32) {
        self.detector.set_release_ms(ms.clamp(10.0, 500.0));
    }

    /// Gain multiplier for the current detector state.
    #[inline]
    fn gain_for(&mut self, peak_input: f32) -> f32 {
        let peak = self.detector.process(peak_input);
        if peak > self.ceiling_linear {
            self.ceiling_linear / peak
        } else {
            1.0
        }
    }
}

impl Effect for Limiter {
    fn process(&mut self, input: f32) -> f32 {
        input * self.gain_for(input)
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let gain = self.gain_for(left.abs().max(right.abs()));
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.detector.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.detector.reset();
    }
}

impl ParameterInfo for Limiter {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::gain_db("Ceiling", "Ceiling", -12.0, 0.0, -0.3)),
            1 => Some(ParamDescriptor::time_ms("Release", "Release", 10.0, 500.0, 50.0)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.ceiling_db,
            1 => self.detector.release_ms(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_ceiling_db(value),
            1 => self.set_release_ms(value),
            _ => {}
        }
    }
}
