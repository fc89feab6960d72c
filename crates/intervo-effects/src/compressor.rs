//! Dynamics compressor with RMS detection.

use intervo_core::{
    Effect, EnvelopeFollower, ParamDescriptor, ParamUnit, ParameterInfo, SmoothedParam,
    db_to_linear, linear_to_db,
};
use intervo_core::envelope::DetectorMode;

/// Soft-knee width in dB.
const KNEE_DB: f32 = 6.0;

/// Feed-forward gain computer for the compression curve.
#[derive(Debug, Clone)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
}

impl GainComputer {
    /// Gain reduction in dB (non-positive) for a detector level in dB.
    #[inline]
    fn compute_gain_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;

        if overshoot <= -KNEE_DB / 2.0 {
            0.0
        } else if overshoot > KNEE_DB / 2.0 {
            -overshoot * (1.0 - 1.0 / self.ratio)
        } else {
            // Quadratic interpolation through the knee
            let knee_factor = (overshoot + KNEE_DB / 2.0) / KNEE_DB;
            -knee_factor * knee_factor * overshoot * (1.0 - 1.0 / self.ratio)
        }
    }
}

/// Feed-forward RMS compressor.
///
/// The detector runs on the mono sum, so both channels receive the same
/// gain reduction and the stereo image stays put.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Threshold | -60 to 0 dB | -20 |
/// | 1 | Ratio | 1–20 | 4 |
/// | 2 | Attack | 0.1–100 ms | 10 |
/// | 3 | Release | 10–1000 ms | 100 |
/// | 4 | Makeup | 0–24 dB | 0 |
#[derive(Debug, Clone)]
pub struct Compressor {
    detector: EnvelopeFollower,
    gain_computer: GainComputer,
    makeup: SmoothedParam,
    makeup_db: f32,
}

impl Compressor {
    /// Create a compressor with moderate defaults.
    pub fn new(sample_rate: f32) -> Self {
        let mut detector = EnvelopeFollower::with_times(sample_rate, 10.0, 100.0);
        detector.set_mode(DetectorMode::Rms);
        Self {
            detector,
            gain_computer: GainComputer {
                threshold_db: -20.0,
                ratio: 4.0,
            },
            makeup: SmoothedParam::standard(1.0, sample_rate),
            makeup_db: 0.0,
        }
    }

    /// Set threshold in dB.
    pub fn set_threshold_db(&mut self, db: f32) {
        self.gain_computer.threshold_db = db.clamp(-60.0, 0.0);
    }

    /// Set compression ratio.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.gain_computer.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, ms: f32) {
        self.detector.set_attack_ms(ms.clamp(0.1, 100.0));
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, ms: f32) {
        self.detector.set_release_ms(ms.clamp(10.0, 1000.0));
    }

    /// Set makeup gain in dB.
    pub fn set_makeup_db(&mut self, db: f32) {
        self.makeup_db = db.clamp(0.0, 24.0);
        self.makeup.set_target(db_to_linear(self.makeup_db));
    }

    /// Gain multiplier for a detector sample.
    #[inline]
    fn gain_for(&mut self, detector_input: f32) -> f32 {
        let envelope = self.detector.process(detector_input);
        let envelope_db = linear_to_db(envelope);
        let reduction_db = self.gain_computer.compute_gain_db(envelope_db);
        db_to_linear(reduction_db) * self.makeup.advance()
    }
}

impl Effect for Compressor {
    fn process(&mut self, input: f32) -> f32 {
        input * self.gain_for(input)
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let gain = self.gain_for((left + right) * 0.5);
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.detector.set_sample_rate(sample_rate);
        self.makeup.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.detector.reset();
        self.makeup.snap_to_target();
    }
}

impl ParameterInfo for Compressor {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -20.0)),
            1 => Some(
                ParamDescriptor::custom("Ratio", "Ratio", 1.0, 20.0, 4.0)
                    .with_unit(ParamUnit::Ratio),
            ),
            2 => Some(ParamDescriptor::time_ms("Attack", "Attack", 0.1, 100.0, 10.0)),
            3 => Some(ParamDescriptor::time_ms("Release", "Release", 10.0, 1000.0, 100.0)),
            4 => Some(ParamDescriptor::gain_db("Makeup", "Makeup", 0.0, 24.0, 0.0)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain_computer.threshold_db,
            1 => self.gain_computer.ratio,
            2 => self.detector.attack_ms(),
            3 => self.detector.release_ms(),
            4 => self.makeup_db,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_threshold_db(value),
            1 => self.set_ratio(value),
            2 => self.set_attack_ms(value),
            3 => self.set_release_ms(value),
            4 => self.set_makeup_db(value),
            _ => {}
        }
    }
}
