//! Envelope follower for tracking signal amplitude.
//!
//! Used by the compressor and limiter for dynamics detection and by the
//! meters for peak ballistics.

use libm::expf;

/// Detection mode for the envelope follower.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DetectorMode {
    /// Track the absolute peak of the signal.
    #[default]
    Peak,
    /// Track a running RMS estimate (square-law smoothing).
    Rms,
}

/// Envelope follower with separate attack and release times.
///
/// # Example
///
/// ```rust
/// use intervo_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(48000.0);
/// env.set_attack_ms(10.0);
/// env.set_release_ms(100.0);
///
/// let level = env.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
    mode: DetectorMode,
}

impl EnvelopeFollower {
    /// Create a follower with 10 ms attack / 100 ms release.
    pub fn new(sample_rate: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: 10.0,
            release_ms: 100.0,
            mode: DetectorMode::Peak,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Create with specified attack and release times in milliseconds.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self::new(sample_rate);
        follower.attack_ms = attack_ms.max(0.0);
        follower.release_ms = release_ms.max(1.0);
        follower.recalculate_coefficients();
        follower
    }

    /// Set the attack time in milliseconds. Zero gives instantaneous attack.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.0);
        self.recalculate_coefficients();
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.recalculate_coefficients();
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Set the detection mode.
    pub fn set_mode(&mut self, mode: DetectorMode) {
        self.mode = mode;
    }

    /// Update sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Current envelope level without processing.
    pub fn level(&self) -> f32 {
        match self.mode {
            DetectorMode::Peak => self.envelope,
            DetectorMode::Rms => libm::sqrtf(self.envelope),
        }
    }

    /// Process a sample and return the envelope level (always positive).
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let detected = match self.mode {
            DetectorMode::Peak => input.abs(),
            DetectorMode::Rms => input * input,
        };

        let coeff = if detected > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = detected + coeff * (self.envelope - detected);

        match self.mode {
            DetectorMode::Peak => self.envelope,
            DetectorMode::Rms => libm::sqrtf(self.envelope),
        }
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = Self::time_coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = Self::time_coeff(self.release_ms, self.sample_rate);
    }

    /// One-pole coefficient for a time constant in ms. Zero time gives an
    /// instantaneous (coefficient 0) response.
    fn time_coeff(ms: f32, sample_rate: f32) -> f32 {
        if ms <= 0.0 {
            0.0
        } else {
            expf(-1.0 / (ms * sample_rate / 1000.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rises_on_signal() {
        let mut env = EnvelopeFollower::new(48000.0);
        let mut level = 0.0;
        for _ in 0..4800 {
            level = env.process(0.8);
        }
        assert!((level - 0.8).abs() < 0.01, "should track level: {level}");
    }

    #[test]
    fn test_falls_on_silence() {
        let mut env = EnvelopeFollower::with_times(48000.0, 1.0, 50.0);
        for _ in 0..4800 {
            env.process(0.8);
        }
        // 10x the release time constant
        for _ in 0..24000 {
            env.process(0.0);
        }
        assert!(env.level() < 0.01, "should decay: {}", env.level());
    }

    #[test]
    fn test_instant_attack() {
        let mut env = EnvelopeFollower::with_times(48000.0, 0.0, 300.0);
        let level = env.process(0.9);
        assert!((level - 0.9).abs() < 1e-6, "zero attack is instantaneous: {level}");
    }

    #[test]
    fn test_attack_slower_than_instant() {
        let mut env = EnvelopeFollower::with_times(48000.0, 20.0, 100.0);
        let level = env.process(1.0);
        assert!(level < 0.5, "20 ms attack should not jump instantly: {level}");
    }

    #[test]
    fn test_rms_mode_tracks_sine_rms() {
        let mut env = EnvelopeFollower::with_times(48000.0, 50.0, 50.0);
        env.set_mode(DetectorMode::Rms);

        // Unit sine has RMS 1/sqrt(2) ~= 0.707
        let mut level = 0.0;
        for i in 0..48000 {
            let x = libm::sinf(2.0 * core::f32::consts::PI * 440.0 * i as f32 / 48000.0);
            level = env.process(x);
        }
        assert!(
            (level - core::f32::consts::FRAC_1_SQRT_2).abs() < 0.05,
            "RMS of unit sine should be ~0.707: {level}"
        );
    }

    #[test]
    fn test_reset() {
        let mut env = EnvelopeFollower::new(48000.0);
        for _ in 0..100 {
            env.process(1.0);
        }
        env.reset();
        assert_eq!(env.level(), 0.0);
    }
}
