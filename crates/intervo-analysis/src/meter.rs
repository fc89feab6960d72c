//! Peak meter ballistics.

/// Peak meter with instantaneous attack and timed release.
///
/// Per sample: `peak = max(|sample|, peak * release_coef)`. Defaults match
/// the engine's meters: 300 ms release.
///
/// # Example
///
/// ```rust
/// use intervo_analysis::PeakMeter;
///
/// let mut meter = PeakMeter::new(48000.0, 300.0);
/// let level = meter.process(0.8);
/// assert_eq!(level, 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct PeakMeter {
    peak: f32,
    release_coeff: f32,
    release_ms: f32,
    sample_rate: f32,
}

impl PeakMeter {
    /// Create a meter with the given release time in milliseconds.
    pub fn new(sample_rate: f32, release_ms: f32) -> Self {
        let mut meter = Self {
            peak: 0.0,
            release_coeff: 0.0,
            release_ms: release_ms.max(1.0),
            sample_rate,
        };
        meter.recalculate();
        meter
    }

    /// Set the release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.recalculate();
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Current peak level without processing.
    pub fn level(&self) -> f32 {
        self.peak
    }

    /// Process one sample and return the updated peak level.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let decayed = self.peak * self.release_coeff;
        self.peak = sample.abs().max(decayed);
        self.peak
    }

    /// Reset the meter to silence.
    pub fn reset(&mut self) {
        self.peak = 0.0;
    }

    fn recalculate(&mut self) {
        let samples = self.release_ms * self.sample_rate / 1000.0;
        self.release_coeff = (-1.0 / samples.max(1.0)).exp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_attack() {
        let mut meter = PeakMeter::new(48000.0, 300.0);
        assert_eq!(meter.process(0.7), 0.7);
        assert_eq!(meter.process(0.9), 0.9);
    }

    #[test]
    fn test_release_decays() {
        let mut meter = PeakMeter::new(48000.0, 100.0);
        meter.process(1.0);

        // After several release time constants the level approaches zero
        for _ in 0..48000 {
            meter.process(0.0);
        }
        assert!(meter.level() < 0.01, "meter should decay: {}", meter.level());
    }

    #[test]
    fn test_release_rate() {
        let mut meter = PeakMeter::new(48000.0, 300.0);
        meter.process(1.0);

        // One time constant (300 ms = 14400 samples) decays to ~1/e
        for _ in 0..14400 {
            meter.process(0.0);
        }
        let expected = (-1.0f32).exp();
        assert!(
            (meter.level() - expected).abs() < 0.02,
            "expected ~{expected}, got {}",
            meter.level()
        );
    }

    #[test]
    fn test_negative_samples_counted() {
        let mut meter = PeakMeter::new(48000.0, 300.0);
        assert_eq!(meter.process(-0.8), 0.8);
    }

    #[test]
    fn test_reset() {
        let mut meter = PeakMeter::new(48000.0, 300.0);
        meter.process(1.0);
        meter.reset();
        assert_eq!(meter.level(), 0.0);
    }
}
