//! Linear ADSR envelope generator.
//!
//! Attack, decay, and release times are converted to per-sample linear
//! increments. Release ramps down from whatever level was held when the gate
//! dropped, so a release triggered mid-attack is as long as one triggered
//! from sustain.

/// ADSR envelope stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Inactive — output is zero.
    #[default]
    Idle,
    /// Ramping up toward peak level.
    Attack,
    /// Falling from peak toward the sustain level.
    Decay,
    /// Holding at the sustain level while the gate is on.
    Sustain,
    /// Ramping down to zero after gate release.
    Release,
}

/// Linear ADSR envelope.
///
/// # Example
///
/// ```rust
/// use intervo_synth::{AdsrEnvelope, EnvelopeStage};
///
/// let mut env = AdsrEnvelope::new(48000.0);
/// env.set_attack_s(0.01);
/// env.set_decay_s(0.1);
/// env.set_sustain(0.7);
/// env.set_release_s(0.2);
///
/// env.gate_on();
/// let level = env.advance();
/// ```
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    stage: EnvelopeStage,
    level: f32,
    sample_rate: f32,

    attack_s: f32,
    decay_s: f32,
    sustain: f32,
    release_s: f32,

    // Per-sample linear steps, recomputed when times change
    attack_inc: f32,
    decay_dec: f32,
    /// Release step, recomputed from the held level on gate-off
    release_dec: f32,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdsrEnvelope {
    /// Create an envelope with 10 ms attack, 100 ms decay, 0.7 sustain,
    /// 200 ms release.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            stage: EnvelopeStage::Idle,
            level: 0.0,
            sample_rate,
            attack_s: 0.01,
            decay_s: 0.1,
            sustain: 0.7,
            release_s: 0.2,
            attack_inc: 0.0,
            decay_dec: 0.0,
            release_dec: 0.0,
        };
        env.recalculate_steps();
        env
    }

    /// Set attack time in seconds.
    pub fn set_attack_s(&mut self, seconds: f32) {
        self.attack_s = seconds.max(0.0005);
        self.recalculate_steps();
    }

    /// Attack time in seconds.
    pub fn attack_s(&self) -> f32 {
        self.attack_s
    }

    /// Set decay time in seconds.
    pub fn set_decay_s(&mut self, seconds: f32) {
        self.decay_s = seconds.max(0.0005);
        self.recalculate_steps();
    }

    /// Decay time in seconds.
    pub fn decay_s(&self) -> f32 {
        self.decay_s
    }

    /// Set sustain level (0.0 to 1.0).
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
        self.recalculate_steps();
    }

    /// Sustain level.
    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    /// Set release time in seconds.
    pub fn set_release_s(&mut self, seconds: f32) {
        self.release_s = seconds.max(0.0005);
    }

    /// Release time in seconds.
    pub fn release_s(&self) -> f32 {
        self.release_s
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_steps();
    }

    /// Open the gate (note on). Idle envelopes enter attack; an already
    /// sounding envelope restarts its attack from the current level, which
    /// avoids a click on retrigger.
    pub fn gate_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Close the gate (note off). The release ramp starts from the level
    /// held at this moment.
    pub fn gate_off(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
            let release_samples = (self.release_s * self.sample_rate).max(1.0);
            self.release_dec = self.level / release_samples;
        }
    }

    /// Force the envelope to idle.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Whether the envelope is producing output.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Advance by one sample and return the level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += self.attack_inc;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= self.decay_dec;
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain;
            }

            EnvelopeStage::Release => {
                self.level -= self.release_dec;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }

    fn recalculate_steps(&mut self) {
        self.attack_inc = 1.0 / (self.attack_s * self.sample_rate).max(1.0);
        // Decay covers the 1.0 -> sustain span in decay_s seconds
        self.decay_dec = (1.0 - self.sustain).max(0.0) / (self.decay_s * self.sample_rate).max(1.0);
        if self.decay_dec <= 0.0 {
            // Sustain at 1.0: fall through decay immediately
            self.decay_dec = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_outputs_zero() {
        let mut env = AdsrEnvelope::new(48000.0);
        assert_eq!(env.stage(), EnvelopeStage::Idle);
        for _ in 0..100 {
            assert_eq!(env.advance(), 0.0);
        }
    }

    #[test]
    fn test_attack_reaches_peak_in_time() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_attack_s(0.01); // 480 samples

        env.gate_on();
        for _ in 0..470 {
            env.advance();
            assert_eq!(env.stage(), EnvelopeStage::Attack);
        }
        // Allow a couple of samples of float slack around the nominal time
        for _ in 0..12 {
            env.advance();
        }
        assert_ne!(env.stage(), EnvelopeStage::Attack, "attack should complete in ~480 samples");
    }

    #[test]
    fn test_decay_lands_on_sustain() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_attack_s(0.001);
        env.set_decay_s(0.01);
        env.set_sustain(0.5);

        env.gate_on();
        for _ in 0..5000 {
            env.advance();
        }
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(env.level(), 0.5);
    }

    #[test]
    fn test_release_to_idle() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_attack_s(0.001);
        env.set_decay_s(0.001);
        env.set_sustain(0.7);
        env.set_release_s(0.05); // 2400 samples

        env.gate_on();
        for _ in 0..2000 {
            env.advance();
        }
        env.gate_off();
        assert_eq!(env.stage(), EnvelopeStage::Release);

        for _ in 0..2500 {
            env.advance();
        }
        assert_eq!(env.stage(), EnvelopeStage::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_release_from_attack_holds_base_level() {
        // Gate off mid-attack: release ramps from the held level and takes
        // the full release time.
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_attack_s(0.1); // slow attack
        env.set_release_s(0.01); // 480 samples

        env.gate_on();
        for _ in 0..1000 {
            env.advance();
        }
        let held = env.level();
        assert!(held < 0.5, "should still be mid-attack");

        env.gate_off();
        // After half the release, level should be about half the held level
        for _ in 0..240 {
            env.advance();
        }
        assert!(
            (env.level() - held / 2.0).abs() < held * 0.1,
            "release should ramp linearly from held level {held}, got {}",
            env.level()
        );
    }

    #[test]
    fn test_gate_off_while_idle_stays_idle() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.gate_off();
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn test_retrigger_keeps_level() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_attack_s(0.01);
        env.gate_on();
        for _ in 0..200 {
            env.advance();
        }
        let level_before = env.level();

        env.gate_on();
        assert_eq!(env.level(), level_before, "retrigger must not click");
        assert_eq!(env.stage(), EnvelopeStage::Attack);
    }

    #[test]
    fn test_output_range() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_sustain(0.6);
        env.gate_on();
        for _ in 0..10000 {
            let level = env.advance();
            assert!((0.0..=1.0).contains(&level), "out of range: {level}");
        }
        env.gate_off();
        for _ in 0..20000 {
            let level = env.advance();
            assert!((0.0..=1.0).contains(&level), "out of range in release: {level}");
        }
    }

    #[test]
    fn test_stable_across_sample_rates() {
        for sr in [22050.0, 44100.0, 48000.0, 96000.0] {
            let mut env = AdsrEnvelope::new(sr);
            env.set_attack_s(0.005);
            env.set_decay_s(0.01);
            env.set_sustain(0.5);
            env.gate_on();

            // Run for 100 ms worth of samples
            for _ in 0..(sr * 0.1) as usize {
                let level = env.advance();
                assert!(level.is_finite());
                assert!((0.0..=1.0).contains(&level));
            }
            assert_eq!(env.stage(), EnvelopeStage::Sustain, "at sr {sr}");
        }
    }

    #[test]
    fn test_full_sustain_skips_decay() {
        let mut env = AdsrEnvelope::new(48000.0);
        env.set_attack_s(0.001);
        env.set_sustain(1.0);
        env.gate_on();
        for _ in 0..200 {
            env.advance();
        }
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(env.level(), 1.0);
    }
}
