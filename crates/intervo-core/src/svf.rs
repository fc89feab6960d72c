//! State Variable Filter implementation.
//!
//! A Chamberlin-topology filter producing lowpass, highpass, bandpass, and
//! notch outputs simultaneously. Well-suited for audio-rate cutoff
//! modulation because its coefficients stay stable under rapid change.

use core::f32::consts::PI;
use libm::sinf;

use crate::Effect;
use crate::flush_denormal;

/// State Variable Filter output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfMode {
    /// Lowpass output.
    #[default]
    Lowpass,
    /// Highpass output.
    Highpass,
    /// Bandpass output.
    Bandpass,
    /// Notch (band-reject) output.
    Notch,
}

/// Chamberlin state variable filter.
///
/// Runs two passes of the difference equations per sample (the classic
/// double-sampled form), which keeps the integrators stable as the cutoff
/// approaches Nyquist. Cutoff is clamped to `[20, 0.45 * sample_rate]`,
/// resonance to `[0.5, 10]`.
///
/// # Example
///
/// ```rust
/// use intervo_core::{StateVariableFilter, SvfMode, Effect};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(1000.0);
/// svf.set_resonance(2.0);
/// svf.set_mode(SvfMode::Lowpass);
///
/// let output = svf.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    // Integrator state
    low: f32,
    band: f32,

    // Coefficients
    f: f32,
    q: f32,

    // Parameters
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    mode: SvfMode,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a new SVF with the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            low: 0.0,
            band: 0.0,
            f: 0.0,
            q: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: 1.0,
            mode: SvfMode::Lowpass,
        };
        svf.update_coefficients();
        svf
    }

    /// Set cutoff frequency in Hz. Clamped to `[20, 0.45 * sample_rate]`.
    pub fn set_cutoff(&mut self, freq: f32) {
        let clamped = freq.clamp(20.0, self.sample_rate * 0.45);
        if clamped != self.cutoff {
            self.cutoff = clamped;
            self.update_coefficients();
        }
    }

    /// Get current cutoff frequency.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q factor). Clamped to `[0.5, 10]`.
    pub fn set_resonance(&mut self, resonance: f32) {
        let clamped = resonance.clamp(0.5, 10.0);
        if clamped != self.resonance {
            self.resonance = clamped;
            self.update_coefficients();
        }
    }

    /// Get current resonance.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Set output mode.
    pub fn set_mode(&mut self, mode: SvfMode) {
        self.mode = mode;
    }

    /// Get current output mode.
    pub fn mode(&self) -> SvfMode {
        self.mode
    }

    fn update_coefficients(&mut self) {
        // Double-sampled: each of the two per-sample passes runs at an
        // effective 2x rate, so the tuning coefficient uses sample_rate * 2.
        self.f = 2.0 * sinf(PI * self.cutoff / (self.sample_rate * 2.0));
        self.q = 1.0 / self.resonance;
    }

    /// Run one pass of the Chamberlin difference equations.
    #[inline]
    fn pass(&mut self, input: f32) -> (f32, f32, f32) {
        self.low += self.f * self.band;
        let high = input - self.low - self.q * self.band;
        self.band += self.f * high;
        (self.low, high, self.band)
    }

    /// Process and return all outputs (lp, hp, bp, notch).
    #[inline]
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32, f32) {
        self.pass(input);
        let (lp, hp, bp) = self.pass(input);

        self.low = flush_denormal(self.low);
        self.band = flush_denormal(self.band);

        (lp, hp, bp, hp + lp)
    }
}

impl Effect for StateVariableFilter {
    fn process(&mut self, input: f32) -> f32 {
        let (lp, hp, bp, notch) = self.process_all(input);

        match self.mode {
            SvfMode::Lowpass => lp,
            SvfMode::Highpass => hp,
            SvfMode::Bandpass => bp,
            SvfMode::Notch => notch,
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.clamp(20.0, sample_rate * 0.45);
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.low = 0.0;
        self.band = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svf_lowpass_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);
        svf.set_mode(SvfMode::Lowpass);

        // DC should pass through lowpass
        let mut output = 0.0;
        for _ in 0..2000 {
            output = svf.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.05, "DC should pass, got {}", output);
    }

    #[test]
    fn test_svf_highpass_blocks_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);
        svf.set_mode(SvfMode::Highpass);

        let mut output = 0.0;
        for _ in 0..2000 {
            output = svf.process(1.0);
        }
        assert!(output.abs() < 0.1, "DC should be blocked, got {}", output);
    }

    #[test]
    fn test_svf_stable_at_high_cutoff() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(21000.0); // clamps to 0.45 * 48000 = 21600
        assert!(svf.cutoff() <= 48000.0 * 0.45);

        for i in 0..10000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let out = svf.process(input);
            assert!(out.is_finite(), "unstable at high cutoff: {out}");
            assert!(out.abs() < 100.0, "runaway at high cutoff: {out}");
        }
    }

    #[test]
    fn test_svf_cutoff_clamping() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(5.0);
        assert_eq!(svf.cutoff(), 20.0);
        svf.set_cutoff(100000.0);
        assert_eq!(svf.cutoff(), 48000.0 * 0.45);
    }

    #[test]
    fn test_svf_resonance_clamping() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance(0.1);
        assert_eq!(svf.resonance(), 0.5);
        svf.set_resonance(50.0);
        assert_eq!(svf.resonance(), 10.0);
    }

    #[test]
    fn test_svf_process_all_finite() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);

        let (lp, hp, bp, notch) = svf.process_all(1.0);
        assert!(lp.is_finite());
        assert!(hp.is_finite());
        assert!(bp.is_finite());
        assert!(notch.is_finite());
    }

    #[test]
    fn test_svf_reset() {
        let mut svf = StateVariableFilter::new(48000.0);

        for _ in 0..100 {
            svf.process(1.0);
        }

        svf.reset();

        assert_eq!(svf.low, 0.0);
        assert_eq!(svf.band, 0.0);
    }

    #[test]
    fn test_svf_bandpass_passes_center() {
        // A sine at the center frequency should survive the bandpass
        let sr = 48000.0;
        let freq = 1000.0;
        let mut svf = StateVariableFilter::new(sr);
        svf.set_cutoff(freq);
        svf.set_resonance(2.0);
        svf.set_mode(SvfMode::Bandpass);

        let mut peak = 0.0f32;
        for i in 0..48000 {
            let t = i as f32 / sr;
            let input = sinf(2.0 * PI * freq * t);
            let out = svf.process(input);
            if i > 4800 {
                peak = peak.max(out.abs());
            }
        }
        assert!(peak > 0.5, "bandpass should pass center freq, peak = {peak}");
    }
}
