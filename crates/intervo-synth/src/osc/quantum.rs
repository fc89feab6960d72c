//! Quantum oscillator: two morphing waveforms on a shared phase.
//!
//! Output is the linear crossfade `(1-morph)·wave_a + morph·wave_b`, both
//! shapes evaluated at the same phase accumulator. Saw, square, and pulse
//! use PolyBLEP band-limiting.

use super::{Waveform, wave_sample};

/// Morphing dual-waveform oscillator.
///
/// # Example
///
/// ```rust
/// use intervo_synth::{QuantumOsc, Waveform};
///
/// let mut osc = QuantumOsc::new(48000.0);
/// osc.set_frequency(440.0);
/// osc.set_waveforms(Waveform::Sine, Waveform::Saw);
/// osc.set_morph(0.3);
///
/// let sample = osc.process();
/// ```
#[derive(Debug, Clone)]
pub struct QuantumOsc {
    /// Shared phase position [0.0, 1.0)
    phase: f64,
    /// Phase increment per sample
    phase_inc: f64,
    sample_rate: f64,
    frequency: f64,
    wave_a: Waveform,
    wave_b: Waveform,
    /// Crossfade between wave_a (0.0) and wave_b (1.0)
    morph: f32,
    /// Duty cycle for pulse shapes
    pulse_width: f64,
}

impl Default for QuantumOsc {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl QuantumOsc {
    /// Create a new oscillator at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = f64::from(sample_rate);
        Self {
            phase: 0.0,
            phase_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
            wave_a: Waveform::Sine,
            wave_b: Waveform::Sine,
            morph: 0.0,
            pulse_width: 0.5,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = f64::from(freq_hz.max(0.0));
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency as f32
    }

    /// Set both waveform selectors.
    pub fn set_waveforms(&mut self, a: Waveform, b: Waveform) {
        self.wave_a = a;
        self.wave_b = b;
    }

    /// Set the first waveform.
    pub fn set_wave_a(&mut self, waveform: Waveform) {
        self.wave_a = waveform;
    }

    /// Set the second waveform.
    pub fn set_wave_b(&mut self, waveform: Waveform) {
        self.wave_b = waveform;
    }

    /// Current waveform pair.
    pub fn waveforms(&self) -> (Waveform, Waveform) {
        (self.wave_a, self.wave_b)
    }

    /// Set the morph position. Clamped to [0, 1].
    pub fn set_morph(&mut self, morph: f32) {
        self.morph = morph.clamp(0.0, 1.0);
    }

    /// Current morph position.
    pub fn morph(&self) -> f32 {
        self.morph
    }

    /// Set pulse width for square/pulse shapes. Clamped to [0.05, 0.95].
    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = f64::from(width.clamp(0.05, 0.95));
    }

    /// Current pulse width.
    pub fn pulse_width(&self) -> f32 {
        self.pulse_width as f32
    }

    /// Update the sample rate, preserving frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let a = wave_sample(self.wave_a, self.phase, self.phase_inc, self.pulse_width);
        let output = if self.morph <= 0.0 {
            a
        } else {
            let b = wave_sample(self.wave_b, self.phase, self.phase_inc, self.pulse_width);
            a * (1.0 - self.morph) + b * self.morph
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Fill a block with consecutive samples.
    pub fn process_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }
}
