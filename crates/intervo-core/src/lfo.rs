//! Low-frequency oscillator for modulation effects.
//!
//! Generates smooth periodic modulation signals for the chorus and phaser.
//! Phase accumulation, no band-limiting — at sub-audio rates aliasing is a
//! non-issue.

use core::f32::consts::PI;
use libm::sinf;

/// LFO waveform type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Smooth sinusoidal modulation (default).
    #[default]
    Sine,
    /// Linear up/down ramps.
    Triangle,
}

/// Low-frequency oscillator.
///
/// # Example
///
/// ```rust
/// use intervo_core::{Lfo, LfoWaveform};
///
/// let mut lfo = Lfo::new(48000.0, 0.5);
/// lfo.set_waveform(LfoWaveform::Triangle);
///
/// // Values in [-1.0, 1.0]
/// let value = lfo.advance();
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Create a new LFO with the given sample rate and frequency.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Set waveform.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Set phase directly (0.0 to 1.0). Useful for quadrature taps:
    /// 0.25 = 90 degrees offset.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase.clamp(0.0, 1.0);
    }

    /// Current phase (0.0 to 1.0).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Update sample rate, preserving the frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.phase_inc = freq / sample_rate;
    }

    /// Get the next LFO value in [-1.0, 1.0] and advance.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let output = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * 2.0 * PI),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Value at a phase offset from the current position without advancing.
    ///
    /// Used for the chorus's quadrature second tap.
    #[inline]
    pub fn value_at_offset(&self, phase_offset: f32) -> f32 {
        let mut phase = self.phase + phase_offset;
        while phase >= 1.0 {
            phase -= 1.0;
        }
        while phase < 0.0 {
            phase += 1.0;
        }
        match self.waveform {
            LfoWaveform::Sine => sinf(phase * 2.0 * PI),
            LfoWaveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
        }
    }
}
