//! Additive oscillator: a bank of up to 64 sine partials.
//!
//! Each partial has an amplitude, a frequency ratio relative to the
//! fundamental, and its own phase accumulator. Partials that would land
//! above Nyquist are silenced rather than aliased.

use core::f64::consts::TAU;
use libm::sin;

/// Maximum number of partials.
pub const MAX_PARTIALS: usize = 64;

/// Additive sine-bank oscillator.
///
/// # Example
///
/// ```rust
/// use intervo_synth::AdditiveOsc;
///
/// let mut osc = AdditiveOsc::new(48000.0);
/// osc.set_harmonic_series(1.0); // amp_k = 1/k, sawtooth-like
/// osc.set_frequency(220.0);
///
/// let sample = osc.process();
/// ```
#[derive(Debug, Clone)]
pub struct AdditiveOsc {
    amps: [f32; MAX_PARTIALS],
    ratios: [f32; MAX_PARTIALS],
    phases: [f64; MAX_PARTIALS],
    /// Amplitudes after Nyquist masking and normalization
    effective_amps: [f32; MAX_PARTIALS],
    frequency: f64,
    sample_rate: f64,
}

impl Default for AdditiveOsc {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AdditiveOsc {
    /// Create an oscillator with only the fundamental active.
    pub fn new(sample_rate: f32) -> Self {
        let mut amps = [0.0; MAX_PARTIALS];
        amps[0] = 1.0;
        let mut ratios = [1.0; MAX_PARTIALS];
        for (k, ratio) in ratios.iter_mut().enumerate() {
            *ratio = (k + 1) as f32;
        }

        let mut osc = Self {
            amps,
            ratios,
            phases: [0.0; MAX_PARTIALS],
            effective_amps: [0.0; MAX_PARTIALS],
            frequency: 440.0,
            sample_rate: f64::from(sample_rate),
        };
        osc.update_effective_amps();
        osc
    }

    /// Set one partial's amplitude and frequency ratio.
    pub fn set_partial(&mut self, index: usize, amp: f32, ratio: f32) {
        if index < MAX_PARTIALS {
            self.amps[index] = amp.clamp(0.0, 1.0);
            self.ratios[index] = ratio.max(0.0);
            self.update_effective_amps();
        }
    }

    /// Partial amplitude at `index`.
    pub fn partial_amp(&self, index: usize) -> f32 {
        if index < MAX_PARTIALS {
            self.amps[index]
        } else {
            0.0
        }
    }

    /// Fill the bank with a harmonic series: `amp_k = 1/k^rolloff`,
    /// `ratio_k = k` for k = 1..=64.
    pub fn set_harmonic_series(&mut self, rolloff: f32) {
        let rolloff = rolloff.max(0.0);
        for k in 0..MAX_PARTIALS {
            let harmonic = (k + 1) as f32;
            self.amps[k] = 1.0 / libm::powf(harmonic, rolloff);
            self.ratios[k] = harmonic;
        }
        self.update_effective_amps();
    }

    /// Replace all partial amplitudes at once (ratios untouched).
    ///
    /// Used by the fractal oscillator, which recomputes the whole bank.
    pub fn set_amplitudes(&mut self, amps: &[f32]) {
        for (dst, &src) in self.amps.iter_mut().zip(amps.iter()) {
            *dst = src.clamp(0.0, 1.0);
        }
        self.update_effective_amps();
    }

    /// Set the fundamental frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = f64::from(freq_hz.max(0.0));
        self.update_effective_amps();
    }

    /// Current fundamental frequency.
    pub fn frequency(&self) -> f32 {
        self.frequency as f32
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        self.update_effective_amps();
    }

    /// Reset all partial phases.
    pub fn reset(&mut self) {
        self.phases = [0.0; MAX_PARTIALS];
    }

    /// Recompute per-partial output amplitudes: silence partials above
    /// Nyquist and normalize so the total never exceeds unity.
    fn update_effective_amps(&mut self) {
        let nyquist = self.sample_rate * 0.5;
        let mut total = 0.0f32;
        for k in 0..MAX_PARTIALS {
            let partial_freq = self.frequency * f64::from(self.ratios[k]);
            self.effective_amps[k] = if partial_freq >= nyquist || partial_freq <= 0.0 {
                0.0
            } else {
                self.amps[k]
            };
            total += self.effective_amps[k];
        }
        if total > 1.0 {
            let norm = 1.0 / total;
            for amp in &mut self.effective_amps {
                *amp *= norm;
            }
        }
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut sum = 0.0f32;
        for k in 0..MAX_PARTIALS {
            let amp = self.effective_amps[k];
            if amp == 0.0 {
                continue;
            }
            sum += amp * sin(self.phases[k] * TAU) as f32;
            self.phases[k] += self.frequency * f64::from(self.ratios[k]) / self.sample_rate;
            if self.phases[k] >= 1.0 {
                self.phases[k] -= 1.0;
            }
        }
        sum
    }

    /// Fill a block with consecutive samples.
    pub fn process_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }
}
