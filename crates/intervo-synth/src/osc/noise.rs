//! Multi-colored noise generator.
//!
//! Five variants: white (xorshift32), pink (Paul Kellet three-pole filter),
//! brown (leaky integration), velvet (sparse signed impulses), and crackle
//! (rare decaying bursts). Each generator owns its PRNG, so identical seeds
//! give identical sample streams.

use super::Xorshift32;

/// Noise variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoiseColor {
    /// Flat spectrum.
    #[default]
    White,
    /// -3 dB/octave, filtered white noise.
    Pink,
    /// -6 dB/octave, integrated white noise.
    Brown,
    /// Sparse random impulses at a configured density.
    Velvet,
    /// Rare short bursts between stretches of silence.
    Crackle,
}

/// Pink filter input coefficients (Paul Kellet three-pole).
const PINK_COEFFS: [f32; 3] = [0.02109238, 0.07113478, 0.68873558];

/// Pink filter pole feedbacks.
const PINK_FEEDBACK: [f32; 3] = [0.3190, 0.7756, 0.9638];

/// Output normalization for the pink filter sum, tuned for roughly unit RMS
/// relative to the white source.
const PINK_NORM: f32 = 0.55;

/// Leakage for the brown-noise integrator.
const BROWN_LEAK: f32 = 0.996;

/// Step scale for the brown-noise integrator.
const BROWN_STEP: f32 = 0.02;

/// Per-sample probability scale of starting a crackle burst (bursts/second).
const CRACKLE_RATE: f32 = 25.0;

/// Decay factor per sample of a crackle burst envelope.
const CRACKLE_DECAY: f32 = 0.985;

/// Multi-colored noise generator.
///
/// # Example
///
/// ```rust
/// use intervo_synth::{NoiseGen, NoiseColor};
///
/// let mut noise = NoiseGen::new(48000.0);
/// noise.set_color(NoiseColor::Pink);
///
/// let sample = noise.process();
/// ```
#[derive(Debug, Clone)]
pub struct NoiseGen {
    color: NoiseColor,
    rng: Xorshift32,
    /// Pink filter pole states
    pink_state: [f32; 3],
    /// Brown integrator state
    brown_state: f32,
    /// Velvet impulse density in impulses per second
    velvet_density: f32,
    /// Crackle burst envelope (0 = silent)
    crackle_env: f32,
    sample_rate: f32,
}

impl Default for NoiseGen {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl NoiseGen {
    /// Create a white-noise generator with the default seed.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, 0x12345678)
    }

    /// Create a generator with an explicit PRNG seed.
    pub fn with_seed(sample_rate: f32, seed: u32) -> Self {
        Self {
            color: NoiseColor::White,
            rng: Xorshift32::new(seed),
            pink_state: [0.0; 3],
            brown_state: 0.0,
            velvet_density: 1000.0,
            crackle_env: 0.0,
            sample_rate,
        }
    }

    /// Select the noise variant.
    pub fn set_color(&mut self, color: NoiseColor) {
        self.color = color;
    }

    /// Current noise variant.
    pub fn color(&self) -> NoiseColor {
        self.color
    }

    /// Set velvet impulse density in impulses per second.
    pub fn set_velvet_density(&mut self, density: f32) {
        self.velvet_density = density.clamp(1.0, 20000.0);
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Reset filter/integrator state. The PRNG sequence is not rewound.
    pub fn reset(&mut self) {
        self.pink_state = [0.0; 3];
        self.brown_state = 0.0;
        self.crackle_env = 0.0;
    }

    /// Re-seed the PRNG, restarting the random sequence.
    pub fn reseed(&mut self, seed: u32) {
        self.rng = Xorshift32::new(seed);
        self.reset();
    }

    /// Generate the next sample in [-1, 1].
    #[inline]
    pub fn process(&mut self) -> f32 {
        match self.color {
            NoiseColor::White => self.rng.next_bipolar(),

            NoiseColor::Pink => {
                let white = self.rng.next_bipolar();
                for i in 0..3 {
                    self.pink_state[i] =
                        PINK_FEEDBACK[i] * self.pink_state[i] + PINK_COEFFS[i] * white;
                }
                let sum: f32 = self.pink_state.iter().sum();
                (sum * PINK_NORM).clamp(-1.0, 1.0)
            }

            NoiseColor::Brown => {
                let white = self.rng.next_bipolar();
                self.brown_state =
                    (self.brown_state * BROWN_LEAK + white * BROWN_STEP).clamp(-1.0, 1.0);
                self.brown_state
            }

            NoiseColor::Velvet => {
                let p = self.velvet_density / self.sample_rate;
                if self.rng.next_unit() < p {
                    if self.rng.next_unit() < 0.5 { 1.0 } else { -1.0 }
                } else {
                    0.0
                }
            }

            NoiseColor::Crackle => {
                if self.crackle_env < 1e-4 {
                    self.crackle_env = 0.0;
                    if self.rng.next_unit() < CRACKLE_RATE / self.sample_rate {
                        self.crackle_env = 1.0;
                    }
                    0.0
                } else {
                    let out = self.crackle_env * self.rng.next_bipolar();
                    self.crackle_env *= CRACKLE_DECAY;
                    out
                }
            }
        }
    }

    /// Fill a block with consecutive samples.
    pub fn process_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }
}
