//! Chaos oscillator built on the Lorenz attractor.
//!
//! Integrates the Lorenz system with forward Euler at a rate-scaled step and
//! outputs one axis, scaled and soft-clipped. At audio rates the attractor
//! produces evolving, never-repeating quasi-pitched tones.

use intervo_core::soft_clip;

/// Which attractor axis to output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LorenzAxis {
    /// The x coordinate (default).
    #[default]
    X,
    /// The y coordinate.
    Y,
    /// The z coordinate (offset-removed).
    Z,
}

/// Lorenz-attractor chaos oscillator.
///
/// ```text
/// dx = sigma * (y - x) * dt
/// dy = (x * (rho - z) - y) * dt
/// dz = (x * y - beta * z) * dt
/// ```
///
/// with `dt = rate_scale / sample_rate`. Defaults: sigma = 10, rho = 28,
/// beta = 8/3 — the classic chaotic regime.
///
/// # Example
///
/// ```rust
/// use intervo_synth::LorenzOsc;
///
/// let mut osc = LorenzOsc::new(48000.0);
/// osc.set_rate_scale(150.0);
/// let sample = osc.process();
/// ```
#[derive(Debug, Clone)]
pub struct LorenzOsc {
    x: f64,
    y: f64,
    z: f64,
    sigma: f64,
    rho: f64,
    beta: f64,
    /// Integration speed multiplier; higher is brighter
    rate_scale: f64,
    /// Output scale applied before the soft clip
    output_scale: f32,
    axis: LorenzAxis,
    sample_rate: f64,
}

impl Default for LorenzOsc {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl LorenzOsc {
    /// Create a new oscillator seeded at the canonical starting point.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            x: 0.1,
            y: 0.0,
            z: 0.0,
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            rate_scale: 100.0,
            output_scale: 1.0 / 20.0,
            axis: LorenzAxis::X,
            sample_rate: f64::from(sample_rate),
        }
    }

    /// Set sigma (the Prandtl number).
    pub fn set_sigma(&mut self, sigma: f32) {
        self.sigma = f64::from(sigma.clamp(0.1, 50.0));
    }

    /// Set rho (the Rayleigh number).
    pub fn set_rho(&mut self, rho: f32) {
        self.rho = f64::from(rho.clamp(0.1, 100.0));
    }

    /// Set beta. Held above 0.01 — non-positive beta lets z blow up.
    pub fn set_beta(&mut self, beta: f32) {
        self.beta = f64::from(beta.max(0.01));
    }

    /// Set the integration rate multiplier. Clamped to [1, 500].
    pub fn set_rate_scale(&mut self, rate_scale: f32) {
        self.rate_scale = f64::from(rate_scale.clamp(1.0, 500.0));
    }

    /// Set the output scale applied before soft clipping.
    pub fn set_output_scale(&mut self, scale: f32) {
        self.output_scale = scale.clamp(0.0, 1.0);
    }

    /// Select the output axis.
    pub fn set_axis(&mut self, axis: LorenzAxis) {
        self.axis = axis;
    }

    /// Current output axis.
    pub fn axis(&self) -> LorenzAxis {
        self.axis
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
    }

    /// Re-seed the attractor at `(0.1, 0, 0)`.
    pub fn reset(&mut self) {
        self.x = 0.1;
        self.y = 0.0;
        self.z = 0.0;
    }

    /// Whether the integrator state is still finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let dt = self.rate_scale / self.sample_rate;

        let dx = self.sigma * (self.y - self.x) * dt;
        let dy = (self.x * (self.rho - self.z) - self.y) * dt;
        let dz = (self.x * self.y - self.beta * self.z) * dt;

        self.x += dx;
        self.y += dy;
        self.z += dz;

        let raw = match self.axis {
            LorenzAxis::X => self.x,
            LorenzAxis::Y => self.y,
            // z orbits around rho - 1; remove the offset to center the output
            LorenzAxis::Z => self.z - (self.rho - 1.0),
        };

        soft_clip(raw as f32 * self.output_scale)
    }

    /// Fill a block with consecutive samples.
    ///
    /// The integrator state is checked once per block; if it has gone
    /// non-finite the attractor is re-seeded and the block is silence.
    pub fn process_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
        if !self.is_finite() {
            self.reset();
            out.fill(0.0);
        }
    }
}
