//! Schroeder allpass filter for reverb diffusion.
//!
//! Passes all frequencies at equal amplitude while smearing phase, which
//! densifies a reverb tail without coloring it. The series building block
//! of Schroeder-style reverbs.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Schroeder allpass filter.
///
/// # Example
///
/// ```rust
/// use intervo_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(556);
/// allpass.set_feedback(0.5);
///
/// let output = allpass.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with the given delay length in samples.
    ///
    /// # Panics
    ///
    /// Panics if `delay_samples` is 0.
    pub fn new(delay_samples: usize) -> Self {
        assert!(delay_samples > 0, "allpass delay must be > 0");
        Self {
            buffer: vec![0.0; delay_samples],
            pos: 0,
            feedback: 0.5,
        }
    }

    /// Set the feedback coefficient. Stable for |feedback| < 1; clamped to
    /// `[-0.99, 0.99]`. Around 0.5 works well for diffusion.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Process one sample through the allpass.
    ///
    /// Schroeder structure: `output = -input + delayed`,
    /// `delay_input = input + delayed * feedback`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let output = -input + delayed;

        self.buffer[self.pos] = flush_denormal(input + delayed * self.feedback);
        self.pos = (self.pos + 1) % self.buffer.len();

        output
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; an allpass has at least one sample of delay.
    pub fn is_empty(&self) -> bool {
        false
    }
}
