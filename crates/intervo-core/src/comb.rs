//! Feedback comb filter for reverb algorithms.
//!
//! A comb filter with damping (one-pole lowpass in the feedback path), the
//! parallel building block of Schroeder-style reverbs.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Comb filter with feedback and damping.
///
/// The feedback path includes a one-pole lowpass, simulating the absorption
/// of high frequencies in real acoustic spaces.
///
/// # Example
///
/// ```rust
/// use intervo_core::CombFilter;
///
/// let mut comb = CombFilter::new(1116);
/// comb.set_feedback(0.84);
/// comb.set_damp(0.2);
///
/// let output = comb.process(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    feedback: f32,
    damp1: f32,
    damp2: f32,
    filterstore: f32,
}

impl CombFilter {
    /// Create a comb filter with the given delay length in samples.
    ///
    /// # Panics
    ///
    /// Panics if `delay_samples` is 0.
    pub fn new(delay_samples: usize) -> Self {
        assert!(delay_samples > 0, "comb delay must be > 0");
        Self {
            buffer: vec![0.0; delay_samples],
            pos: 0,
            feedback: 0.5,
            damp1: 0.5,
            damp2: 0.5,
            filterstore: 0.0,
        }
    }

    /// Set the feedback amount. Clamped to `[0, 0.98]`; higher values give
    /// longer decay.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    /// Current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping amount (0 = bright, 1 = dark).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp.clamp(0.0, 1.0);
        self.damp2 = 1.0 - self.damp1;
    }

    /// Current damping value.
    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp1
    }

    /// Process one sample through the comb.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.pos];

        // One-pole lowpass in the feedback path
        self.filterstore = flush_denormal(output * self.damp2 + self.filterstore * self.damp1);

        self.buffer[self.pos] = input + self.filterstore * self.feedback;
        self.pos = (self.pos + 1) % self.buffer.len();

        output
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filterstore = 0.0;
        self.pos = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a comb filter has at least one sample of delay.
    pub fn is_empty(&self) -> bool {
        false
    }
}
