//! Core Effect trait.
//!
//! The [`Effect`] trait is the common interface for all audio processors in
//! the workspace: track effects, filters inside synth voices, and the master
//! bus stages.
//!
//! ## Design Decisions
//!
//! - **Mono `process`, stereo `process_stereo`**: the mono path serves
//!   per-voice processing (filters, envelopes); the stereo path serves the
//!   track effect chain. The default stereo implementation runs each channel
//!   through `process`, which is only correct for stateless processors —
//!   stateful stereo effects must override it with independent per-channel
//!   state.
//!
//! - **Object-safe**: `dyn Effect` is supported for runtime chains, though
//!   the effect chain dispatches through a tagged union instead of vtables.
//!
//! - **No allocations**: all methods are callable from the audio thread.

/// Core trait for all audio processors.
pub trait Effect {
    /// Process a single mono sample.
    ///
    /// For effects with internal state (filters, delays) this advances the
    /// state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    ///
    /// The default routes each channel through [`process`](Self::process),
    /// which shares state between channels. Stateful stereo effects must
    /// override this with per-channel state.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process(left), self.process(right))
    }

    /// Process a stereo block in place.
    ///
    /// Default implementation calls [`process_stereo`](Self::process_stereo)
    /// per frame. Effects may override for block-level optimizations.
    ///
    /// Both buffers must have equal length.
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "stereo buffers must have equal length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (ol, or) = self.process_stereo(*l, *r);
            *l = ol;
            *r = or;
        }
    }

    /// Update the sample rate.
    ///
    /// Effects recalculate any sample-rate-dependent coefficients here
    /// (filter coefficients, delay times in samples, LFO increments).
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state.
    ///
    /// Clears delay lines and filter history without changing parameters.
    fn reset(&mut self);
}
