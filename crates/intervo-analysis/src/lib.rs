//! Intervo Analysis - visualization taps for the intervo audio engine
//!
//! Three outputs feed visualization clients:
//!
//! - [`ScopeTap`] - a lock-free stereo ring the audio thread writes every
//!   sample; readers snapshot the most recent window
//! - [`SpectrumTap`] + [`SpectrumAnalyzer`] - the audio thread streams
//!   post-master samples into a mono ring; the *reader* runs the
//!   Hann-windowed FFT and reduces it to 32 log-spaced bands
//! - [`PeakMeter`] - instant-attack, timed-release peak ballistics
//!
//! The taps are plain atomics (`AtomicU32` bit-cast samples with
//! release/acquire indices), so the audio thread never locks and readers
//! may observe a partial window — they simply get the latest completed
//! samples.

pub mod fft;
pub mod meter;
pub mod spectrum;
pub mod tap;

pub use fft::{Fft, Window};
pub use meter::PeakMeter;
pub use spectrum::{NUM_BANDS, SPECTRUM_HOP, SPECTRUM_WINDOW, SpectrumAnalyzer};
pub use tap::{AtomicF32, SCOPE_CAPACITY, ScopeTap, SpectrumTap};
