//! Intervo Synth - synthesis engine for the intervo audio engine
//!
//! This crate provides the sound-generating half of the engine: seven
//! oscillator families, a linear ADSR envelope, the per-note synth voice,
//! and the fixed-capacity voice allocator.
//!
//! # Oscillator Families
//!
//! All oscillators run at the engine sample rate, keep their phase in `f64`,
//! and emit `f32` samples via `process()` / `process_block()`:
//!
//! - [`QuantumOsc`] - two morphing waveforms sharing one phase, with
//!   PolyBLEP anti-aliasing on sharp edges
//! - [`LorenzOsc`] - Lorenz-attractor chaos, forward-Euler integrated
//! - [`WavetableOsc`] - up to 16 tables with bilinear position/phase
//!   interpolation
//! - [`FmOsc`] - up to 6 operators with a lower-triangular modulation matrix
//! - [`AdditiveOsc`] - up to 64 sine partials
//! - [`NoiseGen`] - white, pink, brown, velvet, and crackle noise
//! - [`FractalOsc`] - additive partials derived from Mandelbrot escape
//!   iterations
//!
//! # Voices
//!
//! A [`Voice`] combines two quantum oscillators, a noise source, a state
//! variable filter, and amplitude/filter envelopes. The [`VoiceAllocator`]
//! maps note-on/note-off events onto a fixed pool of voices with
//! oldest-voice stealing.
//!
//! ```rust
//! use intervo_synth::VoiceAllocator;
//!
//! let mut voices: VoiceAllocator<16> = VoiceAllocator::new(48000.0);
//! voices.note_on(60, 0.8);
//! voices.note_on(64, 0.8);
//!
//! let mut block = [0.0f32; 256];
//! voices.render(&mut block);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod envelope;
pub mod osc;
pub mod voice;

// Re-export main types at crate root
pub use envelope::{AdsrEnvelope, EnvelopeStage};
pub use osc::additive::{AdditiveOsc, MAX_PARTIALS};
pub use osc::chaos::{LorenzAxis, LorenzOsc};
pub use osc::fm::{FmAlgorithm, FmOsc, MAX_OPERATORS};
pub use osc::fractal::FractalOsc;
pub use osc::noise::{NoiseColor, NoiseGen};
pub use osc::quantum::QuantumOsc;
pub use osc::wavetable::{MAX_TABLES, TABLE_SIZE, WavetableOsc};
pub use osc::Waveform;
pub use voice::{Voice, VoiceAllocator, midi_to_freq};
