//! Intervo Effects - the per-track effect chain and its ten effect kinds
//!
//! Each effect is a plain struct implementing
//! [`Effect`](intervo_core::Effect) for processing and
//! [`ParameterInfo`](intervo_core::ParameterInfo) for introspection. The
//! parameter indices, ranges, and defaults per kind are a stable external
//! contract — commands and the project file address parameters by
//! `(kind, index)`.
//!
//! # Effect Kinds
//!
//! | Kind | Algorithm |
//! |------|-----------|
//! | [`Gain`] | smoothed linear gain |
//! | [`Eq`] | low shelf + mid peak + high shelf biquads |
//! | [`Compressor`] | RMS detector, feed-forward gain computer |
//! | [`Reverb`] | Schroeder: 8 parallel combs + 4 series allpasses |
//! | [`Delay`] | interpolated circular buffer with feedback |
//! | [`Distortion`] | tanh drive, one-pole tone, dry/wet |
//! | [`Chorus`] | 2-tap LFO-modulated delay, quadrature stereo |
//! | [`Phaser`] | LFO-swept first-order allpass cascade |
//! | [`Filter`] | state variable filter (LP/HP/BP) |
//! | [`Limiter`] | peak detector with smooth gain reduction |
//!
//! # Chain
//!
//! [`EffectChain`] holds up to 16 [`EffectSlot`]s processed in ascending
//! order. Dispatch goes through the [`EffectState`] tagged union — one
//! `match` per block, no per-sample virtual calls.
//!
//! ```rust
//! use intervo_effects::{EffectChain, EffectKind};
//!
//! let mut chain = EffectChain::new(48000.0);
//! chain.add(EffectKind::Distortion);
//! chain.add(EffectKind::Delay);
//!
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! chain.process_block(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chain;
pub mod chorus;
pub mod compressor;
pub mod delay;
pub mod distortion;
pub mod eq;
pub mod filter;
pub mod gain;
pub mod limiter;
pub mod phaser;
pub mod reverb;
pub mod slot;

// Re-export main types at crate root
pub use chain::{EffectChain, MAX_EFFECTS};
pub use chorus::Chorus;
pub use compressor::Compressor;
pub use delay::Delay;
pub use distortion::Distortion;
pub use eq::Eq;
pub use filter::Filter;
pub use gain::Gain;
pub use limiter::Limiter;
pub use phaser::Phaser;
pub use reverb::Reverb;
pub use slot::{EffectKind, EffectSlot, EffectState, MAX_PARAMS};
