//! Intervo Core - DSP primitives for the intervo audio engine
//!
//! This crate provides the foundational building blocks shared by the
//! synthesis, effect, and engine crates. Everything here is designed for
//! real-time audio processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for all audio processors
//!
//! ## Parameter Handling
//!
//! - [`SmoothedParam`] - Exponential smoothing for zipper-free changes
//! - [`ParamDescriptor`] / [`ParameterInfo`] - Introspectable parameter
//!   metadata with stable per-kind indices
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - Chamberlin SVF (lowpass, highpass, bandpass,
//!   notch)
//! - [`Biquad`] - Second-order IIR with RBJ cookbook coefficients
//! - [`OnePole`] - 6 dB/oct lowpass for tone controls and damping
//! - [`CombFilter`] / [`AllpassFilter`] - Schroeder reverb building blocks
//!
//! ## Delay Lines & Modulation
//!
//! - [`InterpolatedDelay`] - Variable-length delay with linear interpolation
//! - [`Lfo`] - Low-frequency oscillator for modulation effects
//! - [`EnvelopeFollower`] - Amplitude detection with attack/release ballistics
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded use. Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! intervo-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocations in processing paths; buffers are
//!   sized at construction
//! - **No dependency on std**: pure `no_std` with `libm` for math
//! - **Object-safe traits**: dynamic dispatch where runtime flexibility is
//!   needed, static dispatch everywhere else

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;
pub mod svf;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use biquad::{
    Biquad, high_shelf_coefficients, highpass_coefficients, low_shelf_coefficients,
    lowpass_coefficients, peaking_eq_coefficients,
};
pub use comb::CombFilter;
pub use delay::InterpolatedDelay;
pub use effect::Effect;
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    db_to_linear, flush_denormal, lerp, linear_to_db, ms_to_samples, samples_to_ms, soft_clip,
    soft_clip_exact, wet_dry_mix, wet_dry_mix_stereo,
};
pub use one_pole::OnePole;
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamScale, ParamUnit, ParameterInfo};
pub use svf::{StateVariableFilter, SvfMode};
