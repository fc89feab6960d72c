//! Effect kinds, the tagged effect union, and chain slots.
//!
//! Each slot holds an [`EffectState`] — a sum type over the ten effect
//! structs — so the chain dispatches with one `match` per block instead of
//! virtual calls per sample. The `u8` discriminants of [`EffectKind`] are
//! part of the project file format and must not be reordered.

use intervo_core::{Effect, ParamDescriptor, ParameterInfo};

use crate::chorus::Chorus;
use crate::compressor::Compressor;
use crate::delay::Delay;
use crate::distortion::Distortion;
use crate::eq::Eq;
use crate::filter::Filter;
use crate::gain::Gain;
use crate::limiter::Limiter;
use crate::phaser::Phaser;
use crate::reverb::Reverb;

/// Maximum parameters any effect kind exposes.
pub const MAX_PARAMS: usize = 8;

/// The ten effect kinds.
///
/// Discriminant values are serialized into project files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EffectKind {
    /// Smoothed linear gain.
    Gain = 0,
    /// Three-band shelving EQ.
    Eq = 1,
    /// RMS compressor.
    Compressor = 2,
    /// Schroeder reverb.
    Reverb = 3,
    /// Feedback delay.
    Delay = 4,
    /// Tanh distortion.
    Distortion = 5,
    /// Quadrature chorus.
    Chorus = 6,
    /// Allpass-cascade phaser.
    Phaser = 7,
    /// State variable filter.
    Filter = 8,
    /// Peak limiter.
    Limiter = 9,
}

impl EffectKind {
    /// All kinds in discriminant order.
    pub const ALL: [EffectKind; 10] = [
        EffectKind::Gain,
        EffectKind::Eq,
        EffectKind::Compressor,
        EffectKind::Reverb,
        EffectKind::Delay,
        EffectKind::Distortion,
        EffectKind::Chorus,
        EffectKind::Phaser,
        EffectKind::Filter,
        EffectKind::Limiter,
    ];

    /// Decode a serialized kind byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        EffectKind::ALL.get(value as usize).copied()
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Gain => "Gain",
            EffectKind::Eq => "EQ",
            EffectKind::Compressor => "Compressor",
            EffectKind::Reverb => "Reverb",
            EffectKind::Delay => "Delay",
            EffectKind::Distortion => "Distortion",
            EffectKind::Chorus => "Chorus",
            EffectKind::Phaser => "Phaser",
            EffectKind::Filter => "Filter",
            EffectKind::Limiter => "Limiter",
        }
    }
}

/// Tagged union over the ten effect implementations.
#[derive(Debug, Clone)]
pub enum EffectState {
    /// See [`Gain`].
    Gain(Gain),
    /// See [`Eq`].
    Eq(Eq),
    /// See [`Compressor`].
    Compressor(Compressor),
    /// See [`Reverb`].
    Reverb(Reverb),
    /// See [`Delay`].
    Delay(Delay),
    /// See [`Distortion`].
    Distortion(Distortion),
    /// See [`Chorus`].
    Chorus(Chorus),
    /// See [`Phaser`].
    Phaser(Phaser),
    /// See [`Filter`].
    Filter(Filter),
    /// See [`Limiter`].
    Limiter(Limiter),
}

/// Run `$body` with `$inner` bound to the concrete effect.
macro_rules! with_effect {
    ($self:expr, $inner:ident, $body:expr) => {
        match $self {
            EffectState::Gain($inner) => $body,
            EffectState::Eq($inner) => $body,
            EffectState::Compressor($inner) => $body,
            EffectState::Reverb($inner) => $body,
            EffectState::Delay($inner) => $body,
            EffectState::Distortion($inner) => $body,
            EffectState::Chorus($inner) => $body,
            EffectState::Phaser($inner) => $body,
            EffectState::Filter($inner) => $body,
            EffectState::Limiter($inner) => $body,
        }
    };
}

impl EffectState {
    /// Construct the default effect of a kind.
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        match kind {
            EffectKind::Gain => EffectState::Gain(Gain::new(sample_rate)),
            EffectKind::Eq => EffectState::Eq(Eq::new(sample_rate)),
            EffectKind::Compressor => EffectState::Compressor(Compressor::new(sample_rate)),
            EffectKind::Reverb => EffectState::Reverb(Reverb::new(sample_rate)),
            EffectKind::Delay => EffectState::Delay(Delay::new(sample_rate)),
            EffectKind::Distortion => EffectState::Distortion(Distortion::new(sample_rate)),
            EffectKind::Chorus => EffectState::Chorus(Chorus::new(sample_rate)),
            EffectKind::Phaser => EffectState::Phaser(Phaser::new(sample_rate)),
            EffectKind::Filter => EffectState::Filter(Filter::new(sample_rate)),
            EffectKind::Limiter => EffectState::Limiter(Limiter::new(sample_rate)),
        }
    }

    /// The kind tag of this state.
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectState::Gain(_) => EffectKind::Gain,
            EffectState::Eq(_) => EffectKind::Eq,
            EffectState::Compressor(_) => EffectKind::Compressor,
            EffectState::Reverb(_) => EffectKind::Reverb,
            EffectState::Delay(_) => EffectKind::Delay,
            EffectState::Distortion(_) => EffectKind::Distortion,
            EffectState::Chorus(_) => EffectKind::Chorus,
            EffectState::Phaser(_) => EffectKind::Phaser,
            EffectState::Filter(_) => EffectKind::Filter,
            EffectState::Limiter(_) => EffectKind::Limiter,
        }
    }
}

impl Effect for EffectState {
    fn process(&mut self, input: f32) -> f32 {
        with_effect!(self, e, e.process(input))
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        with_effect!(self, e, e.process_stereo(left, right))
    }

    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        with_effect!(self, e, e.process_block(left, right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        with_effect!(self, e, e.set_sample_rate(sample_rate))
    }

    fn reset(&mut self) {
        with_effect!(self, e, e.reset())
    }
}

impl ParameterInfo for EffectState {
    fn param_count(&self) -> usize {
        with_effect!(self, e, e.param_count())
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        with_effect!(self, e, e.param_info(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        with_effect!(self, e, e.get_param(index))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        with_effect!(self, e, e.set_param(index, value))
    }
}

/// One chain slot: an effect plus its bypass flag.
///
/// Bypass skips processing but preserves all internal state, so toggling
/// cannot click from state loss.
#[derive(Debug, Clone)]
pub struct EffectSlot {
    /// The effect state.
    pub state: EffectState,
    /// When set, the slot passes audio through untouched.
    pub bypass: bool,
}

impl EffectSlot {
    /// Create a slot with the default effect of a kind.
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        Self {
            state: EffectState::new(kind, sample_rate),
            bypass: false,
        }
    }

    /// The kind of the held effect.
    pub fn kind(&self) -> EffectKind {
        self.state.kind()
    }

    /// Snapshot all parameter values, padded to [`MAX_PARAMS`].
    pub fn param_values(&self) -> [f32; MAX_PARAMS] {
        let mut values = [0.0; MAX_PARAMS];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.state.get_param(i);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_u8(kind as u8), Some(kind));
        }
        assert_eq!(EffectKind::from_u8(10), None);
        assert_eq!(EffectKind::from_u8(255), None);
    }

    #[test]
    fn test_state_kind_matches() {
        for kind in EffectKind::ALL {
            let state = EffectState::new(kind, 48000.0);
            assert_eq!(state.kind(), kind);
        }
    }

    #[test]
    fn test_all_kinds_have_defaults_in_range() {
        for kind in EffectKind::ALL {
            let state = EffectState::new(kind, 48000.0);
            for i in 0..state.param_count() {
                let desc = state.param_info(i).unwrap();
                let value = state.get_param(i);
                assert!(
                    value >= desc.min - 1e-4 && value <= desc.max + 1e-4,
                    "{:?} param {i} default {value} outside [{}, {}]",
                    kind,
                    desc.min,
                    desc.max
                );
            }
        }
    }

    #[test]
    fn test_param_counts_fit_max() {
        for kind in EffectKind::ALL {
            let state = EffectState::new(kind, 48000.0);
            assert!(
                state.param_count() <= MAX_PARAMS,
                "{kind:?} exceeds MAX_PARAMS"
            );
        }
    }

    #[test]
    fn test_set_param_clamps_everywhere() {
        for kind in EffectKind::ALL {
            let mut state = EffectState::new(kind, 48000.0);
            for i in 0..state.param_count() {
                let desc = state.param_info(i).unwrap();

                state.set_param(i, desc.max + 1000.0);
                let stored = state.get_param(i);
                assert!(
                    (stored - desc.max).abs() < 1e-3,
                    "{kind:?} param {i}: over-range stored {stored}, expected {}",
                    desc.max
                );

                state.set_param(i, desc.min - 1000.0);
                let stored = state.get_param(i);
                assert!(
                    (stored - desc.min).abs() < 1e-3,
                    "{kind:?} param {i}: under-range stored {stored}, expected {}",
                    desc.min
                );
            }
        }
    }

    #[test]
    fn test_all_kinds_process_finite() {
        for kind in EffectKind::ALL {
            let mut state = EffectState::new(kind, 48000.0);
            for i in 0..4096 {
                let x = libm::sinf(i as f32 * 0.1);
                let (l, r) = state.process_stereo(x, -x);
                assert!(
                    l.is_finite() && r.is_finite(),
                    "{kind:?} produced non-finite output"
                );
            }
        }
    }

    #[test]
    fn test_slot_param_values_snapshot() {
        let slot = EffectSlot::new(EffectKind::Reverb, 48000.0);
        let values = slot.param_values();
        assert_eq!(values[0], 0.5); // room
        assert_eq!(values[3], 0.3); // mix
        assert_eq!(values[7], 0.0); // padding
    }
}
