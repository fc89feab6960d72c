//! Schroeder reverb: 8 parallel combs into 4 series allpasses per channel.
//!
//! Classic Schroeder/Freeverb topology. The comb bank creates the modal
//! density, the allpass chain smears it into a smooth tail. The right
//! channel runs a slightly detuned copy of the network (+23 samples on
//! every delay) for stereo decorrelation.
//!
//! # References
//!
//! - Schroeder, "Natural Sounding Artificial Reverberation", JAES 1962.
//! - Jezar, Freeverb — delay tunings and damping structure.

use intervo_core::{AllpassFilter, CombFilter, Effect, ParamDescriptor, ParameterInfo};
use libm::roundf;

/// Comb delay tunings at the 44.1 kHz reference rate (from Freeverb,
/// mutually prime).
const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass delay tunings at the 44.1 kHz reference rate.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Right-channel offset in samples for stereo decorrelation.
const STEREO_SPREAD: usize = 23;

/// Reference sample rate for the tuning constants.
const REFERENCE_RATE: f32 = 44100.0;

/// Allpass diffusion feedback.
const ALLPASS_FEEDBACK: f32 = 0.5;

/// Comb feedback at room = 0.
const ROOM_FEEDBACK_BASE: f32 = 0.7;

/// Comb feedback span across the room range.
const ROOM_FEEDBACK_SPAN: f32 = 0.28;

/// Wet output normalization for the 8-comb sum.
const WET_SCALE: f32 = 0.015;

/// Scale delay samples from the 44.1 kHz reference to the target rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    (roundf(samples as f32 * target_rate / REFERENCE_RATE) as usize).max(1)
}

/// One channel of the Schroeder network.
#[derive(Debug, Clone)]
struct ReverbChannel {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl ReverbChannel {
    fn new(sample_rate: f32, offset: usize) -> Self {
        let combs = core::array::from_fn(|i| {
            CombFilter::new(scale_to_rate(COMB_TUNINGS_44K[i] + offset, sample_rate))
        });
        let allpasses = core::array::from_fn(|i| {
            let mut ap =
                AllpassFilter::new(scale_to_rate(ALLPASS_TUNINGS_44K[i] + offset, sample_rate));
            ap.set_feedback(ALLPASS_FEEDBACK);
            ap
        });
        Self { combs, allpasses }
    }

    fn set_feedback(&mut self, feedback: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    fn set_damp(&mut self, damp: f32) {
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mut wet = 0.0;
        for comb in &mut self.combs {
            wet += comb.process(input);
        }
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }
        wet * WET_SCALE
    }

    fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}

/// Schroeder reverb.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Room | 0–1 | 0.5 |
/// | 1 | Damping | 0–1 | 0.5 |
/// | 2 | Width | 0–1 | 1.0 |
/// | 3 | Mix | 0–1 | 0.3 |
///
/// `mix = 0` passes the dry signal through untouched.
#[derive(Debug, Clone)]
pub struct Reverb {
    left: ReverbChannel,
    right: ReverbChannel,
    room: f32,
    damping: f32,
    width: f32,
    mix: f32,
    sample_rate: f32,
}

impl Reverb {
    /// Create a medium-room reverb.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            left: ReverbChannel::new(sample_rate, 0),
            right: ReverbChannel::new(sample_rate, STEREO_SPREAD),
            room: 0.5,
            damping: 0.5,
            width: 1.0,
            mix: 0.3,
            sample_rate,
        };
        reverb.update_network();
        reverb
    }

    /// Set the room size (0 = small, 1 = large).
    pub fn set_room(&mut self, room: f32) {
        let clamped = room.clamp(0.0, 1.0);
        if clamped != self.room {
            self.room = clamped;
            self.update_network();
        }
    }

    /// Set high-frequency damping (0 = bright, 1 = dark).
    pub fn set_damping(&mut self, damping: f32) {
        let clamped = damping.clamp(0.0, 1.0);
        if clamped != self.damping {
            self.damping = clamped;
            self.update_network();
        }
    }

    /// Set stereo width (0 = mono wet, 1 = full decorrelation).
    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(0.0, 1.0);
    }

    /// Set the wet/dry mix.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    fn update_network(&mut self) {
        let feedback = ROOM_FEEDBACK_BASE + ROOM_FEEDBACK_SPAN * self.room;
        self.left.set_feedback(feedback);
        self.right.set_feedback(feedback);
        self.left.set_damp(self.damping);
        self.right.set_damp(self.damping);
    }
}

impl Effect for Reverb {
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        (l + r) * 0.5
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        if self.mix <= 0.0 {
            // Identity-in-mix: keep feeding the network so the tail stays
            // warm, but the output is the dry signal exactly
            let _ = self.left.process(left);
            let _ = self.right.process(right);
            return (left, right);
        }

        let wet_l = self.left.process(left);
        let wet_r = self.right.process(right);

        // Width crossfades the right wet signal toward the left network
        let wet_r = wet_r * self.width + wet_l * (1.0 - self.width);

        (
            left + (wet_l - left) * self.mix,
            right + (wet_r - right) * self.mix,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.left = ReverbChannel::new(sample_rate, 0);
            self.right = ReverbChannel::new(sample_rate, STEREO_SPREAD);
            self.update_network();
        }
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

impl ParameterInfo for Reverb {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::custom("Room", "Room", 0.0, 1.0, 0.5)),
            1 => Some(ParamDescriptor::custom("Damping", "Damp", 0.0, 1.0, 0.5)),
            2 => Some(ParamDescriptor::custom("Width", "Width", 0.0, 1.0, 1.0)),
            3 => Some(ParamDescriptor::mix(0.3)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.room,
            1 => self.damping,
            2 => self.width,
            3 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_room(value),
            1 => self.set_damping(value),
            2 => self.set_width(value),
            3 => self.set_mix(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_zero_is_identity() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(0.0);

        for i in 0..4800 {
            let x = libm::sinf(i as f32 * 0.05) * 0.5;
            let (l, r) = reverb.process_stereo(x, -x);
            assert_eq!(l, x, "mix=0 must be exact identity");
            assert_eq!(r, -x);
        }
    }

    #[test]
    fn test_impulse_produces_tail() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);

        reverb.process_stereo(1.0, 1.0);

        // Energy should arrive after the shortest comb delay and persist
        let mut tail_energy = 0.0f32;
        for _ in 0..48000 {
            let (l, r) = reverb.process_stereo(0.0, 0.0);
            tail_energy += l.abs() + r.abs();
        }
        assert!(tail_energy > 0.1, "reverb should produce a tail: {tail_energy}");
    }

    #[test]
    fn test_tail_decays() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_mix(1.0);
        reverb.set_room(0.5);

        reverb.process_stereo(1.0, 1.0);

        let mut early = 0.0f32;
        for _ in 0..24000 {
            let (l, _) = reverb.process_stereo(0.0, 0.0);
            early += l.abs();
        }
        let mut late = 0.0f32;
        for _ in 0..24000 {
            let (l, _) = reverb.process_stereo(0.0, 0.0);
            late += l.abs();
        }
        assert!(late < early, "tail must decay: early {early}, late {late}");
    }

    #[test]
    fn test_larger_room_longer_tail() {
        let measure = |room: f32| -> f32 {
            let mut reverb = Reverb::new(48000.0);
            reverb.set_mix(1.0);
            reverb.set_room(room);
            reverb.process_stereo(1.0, 1.0);
            // Skip the first second, then measure the late tail
            for _ in 0..48000 {
                reverb.process_stereo(0.0, 0.0);
            }
            let mut energy = 0.0f32;
            for _ in 0..48000 {
                let (l, r) = reverb.process_stereo(0.0, 0.0);
                energy += l.abs() + r.abs();
            }
            energy
        };

        assert!(
            measure(1.0) > measure(0.0),
            "larger room should sustain a longer tail"
        );
    }

    #[test]
    fn test_param_clamp() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_param(3, 5.0);
        assert_eq!(reverb.get_param(3), 1.0);
        reverb.set_param(3, -0.2);
        assert_eq!(reverb.get_param(3), 0.0);
    }

    #[test]
    fn test_stable_long_run() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_room(1.0);
        reverb.set_mix(1.0);

        let mut peak = 0.0f32;
        for i in 0..240000 {
            let x = libm::sinf(i as f32 * 0.01) * 0.8;
            let (l, r) = reverb.process_stereo(x, x);
            assert!(l.is_finite() && r.is_finite());
            peak = peak.max(l.abs()).max(r.abs());
        }
        assert!(peak < 10.0, "reverb unstable: peak {peak}");
    }
}
