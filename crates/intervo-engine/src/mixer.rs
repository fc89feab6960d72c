//! Master bus: solo-aware sum, master volume, soft clip, meters.

use intervo_analysis::PeakMeter;
use intervo_core::{SmoothedParam, soft_clip};

/// The master bus.
///
/// Tracks are summed into the output buffers by the engine; `finalize`
/// applies the smoothed master volume, the rational-polynomial soft clip
/// (bounding output to `[-1, 1]`), and the master peak meters.
#[derive(Debug, Clone)]
pub struct Mixer {
    master: SmoothedParam,
    meter_l: PeakMeter,
    meter_r: PeakMeter,
}

impl Mixer {
    /// Create a unity-gain master bus.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            master: SmoothedParam::standard(1.0, sample_rate),
            meter_l: PeakMeter::new(sample_rate, 300.0),
            meter_r: PeakMeter::new(sample_rate, 300.0),
        }
    }

    /// Set the master volume. Clamped to `[0, 2]`.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master.set_target(volume.clamp(0.0, 2.0));
    }

    /// Master volume target.
    pub fn master_volume(&self) -> f32 {
        self.master.target()
    }

    /// Sum a rendered track into the output buffers.
    pub fn accumulate(track_l: &[f32], track_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        for (dst, src) in out_l.iter_mut().zip(track_l.iter()) {
            *dst += src;
        }
        for (dst, src) in out_r.iter_mut().zip(track_r.iter()) {
            *dst += src;
        }
    }

    /// Apply master volume, soft clip, and meters in place.
    ///
    /// Returns false if any input sample was non-finite — the caller is
    /// expected to silence the block and reset the offending components.
    pub fn finalize(&mut self, left: &mut [f32], right: &mut [f32]) -> bool {
        let mut finite = true;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            if !l.is_finite() || !r.is_finite() {
                finite = false;
                break;
            }
            let master = self.master.advance();
            *l = soft_clip(*l * master);
            *r = soft_clip(*r * master);
            self.meter_l.process(*l);
            self.meter_r.process(*r);
        }
        finite
    }

    /// Master peak levels.
    pub fn peaks(&self) -> (f32, f32) {
        (self.meter_l.level(), self.meter_r.level())
    }

    /// Reset meters and snap the volume smoother.
    pub fn reset(&mut self) {
        self.meter_l.reset();
        self.meter_r.reset();
        self.master.snap_to_target();
    }
}
