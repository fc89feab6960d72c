//! Tracks: a voice pool, an effect chain, and a mix position.

use crate::VOICES_PER_TRACK;
use crate::project::TrackId;
use crate::sequencer::{EventKind, NoteEvent};
use intervo_analysis::PeakMeter;
use intervo_core::SmoothedParam;
use intervo_effects::EffectChain;
use intervo_synth::VoiceAllocator;
use std::f32::consts::FRAC_PI_4;

/// One mixer channel: synth voices, effects, volume/pan/mute/solo.
///
/// Rendering is sample-accurate: note events carry frame offsets within the
/// block and the voice pool is advanced in sub-spans between them.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    /// Display name.
    pub name: String,
    /// Mute flag. Muted tracks still render (state keeps advancing) but do
    /// not reach the mix.
    pub mute: bool,
    /// Solo flag. When any track is soloed, only soloed tracks are mixed.
    pub solo: bool,
    /// Display color.
    pub color: [u8; 3],
    /// The track's effect chain.
    pub effects: EffectChain,
    voices: VoiceAllocator<VOICES_PER_TRACK>,
    volume: SmoothedParam,
    pan: SmoothedParam,
    meter_l: PeakMeter,
    meter_r: PeakMeter,
}

impl Track {
    /// Create a track at unity volume, centered pan.
    pub fn new(id: TrackId, name: &str, sample_rate: f32) -> Self {
        Self {
            id,
            name: name.to_string(),
            mute: false,
            solo: false,
            color: [0x80, 0x80, 0x80],
            effects: EffectChain::new(sample_rate),
            voices: VoiceAllocator::new(sample_rate),
            volume: SmoothedParam::standard(1.0, sample_rate),
            pan: SmoothedParam::standard(0.0, sample_rate),
            meter_l: PeakMeter::new(sample_rate, 300.0),
            meter_r: PeakMeter::new(sample_rate, 300.0),
        }
    }

    /// Stable id.
    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Set the linear volume. Clamped to `[0, 2]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume.set_target(volume.clamp(0.0, 2.0));
    }

    /// Volume target.
    pub fn volume(&self) -> f32 {
        self.volume.target()
    }

    /// Set the pan position. Clamped to `[-1, 1]`.
    pub fn set_pan(&mut self, pan: f32) {
        self.pan.set_target(pan.clamp(-1.0, 1.0));
    }

    /// Pan target.
    pub fn pan(&self) -> f32 {
        self.pan.target()
    }

    /// The voice pool.
    pub fn voices(&self) -> &VoiceAllocator<VOICES_PER_TRACK> {
        &self.voices
    }

    /// Mutable voice pool (patch configuration).
    pub fn voices_mut(&mut self) -> &mut VoiceAllocator<VOICES_PER_TRACK> {
        &mut self.voices
    }

    /// Post-effects peak levels from the last rendered block.
    pub fn peaks(&self) -> (f32, f32) {
        (self.meter_l.level(), self.meter_r.level())
    }

    /// Release every held note.
    pub fn all_notes_off(&mut self) {
        self.voices.all_notes_off();
    }

    /// Silence the track immediately and clear effect tails.
    pub fn hard_reset(&mut self) {
        self.voices.kill_all();
        self.effects.reset();
        self.meter_l.reset();
        self.meter_r.reset();
    }

    /// Render one block into `left`/`right` (overwritten, not summed).
    ///
    /// `events` is the block's full event list sorted by frame; this track
    /// picks out its own entries by `track_index`. `scratch` is the shared
    /// mono voice buffer, at least `left.len()` long.
    pub fn render_block(
        &mut self,
        events: &[NoteEvent],
        track_index: usize,
        left: &mut [f32],
        right: &mut [f32],
        scratch: &mut [f32],
    ) {
        let frames = left.len();
        let scratch = &mut scratch[..frames];
        scratch.fill(0.0);

        // Render voices in spans split at this track's event frames.
        // Note-offs sort before note-ons at equal frames, so the event
        // order already implements off-before-on.
        let mut cursor = 0usize;
        for event in events.iter().filter(|e| e.track == track_index) {
            let frame = event.frame.min(frames);
            if frame > cursor {
                self.voices.render(&mut scratch[cursor..frame]);
                cursor = frame;
            }
            match event.kind {
                EventKind::NoteOn { pitch, velocity } => self.voices.note_on(pitch, velocity),
                EventKind::NoteOff { pitch } => self.voices.note_off(pitch),
            }
        }
        if cursor < frames {
            self.voices.render(&mut scratch[cursor..frames]);
        }
        self.voices.tick_ages();

        // Mono fan-out into the stereo pair, then the effect chain
        left.copy_from_slice(scratch);
        right.copy_from_slice(scratch);
        self.effects.process_block(left, right);

        // Volume and constant-power pan, then post-effects meters
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let volume = self.volume.advance();
            let theta = (self.pan.advance() + 1.0) * FRAC_PI_4;
            *l *= volume * theta.cos();
            *r *= volume * theta.sin();
            self.meter_l.process(*l);
            self.meter_r.process(*r);
        }
    }
}
