//! Engine commands.
//!
//! Every mutation of audio state goes through [`Command`]: the control side
//! submits, the audio thread applies at the next block boundary, and the
//! handle's mirror applies the same command locally. Because commands are
//! the only mutation path and their application is deterministic, the two
//! sides never diverge.
//!
//! With the `serde` feature enabled commands serialize to JSON, which is
//! the wire format for the CLI's script files (one JSON command per line).

use crate::project::{PatternId, TrackId};
use intervo_effects::EffectKind;

/// A control-plane mutation, applied atomically at a block boundary.
///
/// Commands referencing unknown ids are dropped silently; commands that
/// would exceed a fixed capacity are dropped and reported through the
/// engine event ring. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Append a new track.
    AddTrack {
        /// Display name for the new track.
        name: String,
    },
    /// Remove a track and every arrangement item referencing it.
    RemoveTrack {
        /// Target track.
        track: TrackId,
    },
    /// Set a track's volume (clamped to `[0, 2]`).
    SetVolume {
        /// Target track.
        track: TrackId,
        /// New linear volume.
        volume: f32,
    },
    /// Set a track's pan (clamped to `[-1, 1]`).
    SetPan {
        /// Target track.
        track: TrackId,
        /// New pan position.
        pan: f32,
    },
    /// Flip a track's mute flag.
    ToggleMute {
        /// Target track.
        track: TrackId,
    },
    /// Flip a track's solo flag.
    ToggleSolo {
        /// Target track.
        track: TrackId,
    },
    /// Append an effect to a track's chain.
    AddEffect {
        /// Target track.
        track: TrackId,
        /// Which effect to add.
        kind: EffectKind,
    },
    /// Remove an effect slot, shifting higher slots down.
    RemoveEffect {
        /// Target track.
        track: TrackId,
        /// Slot index.
        slot: usize,
    },
    /// Set an effect parameter (clamped to the parameter's range).
    SetEffectParam {
        /// Target track.
        track: TrackId,
        /// Slot index.
        slot: usize,
        /// Parameter index within the effect kind.
        param: usize,
        /// New value.
        value: f32,
    },
    /// Flip an effect slot's bypass flag. State is preserved.
    ToggleEffectBypass {
        /// Target track.
        track: TrackId,
        /// Slot index.
        slot: usize,
    },
    /// Append a new empty pattern.
    AddPattern {
        /// Display name for the new pattern.
        name: String,
        /// Pattern length in beats.
        length_beats: f64,
    },
    /// Add a note to a pattern.
    AddNote {
        /// Target pattern.
        pattern: PatternId,
        /// MIDI pitch (clamped to 0–127).
        pitch: u8,
        /// Velocity (clamped to `[0, 1]`).
        velocity: f32,
        /// Start position in beats from the pattern start.
        start_beat: f64,
        /// Duration in beats.
        duration_beats: f64,
    },
    /// Remove a note from a pattern by its id.
    RemoveNote {
        /// Target pattern.
        pattern: PatternId,
        /// Note id within the pattern.
        note: u32,
    },
    /// Place a pattern on a track at a timeline position.
    AddArrangement {
        /// Pattern to place.
        pattern: PatternId,
        /// Track to play it on.
        track: TrackId,
        /// Timeline position in beats.
        start_beat: f64,
        /// Whether the placement starts muted.
        muted: bool,
    },
    /// Set the tempo (clamped to `[20, 400]` BPM).
    SetBpm {
        /// New tempo in beats per minute.
        bpm: f64,
    },
    /// Seek to a beat position.
    SetPosition {
        /// Target position in beats.
        beat: f64,
    },
    /// Start playback from the current position.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Stop playback and rewind to zero.
    Stop,
    /// Set the loop region in beats. Ignored unless `start < end`.
    SetLoop {
        /// Loop start in beats.
        start: f64,
        /// Loop end in beats (exclusive).
        end: f64,
    },
    /// Flip the looping flag.
    ToggleLoop,
    /// Set the master volume (clamped to `[0, 2]`).
    SetMasterVolume {
        /// New linear master volume.
        volume: f32,
    },
}
