//! Intervo Engine - the real-time multi-track audio engine
//!
//! The engine renders a set of tracks — each a polyphonic synth voice pool
//! plus an effect chain — driven by a sample-accurate pattern sequencer
//! with transport and looping, mixed down through a soft-clipped master bus
//! with analysis taps.
//!
//! # Architecture
//!
//! [`create`] splits the engine into two halves:
//!
//! - [`AudioEngine`] lives on the audio thread. Its [`render`]
//!   (AudioEngine::render) callback drains the command queue, advances the
//!   transport, pulls note events from the sequencer, renders and mixes the
//!   tracks, and feeds the analysis taps. It never allocates, locks, or
//!   blocks.
//! - [`EngineHandle`] lives on the control side. It submits [`Command`]s
//!   through a lock-free SPSC queue, maintains a structural mirror of the
//!   project for snapshots and file I/O, and owns the reader side of the
//!   analysis taps.
//!
//! Heap allocation happens only on the control side: commands that need new
//! objects (tracks, patterns, effects) ship them pre-built through the
//! queue, and objects removed on the audio thread travel back through a
//! garbage channel to be freed here.
//!
//! ```no_run
//! use intervo_engine::{Command, EngineConfig, create};
//!
//! let (mut audio, mut handle) = create(EngineConfig::default());
//!
//! handle.submit(Command::Play).unwrap();
//!
//! // In the audio callback:
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! audio.render(&mut left, &mut right);
//! ```

pub mod command;
pub mod engine;
pub mod error;
pub mod file;
pub mod mixer;
pub mod pattern;
pub mod project;
pub mod sequencer;
pub mod track;
pub mod transport;

pub use command::Command;
pub use engine::{AudioEngine, EngineConfig, EngineEvent, EngineHandle, create};
pub use error::{ProjectFileError, SubmitError};
pub use pattern::{Pattern, PatternNote};
pub use project::{ArrangementItem, PatternId, Project, TrackId};
pub use sequencer::{EventKind, NoteEvent, Sequencer};
pub use track::Track;
pub use transport::{BlockTiming, Segment, Transport};

/// Maximum tracks per project.
pub const MAX_TRACKS: usize = 64;

/// Voices per track.
pub const VOICES_PER_TRACK: usize = 16;

/// Maximum patterns per project.
pub const MAX_PATTERNS: usize = 256;

/// Maximum notes per pattern.
pub const MAX_NOTES_PER_PATTERN: usize = 4096;

/// Maximum arrangement items per project.
pub const MAX_ARRANGEMENT_ITEMS: usize = 1024;

/// Maximum frames per render block.
pub const MAX_BLOCK_SIZE: usize = 4096;

/// Maximum note events emitted per block.
pub const MAX_EVENTS_PER_BLOCK: usize = 1024;

/// Maximum scheduled note-offs held by the sequencer.
pub const MAX_PENDING_NOTE_OFFS: usize = 1024;

/// Commands drained per block, bounding per-block control work.
pub const COMMANDS_PER_BLOCK: usize = 64;

/// Command queue capacity.
pub const COMMAND_QUEUE_CAPACITY: usize = 1024;
