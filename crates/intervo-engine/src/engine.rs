//! The engine driver: the audio-side block callback and the control-side
//! handle.
//!
//! [`create`] builds both halves wired together by three lock-free SPSC
//! rings:
//!
//! - **commands** (control → audio): every mutation, with heap-backed
//!   payloads (tracks, patterns, effect slots, whole projects) constructed
//!   on the control side and shipped by value or box
//! - **garbage** (audio → control): objects removed on the audio thread,
//!   returned so their memory is freed off the audio path
//! - **events** (audio → control): best-effort notifications (dropped
//!   commands, capacity hits, non-finite resets) that the control side
//!   forwards to `tracing`
//!
//! The control side additionally keeps a **mirror** project, updated by
//! applying every successfully queued command locally. Command application
//! is deterministic, so the mirror stays structurally identical to the
//! audio-side project and serves snapshots and file I/O without ever
//! touching audio state.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use intervo_analysis::{
    AtomicF32, NUM_BANDS, ScopeTap, SpectrumAnalyzer, SpectrumTap,
};
use intervo_effects::{EffectSlot, MAX_EFFECTS};

use crate::command::Command;
use crate::error::{ProjectFileError, SubmitError};
use crate::file;
use crate::mixer::Mixer;
use crate::pattern::Pattern;
use crate::project::Project;
use crate::sequencer::Sequencer;
use crate::track::Track;
use crate::{COMMAND_QUEUE_CAPACITY, COMMANDS_PER_BLOCK, MAX_BLOCK_SIZE, MAX_PATTERNS, MAX_TRACKS};

/// Garbage ring capacity.
const GARBAGE_CAPACITY: usize = 256;

/// Event ring capacity.
const EVENT_CAPACITY: usize = 256;

/// Engine construction parameters. Sample rate and block size are fixed
/// for the engine's lifetime.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Nominal block size in frames (capped at [`MAX_BLOCK_SIZE`]).
    pub block_size: usize,
    /// Project name.
    pub name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            block_size: 256,
            name: "untitled".to_string(),
        }
    }
}

/// Best-effort notifications from the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A command referenced an unknown id or failed validation.
    CommandDropped,
    /// A command would have exceeded a fixed capacity.
    CapacityExceeded,
    /// Non-finite samples were detected; the block was silenced and the
    /// offending components reset.
    NonFiniteReset,
    /// The per-block event list filled up; some note events were dropped.
    EventOverflow,
}

/// Messages crossing the command ring.
enum EngineMsg {
    /// A plain-data command.
    Plain(Command),
    /// Install a control-side-built track.
    AddTrack(Box<Track>),
    /// Install a control-side-built pattern.
    AddPattern(Box<Pattern>),
    /// Install a control-side-built effect slot.
    AddEffect {
        track: crate::project::TrackId,
        slot: EffectSlot,
    },
    /// Swap in a freshly loaded project.
    ReplaceProject(Box<Project>),
}

/// Heap objects returned to the control side for disposal.
enum Garbage {
    Track(Box<Track>),
    Pattern(Box<Pattern>),
    Slot(EffectSlot),
    Project(Box<Project>),
}

/// State shared between the halves: playhead, meters, and analysis taps.
struct SharedState {
    playhead_beats: AtomicF32,
    playing: AtomicBool,
    peak_l: AtomicF32,
    peak_r: AtomicF32,
    scope: ScopeTap,
    spectrum: SpectrumTap,
}

impl SharedState {
    fn new() -> Self {
        Self {
            playhead_beats: AtomicF32::new(0.0),
            playing: AtomicBool::new(false),
            peak_l: AtomicF32::new(0.0),
            peak_r: AtomicF32::new(0.0),
            scope: ScopeTap::new(),
            spectrum: SpectrumTap::new(),
        }
    }
}

/// Build an engine, returning the audio half and the control half.
pub fn create(config: EngineConfig) -> (AudioEngine, EngineHandle) {
    let block_size = config.block_size.clamp(16, MAX_BLOCK_SIZE);
    let sample_rate = config.sample_rate;

    let project = Project::new(&config.name, sample_rate);
    let mirror = project.clone();

    let (cmd_tx, cmd_rx) = rtrb::RingBuffer::new(COMMAND_QUEUE_CAPACITY);
    let (garbage_tx, garbage_rx) = rtrb::RingBuffer::new(GARBAGE_CAPACITY);
    let (event_tx, event_rx) = rtrb::RingBuffer::new(EVENT_CAPACITY);

    let shared = Arc::new(SharedState::new());

    let audio = AudioEngine {
        project,
        sequencer: Sequencer::new(),
        mixer: Mixer::new(sample_rate),
        commands: cmd_rx,
        garbage: garbage_tx,
        events: event_tx,
        shared: Arc::clone(&shared),
        scratch_mono: vec![0.0; MAX_BLOCK_SIZE],
        track_l: vec![0.0; MAX_BLOCK_SIZE],
        track_r: vec![0.0; MAX_BLOCK_SIZE],
        block_size,
    };

    let handle = EngineHandle {
        mirror,
        commands: cmd_tx,
        garbage: garbage_rx,
        events: event_rx,
        shared,
        analyzer: SpectrumAnalyzer::new(sample_rate),
        spectrum_cursor: 0,
        spectrum_scratch: Vec::new(),
        sample_rate,
    };

    (audio, handle)
}

/// The audio-thread half: owns all mutable audio state.
///
/// `render` is the block callback. After construction it performs no heap
/// allocation, takes no locks, and never blocks.
pub struct AudioEngine {
    project: Project,
    sequencer: Sequencer,
    mixer: Mixer,
    commands: rtrb::Consumer<EngineMsg>,
    garbage: rtrb::Producer<Garbage>,
    events: rtrb::Producer<EngineEvent>,
    shared: Arc<SharedState>,
    scratch_mono: Vec<f32>,
    track_l: Vec<f32>,
    track_r: Vec<f32>,
    block_size: usize,
}

impl AudioEngine {
    /// Nominal block size in frames.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The audio-side project (tests and offline rendering).
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Render one block of stereo audio.
    ///
    /// Oversized host buffers are processed in sub-blocks capped at
    /// [`MAX_BLOCK_SIZE`]. Output is always within `[-1, 1]`.
    pub fn render(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        let frames = out_left.len().min(out_right.len());
        self.drain_commands();

        let mut done = 0;
        while done < frames {
            let chunk = (frames - done).min(MAX_BLOCK_SIZE);
            self.render_chunk(
                &mut out_left[done..done + chunk],
                &mut out_right[done..done + chunk],
            );
            done += chunk;
        }
    }

    fn render_chunk(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        let frames = out_left.len();
        out_left.fill(0.0);
        out_right.fill(0.0);

        if !self.project.transport.is_playing() {
            // Exact silence at rest; the taps still advance
            self.feed_taps(out_left, out_right);
            self.publish_shared();
            return;
        }

        let timing = self.project.transport.advance(frames);

        // Sequence, render, and mix
        let any_solo = self.project.any_solo();
        {
            let events = self.sequencer.collect(&mut self.project, &timing);

            for index in 0..self.project.tracks().len() {
                let track_l = &mut self.track_l[..frames];
                let track_r = &mut self.track_r[..frames];
                let scratch = &mut self.scratch_mono[..];

                let track = &mut self.project.tracks_mut()[index];
                track.render_block(events, index, track_l, track_r, scratch);

                let audible = if any_solo { track.solo } else { !track.mute };
                if audible {
                    Mixer::accumulate(track_l, track_r, out_left, out_right);
                }
            }
        }

        if self.sequencer.take_overflow() {
            self.push_event(EngineEvent::EventOverflow);
        }

        self.mixer.set_master_volume(self.project.master_volume);
        if !self.mixer.finalize(out_left, out_right) {
            // A component went non-finite: silence the block, reset the
            // offenders, report
            out_left.fill(0.0);
            out_right.fill(0.0);
            for track in self.project.tracks_mut() {
                track.hard_reset();
            }
            self.mixer.reset();
            self.push_event(EngineEvent::NonFiniteReset);
        }

        self.feed_taps(out_left, out_right);
        self.publish_shared();
    }

    /// Apply up to [`COMMANDS_PER_BLOCK`] queued messages.
    fn drain_commands(&mut self) {
        for _ in 0..COMMANDS_PER_BLOCK {
            let Ok(msg) = self.commands.pop() else {
                break;
            };
            self.apply_msg(msg);
        }
    }

    fn apply_msg(&mut self, msg: EngineMsg) {
        match msg {
            EngineMsg::Plain(command) => {
                if !apply_plain_command(&mut self.project, &command) {
                    self.push_event(EngineEvent::CommandDropped);
                }
                match &command {
                    Command::SetPosition { .. } | Command::Stop => {
                        self.sequencer.on_seek();
                    }
                    Command::AddNote { .. }
                    | Command::RemoveNote { .. }
                    | Command::AddArrangement { .. } => {
                        self.sequencer.invalidate();
                    }
                    _ => {}
                }
                self.collect_removals(&command);
            }
            EngineMsg::AddTrack(track) => {
                if let Err(rejected) = self.project.install_track(track) {
                    self.push_garbage(Garbage::Track(rejected));
                    self.push_event(EngineEvent::CapacityExceeded);
                }
            }
            EngineMsg::AddPattern(pattern) => {
                if let Err(rejected) = self.project.install_pattern(pattern) {
                    self.push_garbage(Garbage::Pattern(rejected));
                    self.push_event(EngineEvent::CapacityExceeded);
                }
            }
            EngineMsg::AddEffect { track, slot } => {
                match self.project.track_mut(track) {
                    Some(t) => {
                        if let Err(rejected) = t.effects.push_slot(slot) {
                            self.push_garbage(Garbage::Slot(rejected));
                            self.push_event(EngineEvent::CapacityExceeded);
                        }
                    }
                    None => {
                        self.push_garbage(Garbage::Slot(slot));
                        self.push_event(EngineEvent::CommandDropped);
                    }
                }
            }
            EngineMsg::ReplaceProject(project) => {
                let old = std::mem::replace(&mut self.project, *project);
                self.push_garbage(Garbage::Project(Box::new(old)));
                self.mixer.set_master_volume(self.project.master_volume);
                self.sequencer.on_seek();
            }
        }
    }

    /// Route objects freed by removal commands into the garbage ring.
    fn collect_removals(&mut self, command: &Command) {
        match *command {
            Command::RemoveTrack { track } => {
                // apply_plain_command left the track in place for us to
                // remove here, where the garbage ring is reachable
                if let Some(boxed) = self.project.remove_track(track) {
                    self.push_garbage(Garbage::Track(boxed));
                    self.sequencer.invalidate();
                }
            }
            Command::RemoveEffect { track, slot } => {
                if let Some(t) = self.project.track_mut(track) {
                    if let Some(removed) = t.effects.remove(slot) {
                        self.push_garbage(Garbage::Slot(removed));
                    }
                }
            }
            _ => {}
        }
    }

    fn feed_taps(&self, left: &[f32], right: &[f32]) {
        for (l, r) in left.iter().zip(right.iter()) {
            self.shared.scope.write(*l, *r);
            self.shared.spectrum.write((l + r) * 0.5);
        }
    }

    fn publish_shared(&self) {
        self.shared
            .playhead_beats
            .set(self.project.transport.current_beat() as f32);
        self.shared
            .playing
            .store(self.project.transport.is_playing(), Ordering::Release);
        let (peak_l, peak_r) = self.mixer.peaks();
        self.shared.peak_l.set(peak_l);
        self.shared.peak_r.set(peak_r);
    }

    fn push_event(&mut self, event: EngineEvent) {
        // Best-effort: a full ring drops the report, never the audio
        let _ = self.events.push(event);
    }

    fn push_garbage(&mut self, garbage: Garbage) {
        // A full garbage ring leaks the object until the control side
        // drains; dropping here would free on the audio thread
        let _ = self.garbage.push(garbage);
    }
}

/// Apply a plain-data command to a project.
///
/// Used identically by the audio side and the control-side mirror, which
/// is what keeps them in lockstep. Returns false when the command
/// referenced an unknown id or failed validation. Removal commands only
/// validate here; the audio side routes the freed objects separately.
fn apply_plain_command(project: &mut Project, command: &Command) -> bool {
    match *command {
        Command::SetVolume { track, volume } => project
            .track_mut(track)
            .map(|t| t.set_volume(volume))
            .is_some(),
        Command::SetPan { track, pan } => {
            project.track_mut(track).map(|t| t.set_pan(pan)).is_some()
        }
        Command::ToggleMute { track } => project
            .track_mut(track)
            .map(|t| t.mute = !t.mute)
            .is_some(),
        Command::ToggleSolo { track } => project
            .track_mut(track)
            .map(|t| t.solo = !t.solo)
            .is_some(),
        Command::RemoveTrack { track } => project.track(track).is_some(),
        Command::RemoveEffect { track, slot } => project
            .track(track)
            .is_some_and(|t| slot < t.effects.len()),
        Command::SetEffectParam {
            track,
            slot,
            param,
            value,
        } => match project.track_mut(track) {
            Some(t) if slot < t.effects.len() => {
                t.effects.set_param(slot, param, value);
                true
            }
            _ => false,
        },
        Command::ToggleEffectBypass { track, slot } => match project.track_mut(track) {
            Some(t) if slot < t.effects.len() => {
                t.effects.toggle_bypass(slot);
                true
            }
            _ => false,
        },
        Command::AddNote {
            pattern,
            pitch,
            velocity,
            start_beat,
            duration_beats,
        } => project
            .pattern_mut(pattern)
            .is_some_and(|p| p.add_note(pitch, velocity, start_beat, duration_beats).is_some()),
        Command::RemoveNote { pattern, note } => project
            .pattern_mut(pattern)
            .is_some_and(|p| p.remove_note(note)),
        Command::AddArrangement {
            pattern,
            track,
            start_beat,
            muted,
        } => project.add_arrangement(crate::project::ArrangementItem {
            pattern_id: pattern,
            track_id: track,
            start_beat,
            muted,
        }),
        Command::SetBpm { bpm } => {
            project.transport.set_bpm(bpm);
            true
        }
        Command::SetPosition { beat } => {
            project.transport.set_position(beat);
            true
        }
        Command::Play => {
            project.transport.play();
            true
        }
        Command::Pause => {
            project.transport.pause();
            true
        }
        Command::Stop => {
            project.transport.stop();
            true
        }
        Command::SetLoop { start, end } => project.transport.set_loop(start, end),
        Command::ToggleLoop => {
            project.transport.toggle_loop();
            true
        }
        Command::SetMasterVolume { volume } => {
            project.set_master_volume(volume);
            true
        }
        // Allocation-carrying commands never arrive here as plain messages
        Command::AddTrack { .. } | Command::AddPattern { .. } | Command::AddEffect { .. } => false,
    }
}

/// The control-side half: command submission, snapshots, file I/O, and
/// the reader side of the analysis taps.
pub struct EngineHandle {
    mirror: Project,
    commands: rtrb::Producer<EngineMsg>,
    garbage: rtrb::Consumer<Garbage>,
    events: rtrb::Consumer<EngineEvent>,
    shared: Arc<SharedState>,
    analyzer: SpectrumAnalyzer,
    spectrum_cursor: u64,
    spectrum_scratch: Vec<f32>,
    sample_rate: f32,
}

impl EngineHandle {
    /// Submit a command.
    ///
    /// On success the command is queued for the audio thread and applied to
    /// the local mirror. Commands that fail mirror-side validation (unknown
    /// ids, full capacities) are dropped without queueing — the audio side
    /// would drop them identically.
    pub fn submit(&mut self, command: Command) -> Result<(), SubmitError> {
        self.collect_garbage();

        match command {
            Command::AddTrack { ref name } => {
                if self.mirror.tracks().len() >= MAX_TRACKS {
                    tracing::warn!("AddTrack dropped: track capacity reached");
                    return Ok(());
                }
                let track = self.mirror.prepare_track(name);
                let clone = track.clone();
                self.push_msg(EngineMsg::AddTrack(Box::new(track)))?;
                let _ = self.mirror.install_track(Box::new(clone));
                Ok(())
            }
            Command::AddPattern {
                ref name,
                length_beats,
            } => {
                if self.mirror.patterns().len() >= MAX_PATTERNS {
                    tracing::warn!("AddPattern dropped: pattern capacity reached");
                    return Ok(());
                }
                let pattern = self.mirror.prepare_pattern(name, length_beats);
                let clone = pattern.clone();
                self.push_msg(EngineMsg::AddPattern(Box::new(pattern)))?;
                let _ = self.mirror.install_pattern(Box::new(clone));
                Ok(())
            }
            Command::AddEffect { track, kind } => {
                let Some(t) = self.mirror.track(track) else {
                    tracing::debug!(?track, "AddEffect dropped: unknown track");
                    return Ok(());
                };
                if t.effects.len() >= MAX_EFFECTS {
                    tracing::warn!(?track, "AddEffect dropped: chain full");
                    return Ok(());
                }
                let slot = EffectSlot::new(kind, self.sample_rate);
                let clone = slot.clone();
                self.push_msg(EngineMsg::AddEffect { track, slot })?;
                if let Some(t) = self.mirror.track_mut(track) {
                    let _ = t.effects.push_slot(clone);
                }
                Ok(())
            }
            command => {
                self.push_msg(EngineMsg::Plain(command.clone()))?;
                if apply_plain_command(&mut self.mirror, &command) {
                    // Mirror removals free on the control thread
                    match &command {
                        Command::RemoveTrack { track } => {
                            let _ = self.mirror.remove_track(*track);
                        }
                        Command::RemoveEffect { track, slot } => {
                            if let Some(t) = self.mirror.track_mut(*track) {
                                let _ = t.effects.remove(*slot);
                            }
                        }
                        _ => {}
                    }
                } else {
                    tracing::debug!(?command, "command will be dropped by the engine");
                }
                Ok(())
            }
        }
    }

    fn push_msg(&mut self, msg: EngineMsg) -> Result<(), SubmitError> {
        self.commands.push(msg).map_err(|_| SubmitError::QueueFull)
    }

    /// Read-only view of the project structure.
    ///
    /// The mirror reflects every successfully submitted command; dynamic
    /// state (playhead, meters) comes from the atomic accessors instead.
    pub fn snapshot(&self) -> &Project {
        &self.mirror
    }

    /// Current playhead position in beats.
    pub fn playhead_beats(&self) -> f32 {
        self.shared.playhead_beats.get()
    }

    /// Whether the audio thread is currently playing.
    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Acquire)
    }

    /// Master peak levels as (left, right).
    pub fn read_meters(&self) -> (f32, f32) {
        (self.shared.peak_l.get(), self.shared.peak_r.get())
    }

    /// Snapshot the most recent `frames` of master output.
    pub fn read_waveform(&self, frames: usize) -> Vec<(f32, f32)> {
        self.shared.scope.snapshot(frames)
    }

    /// The 32 spectrum band magnitudes.
    ///
    /// Pulls new samples from the audio thread's tap and recomputes the
    /// FFT here, on the calling thread, when enough have accumulated.
    pub fn read_spectrum(&mut self) -> [f32; NUM_BANDS] {
        self.spectrum_scratch.clear();
        self.spectrum_cursor = self
            .shared
            .spectrum
            .read_since(self.spectrum_cursor, &mut self.spectrum_scratch);
        self.analyzer.push_samples(&self.spectrum_scratch);
        *self.analyzer.bands()
    }

    /// Drain pending engine events, forwarding each to `tracing`.
    pub fn poll_events(&mut self) -> Vec<EngineEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.pop() {
            match event {
                EngineEvent::CommandDropped => {
                    tracing::debug!("engine dropped a command (unknown id)");
                }
                EngineEvent::CapacityExceeded => {
                    tracing::warn!("engine dropped a command (capacity exceeded)");
                }
                EngineEvent::NonFiniteReset => {
                    tracing::warn!("engine reset after non-finite output");
                }
                EngineEvent::EventOverflow => {
                    tracing::warn!("engine dropped note events (block overflow)");
                }
            }
            drained.push(event);
        }
        self.collect_garbage();
        drained
    }

    /// Save the project to a file. Reads the mirror; audio is unaffected.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ProjectFileError> {
        file::save_project(&self.mirror, path.as_ref())
    }

    /// Load a project file and install it on the audio thread.
    ///
    /// On any failure the engine keeps playing the old project.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ProjectFileError> {
        let project = file::load_project(path.as_ref(), self.sample_rate)?;
        let mirror = project.clone();
        self.push_msg(EngineMsg::ReplaceProject(Box::new(project)))
            .map_err(|_| ProjectFileError::EngineBusy)?;
        self.mirror = mirror;
        Ok(())
    }

    /// Free objects the audio thread has discarded.
    fn collect_garbage(&mut self) {
        while let Ok(garbage) = self.garbage.pop() {
            drop(garbage);
        }
    }
}
