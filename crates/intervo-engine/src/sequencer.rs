//! Pattern sequencer: turns the arrangement into sample-accurate events.
//!
//! Each arrangement item has a cursor into its pattern's start-beat-sorted
//! note index. During linear playback cursors only move forward; a seek or
//! loop wrap rebuilds them by binary search. Note-offs are tracked in a
//! pending table and emitted when their beat falls inside a block.
//!
//! Loop-seam rule: an event scheduled exactly at `loop_end` belongs to the
//! loop start — it is emitted at the seam frame of the wrapped segment, as
//! are pending note-offs that would otherwise land at or beyond the seam.

use crate::project::{Project, TrackId};
use crate::transport::{BlockTiming, Segment};
use crate::{MAX_ARRANGEMENT_ITEMS, MAX_EVENTS_PER_BLOCK, MAX_PENDING_NOTE_OFFS};

/// Beat-comparison tolerance for seam matching.
const BEAT_EPSILON: f64 = 1e-9;

/// What happened at an event's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Release a held pitch. Sorts before note-ons at the same frame.
    NoteOff {
        /// MIDI pitch.
        pitch: u8,
    },
    /// Start a note.
    NoteOn {
        /// MIDI pitch.
        pitch: u8,
        /// Normalized velocity.
        velocity: f32,
    },
}

impl EventKind {
    /// Sort rank: note-offs before note-ons at equal frames.
    fn rank(&self) -> u8 {
        match self {
            EventKind::NoteOff { .. } => 0,
            EventKind::NoteOn { .. } => 1,
        }
    }

    fn pitch(&self) -> u8 {
        match self {
            EventKind::NoteOff { pitch } | EventKind::NoteOn { pitch, .. } => *pitch,
        }
    }
}

/// One note event within a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Frame offset within the block.
    pub frame: usize,
    /// Index of the destination track in render order.
    pub track: usize,
    /// The event payload.
    pub kind: EventKind,
}

/// A scheduled note-off waiting for its beat.
#[derive(Debug, Clone, Copy)]
struct PendingOff {
    beat: f64,
    track_id: TrackId,
    pitch: u8,
}

/// The sequencer.
///
/// All storage is reserved up front; `collect` never allocates.
#[derive(Debug)]
pub struct Sequencer {
    /// Per-arrangement-item position into the sorted note index
    cursors: Vec<usize>,
    pending_offs: Vec<PendingOff>,
    events: Vec<NoteEvent>,
    needs_rebuild: bool,
    /// Emit every pending note-off at the start of the next block
    flush_all_offs: bool,
    overflowed: bool,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Create a sequencer with reserved storage.
    pub fn new() -> Self {
        Self {
            cursors: Vec::with_capacity(MAX_ARRANGEMENT_ITEMS),
            pending_offs: Vec::with_capacity(MAX_PENDING_NOTE_OFFS),
            events: Vec::with_capacity(MAX_EVENTS_PER_BLOCK),
            needs_rebuild: true,
            flush_all_offs: false,
            overflowed: false,
        }
    }

    /// Mark cursors stale after an arrangement or pattern edit.
    pub fn invalidate(&mut self) {
        self.needs_rebuild = true;
    }

    /// Handle an explicit seek: cursors rebuild and every pending note-off
    /// flushes at the start of the next block, so no voice stays gated
    /// across the jump.
    pub fn on_seek(&mut self) {
        self.needs_rebuild = true;
        self.flush_all_offs = true;
    }

    /// Whether the event list filled up last block (extra events dropped).
    pub fn take_overflow(&mut self) -> bool {
        std::mem::take(&mut self.overflowed)
    }

    /// Produce this block's events, sorted by frame with note-offs first
    /// at equal frames.
    pub fn collect<'a>(
        &'a mut self,
        project: &mut Project,
        timing: &BlockTiming,
    ) -> &'a [NoteEvent] {
        self.events.clear();

        let spb = project.transport.samples_per_beat();

        if self.needs_rebuild {
            self.rebuild(project, timing.first.beat_start);
            self.needs_rebuild = false;
        }

        if self.flush_all_offs {
            self.flush_all_offs = false;
            while let Some(off) = self.pending_offs.pop() {
                self.emit_off(project, &off, timing.first.frame_offset);
            }
        }

        self.process_segment(project, &timing.first, spb);

        if let Some(wrapped) = &timing.wrapped {
            let seam_beat = timing.first.beat_end;
            let seam_frame = wrapped.frame_offset;

            // Note-offs at or beyond the seam are cut at the seam. This
            // runs before the seam note-ons so an off never lands on a note
            // emitted at the seam itself.
            let mut i = 0;
            while i < self.pending_offs.len() {
                if self.pending_offs[i].beat >= seam_beat - BEAT_EPSILON {
                    let off = self.pending_offs.swap_remove(i);
                    self.emit_off(project, &off, seam_frame);
                } else {
                    i += 1;
                }
            }

            // Events exactly at loop_end fire at the seam; their note-offs
            // are rescheduled in post-wrap coordinates
            self.emit_notes_at_beat(project, seam_beat, wrapped.beat_start, seam_frame);

            self.rebuild(project, wrapped.beat_start);
            self.process_segment(project, wrapped, spb);
        }

        self.events.sort_unstable_by(|a, b| {
            a.frame
                .cmp(&b.frame)
                .then(a.kind.rank().cmp(&b.kind.rank()))
                .then(a.track.cmp(&b.track))
                .then(a.kind.pitch().cmp(&b.kind.pitch()))
        });

        &self.events
    }

    /// Rebuild every cursor for playback from `position` by binary search.
    fn rebuild(&mut self, project: &mut Project, position: f64) {
        let item_count = project.arrangement().len();
        self.cursors.clear();
        self.cursors.resize(item_count.min(MAX_ARRANGEMENT_ITEMS), 0);

        for idx in 0..item_count.min(MAX_ARRANGEMENT_ITEMS) {
            let item = project.arrangement()[idx];
            let local = position - item.start_beat;
            let Some(pattern) = project.pattern_mut(item.pattern_id) else {
                continue;
            };
            pattern.ensure_index();
            self.cursors[idx] = if local <= 0.0 {
                0
            } else {
                pattern.position_at_beat(local - BEAT_EPSILON)
            };
        }
    }

    /// Emit events for one beat span.
    fn process_segment(&mut self, project: &mut Project, segment: &Segment, spb: f64) {
        if segment.beat_end <= segment.beat_start {
            return;
        }

        // Pending note-offs falling inside the span
        let mut i = 0;
        while i < self.pending_offs.len() {
            let off = self.pending_offs[i];
            if off.beat >= segment.beat_start - BEAT_EPSILON && off.beat < segment.beat_end {
                let frame = frame_for(off.beat, segment, spb);
                let off = self.pending_offs.swap_remove(i);
                self.emit_off(project, &off, frame);
            } else {
                i += 1;
            }
        }

        // Pattern notes starting inside the span
        let item_count = project.arrangement().len().min(self.cursors.len());
        for idx in 0..item_count {
            let item = project.arrangement()[idx];
            if item.muted {
                continue;
            }
            let Some(track) = project.track_index(item.track_id) else {
                continue;
            };

            let local_start = segment.beat_start - item.start_beat;
            let local_end = segment.beat_end - item.start_beat;
            if local_end <= 0.0 {
                continue;
            }

            let Some(pattern) = project.pattern_mut(item.pattern_id) else {
                continue;
            };
            pattern.ensure_index();

            while let Some(note) = pattern.sorted_note(self.cursors[idx]) {
                if note.start_beat >= local_end {
                    break;
                }
                if note.start_beat >= local_start - BEAT_EPSILON {
                    let absolute = item.start_beat + note.start_beat;
                    let frame = frame_for(absolute, segment, spb);
                    let pitch = note.pitch;
                    let velocity = note.velocity;
                    let off_beat = absolute + note.duration_beats;
                    self.emit(NoteEvent {
                        frame,
                        track,
                        kind: EventKind::NoteOn { pitch, velocity },
                    });
                    self.schedule_off(off_beat, item.track_id, pitch);
                }
                self.cursors[idx] += 1;
            }
        }
    }

    /// Emit note-ons scheduled exactly at `beat` (the loop seam). Their
    /// note-offs are scheduled relative to `reschedule_base`, the post-wrap
    /// playback position.
    fn emit_notes_at_beat(
        &mut self,
        project: &mut Project,
        beat: f64,
        reschedule_base: f64,
        frame: usize,
    ) {
        let item_count = project.arrangement().len().min(self.cursors.len());
        for idx in 0..item_count {
            let item = project.arrangement()[idx];
            if item.muted {
                continue;
            }
            let Some(track) = project.track_index(item.track_id) else {
                continue;
            };
            let local = beat - item.start_beat;
            let Some(pattern) = project.pattern_mut(item.pattern_id) else {
                continue;
            };
            pattern.ensure_index();

            while let Some(note) = pattern.sorted_note(self.cursors[idx]) {
                if (note.start_beat - local).abs() > BEAT_EPSILON {
                    break;
                }
                let pitch = note.pitch;
                let velocity = note.velocity;
                let off_beat = reschedule_base + note.duration_beats;
                self.emit(NoteEvent {
                    frame,
                    track,
                    kind: EventKind::NoteOn { pitch, velocity },
                });
                self.schedule_off(off_beat, item.track_id, pitch);
                self.cursors[idx] += 1;
            }
        }
    }

    fn emit_off(&mut self, project: &Project, off: &PendingOff, frame: usize) {
        if let Some(track) = project.track_index(off.track_id) {
            self.emit(NoteEvent {
                frame,
                track,
                kind: EventKind::NoteOff { pitch: off.pitch },
            });
        }
    }

    fn emit(&mut self, event: NoteEvent) {
        if self.events.len() < MAX_EVENTS_PER_BLOCK {
            self.events.push(event);
        } else {
            self.overflowed = true;
        }
    }

    fn schedule_off(&mut self, beat: f64, track_id: TrackId, pitch: u8) {
        if self.pending_offs.len() < MAX_PENDING_NOTE_OFFS {
            self.pending_offs.push(PendingOff {
                beat,
                track_id,
                pitch,
            });
        } else {
            self.overflowed = true;
        }
    }
}

/// Frame offset of a beat within a segment, clamped into the segment.
fn frame_for(beat: f64, segment: &Segment, spb: f64) -> usize {
    let relative = ((beat - segment.beat_start) * spb).floor();
    let frame = if relative <= 0.0 { 0 } else { relative as usize };
    segment.frame_offset + frame.min(segment.frames.saturating_sub(1))
}
