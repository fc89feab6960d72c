//! Patterns: named containers of notes.
//!
//! Notes are stored unsorted; the sequencer asks for a start-beat-sorted
//! index which is rebuilt lazily after edits. Note storage is reserved at
//! full capacity on construction so edits on the audio thread never
//! allocate.

use crate::{MAX_NOTES_PER_PATTERN, project::PatternId};

/// Pitch-class hue wheel for note colors (C through B).
const NOTE_COLORS: [[u8; 3]; 12] = [
    [0xe5, 0x48, 0x4d],
    [0xe5, 0x7a, 0x48],
    [0xe5, 0xad, 0x48],
    [0xe5, 0xdf, 0x48],
    [0xad, 0xe5, 0x48],
    [0x5e, 0xe5, 0x48],
    [0x48, 0xe5, 0x85],
    [0x48, 0xe5, 0xd4],
    [0x48, 0xb0, 0xe5],
    [0x48, 0x62, 0xe5],
    [0x8e, 0x48, 0xe5],
    [0xe5, 0x48, 0xc4],
];

/// One note within a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternNote {
    /// Id unique within the pattern, stable across edits.
    pub id: u32,
    /// MIDI pitch, 0–127.
    pub pitch: u8,
    /// Normalized velocity, `[0, 1]`.
    pub velocity: f32,
    /// Start position in beats from the pattern start.
    pub start_beat: f64,
    /// Duration in beats.
    pub duration_beats: f64,
    /// Per-note pan offset, `[-1, 1]`.
    pub pan: f32,
    /// Cached display color, derived from the pitch class.
    pub color: [u8; 3],
}

/// A named, fixed-capacity container of notes.
///
/// # Example
///
/// ```rust
/// use intervo_engine::{Pattern, PatternId};
///
/// let mut pattern = Pattern::new(PatternId(0), "Lead", 4.0);
/// let id = pattern.add_note(60, 0.8, 0.0, 1.0).unwrap();
/// assert_eq!(pattern.notes().len(), 1);
/// pattern.remove_note(id);
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Stable id within the project.
    pub id: PatternId,
    /// Display name.
    pub name: String,
    /// Length in beats.
    pub length_beats: f64,
    notes: Vec<PatternNote>,
    next_note_id: u32,
    /// Note indices ordered by start beat; rebuilt lazily
    sorted: Vec<u32>,
    index_dirty: bool,
}

impl Pattern {
    /// Create an empty pattern with storage reserved at full capacity.
    pub fn new(id: PatternId, name: &str, length_beats: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            length_beats: length_beats.max(0.25),
            notes: Vec::with_capacity(MAX_NOTES_PER_PATTERN),
            next_note_id: 0,
            sorted: Vec::with_capacity(MAX_NOTES_PER_PATTERN),
            index_dirty: false,
        }
    }

    /// Add a note, clamping fields to their ranges. Returns the new note's
    /// id, or `None` when the pattern is full.
    pub fn add_note(
        &mut self,
        pitch: u8,
        velocity: f32,
        start_beat: f64,
        duration_beats: f64,
    ) -> Option<u32> {
        if self.notes.len() >= MAX_NOTES_PER_PATTERN {
            return None;
        }

        let pitch = pitch.min(127);
        let id = self.next_note_id;
        self.next_note_id += 1;

        self.notes.push(PatternNote {
            id,
            pitch,
            velocity: velocity.clamp(0.0, 1.0),
            start_beat: start_beat.clamp(0.0, self.length_beats),
            duration_beats: duration_beats.max(1.0 / 64.0),
            pan: 0.0,
            color: NOTE_COLORS[usize::from(pitch % 12)],
        });
        self.index_dirty = true;
        Some(id)
    }

    /// Restore a note verbatim (used by the project loader). Skips the
    /// clamping of [`add_note`] but still honors capacity.
    pub fn restore_note(&mut self, note: PatternNote) -> bool {
        if self.notes.len() >= MAX_NOTES_PER_PATTERN {
            return false;
        }
        self.next_note_id = self.next_note_id.max(note.id + 1);
        self.notes.push(note);
        self.index_dirty = true;
        true
    }

    /// Remove a note by id. Returns whether it existed.
    pub fn remove_note(&mut self, note_id: u32) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != note_id);
        let removed = self.notes.len() != before;
        if removed {
            self.index_dirty = true;
        }
        removed
    }

    /// All notes in insertion order.
    pub fn notes(&self) -> &[PatternNote] {
        &self.notes
    }

    /// Rebuild the start-beat index if needed.
    ///
    /// Sorting runs in place over preallocated storage, so this is safe at
    /// seek points on the audio thread.
    pub fn ensure_index(&mut self) {
        if !self.index_dirty && self.sorted.len() == self.notes.len() {
            return;
        }
        self.sorted.clear();
        self.sorted.extend(0..self.notes.len() as u32);
        let notes = &self.notes;
        self.sorted.sort_unstable_by(|&a, &b| {
            notes[a as usize]
                .start_beat
                .total_cmp(&notes[b as usize].start_beat)
        });
        self.index_dirty = false;
    }

    /// Note at a position in start-beat order. Call
    /// [`ensure_index`](Self::ensure_index) first.
    pub fn sorted_note(&self, position: usize) -> Option<&PatternNote> {
        self.sorted
            .get(position)
            .map(|&i| &self.notes[i as usize])
    }

    /// Number of notes.
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Position of the first sorted note starting at or after `beat`.
    ///
    /// Binary search over the sorted index; used for cursor rebuilds on
    /// seek.
    pub fn position_at_beat(&self, beat: f64) -> usize {
        self.sorted.partition_point(|&i| {
            self.notes[i as usize].start_beat < beat
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Pattern {
        Pattern::new(PatternId(0), "Test", 4.0)
    }

    #[test]
    fn test_add_note_assigns_ids() {
        let mut p = pattern();
        let a = p.add_note(60, 0.8, 0.0, 1.0).unwrap();
        let b = p.add_note(64, 0.8, 1.0, 1.0).unwrap();
        assert_ne!(a, b);
        assert_eq!(p.note_count(), 2);
    }

    #[test]
    fn test_add_note_clamps() {
        let mut p = pattern();
        p.add_note(200, 2.0, 100.0, -1.0).unwrap();
        let note = &p.notes()[0];
        assert_eq!(note.pitch, 127);
        assert_eq!(note.velocity, 1.0);
        assert_eq!(note.start_beat, 4.0);
        assert!(note.duration_beats > 0.0);
    }

    #[test]
    fn test_capacity_limit() {
        let mut p = pattern();
        for i in 0..MAX_NOTES_PER_PATTERN {
            assert!(p.add_note(60, 0.5, (i % 4) as f64, 0.25).is_some());
        }
        assert!(p.add_note(60, 0.5, 0.0, 0.25).is_none());
    }

    #[test]
    fn test_remove_note() {
        let mut p = pattern();
        let a = p.add_note(60, 0.8, 0.0, 1.0).unwrap();
        let b = p.add_note(64, 0.8, 1.0, 1.0).unwrap();

        assert!(p.remove_note(a));
        assert!(!p.remove_note(a), "double remove must fail");
        assert_eq!(p.note_count(), 1);
        assert_eq!(p.notes()[0].id, b);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut p = pattern();
        let a = p.add_note(60, 0.8, 0.0, 1.0).unwrap();
        p.remove_note(a);
        let b = p.add_note(62, 0.8, 0.0, 1.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sorted_index() {
        let mut p = pattern();
        p.add_note(60, 0.8, 3.0, 0.5);
        p.add_note(62, 0.8, 0.5, 0.5);
        p.add_note(64, 0.8, 1.5, 0.5);

        p.ensure_index();
        assert_eq!(p.sorted_note(0).unwrap().start_beat, 0.5);
        assert_eq!(p.sorted_note(1).unwrap().start_beat, 1.5);
        assert_eq!(p.sorted_note(2).unwrap().start_beat, 3.0);
    }

    #[test]
    fn test_index_tracks_edits() {
        let mut p = pattern();
        p.add_note(60, 0.8, 2.0, 0.5);
        p.ensure_index();

        p.add_note(62, 0.8, 1.0, 0.5);
        p.ensure_index();
        assert_eq!(p.sorted_note(0).unwrap().start_beat, 1.0);
    }

    #[test]
    fn test_position_at_beat() {
        let mut p = pattern();
        p.add_note(60, 0.8, 0.0, 0.5);
        p.add_note(62, 0.8, 1.0, 0.5);
        p.add_note(64, 0.8, 2.0, 0.5);
        p.ensure_index();

        assert_eq!(p.position_at_beat(0.0), 0);
        assert_eq!(p.position_at_beat(0.5), 1);
        assert_eq!(p.position_at_beat(1.0), 1);
        assert_eq!(p.position_at_beat(1.5), 2);
        assert_eq!(p.position_at_beat(3.0), 3);
    }

    #[test]
    fn test_note_color_from_pitch_class() {
        let mut p = pattern();
        p.add_note(60, 0.8, 0.0, 1.0); // C
        p.add_note(72, 0.8, 1.0, 1.0); // C an octave up
        p.add_note(61, 0.8, 2.0, 1.0); // C#
        let notes = p.notes();
        assert_eq!(notes[0].color, notes[1].color, "same pitch class, same color");
        assert_ne!(notes[0].color, notes[2].color);
    }
}
