//! The project: tracks, patterns, arrangement, transport, master level.
//!
//! The project owns everything the audio thread renders. All storage is
//! reserved at fixed capacity on construction; tracks and patterns are
//! boxed so installing one shipped from the control side never touches the
//! allocator on the audio thread.

use crate::pattern::Pattern;
use crate::track::Track;
use crate::transport::Transport;
use crate::{MAX_ARRANGEMENT_ITEMS, MAX_PATTERNS, MAX_TRACKS};

/// Stable track identifier. Ids are never reused within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackId(pub u32);

/// Stable pattern identifier. Ids are never reused within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternId(pub u32);

/// A pattern placed on a track at a timeline position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrangementItem {
    /// The placed pattern.
    pub pattern_id: PatternId,
    /// The track that plays it.
    pub track_id: TrackId,
    /// Timeline position in beats.
    pub start_beat: f64,
    /// Muted placements emit no events.
    pub muted: bool,
}

/// Track color cycle, assigned round-robin on creation.
const TRACK_COLORS: [[u8; 3]; 8] = [
    [0xd9, 0x53, 0x4f],
    [0xe8, 0x9c, 0x3f],
    [0xe8, 0xd4, 0x3f],
    [0x6f, 0xc0, 0x5c],
    [0x45, 0xb5, 0xaa],
    [0x4f, 0x86, 0xd9],
    [0x8a, 0x63, 0xd2],
    [0xcf, 0x5c, 0xa8],
];

/// Everything the engine renders.
///
/// The sample rate is fixed for the project's lifetime; changing it means
/// building a new project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Display name.
    pub name: String,
    /// Tempo, play state, loop region.
    pub transport: Transport,
    /// Master bus volume, `[0, 2]`.
    pub master_volume: f32,
    tracks: Vec<Box<Track>>,
    patterns: Vec<Box<Pattern>>,
    items: Vec<ArrangementItem>,
    next_track_id: u32,
    next_pattern_id: u32,
    sample_rate: f32,
}

impl Project {
    /// Create an empty project shell with reserved storage and no content.
    pub fn empty(name: &str, sample_rate: f32) -> Self {
        Self {
            name: name.to_string(),
            transport: Transport::new(f64::from(sample_rate)),
            master_volume: 1.0,
            tracks: Vec::with_capacity(MAX_TRACKS),
            patterns: Vec::with_capacity(MAX_PATTERNS),
            items: Vec::with_capacity(MAX_ARRANGEMENT_ITEMS),
            next_track_id: 0,
            next_pattern_id: 0,
            sample_rate,
        }
    }

    /// Create a project with the default content: one track, one empty
    /// 4-beat pattern.
    pub fn new(name: &str, sample_rate: f32) -> Self {
        let mut project = Self::empty(name, sample_rate);
        project.add_track("Track 1");
        project.add_pattern("Pattern 1", 4.0);
        project
    }

    /// The fixed sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    // -- Tracks --

    /// Build the track that `add_track` would install next: the id comes
    /// from the id counter, the color from the palette cycle. Does not
    /// install. Allocates; control-side only.
    pub fn prepare_track(&self, name: &str) -> Track {
        let id = TrackId(self.next_track_id);
        let color = TRACK_COLORS[self.tracks.len() % TRACK_COLORS.len()];
        let mut track = Track::new(id, name, self.sample_rate);
        track.color = color;
        track
    }

    /// Construct and install a new track. Returns its id, or `None` at
    /// capacity. Allocates; control-side only.
    pub fn add_track(&mut self, name: &str) -> Option<TrackId> {
        if self.tracks.len() >= MAX_TRACKS {
            return None;
        }
        let track = self.prepare_track(name);
        let id = track.id();
        self.install_track(Box::new(track)).ok()?;
        Some(id)
    }

    /// Install a pre-built track. Returns the box back at capacity so the
    /// caller can dispose of it off the audio thread.
    pub fn install_track(&mut self, track: Box<Track>) -> Result<(), Box<Track>> {
        if self.tracks.len() >= MAX_TRACKS {
            return Err(track);
        }
        self.next_track_id = self.next_track_id.max(track.id().0 + 1);
        self.tracks.push(track);
        Ok(())
    }

    /// Remove a track by id, dropping arrangement items that reference it.
    /// Returns the boxed track for off-thread disposal.
    pub fn remove_track(&mut self, id: TrackId) -> Option<Box<Track>> {
        let index = self.track_index(id)?;
        self.items.retain(|item| item.track_id != id);
        Some(self.tracks.remove(index))
    }

    /// Position of a track in render order.
    pub fn track_index(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    /// Track by id.
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id).map(|b| &**b)
    }

    /// Mutable track by id.
    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|t| t.id() == id)
            .map(|b| &mut **b)
    }

    /// All tracks in render order.
    pub fn tracks(&self) -> &[Box<Track>] {
        &self.tracks
    }

    /// Mutable access to all tracks.
    pub fn tracks_mut(&mut self) -> &mut [Box<Track>] {
        &mut self.tracks
    }

    // -- Patterns --

    /// Build the pattern that `add_pattern` would install next. Does not
    /// install. Allocates; control-side only.
    pub fn prepare_pattern(&self, name: &str, length_beats: f64) -> Pattern {
        Pattern::new(PatternId(self.next_pattern_id), name, length_beats)
    }

    /// Construct and install a new pattern. Returns its id, or `None` at
    /// capacity. Allocates; control-side only.
    pub fn add_pattern(&mut self, name: &str, length_beats: f64) -> Option<PatternId> {
        if self.patterns.len() >= MAX_PATTERNS {
            return None;
        }
        let pattern = self.prepare_pattern(name, length_beats);
        let id = pattern.id;
        self.install_pattern(Box::new(pattern)).ok()?;
        Some(id)
    }

    /// Install a pre-built pattern. Returns the box back at capacity.
    pub fn install_pattern(&mut self, pattern: Box<Pattern>) -> Result<(), Box<Pattern>> {
        if self.patterns.len() >= MAX_PATTERNS {
            return Err(pattern);
        }
        self.next_pattern_id = self.next_pattern_id.max(pattern.id.0 + 1);
        self.patterns.push(pattern);
        Ok(())
    }

    /// Pattern by id.
    pub fn pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id).map(|b| &**b)
    }

    /// Mutable pattern by id.
    pub fn pattern_mut(&mut self, id: PatternId) -> Option<&mut Pattern> {
        self.patterns
            .iter_mut()
            .find(|p| p.id == id)
            .map(|b| &mut **b)
    }

    /// All patterns in creation order.
    pub fn patterns(&self) -> &[Box<Pattern>] {
        &self.patterns
    }

    /// Mutable access to all patterns.
    pub fn patterns_mut(&mut self) -> &mut [Box<Pattern>] {
        &mut self.patterns
    }

    // -- Arrangement --

    /// Place a pattern on a track. Both ids must be live; returns whether
    /// the item was added.
    pub fn add_arrangement(&mut self, item: ArrangementItem) -> bool {
        if self.items.len() >= MAX_ARRANGEMENT_ITEMS {
            return false;
        }
        if self.pattern(item.pattern_id).is_none() || self.track(item.track_id).is_none() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// All arrangement items.
    pub fn arrangement(&self) -> &[ArrangementItem] {
        &self.items
    }

    /// Mutable access to the arrangement items.
    pub fn arrangement_mut(&mut self) -> &mut Vec<ArrangementItem> {
        &mut self.items
    }

    /// Set the master volume (clamped to `[0, 2]`).
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 2.0);
    }

    /// Whether any track is soloed.
    pub fn any_solo(&self) -> bool {
        self.tracks.iter().any(|t| t.solo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content() {
        let project = Project::new("Demo", 48000.0);
        assert_eq!(project.tracks().len(), 1);
        assert_eq!(project.patterns().len(), 1);
        assert!(project.arrangement().is_empty());
    }

    #[test]
    fn test_track_ids_not_reused() {
        let mut project = Project::new("Demo", 48000.0);
        let a = project.add_track("A").unwrap();
        project.remove_track(a);
        let b = project.add_track("B").unwrap();
        assert_ne!(a, b, "removed ids must not be reissued");
    }

    #[test]
    fn test_track_capacity() {
        let mut project = Project::empty("Demo", 48000.0);
        for i in 0..MAX_TRACKS {
            assert!(project.add_track(&format!("T{i}")).is_some());
        }
        assert!(project.add_track("overflow").is_none());
    }

    #[test]
    fn test_remove_track_drops_referencing_items() {
        let mut project = Project::new("Demo", 48000.0);
        let track = project.tracks()[0].id();
        let pattern = project.patterns()[0].id;
        assert!(project.add_arrangement(ArrangementItem {
            pattern_id: pattern,
            track_id: track,
            start_beat: 0.0,
            muted: false,
        }));

        project.remove_track(track);
        assert!(project.arrangement().is_empty());
    }

    #[test]
    fn test_arrangement_rejects_dead_refs() {
        let mut project = Project::new("Demo", 48000.0);
        let live_track = project.tracks()[0].id();
        let live_pattern = project.patterns()[0].id;

        assert!(!project.add_arrangement(ArrangementItem {
            pattern_id: PatternId(999),
            track_id: live_track,
            start_beat: 0.0,
            muted: false,
        }));
        assert!(!project.add_arrangement(ArrangementItem {
            pattern_id: live_pattern,
            track_id: TrackId(999),
            start_beat: 0.0,
            muted: false,
        }));
    }

    #[test]
    fn test_master_volume_clamped() {
        let mut project = Project::new("Demo", 48000.0);
        project.set_master_volume(5.0);
        assert_eq!(project.master_volume, 2.0);
        project.set_master_volume(-1.0);
        assert_eq!(project.master_volume, 0.0);
    }

    #[test]
    fn test_track_colors_cycle() {
        let mut project = Project::empty("Demo", 48000.0);
        for i in 0..10 {
            project.add_track(&format!("T{i}"));
        }
        let tracks = project.tracks();
        assert_eq!(tracks[0].color, tracks[8].color, "palette cycles at 8");
        assert_ne!(tracks[0].color, tracks[1].color);
    }
}
