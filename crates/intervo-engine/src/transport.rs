//! Transport: tempo, sample clock, and loop region.
//!
//! The transport owns the engine's single sample counter. Advancing by a
//! block returns the beat interval the block covers; when the loop wraps
//! mid-block the interval is split in two so the sequencer can emit events
//! correctly across the seam.

/// One contiguous span of a render block in both beat and frame terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First beat covered (inclusive).
    pub beat_start: f64,
    /// Last beat covered (exclusive).
    pub beat_end: f64,
    /// Frame within the block where this span starts.
    pub frame_offset: usize,
    /// Span length in frames.
    pub frames: usize,
}

/// The beat intervals covered by one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockTiming {
    /// The span up to the loop seam (or the whole block).
    pub first: Segment,
    /// The span after a loop wrap, when one occurred.
    pub wrapped: Option<Segment>,
}

/// Sample-clock transport with BPM, play state, and loop region.
///
/// # Example
///
/// ```rust
/// use intervo_engine::Transport;
///
/// let mut transport = Transport::new(48000.0);
/// transport.set_bpm(120.0);
/// transport.play();
///
/// let timing = transport.advance(256);
/// assert_eq!(timing.first.beat_start, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Transport {
    bpm: f64,
    beats_per_bar: u8,
    beat_unit: u8,
    sample_counter: u64,
    playing: bool,
    looping: bool,
    /// Loop region in beats, `[loop_start, loop_end)`
    loop_start: f64,
    loop_end: f64,
    sample_rate: f64,
}

impl Transport {
    /// Create a stopped transport at 120 BPM in 4/4 with a 4-beat loop
    /// region (looping off).
    pub fn new(sample_rate: f64) -> Self {
        Self {
            bpm: 120.0,
            beats_per_bar: 4,
            beat_unit: 4,
            sample_counter: 0,
            playing: false,
            looping: false,
            loop_start: 0.0,
            loop_end: 4.0,
            sample_rate,
        }
    }

    /// Set the tempo. Clamped to `[20, 400]` BPM; takes effect from the
    /// next `advance` call.
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm.clamp(20.0, 400.0);
    }

    /// Current tempo in BPM.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set the time signature. Zero values are ignored.
    pub fn set_time_signature(&mut self, beats_per_bar: u8, beat_unit: u8) {
        if beats_per_bar > 0 && beat_unit > 0 {
            self.beats_per_bar = beats_per_bar;
            self.beat_unit = beat_unit;
        }
    }

    /// Current time signature as (beats per bar, beat unit).
    pub fn time_signature(&self) -> (u8, u8) {
        (self.beats_per_bar, self.beat_unit)
    }

    /// Samples per beat at the current tempo.
    pub fn samples_per_beat(&self) -> f64 {
        self.sample_rate * 60.0 / self.bpm
    }

    /// Current position in beats.
    pub fn current_beat(&self) -> f64 {
        self.sample_counter as f64 / self.samples_per_beat()
    }

    /// Current position in samples.
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }

    /// Start playback from the current position.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Pause playback. The position is kept, so `play` resumes.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop playback and rewind to zero.
    pub fn stop(&mut self) {
        self.playing = false;
        self.sample_counter = 0;
    }

    /// Whether the transport is playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Seek to a beat position (clamped at zero).
    pub fn set_position(&mut self, beat: f64) {
        let beat = beat.max(0.0);
        self.sample_counter = (beat * self.samples_per_beat()).round() as u64;
    }

    /// Set the loop region. Ignored unless `start < end` — the looping
    /// invariant `loop_start < loop_end` always holds.
    pub fn set_loop(&mut self, start: f64, end: f64) -> bool {
        if start >= 0.0 && start < end {
            self.loop_start = start;
            self.loop_end = end;
            true
        } else {
            false
        }
    }

    /// Loop region in beats.
    pub fn loop_region(&self) -> (f64, f64) {
        (self.loop_start, self.loop_end)
    }

    /// Flip the looping flag.
    pub fn toggle_loop(&mut self) {
        self.looping = !self.looping;
    }

    /// Whether looping is enabled.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Set the looping flag directly (used by the project loader).
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Advance by `frames` and return the covered beat interval(s).
    ///
    /// When looping and the block crosses `loop_end`, the counter wraps to
    /// `loop_start + overshoot % loop_length` and the returned timing holds
    /// both sub-intervals. Does not advance while stopped.
    pub fn advance(&mut self, frames: usize) -> BlockTiming {
        let spb = self.samples_per_beat();
        let start = self.sample_counter as f64;
        let beat_start = start / spb;

        if !self.playing {
            let segment = Segment {
                beat_start,
                beat_end: beat_start,
                frame_offset: 0,
                frames: 0,
            };
            return BlockTiming { first: segment, wrapped: None };
        }

        let end = start + frames as f64;

        if self.looping {
            let loop_start_s = self.loop_start * spb;
            let loop_end_s = self.loop_end * spb;
            let loop_len_s = loop_end_s - loop_start_s;

            if start >= loop_end_s {
                // Looping was enabled while already past the region: jump
                // back before rendering anything
                let new_pos = loop_start_s + (start - loop_end_s) % loop_len_s;
                self.sample_counter = new_pos.round() as u64 + frames as u64;

                let first = Segment {
                    beat_start,
                    beat_end: beat_start,
                    frame_offset: 0,
                    frames: 0,
                };
                let wrapped_start = new_pos / spb;
                let wrapped = Segment {
                    beat_start: wrapped_start,
                    beat_end: ((new_pos + frames as f64) / spb).min(self.loop_end),
                    frame_offset: 0,
                    frames,
                };
                return BlockTiming {
                    first,
                    wrapped: Some(wrapped),
                };
            }

            if start < loop_end_s && end >= loop_end_s {
                // The block crosses the seam
                let frames_a = ((loop_end_s - start).ceil() as usize).min(frames);
                let remainder = frames - frames_a;

                let new_pos = loop_start_s + (end - loop_end_s) % loop_len_s;
                self.sample_counter = new_pos.round() as u64;

                let first = Segment {
                    beat_start,
                    beat_end: self.loop_end,
                    frame_offset: 0,
                    frames: frames_a,
                };
                let wrapped = Segment {
                    beat_start: self.loop_start,
                    // Pathological loops shorter than a block are capped at
                    // one pass per block
                    beat_end: (self.loop_start + remainder as f64 / spb).min(self.loop_end),
                    frame_offset: frames_a,
                    frames: remainder,
                };
                return BlockTiming {
                    first,
                    wrapped: Some(wrapped),
                };
            }
        }

        self.sample_counter += frames as u64;
        BlockTiming {
            first: Segment {
                beat_start,
                beat_end: end / spb,
                frame_offset: 0,
                frames,
            },
            wrapped: None,
        }
    }
}
