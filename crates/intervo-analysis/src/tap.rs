//! Lock-free audio taps.
//!
//! The audio thread streams samples into fixed-size rings of `AtomicU32`
//! (bit-cast `f32`). The write index is published with release ordering and
//! read with acquire, so a reader that observes index `n` also observes
//! every sample written before it. Readers never block the writer; a reader
//! racing the writer simply gets the latest completed window.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Oscilloscope ring capacity in frames (power of two).
pub const SCOPE_CAPACITY: usize = 4096;

/// Spectrum ring capacity in samples (power of two, >= analysis window).
pub const SPECTRUM_TAP_CAPACITY: usize = 2048;

/// Lock-free `f32` cell built on `AtomicU32` bit casts.
#[derive(Debug)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// Create a cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Read the value (acquire).
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Write the value (release).
    #[inline]
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Stereo oscilloscope ring.
///
/// The writer is the audio thread; any number of readers may snapshot the
/// latest frames concurrently.
#[derive(Debug)]
pub struct ScopeTap {
    left: Box<[AtomicU32]>,
    right: Box<[AtomicU32]>,
    /// Monotonic frame counter; `counter % capacity` is the next write slot
    position: AtomicU64,
}

impl Default for ScopeTap {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTap {
    /// Create an empty scope ring.
    pub fn new() -> Self {
        Self {
            left: (0..SCOPE_CAPACITY).map(|_| AtomicU32::new(0)).collect(),
            right: (0..SCOPE_CAPACITY).map(|_| AtomicU32::new(0)).collect(),
            position: AtomicU64::new(0),
        }
    }

    /// Ring capacity in frames.
    pub fn capacity(&self) -> usize {
        SCOPE_CAPACITY
    }

    /// Write one stereo frame. Audio-thread side; never blocks.
    #[inline]
    pub fn write(&self, left: f32, right: f32) {
        let pos = self.position.load(Ordering::Relaxed);
        let slot = (pos % SCOPE_CAPACITY as u64) as usize;
        self.left[slot].store(left.to_bits(), Ordering::Relaxed);
        self.right[slot].store(right.to_bits(), Ordering::Relaxed);
        // Release: publishes the sample stores above to acquiring readers
        self.position.store(pos + 1, Ordering::Release);
    }

    /// Snapshot the most recent `frames` (capped at capacity), oldest first.
    ///
    /// Allocates the return vector on the calling thread.
    pub fn snapshot(&self, frames: usize) -> Vec<(f32, f32)> {
        let frames = frames.min(SCOPE_CAPACITY);
        let end = self.position.load(Ordering::Acquire);
        let available = end.min(frames as u64);
        let start = end - available;

        (start..end)
            .map(|pos| {
                let slot = (pos % SCOPE_CAPACITY as u64) as usize;
                (
                    f32::from_bits(self.left[slot].load(Ordering::Relaxed)),
                    f32::from_bits(self.right[slot].load(Ordering::Relaxed)),
                )
            })
            .collect()
    }
}

/// Mono sample ring feeding the spectrum analyzer.
///
/// The writer is the audio thread; the reader copies samples it has not
/// seen yet, tracking its own cursor.
#[derive(Debug)]
pub struct SpectrumTap {
    samples: Box<[AtomicU32]>,
    position: AtomicU64,
}

impl Default for SpectrumTap {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumTap {
    /// Create an empty spectrum ring.
    pub fn new() -> Self {
        Self {
            samples: (0..SPECTRUM_TAP_CAPACITY)
                .map(|_| AtomicU32::new(0))
                .collect(),
            position: AtomicU64::new(0),
        }
    }

    /// Write one sample. Audio-thread side; never blocks.
    #[inline]
    pub fn write(&self, sample: f32) {
        let pos = self.position.load(Ordering::Relaxed);
        let slot = (pos % SPECTRUM_TAP_CAPACITY as u64) as usize;
        self.samples[slot].store(sample.to_bits(), Ordering::Relaxed);
        self.position.store(pos + 1, Ordering::Release);
    }

    /// Copy every sample written since `cursor` into `out` (oldest first)
    /// and return the new cursor.
    ///
    /// If the reader fell more than a ring behind, the overwritten span is
    /// skipped — the reader gets the latest completed samples.
    pub fn read_since(&self, cursor: u64, out: &mut Vec<f32>) -> u64 {
        let end = self.position.load(Ordering::Acquire);
        let earliest = end.saturating_sub(SPECTRUM_TAP_CAPACITY as u64);
        let start = cursor.max(earliest);

        for pos in start..end {
            let slot = (pos % SPECTRUM_TAP_CAPACITY as u64) as usize;
            out.push(f32::from_bits(self.samples[slot].load(Ordering::Relaxed)));
        }
        end
    }
}
