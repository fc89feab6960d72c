//! Interpolated delay line.
//!
//! Circular-buffer delay with linear-interpolated fractional reads. Used by
//! the delay, chorus, and reverb effects. The buffer is heap-allocated once
//! at construction and never reallocates, so reads and writes are safe on
//! the audio thread.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Delay line with linear-interpolated fractional reads.
///
/// # Example
///
/// ```rust
/// use intervo_core::InterpolatedDelay;
///
/// // 50 ms max delay at 48 kHz
/// let mut delay = InterpolatedDelay::new((0.05 * 48000.0) as usize);
///
/// delay.write(1.0);
/// let out = delay.read(10.5); // fractional delay
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Creates a delay line with the given maximum delay in samples.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "delay size must be > 0");
        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
        }
    }

    /// Creates a delay line from sample rate and max delay time in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Reads a delayed sample with linear interpolation.
    ///
    /// `delay_samples` counts backwards from the last written sample and may
    /// be fractional. Values beyond capacity are clamped.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let clamped = delay_samples.min((len - 1) as f32);

        let delay_int = clamped as usize;
        let frac = clamped - delay_int as f32;

        let last_written = if self.write_pos == 0 {
            len - 1
        } else {
            self.write_pos - 1
        };

        let read_pos = if last_written >= delay_int {
            last_written - delay_int
        } else {
            len + last_written - delay_int
        };

        let next_pos = if read_pos == 0 { len - 1 } else { read_pos - 1 };

        let s0 = self.buffer[read_pos];
        let s1 = self.buffer[next_pos];
        s0 + (s1 - s0) * frac
    }

    /// Writes a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Clears the delay line to silence.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_delay_exact() {
        let mut delay = InterpolatedDelay::new(64);

        for i in 0..32 {
            delay.write(i as f32);
        }

        // Most recent write is delay 0
        assert_eq!(delay.read(0.0), 31.0);
        assert_eq!(delay.read(1.0), 30.0);
        assert_eq!(delay.read(10.0), 21.0);
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        let mut delay = InterpolatedDelay::new(16);
        delay.write(0.0);
        delay.write(1.0);

        // Halfway between the last two writes
        let out = delay.read(0.5);
        assert!((out - 0.5).abs() < 1e-6, "expected 0.5, got {out}");
    }

    #[test]
    fn test_wraparound() {
        let mut delay = InterpolatedDelay::new(4);
        for i in 0..10 {
            delay.write(i as f32);
        }
        // Only the last 4 writes survive
        assert_eq!(delay.read(0.0), 9.0);
        assert_eq!(delay.read(3.0), 6.0);
    }

    #[test]
    fn test_clear() {
        let mut delay = InterpolatedDelay::new(8);
        for _ in 0..8 {
            delay.write(1.0);
        }
        delay.clear();
        assert_eq!(delay.read(0.0), 0.0);
        assert_eq!(delay.read(7.0), 0.0);
    }

    #[test]
    fn test_read_beyond_capacity_clamps() {
        let mut delay = InterpolatedDelay::new(8);
        delay.write(5.0);
        // Should not panic
        let _ = delay.read(100.0);
    }

    #[test]
    fn test_from_time() {
        let delay = InterpolatedDelay::from_time(48000.0, 0.25);
        assert!(delay.capacity() >= 12000);
    }
}
