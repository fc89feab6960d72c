//! Wavetable oscillator with table-position morphing.
//!
//! Holds up to 16 mono tables of 2048 samples. The table position is a
//! continuous value; output interpolates bilinearly between the two adjacent
//! tables at the fractional phase position.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;
use core::f32::consts::TAU;
use libm::sinf;

/// Samples per wavetable.
pub const TABLE_SIZE: usize = 2048;

/// Maximum number of tables.
pub const MAX_TABLES: usize = 16;

/// Morphing wavetable oscillator.
///
/// # Example
///
/// ```rust
/// use intervo_synth::WavetableOsc;
///
/// let mut osc = WavetableOsc::with_default_tables(48000.0);
/// osc.set_frequency(220.0);
/// osc.set_table_position(1.5); // halfway between tables 1 and 2
///
/// let sample = osc.process();
/// ```
#[derive(Debug, Clone)]
pub struct WavetableOsc {
    tables: Vec<Vec<f32>>,
    /// Continuous position in [0, num_tables - 1]
    table_position: f32,
    phase: f64,
    phase_inc: f64,
    sample_rate: f64,
    frequency: f64,
}

impl WavetableOsc {
    /// Create an oscillator with no tables loaded (silent until tables are
    /// added).
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = f64::from(sample_rate);
        Self {
            tables: Vec::with_capacity(MAX_TABLES),
            table_position: 0.0,
            phase: 0.0,
            phase_inc: 440.0 / sample_rate,
            sample_rate,
            frequency: 440.0,
        }
    }

    /// Create an oscillator preloaded with the four default tables:
    /// sine, triangle, saw, square.
    pub fn with_default_tables(sample_rate: f32) -> Self {
        let mut osc = Self::new(sample_rate);
        osc.load_default_tables();
        osc
    }

    /// Generate and load the four default tables (sine, triangle, saw,
    /// square), replacing any existing tables.
    pub fn load_default_tables(&mut self) {
        self.tables.clear();

        let mut sine = Vec::with_capacity(TABLE_SIZE);
        let mut triangle = Vec::with_capacity(TABLE_SIZE);
        let mut saw = Vec::with_capacity(TABLE_SIZE);
        let mut square = Vec::with_capacity(TABLE_SIZE);

        for i in 0..TABLE_SIZE {
            let phase = i as f32 / TABLE_SIZE as f32;
            sine.push(sinf(phase * TAU));
            triangle.push(4.0 * (phase - 0.5).abs() - 1.0);
            saw.push(2.0 * phase - 1.0);
            square.push(if phase < 0.5 { 1.0 } else { -1.0 });
        }

        self.tables.push(sine);
        self.tables.push(triangle);
        self.tables.push(saw);
        self.tables.push(square);
    }

    /// Add a table. Returns false (table ignored) when the table has the
    /// wrong size or the capacity of 16 is reached.
    pub fn add_table(&mut self, table: &[f32]) -> bool {
        if table.len() != TABLE_SIZE || self.tables.len() >= MAX_TABLES {
            return false;
        }
        self.tables.push(table.to_vec());
        true
    }

    /// Number of loaded tables.
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Set the continuous table position. Clamped to `[0, num_tables - 1]`.
    pub fn set_table_position(&mut self, position: f32) {
        let max = (self.tables.len().saturating_sub(1)) as f32;
        self.table_position = position.clamp(0.0, max);
    }

    /// Current table position.
    pub fn table_position(&self) -> f32 {
        self.table_position
    }

    /// Set frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = f64::from(freq_hz.max(0.0));
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency as f32
    }

    /// Update the sample rate, preserving frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Reset phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Read one table at a fractional sample index with linear interpolation.
    #[inline]
    fn read_table(&self, table: usize, index: f32) -> f32 {
        let table = &self.tables[table];
        let i0 = index as usize % TABLE_SIZE;
        let i1 = (i0 + 1) % TABLE_SIZE;
        let frac = index - index as usize as f32;
        table[i0] + (table[i1] - table[i0]) * frac
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if self.tables.is_empty() {
            return 0.0;
        }

        let index = (self.phase * TABLE_SIZE as f64) as f32;

        let t0 = self.table_position as usize;
        let t1 = (t0 + 1).min(self.tables.len() - 1);
        let tfrac = self.table_position - t0 as f32;

        let s0 = self.read_table(t0, index);
        let output = if t1 == t0 || tfrac <= 0.0 {
            s0
        } else {
            let s1 = self.read_table(t1, index);
            s0 + (s1 - s0) * tfrac
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }

    /// Fill a block with consecutive samples.
    pub fn process_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_without_tables() {
        let mut osc = WavetableOsc::new(48000.0);
        for _ in 0..100 {
            assert_eq!(osc.process(), 0.0);
        }
    }

    #[test]
    fn test_default_tables_loaded() {
        let osc = WavetableOsc::with_default_tables(48000.0);
        assert_eq!(osc.num_tables(), 4);
    }

    #[test]
    fn test_sine_table_frequency() {
        let mut osc = WavetableOsc::with_default_tables(48000.0);
        osc.set_frequency(440.0);
        osc.set_table_position(0.0); // sine table

        let mut zero_crossings: i32 = 0;
        let mut prev = 0.0;
        for _ in 0..48000 {
            let s = osc.process();
            if prev <= 0.0 && s > 0.0 {
                zero_crossings += 1;
            }
            prev = s;
        }
        assert!(
            (zero_crossings - 440).abs() <= 2,
            "expected ~440 crossings, got {zero_crossings}"
        );
    }

    #[test]
    fn test_table_position_clamped() {
        let mut osc = WavetableOsc::with_default_tables(48000.0);
        osc.set_table_position(100.0);
        assert_eq!(osc.table_position(), 3.0);
        osc.set_table_position(-5.0);
        assert_eq!(osc.table_position(), 0.0);
    }

    #[test]
    fn test_morph_between_tables() {
        // Position 0.5 should be the average of the sine and triangle tables
        let mut osc = WavetableOsc::with_default_tables(48000.0);
        osc.set_frequency(100.0);
        osc.set_table_position(0.5);

        let mut sine = WavetableOsc::with_default_tables(48000.0);
        sine.set_frequency(100.0);
        sine.set_table_position(0.0);

        let mut tri = WavetableOsc::with_default_tables(48000.0);
        tri.set_frequency(100.0);
        tri.set_table_position(1.0);

        for _ in 0..1024 {
            let blended = osc.process();
            let expected = 0.5 * sine.process() + 0.5 * tri.process();
            assert!((blended - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_add_table_rejects_wrong_size() {
        let mut osc = WavetableOsc::new(48000.0);
        assert!(!osc.add_table(&[0.0; 100]));
        assert!(osc.add_table(&[0.0; TABLE_SIZE]));
    }

    #[test]
    fn test_add_table_respects_capacity() {
        let mut osc = WavetableOsc::new(48000.0);
        let table = [0.0f32; TABLE_SIZE];
        for _ in 0..MAX_TABLES {
            assert!(osc.add_table(&table));
        }
        assert!(!osc.add_table(&table), "17th table must be rejected");
        assert_eq!(osc.num_tables(), MAX_TABLES);
    }

    #[test]
    fn test_output_bounded() {
        let mut osc = WavetableOsc::with_default_tables(48000.0);
        osc.set_frequency(2000.0);
        osc.set_table_position(2.7);
        for _ in 0..10000 {
            let s = osc.process();
            assert!((-1.0..=1.0).contains(&s), "out of range: {s}");
        }
    }
}
