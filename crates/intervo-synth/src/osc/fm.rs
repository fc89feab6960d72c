//! FM oscillator with up to six operators.
//!
//! Operators evaluate in fixed order 0..N-1, so matrix entry `M[dest][src]`
//! only takes effect for `src < dest` — the routing graph is a DAG by
//! construction. Self-modulation is covered by the per-operator feedback
//! coefficient instead.

use core::f64::consts::TAU;
use libm::sin;

/// Maximum number of FM operators.
pub const MAX_OPERATORS: usize = 6;

/// Preset modulation-matrix topologies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FmAlgorithm {
    /// Serial chain: op 0 -> 1 -> ... -> N-1, last operator is the carrier.
    #[default]
    Stack,
    /// All operators are carriers, no cross-modulation (organ-like).
    Parallel,
    /// Op 0 modulates every other operator; ops 1..N-1 are carriers.
    Star,
}

/// A single FM operator.
#[derive(Debug, Clone)]
struct Operator {
    /// Frequency ratio relative to the base frequency
    ratio: f64,
    /// Fixed detune in Hz
    detune: f64,
    /// Output level contribution when acting as a carrier
    level: f32,
    /// Self-modulation coefficient
    feedback: f32,
    phase: f64,
    prev_out: f32,
}

impl Operator {
    fn new() -> Self {
        Self {
            ratio: 1.0,
            detune: 0.0,
            level: 0.0,
            feedback: 0.0,
            phase: 0.0,
            prev_out: 0.0,
        }
    }
}

/// Multi-operator FM oscillator.
///
/// # Example
///
/// ```rust
/// use intervo_synth::{FmOsc, FmAlgorithm};
///
/// let mut osc = FmOsc::new(48000.0);
/// osc.set_algorithm(FmAlgorithm::Stack);
/// osc.set_frequency(220.0);
///
/// let sample = osc.process();
/// ```
#[derive(Debug, Clone)]
pub struct FmOsc {
    ops: [Operator; MAX_OPERATORS],
    num_ops: usize,
    /// Modulation amounts: matrix[dest][src], effective only for src < dest.
    /// Amounts are modulation indices — frequency deviation is
    /// `matrix[i][j] * out_j * base_freq`.
    matrix: [[f32; MAX_OPERATORS]; MAX_OPERATORS],
    base_freq: f64,
    sample_rate: f64,
}

impl Default for FmOsc {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl FmOsc {
    /// Create a two-operator stack at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            ops: core::array::from_fn(|_| Operator::new()),
            num_ops: 2,
            matrix: [[0.0; MAX_OPERATORS]; MAX_OPERATORS],
            base_freq: 440.0,
            sample_rate: f64::from(sample_rate),
        };
        osc.set_algorithm(FmAlgorithm::Stack);
        osc
    }

    /// Set the number of active operators (1 to 6).
    pub fn set_num_operators(&mut self, count: usize) {
        self.num_ops = count.clamp(1, MAX_OPERATORS);
    }

    /// Number of active operators.
    pub fn num_operators(&self) -> usize {
        self.num_ops
    }

    /// Set an operator's frequency ratio.
    pub fn set_ratio(&mut self, op: usize, ratio: f32) {
        if op < MAX_OPERATORS {
            self.ops[op].ratio = f64::from(ratio.clamp(0.01, 32.0));
        }
    }

    /// Set an operator's detune in Hz.
    pub fn set_detune(&mut self, op: usize, detune_hz: f32) {
        if op < MAX_OPERATORS {
            self.ops[op].detune = f64::from(detune_hz.clamp(-100.0, 100.0));
        }
    }

    /// Set an operator's carrier output level.
    pub fn set_level(&mut self, op: usize, level: f32) {
        if op < MAX_OPERATORS {
            self.ops[op].level = level.clamp(0.0, 1.0);
        }
    }

    /// Set an operator's self-feedback coefficient.
    pub fn set_feedback(&mut self, op: usize, feedback: f32) {
        if op < MAX_OPERATORS {
            self.ops[op].feedback = feedback.clamp(0.0, 2.0);
        }
    }

    /// Set a modulation-matrix entry.
    ///
    /// Only `src < dest` entries take effect; others are stored but inert
    /// because operators evaluate in index order.
    pub fn set_matrix(&mut self, dest: usize, src: usize, amount: f32) {
        if dest < MAX_OPERATORS && src < MAX_OPERATORS {
            self.matrix[dest][src] = amount.clamp(0.0, 16.0);
        }
    }

    /// Matrix entry at `(dest, src)`.
    pub fn matrix(&self, dest: usize, src: usize) -> f32 {
        self.matrix[dest][src]
    }

    /// Configure the operators and matrix for a preset topology.
    pub fn set_algorithm(&mut self, algorithm: FmAlgorithm) {
        self.matrix = [[0.0; MAX_OPERATORS]; MAX_OPERATORS];
        for op in &mut self.ops {
            op.level = 0.0;
            op.feedback = 0.0;
        }

        match algorithm {
            FmAlgorithm::Stack => {
                for i in 1..self.num_ops {
                    self.matrix[i][i - 1] = 2.0;
                }
                self.ops[self.num_ops - 1].level = 1.0;
            }
            FmAlgorithm::Parallel => {
                let level = 1.0 / self.num_ops as f32;
                for op in self.ops.iter_mut().take(self.num_ops) {
                    op.level = level;
                }
            }
            FmAlgorithm::Star => {
                if self.num_ops > 1 {
                    let level = 1.0 / (self.num_ops - 1) as f32;
                    for i in 1..self.num_ops {
                        self.matrix[i][0] = 1.5;
                        self.ops[i].level = level;
                    }
                } else {
                    self.ops[0].level = 1.0;
                }
            }
        }
    }

    /// Set the base frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.base_freq = f64::from(freq_hz.max(0.0));
    }

    /// Current base frequency.
    pub fn frequency(&self) -> f32 {
        self.base_freq as f32
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
    }

    /// Reset all operator phases and feedback history.
    pub fn reset(&mut self) {
        for op in &mut self.ops {
            op.phase = 0.0;
            op.prev_out = 0.0;
        }
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut outputs = [0.0f32; MAX_OPERATORS];
        let mut mixed = 0.0f32;

        for i in 0..self.num_ops {
            // Frequency deviation from earlier operators plus self-feedback
            let mut deviation = 0.0f64;
            for (j, &out) in outputs.iter().enumerate().take(i) {
                let amount = self.matrix[i][j];
                if amount != 0.0 {
                    deviation += f64::from(amount * out);
                }
            }
            deviation += f64::from(self.ops[i].feedback * self.ops[i].prev_out);

            let freq =
                self.base_freq * self.ops[i].ratio + self.ops[i].detune + self.base_freq * deviation;
            self.ops[i].phase += freq / self.sample_rate;
            self.ops[i].phase -= libm::floor(self.ops[i].phase);

            let out = sin(self.ops[i].phase * TAU) as f32;
            self.ops[i].prev_out = out;
            outputs[i] = out;
            mixed += out * self.ops[i].level;
        }

        mixed
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
    fn test_parallel_is_sine_sum() {
        let mut osc = FmOsc::new(48000.0);
        osc.set_num_operators(1);
        osc.set_algorithm(FmAlgorithm::Parallel);
        osc.set_frequency(440.0);

        // Single parallel operator is just a sine
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
    fn test_stack_richer_than_sine() {
        // A modulated stack should have substantially more signal variation
        // than a pure sine between consecutive samples at the same frequency.
        let sr = 48000.0;
        let mut stack = FmOsc::new(sr);
        stack.set_num_operators(2);
        stack.set_ratio(0, 2.0);
        stack.set_algorithm(FmAlgorithm::Stack);
        stack.set_frequency(220.0);

        let mut sine = FmOsc::new(sr);
        sine.set_num_operators(1);
        sine.set_algorithm(FmAlgorithm::Parallel);
        sine.set_frequency(220.0);

        let mut stack_roughness = 0.0f32;
        let mut sine_roughness = 0.0f32;
        let mut prev_stack = 0.0;
        let mut prev_sine = 0.0;
        for _ in 0..48000 {
            let s = stack.process();
            let p = sine.process();
            stack_roughness += (s - prev_stack).abs();
            sine_roughness += (p - prev_sine).abs();
            prev_stack = s;
            prev_sine = p;
        }
        assert!(
            stack_roughness > sine_roughness * 1.2,
            "FM should add harmonics: stack {stack_roughness} vs sine {sine_roughness}"
        );
    }

    #[test]
    fn test_upper_triangular_matrix_inert() {
        // M[0][1] routes a later operator into an earlier one; evaluation
        // order makes it a no-op.
        let sr = 48000.0;
        let mut with_entry = FmOsc::new(sr);
        with_entry.set_num_operators(2);
        with_entry.set_algorithm(FmAlgorithm::Parallel);
        with_entry.set_matrix(0, 1, 8.0);

        let mut without = FmOsc::new(sr);
        without.set_num_operators(2);
        without.set_algorithm(FmAlgorithm::Parallel);

        for _ in 0..1024 {
            assert_eq!(with_entry.process(), without.process());
        }
    }

    #[test]
    fn test_output_bounded() {
        let mut osc = FmOsc::new(48000.0);
        osc.set_num_operators(6);
        osc.set_algorithm(FmAlgorithm::Star);
        osc.set_frequency(440.0);
        for op in 0..6 {
            osc.set_feedback(op, 1.0);
        }

        for _ in 0..48000 {
            let s = osc.process();
            assert!(s.is_finite());
            assert!((-2.0..=2.0).contains(&s), "out of range: {s}");
        }
    }

    #[test]
    fn test_reset() {
        let mut osc = FmOsc::new(48000.0);
        for _ in 0..500 {
            osc.process();
        }
        osc.reset();

        let fresh = FmOsc::new(48000.0);
        let mut osc2 = fresh.clone();
        for _ in 0..256 {
            assert_eq!(osc.process(), osc2.process());
        }
    }

    #[test]
    fn test_operator_count_clamped() {
        let mut osc = FmOsc::new(48000.0);
        osc.set_num_operators(100);
        assert_eq!(osc.num_operators(), MAX_OPERATORS);
        osc.set_num_operators(0);
        assert_eq!(osc.num_operators(), 1);
    }
}
