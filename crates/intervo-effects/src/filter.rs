//! Track filter effect wrapping the state variable filter.

use intervo_core::{
    Effect, ParamDescriptor, ParamScale, ParamUnit, ParameterInfo, StateVariableFilter, SvfMode,
};

/// Stereo state-variable filter effect.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Cutoff | 20–20k Hz (log) | 1000 |
/// | 1 | Resonance | 0.5–10 | 1 |
/// | 2 | Type | 0 = LP, 1 = HP, 2 = BP | 0 |
#[derive(Debug, Clone)]
pub struct Filter {
    svf_l: StateVariableFilter,
    svf_r: StateVariableFilter,
}

impl Filter {
    /// Create a 1 kHz lowpass.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf_l = StateVariableFilter::new(sample_rate);
        svf_l.set_cutoff(1000.0);
        let svf_r = svf_l.clone();
        Self { svf_l, svf_r }
    }

    /// Set cutoff frequency in Hz.
    pub fn set_cutoff(&mut self, freq: f32) {
        self.svf_l.set_cutoff(freq);
        self.svf_r.set_cutoff(freq);
    }

    /// Set resonance.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.svf_l.set_resonance(resonance);
        self.svf_r.set_resonance(resonance);
    }

    /// Set the filter mode from a parameter index (0 = LP, 1 = HP, 2 = BP).
    pub fn set_mode_index(&mut self, index: f32) {
        let mode = match index as u8 {
            1 => SvfMode::Highpass,
            2 => SvfMode::Bandpass,
            _ => SvfMode::Lowpass,
        };
        self.svf_l.set_mode(mode);
        self.svf_r.set_mode(mode);
    }

    fn mode_index(&self) -> f32 {
        match self.svf_l.mode() {
            SvfMode::Highpass => 1.0,
            SvfMode::Bandpass => 2.0,
            _ => 0.0,
        }
    }
}

impl Effect for Filter {
    fn process(&mut self, input: f32) -> f32 {
        self.svf_l.process(input)
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.svf_l.process(left), self.svf_r.process(right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.svf_l.set_sample_rate(sample_rate);
        self.svf_r.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.svf_l.reset();
        self.svf_r.reset();
    }
}

impl ParameterInfo for Filter {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::freq_hz("Cutoff", "Cutoff", 20.0, 20000.0, 1000.0)),
            1 => Some(ParamDescriptor::custom("Resonance", "Res", 0.5, 10.0, 1.0)),
            2 => Some(
                ParamDescriptor::custom("Type", "Type", 0.0, 2.0, 0.0)
                    .with_unit(ParamUnit::None)
                    .with_scale(ParamScale::Linear)
                    .with_step(1.0),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.svf_l.cutoff(),
            1 => self.svf_l.resonance(),
            2 => self.mode_index(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_cutoff(value),
            1 => self.set_resonance(value),
            2 => self.set_mode_index(value.clamp(0.0, 2.0)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = Filter::new(48000.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = filter.process(1.0);
        }
        assert!((out - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = Filter::new(48000.0);
        filter.set_param(2, 1.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = filter.process(1.0);
        }
        assert!(out.abs() < 0.1);
    }

    #[test]
    fn test_param_clamp() {
        let mut filter = Filter::new(48000.0);
        filter.set_param(0, 1.0);
        assert_eq!(filter.get_param(0), 20.0);
        filter.set_param(1, 100.0);
        assert_eq!(filter.get_param(1), 10.0);
        filter.set_param(2, 7.0);
        assert_eq!(filter.get_param(2), 2.0);
    }

    #[test]
    fn test_stereo_independent_state() {
        let mut filter = Filter::new(48000.0);
        for _ in 0..1000 {
            filter.process_stereo(1.0, 0.0);
        }
        let (l, r) = filter.process_stereo(1.0, 0.0);
        assert!(l > 0.5, "left charged with DC");
        assert!(r.abs() < 0.05, "right stays silent: {r}");
    }
}
