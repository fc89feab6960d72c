//! Three-band EQ: low shelf, mid peak, high shelf.

use intervo_core::{
    Biquad, Effect, ParamDescriptor, ParamScale, ParamUnit, ParameterInfo,
    high_shelf_coefficients, low_shelf_coefficients, peaking_eq_coefficients,
};
use libm::sqrtf;

/// Three-band EQ with serial biquads per channel.
///
/// The mid peak sits at the geometric mean of the two shelf corners with
/// Q = 1.
///
/// ## Parameters
///
/// | Idx | Name | Range | Default |
/// |-----|------|-------|---------|
/// | 0 | Low Gain | -12 to +12 dB | 0.0 |
/// | 1 | Mid Gain | -12 to +12 dB | 0.0 |
/// | 2 | High Gain | -12 to +12 dB | 0.0 |
/// | 3 | Low Freq | 80–500 Hz | 250 |
/// | 4 | High Freq | 2k–8k Hz | 4000 |
#[derive(Debug, Clone)]
pub struct Eq {
    low_db: f32,
    mid_db: f32,
    high_db: f32,
    low_freq: f32,
    high_freq: f32,
    /// Biquads per channel: [channel][band]
    bands: [[Biquad; 3]; 2],
    sample_rate: f32,
}

impl Eq {
    /// Create a flat EQ.
    pub fn new(sample_rate: f32) -> Self {
        let mut eq = Self {
            low_db: 0.0,
            mid_db: 0.0,
            high_db: 0.0,
            low_freq: 250.0,
            high_freq: 4000.0,
            bands: core::array::from_fn(|_| core::array::from_fn(|_| Biquad::new())),
            sample_rate,
        };
        eq.update_coefficients();
        eq
    }

    /// Set low-shelf gain in dB.
    pub fn set_low_db(&mut self, db: f32) {
        let clamped = db.clamp(-12.0, 12.0);
        if clamped != self.low_db {
            self.low_db = clamped;
            self.update_coefficients();
        }
    }

    /// Set mid-peak gain in dB.
    pub fn set_mid_db(&mut self, db: f32) {
        let clamped = db.clamp(-12.0, 12.0);
        if clamped != self.mid_db {
            self.mid_db = clamped;
            self.update_coefficients();
        }
    }

    /// Set high-shelf gain in dB.
    pub fn set_high_db(&mut self, db: f32) {
        let clamped = db.clamp(-12.0, 12.0);
        if clamped != self.high_db {
            self.high_db = clamped;
            self.update_coefficients();
        }
    }

    /// Set the low-shelf corner frequency.
    pub fn set_low_freq(&mut self, freq: f32) {
        let clamped = freq.clamp(80.0, 500.0);
        if clamped != self.low_freq {
            self.low_freq = clamped;
            self.update_coefficients();
        }
    }

    /// Set the high-shelf corner frequency.
    pub fn set_high_freq(&mut self, freq: f32) {
        let clamped = freq.clamp(2000.0, 8000.0);
        if clamped != self.high_freq {
            self.high_freq = clamped;
            self.update_coefficients();
        }
    }

    fn update_coefficients(&mut self) {
        let low = low_shelf_coefficients(self.low_freq, self.low_db, self.sample_rate);
        let mid_freq = sqrtf(self.low_freq * self.high_freq);
        let mid = peaking_eq_coefficients(mid_freq, 1.0, self.mid_db, self.sample_rate);
        let high = high_shelf_coefficients(self.high_freq, self.high_db, self.sample_rate);

        for channel in &mut self.bands {
            channel[0].set_coefficients(low.0, low.1, low.2, low.3, low.4, low.5);
            channel[1].set_coefficients(mid.0, mid.1, mid.2, mid.3, mid.4, mid.5);
            channel[2].set_coefficients(high.0, high.1, high.2, high.3, high.4, high.5);
        }
    }

    #[inline]
    fn process_channel(&mut self, channel: usize, input: f32) -> f32 {
        let mut sample = input;
        for band in &mut self.bands[channel] {
            sample = band.process(sample);
        }
        sample
    }
}

impl Effect for Eq {
    fn process(&mut self, input: f32) -> f32 {
        self.process_channel(0, input)
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process_channel(0, left), self.process_channel(1, right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    fn reset(&mut self) {
        for channel in &mut self.bands {
            for band in channel {
                band.clear();
            }
        }
    }
}

impl ParameterInfo for Eq {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::gain_db("Low Gain", "Low", -12.0, 12.0, 0.0)),
            1 => Some(ParamDescriptor::gain_db("Mid Gain", "Mid", -12.0, 12.0, 0.0)),
            2 => Some(ParamDescriptor::gain_db("High Gain", "High", -12.0, 12.0, 0.0)),
            3 => Some(
                ParamDescriptor::custom("Low Freq", "LowFrq", 80.0, 500.0, 250.0)
                    .with_unit(ParamUnit::Hertz)
                    .with_scale(ParamScale::Logarithmic),
            ),
            4 => Some(
                ParamDescriptor::custom("High Freq", "HiFrq", 2000.0, 8000.0, 4000.0)
                    .with_unit(ParamUnit::Hertz)
                    .with_scale(ParamScale::Logarithmic),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.low_db,
            1 => self.mid_db,
            2 => self.high_db,
            3 => self.low_freq,
            4 => self.high_freq,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_low_db(value),
            1 => self.set_mid_db(value),
            2 => self.set_high_db(value),
            3 => self.set_low_freq(value),
            4 => self.set_high_freq(value),
            _ => {}
        }
    }
}
