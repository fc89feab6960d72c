//! Streaming spectrum analyzer: Hann-windowed FFT reduced to 32 log bands.
//!
//! Runs on the *reader* side of the spectrum tap. Samples stream in via
//! [`push_samples`](SpectrumAnalyzer::push_samples); every 512 new samples
//! (50% overlap of the 1024 window) the analyzer recomputes its band
//! magnitudes.

use crate::fft::{Fft, Window};

/// Analysis window length in samples.
pub const SPECTRUM_WINDOW: usize = 1024;

/// Hop size between FFTs (50% overlap).
pub const SPECTRUM_HOP: usize = 512;

/// Number of logarithmically spaced output bands.
pub const NUM_BANDS: usize = 32;

/// Low edge of the band range in Hz.
const BAND_LOW_HZ: f32 = 20.0;

/// Streaming 32-band spectrum analyzer.
///
/// Band edges are log-spaced from 20 Hz to Nyquist. Magnitudes are
/// normalized so a full-scale sine at a band center reads approximately
/// 1.0 regardless of band width.
///
/// # Example
///
/// ```rust
/// use intervo_analysis::SpectrumAnalyzer;
///
/// let mut analyzer = SpectrumAnalyzer::new(48000.0);
/// let samples: Vec<f32> = (0..2048)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin())
///     .collect();
/// analyzer.push_samples(&samples);
///
/// let bands = analyzer.bands();
/// ```
pub struct SpectrumAnalyzer {
    fft: Fft,
    /// Sliding window of the most recent samples
    window: [f32; SPECTRUM_WINDOW],
    write_pos: usize,
    /// Samples accumulated since the last FFT
    since_fft: usize,
    /// Whether a full window has ever been accumulated
    primed: bool,
    /// Per-band bin ranges (start inclusive, end exclusive)
    band_bins: [(usize, usize); NUM_BANDS],
    bands: [f32; NUM_BANDS],
    scratch: Vec<f32>,
    sample_rate: f32,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            fft: Fft::new(SPECTRUM_WINDOW),
            window: [0.0; SPECTRUM_WINDOW],
            write_pos: 0,
            since_fft: 0,
            primed: false,
            band_bins: Self::compute_band_bins(sample_rate),
            bands: [0.0; NUM_BANDS],
            scratch: vec![0.0; SPECTRUM_WINDOW],
            sample_rate,
        }
    }

    /// Sample rate this analyzer was built for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Feed new samples. Recomputes the bands each time 512 samples have
    /// accumulated since the previous FFT.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.window[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % SPECTRUM_WINDOW;
            if self.write_pos == 0 {
                self.primed = true;
            }
            self.since_fft += 1;

            if self.since_fft >= SPECTRUM_HOP && (self.primed || self.write_pos == 0) {
                self.compute();
                self.since_fft = 0;
            }
        }
    }

    /// The latest band magnitudes.
    pub fn bands(&self) -> &[f32; NUM_BANDS] {
        &self.bands
    }

    /// Center frequency of a band in Hz.
    pub fn band_center_hz(&self, band: usize) -> f32 {
        let nyquist = self.sample_rate / 2.0;
        let ratio = nyquist / BAND_LOW_HZ;
        let t = (band as f32 + 0.5) / NUM_BANDS as f32;
        BAND_LOW_HZ * ratio.powf(t)
    }

    /// Recompute band magnitudes from the current window.
    fn compute(&mut self) {
        // Unroll the ring into time order
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            *slot = self.window[(self.write_pos + i) % SPECTRUM_WINDOW];
        }
        Window::Hann.apply(&mut self.scratch);

        let spectrum = self.fft.forward(&self.scratch);

        // A full-scale sine through a Hann window peaks at N/4 with its
        // main lobe summing to ~N/2 across adjacent bins; scaling the band
        // sum by 2/N makes such a sine read ~1.0
        let norm = 2.0 / SPECTRUM_WINDOW as f32;
        for (band, &(start, end)) in self.band_bins.iter().enumerate() {
            let mut sum = 0.0;
            for bin in start..end {
                sum += spectrum[bin].norm();
            }
            self.bands[band] = sum * norm;
        }
    }

    /// Log-spaced bin ranges from 20 Hz to Nyquist. Every band spans at
    /// least one bin; ranges are clamped to the positive-frequency bins.
    fn compute_band_bins(sample_rate: f32) -> [(usize, usize); NUM_BANDS] {
        let nyquist = sample_rate / 2.0;
        let bin_width = sample_rate / SPECTRUM_WINDOW as f32;
        let max_bin = SPECTRUM_WINDOW / 2;
        let ratio = nyquist / BAND_LOW_HZ;

        core::array::from_fn(|band| {
            let f_lo = BAND_LOW_HZ * ratio.powf(band as f32 / NUM_BANDS as f32);
            let f_hi = BAND_LOW_HZ * ratio.powf((band + 1) as f32 / NUM_BANDS as f32);
            let start = ((f_lo / bin_width) as usize).min(max_bin);
            let end = if band == NUM_BANDS - 1 {
                // The top band always reaches the Nyquist bin
                max_bin + 1
            } else {
                ((f_hi / bin_width).ceil() as usize).clamp(start + 1, max_bin + 1)
            };
            (start, end)
        })
    }
}
