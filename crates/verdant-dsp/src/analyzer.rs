use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::{AnalyzerConfig, DspError};

/// Smallest reference level used for normalization.
const REFERENCE_FLOOR: f32 = 1e-6;

/// Half-open FFT bin range `[start, end)` covered by one band.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BandRange {
    pub start: usize,
    pub end: usize,
}

impl BandRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, bin: usize) -> bool {
        (self.start..self.end).contains(&bin)
    }
}

/// Turns a block of mono samples into log-spaced, display-normalized band levels.
///
/// Pipeline per call: zero-pad, Hann window, forward FFT, per-band RMS of bin
/// magnitudes, frequency tilt, percentile normalization, S-curve. Output
/// levels lie in `[0, 1.4]`; the top of the range is reserved for peaks.
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft: Arc<dyn Fft<f32>>,

    window: Vec<f32>,
    ranges: Vec<BandRange>,

    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    bands: Vec<f32>,
    sorted: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, DspError> {
        config.validate()?;

        let fft = FftPlanner::new().plan_fft_forward(config.fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        let analyzer = Self {
            window: hann_window(config.fft_size),
            ranges: band_ranges(&config),
            fft,
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            bands: vec![0.0; config.bands],
            sorted: Vec::with_capacity(config.bands),
            config,
        };

        log::debug!(
            "spectrum analyzer: fft {} bins, {} bands, {:.3} Hz/bin",
            analyzer.config.fft_size,
            analyzer.config.bands,
            analyzer.config.bin_resolution()
        );

        Ok(analyzer)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn band_ranges(&self) -> &[BandRange] {
        &self.ranges
    }

    /// Analyzes the first `fft_size` samples (zero-padded if shorter).
    ///
    /// Non-finite samples are treated as silence.
    pub fn process(&mut self, samples: &[f32]) -> &[f32] {
        let n = self.config.fft_size;

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = samples.get(i).copied().filter(|s| s.is_finite()).unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let spectrum = &self.buffer[..n / 2];
        for (band, range) in self.bands.iter_mut().zip(&self.ranges) {
            *band = band_rms(spectrum, *range);
        }

        compensate_gain(&mut self.bands);
        normalize(&mut self.bands, &mut self.sorted);

        &self.bands
    }

    /// Levels from the most recent [`process`](Self::process) call.
    pub fn levels(&self) -> &[f32] {
        &self.bands
    }
}

fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos()))
        .collect()
}

/// Log-spaced band edges between `min_freq` and `max_freq`, mapped to bins.
///
/// Every range is non-empty and lies inside `[1, fft_size / 2]`; low bands
/// may share bins when the resolution is coarser than the band spacing.
fn band_ranges(config: &AnalyzerConfig) -> Vec<BandRange> {
    let half = config.fft_size / 2;
    let res = config.bin_resolution();
    let log_min = config.min_freq.log10();
    let log_range = config.max_freq.log10() - log_min;
    let bands = config.bands as f32;

    (0..config.bands)
        .map(|i| {
            let f_start = 10f32.powf(log_min + log_range * (i as f32 / bands));
            let f_end = 10f32.powf(log_min + log_range * ((i + 1) as f32 / bands));

            let start = ((f_start / res) as usize).max(1).min(half - 1);
            let end = ((f_end / res) as usize).max(start + 1).min(half);
            BandRange { start, end }
        })
        .collect()
}

fn band_rms(spectrum: &[Complex<f32>], range: BandRange) -> f32 {
    if range.is_empty() {
        return 0.0;
    }
    let sum: f32 = spectrum[range.start..range.end].iter().map(|c| c.norm_sqr()).sum();
    (sum / range.len() as f32).sqrt()
}

/// Tilts the spectrum: the lowest 30% of bands are attenuated (down to half),
/// the top 20% boosted (up to 1.5x).
fn compensate_gain(bands: &mut [f32]) {
    let len = bands.len() as f32;
    for (i, band) in bands.iter_mut().enumerate() {
        let ratio = i as f32 / len;
        if ratio < 0.3 {
            *band *= (1.0 - (0.3 - ratio) * 2.0).max(0.5);
        } else if ratio > 0.8 {
            *band *= (1.0 + (ratio - 0.8) * 1.5).min(1.5);
        }
    }
}

/// Sorted position of the 95th-percentile band.
fn reference_index(bands: usize) -> usize {
    ((bands as f32 * 0.95) as usize).max(1).min(bands.saturating_sub(1))
}

fn normalize(bands: &mut [f32], sorted: &mut Vec<f32>) {
    if bands.is_empty() {
        return;
    }

    sorted.clear();
    sorted.extend_from_slice(bands);
    sorted.sort_unstable_by(f32::total_cmp);

    let reference = sorted[reference_index(bands.len())].max(REFERENCE_FLOOR);

    for band in bands.iter_mut() {
        *band = s_curve((*band / reference).clamp(0.0, 1.0));
    }
}

/// Contrast curve: squashes the noise floor and lifts peaks above 0.9.
fn s_curve(x: f32) -> f32 {
    if x < 0.1 {
        x * 0.1
    } else if x > 0.9 {
        0.9 + (x - 0.9) * 5.0
    } else {
        let t = (x - 0.1) / 0.8;
        0.01 + 0.98 * t * t
    }
}
