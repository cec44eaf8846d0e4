use crate::DspError;

/// Spectrum analyzer parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// FFT window length in samples.
    ///
    /// Shorter windows react faster at the cost of low-frequency resolution.
    pub fft_size: usize,

    /// Number of output bands.
    pub bands: usize,

    /// Sample rate of the incoming mono stream, in Hz.
    pub sample_rate: f32,

    /// Lower edge of the first band, in Hz.
    pub min_freq: f32,

    /// Upper edge of the last band, in Hz.
    pub max_freq: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            bands: 64,
            sample_rate: 48_000.0,
            min_freq: 20.0,
            max_freq: 20_000.0,
        }
    }
}

impl AnalyzerConfig {
    /// Frequency step between adjacent FFT bins.
    pub fn bin_resolution(&self) -> f32 {
        self.sample_rate / self.fft_size as f32
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }

    pub fn validate(&self) -> Result<(), DspError> {
        if self.fft_size < 4 {
            return Err(DspError::config(
                "fft_size",
                format!("must be at least 4, got {}", self.fft_size),
            ));
        }
        if self.bands == 0 {
            return Err(DspError::config("bands", "must be at least 1"));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(DspError::config(
                "sample_rate",
                format!("must be finite and positive, got {}", self.sample_rate),
            ));
        }
        if !(self.min_freq.is_finite() && self.min_freq > 0.0) {
            return Err(DspError::config(
                "min_freq",
                format!("must be finite and positive, got {}", self.min_freq),
            ));
        }
        if !(self.max_freq.is_finite() && self.max_freq > self.min_freq) {
            return Err(DspError::config(
                "max_freq",
                format!("must exceed min_freq {}, got {}", self.min_freq, self.max_freq),
            ));
        }
        if self.max_freq > self.nyquist() {
            return Err(DspError::config(
                "max_freq",
                format!("must not exceed nyquist {}, got {}", self.nyquist(), self.max_freq),
            ));
        }
        Ok(())
    }
}
