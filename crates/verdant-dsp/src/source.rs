use std::f64::consts::TAU;

use crate::DspError;

/// Producer of mono sample chunks for the analysis thread.
///
/// Platform capture backends (e.g. system loopback) implement this; the
/// sources in this module are synthetic.
pub trait SampleSource: Send {
    /// Sample rate of the produced stream, in Hz.
    fn sample_rate(&self) -> f32;

    /// Replaces the contents of `out` with the next chunk and returns its length.
    ///
    /// Returning `Ok(0)` means nothing is available yet.
    fn next_chunk(&mut self, out: &mut Vec<f32>) -> Result<usize, DspError>;
}

/// Sum of sine partials with a phase that continues across chunks.
#[derive(Debug, Clone)]
pub struct ToneSource {
    sample_rate: f32,
    chunk_len: usize,
    partials: Vec<Partial>,
    position: u64,
}

#[derive(Debug, Clone, Copy)]
struct Partial {
    freq: f32,
    amplitude: f32,
}

impl ToneSource {
    pub fn new(sample_rate: f32, chunk_len: usize) -> Self {
        Self {
            sample_rate,
            chunk_len,
            partials: Vec::new(),
            position: 0,
        }
    }

    /// Adds a sine partial.
    pub fn with_partial(mut self, freq: f32, amplitude: f32) -> Self {
        self.partials.push(Partial { freq, amplitude });
        self
    }

    /// A chord spread across the audible range, for demos.
    pub fn demo(sample_rate: f32, chunk_len: usize) -> Self {
        Self::new(sample_rate, chunk_len)
            .with_partial(55.0, 0.6)
            .with_partial(220.0, 0.4)
            .with_partial(880.0, 0.3)
            .with_partial(3_520.0, 0.2)
            .with_partial(12_000.0, 0.1)
    }

    /// Samples produced so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn sample_at(&self, index: u64) -> f32 {
        let t = index as f64 / self.sample_rate as f64;
        self.partials
            .iter()
            .map(|p| p.amplitude * (TAU * p.freq as f64 * t).sin() as f32)
            .sum()
    }
}

impl SampleSource for ToneSource {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn next_chunk(&mut self, out: &mut Vec<f32>) -> Result<usize, DspError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(DspError::Source(format!(
                "tone source has invalid sample rate {}",
                self.sample_rate
            )));
        }

        out.clear();
        out.extend((0..self.chunk_len as u64).map(|i| self.sample_at(self.position + i)));
        self.position += self.chunk_len as u64;
        Ok(out.len())
    }
}

/// Endless zeros.
#[derive(Debug, Clone)]
pub struct SilenceSource {
    sample_rate: f32,
    chunk_len: usize,
}

impl SilenceSource {
    pub fn new(sample_rate: f32, chunk_len: usize) -> Self {
        Self {
            sample_rate,
            chunk_len,
        }
    }
}

impl SampleSource for SilenceSource {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn next_chunk(&mut self, out: &mut Vec<f32>) -> Result<usize, DspError> {
        out.clear();
        out.resize(self.chunk_len, 0.0);
        Ok(out.len())
    }
}

/// Averages interleaved frames into one mono channel.
///
/// A trailing partial frame is dropped. Zero channels yields nothing.
pub fn downmix_interleaved(samples: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        _ => {
            let scale = 1.0 / channels as f32;
            samples
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() * scale)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_phase_continues_across_chunks() {
        let mut split = ToneSource::new(48_000.0, 64).with_partial(1_000.0, 1.0);
        let mut whole = ToneSource::new(48_000.0, 128).with_partial(1_000.0, 1.0);

        let mut a = Vec::new();
        let mut b = Vec::new();
        split.next_chunk(&mut a).unwrap();
        split.next_chunk(&mut b).unwrap();
        a.extend_from_slice(&b);

        let mut all = Vec::new();
        whole.next_chunk(&mut all).unwrap();
        assert_eq!(a, all);
        assert_eq!(split.position(), 128);
    }

    #[test]
    fn tone_is_deterministic() {
        let mut x = ToneSource::demo(44_100.0, 256);
        let mut y = ToneSource::demo(44_100.0, 256);
        let (mut a, mut b) = (Vec::new(), Vec::new());
        x.next_chunk(&mut a).unwrap();
        y.next_chunk(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quarter_period_hits_amplitude() {
        // 12 kHz at 48 kHz: four samples per period.
        let mut src = ToneSource::new(48_000.0, 4).with_partial(12_000.0, 0.5);
        let mut out = Vec::new();
        assert_eq!(src.next_chunk(&mut out).unwrap(), 4);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert!((out[3] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn invalid_rate_is_a_source_error() {
        let mut src = ToneSource::new(0.0, 4).with_partial(100.0, 1.0);
        assert!(matches!(src.next_chunk(&mut Vec::new()), Err(DspError::Source(_))));
    }

    #[test]
    fn silence_replaces_previous_contents() {
        let mut out = vec![1.0; 3];
        let n = SilenceSource::new(48_000.0, 5).next_chunk(&mut out).unwrap();
        assert_eq!(n, 5);
        assert_eq!(out, vec![0.0; 5]);
    }

    #[test]
    fn downmix_averages_frames() {
        assert_eq!(downmix_interleaved(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
        let three = downmix_interleaved(&[0.3, 0.6, 0.9, 1.0], 3);
        assert_eq!(three.len(), 1);
        assert!((three[0] - 0.6).abs() < 1e-6);
        assert_eq!(downmix_interleaved(&[0.1, 0.2], 1), vec![0.1, 0.2]);
        assert!(downmix_interleaved(&[0.1, 0.2], 0).is_empty());
    }
}
