//! Verdant spectrum analysis.
//!
//! Samples come from a [`SampleSource`], an [`AnalysisWorker`] runs them
//! through a [`SpectrumAnalyzer`] on its own thread, and the resulting band
//! levels are published through a [`SharedSpectrum`] for the renderer to read.

mod analyzer;
mod config;
mod error;
mod source;
mod spectrum;
mod worker;

pub use analyzer::{BandRange, SpectrumAnalyzer};
pub use config::AnalyzerConfig;
pub use error::DspError;
pub use source::{downmix_interleaved, SampleSource, SilenceSource, ToneSource};
pub use spectrum::SharedSpectrum;
pub use worker::AnalysisWorker;
