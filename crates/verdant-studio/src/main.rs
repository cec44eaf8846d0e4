mod app;
mod bars;

use std::time::Duration;

use anyhow::Result;

use verdant_dsp::{AnalysisWorker, AnalyzerConfig, SharedSpectrum, SpectrumAnalyzer, ToneSource};
use verdant_engine::device::GpuInit;
use verdant_engine::logging::{init_logging, LoggingConfig};
use verdant_engine::window::{Runtime, RuntimeConfig};

use crate::app::SpectrumApp;

/// Samples pulled from the source per analysis pass.
const CHUNK_LEN: usize = 256;

/// Pause between analysis passes.
const ANALYSIS_INTERVAL: Duration = Duration::from_millis(5);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = AnalyzerConfig::default();
    let bands = config.bands;
    let source = ToneSource::demo(config.sample_rate, CHUNK_LEN);

    let analyzer = SpectrumAnalyzer::new(config)?;
    let spectrum = SharedSpectrum::new(bands);
    let worker = AnalysisWorker::spawn(source, analyzer, spectrum.clone(), ANALYSIS_INTERVAL)?;

    let result = Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        SpectrumApp::new(spectrum, bands),
    );

    worker.stop();
    result
}
