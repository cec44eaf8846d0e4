use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::{DspError, SampleSource, SharedSpectrum, SpectrumAnalyzer};

/// Background thread running capture → analyze → publish.
///
/// Each iteration pulls one chunk from the source, appends it to a rolling
/// window of the latest `fft_size` samples, analyzes that window and writes
/// the levels to the shared spectrum, then sleeps for `interval`.
///
/// Dropping the worker stops it as well; [`stop`](Self::stop) makes the join
/// explicit.
pub struct AnalysisWorker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    pub fn spawn<S>(
        mut source: S,
        mut analyzer: SpectrumAnalyzer,
        spectrum: SharedSpectrum,
        interval: Duration,
    ) -> Result<Self, DspError>
    where
        S: SampleSource + 'static,
    {
        let expected_rate = analyzer.config().sample_rate;
        if source.sample_rate() != expected_rate {
            log::warn!(
                "source runs at {} Hz but the analyzer expects {} Hz; band edges will be off",
                source.sample_rate(),
                expected_rate
            );
        }

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("verdant-analysis".into())
            .spawn(move || {
                let window_len = analyzer.config().fft_size;
                let mut chunk = Vec::new();
                let mut window = Vec::with_capacity(window_len * 2);

                log::debug!("analysis thread started ({window_len} sample window)");

                while flag.load(Ordering::Acquire) {
                    match source.next_chunk(&mut chunk) {
                        Ok(0) => {}
                        Ok(_) => {
                            push_window(&mut window, &chunk, window_len);
                            spectrum.write(analyzer.process(&window));
                        }
                        Err(err) => log::warn!("{err}"),
                    }
                    thread::sleep(interval);
                }

                log::debug!("analysis thread stopped");
            })
            .map_err(|e| DspError::Spawn(e.to_string()))?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signals the thread and waits for its current iteration to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("analysis thread panicked");
            }
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Appends `chunk` and keeps only the newest `len` samples.
fn push_window(window: &mut Vec<f32>, chunk: &[f32], len: usize) {
    window.extend_from_slice(chunk);
    if window.len() > len {
        let excess = window.len() - len;
        window.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::{AnalyzerConfig, SilenceSource, ToneSource};

    struct FailingSource {
        calls: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl SampleSource for FailingSource {
        fn sample_rate(&self) -> f32 {
            48_000.0
        }

        fn next_chunk(&mut self, _out: &mut Vec<f32>) -> Result<usize, DspError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Err(DspError::Source("unplugged".into()))
        }
    }

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    #[test]
    fn window_keeps_newest_samples() {
        let mut w = Vec::new();
        push_window(&mut w, &[1.0, 2.0, 3.0], 4);
        push_window(&mut w, &[4.0, 5.0], 4);
        assert_eq!(w, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn tone_reaches_the_shared_spectrum() {
        let cfg = AnalyzerConfig::default();
        let source = ToneSource::new(cfg.sample_rate, 256).with_partial(1_000.0, 0.8);
        let analyzer = SpectrumAnalyzer::new(cfg).unwrap();
        let spectrum = SharedSpectrum::new(64);

        let worker =
            AnalysisWorker::spawn(source, analyzer, spectrum.clone(), Duration::from_millis(1))
                .unwrap();

        let lit = wait_until(Duration::from_secs(5), || spectrum.read().iter().any(|&l| l > 0.5));
        worker.stop();
        assert!(lit);
    }

    #[test]
    fn silence_keeps_levels_at_zero() {
        let cfg = AnalyzerConfig::default();
        let analyzer = SpectrumAnalyzer::new(cfg).unwrap();
        let spectrum = SharedSpectrum::new(64);

        let worker = AnalysisWorker::spawn(
            SilenceSource::new(48_000.0, 512),
            analyzer,
            spectrum.clone(),
            Duration::from_millis(1),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        worker.stop();

        assert!(spectrum.read().iter().all(|&l| l == 0.0));
    }

    #[test]
    fn source_errors_do_not_stop_the_loop() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let source = FailingSource { calls: Arc::clone(&calls) };
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();

        let worker = AnalysisWorker::spawn(
            source,
            analyzer,
            SharedSpectrum::new(64),
            Duration::from_millis(1),
        )
        .unwrap();

        assert!(wait_until(Duration::from_secs(5), || calls.load(Ordering::Relaxed) >= 3));
        assert!(worker.is_running());
        worker.stop();
    }

    #[test]
    fn stop_joins_the_thread() {
        let analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let worker = AnalysisWorker::spawn(
            SilenceSource::new(48_000.0, 64),
            analyzer,
            SharedSpectrum::new(64),
            Duration::from_millis(5),
        )
        .unwrap();

        let start = Instant::now();
        worker.stop();
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
