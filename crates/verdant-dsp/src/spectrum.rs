use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Latest band levels, shared between the analysis thread and the renderer.
///
/// Cloning yields another handle to the same levels. Writers replace the
/// whole snapshot; readers copy it out, so neither side holds the lock for
/// longer than a memcpy.
#[derive(Clone, Debug)]
pub struct SharedSpectrum {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    levels: Mutex<Vec<f32>>,
    warned_mismatch: AtomicBool,
}

impl SharedSpectrum {
    /// Creates a spectrum of `bands` zeroed levels.
    pub fn new(bands: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                levels: Mutex::new(vec![0.0; bands]),
                warned_mismatch: AtomicBool::new(false),
            }),
        }
    }

    pub fn bands(&self) -> usize {
        self.lock().len()
    }

    /// Publishes new levels.
    ///
    /// A slice of the wrong length copies only the overlapping prefix; the
    /// band count never changes after construction.
    pub fn write(&self, levels: &[f32]) {
        let mut guard = self.lock();
        let n = guard.len().min(levels.len());

        let mismatched = n != guard.len() || n != levels.len();
        if mismatched && !self.inner.warned_mismatch.swap(true, Ordering::Relaxed) {
            log::debug!(
                "spectrum write of {} levels into {} bands; copying {}",
                levels.len(),
                guard.len(),
                n
            );
        }

        guard[..n].copy_from_slice(&levels[..n]);
    }

    /// Returns a copy of the current levels.
    pub fn read(&self) -> Vec<f32> {
        self.lock().clone()
    }

    /// Copies the current levels into `out`, reusing its allocation.
    pub fn read_into(&self, out: &mut Vec<f32>) {
        let guard = self.lock();
        out.clear();
        out.extend_from_slice(&guard);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f32>> {
        // A panicking writer leaves a complete (if stale) snapshot behind.
        self.inner
            .levels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
