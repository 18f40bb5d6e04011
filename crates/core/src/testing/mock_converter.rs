//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::converter::{ConversionJob, ConversionResult, Converter, ConverterError};

/// How a path should fail.
#[derive(Debug, Clone, Copy)]
enum Failure {
    Times(u32),
    Always,
    Panic,
}

/// Mock implementation of the Converter trait.
///
/// Writes `converted_bytes(input)` to the job's output path instead of running
/// an external tool. Provides controllable behavior for testing:
/// - Track attempts per input path
/// - Fail a path a fixed number of times, or always
/// - Slow conversions down to exercise the worker pool
///
/// Clones share state, so a test can keep a handle after passing one on.
///
/// # Example
///
/// ```rust,ignore
/// use nccompress_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.fail_times("/data/a.nc", 2).await;
///
/// // ... run the batch ...
///
/// assert_eq!(converter.attempts_for("/data/a.nc").await, 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Attempts recorded per input path.
    attempts: Arc<RwLock<HashMap<PathBuf, u32>>>,
    /// Configured failures per input path.
    failures: Arc<RwLock<HashMap<PathBuf, Failure>>>,
    /// Simulated duration of every attempt.
    delay: Arc<RwLock<Duration>>,
    /// Simulated duration for specific paths.
    path_delays: Arc<RwLock<HashMap<PathBuf, Duration>>>,
    /// Attempts currently running, and the most seen at once.
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    /// Error returned by `validate`, if any.
    unavailable: Arc<RwLock<bool>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
            path_delays: Arc::new(RwLock::new(HashMap::new())),
            running: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            unavailable: Arc::new(RwLock::new(false)),
        }
    }

    /// The bytes the mock writes for an input with the given contents.
    pub fn converted_bytes(input: &[u8]) -> Vec<u8> {
        let mut out = b"nc4:".to_vec();
        out.extend_from_slice(input);
        out
    }

    /// Fail the next `times` attempts for `path`, then succeed.
    pub async fn fail_times(&self, path: impl AsRef<Path>, times: u32) {
        self.failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), Failure::Times(times));
    }

    /// Fail every attempt for `path`.
    pub async fn fail_always(&self, path: impl AsRef<Path>) {
        self.failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), Failure::Always);
    }

    /// Panic inside the attempt for `path`, as a crashing worker would.
    pub async fn panic_on(&self, path: impl AsRef<Path>) {
        self.failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), Failure::Panic);
    }

    /// Set the simulated duration of every attempt.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Set the simulated duration for one path.
    pub async fn set_delay_for(&self, path: impl AsRef<Path>, delay: Duration) {
        self.path_delays
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), delay);
    }

    /// Make `validate` report the tool as missing.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Number of attempts made for `path`.
    pub async fn attempts_for(&self, path: impl AsRef<Path>) -> u32 {
        self.attempts
            .read()
            .await
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }

    /// Total attempts across all paths.
    pub async fn total_attempts(&self) -> u32 {
        self.attempts.read().await.values().sum()
    }

    /// Most attempts that were ever in flight at the same time.
    pub fn max_concurrent(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Consume one configured failure for `path`, if any.
    async fn should_fail(&self, path: &Path) -> bool {
        let mut failures = self.failures.write().await;
        match failures.get_mut(path) {
            Some(Failure::Panic) => panic!("mock converter crashed on {}", path.display()),
            Some(Failure::Always) => true,
            Some(Failure::Times(0)) | None => false,
            Some(Failure::Times(n)) => {
                *n -= 1;
                true
            }
        }
    }

    async fn attempt(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError> {
        let started = Instant::now();
        *self
            .attempts
            .write()
            .await
            .entry(job.input_path.clone())
            .or_insert(0) += 1;

        let delay = match self.path_delays.read().await.get(&job.input_path) {
            Some(d) => *d,
            None => *self.delay.read().await,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let input = match tokio::fs::read(&job.input_path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return Err(ConverterError::InputNotFound {
                    path: job.input_path.clone(),
                })
            }
        };

        if self.should_fail(&job.input_path).await {
            return Err(ConverterError::process_failed(
                job.input_path.clone(),
                Some(1),
                "mock conversion failure".to_string(),
            ));
        }

        let output = Self::converted_bytes(&input);
        tokio::fs::write(&job.output_path, &output).await?;

        Ok(ConversionResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output.len() as u64,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let result = self.attempt(job).await;

        self.running.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if *self.unavailable.read().await {
            return Err(ConverterError::ExecutableNotFound {
                program: PathBuf::from("ncks"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(dir: &TempDir) -> ConversionJob {
        let input = dir.path().join("a.nc");
        std::fs::write(&input, b"classic").unwrap();
        ConversionJob::for_input(&input, "_new.nc", 1)
    }

    #[tokio::test]
    async fn test_basic_conversion() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir);
        let converter = MockConverter::new();

        let result = converter.convert(&job).await.unwrap();

        assert_eq!(result.output_path, job.output_path);
        assert_eq!(
            std::fs::read(&job.output_path).unwrap(),
            MockConverter::converted_bytes(b"classic")
        );
        assert_eq!(converter.attempts_for(&job.input_path).await, 1);
    }

    #[tokio::test]
    async fn test_fail_times_then_succeed() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir);
        let converter = MockConverter::new();
        converter.fail_times(&job.input_path, 2).await;

        assert!(converter.convert(&job).await.is_err());
        assert!(converter.convert(&job).await.is_err());
        assert!(converter.convert(&job).await.is_ok());
        assert_eq!(converter.attempts_for(&job.input_path).await, 3);
    }

    #[tokio::test]
    async fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let job = ConversionJob::for_input(&dir.path().join("gone.nc"), "_new.nc", 1);

        let err = MockConverter::new().convert(&job).await.unwrap_err();
        assert!(matches!(err, ConverterError::InputNotFound { .. }));
        assert!(!job.output_path.exists());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let converter = MockConverter::new();
        assert!(converter.validate().await.is_ok());
        converter.set_unavailable(true).await;
        assert!(matches!(
            converter.validate().await,
            Err(ConverterError::ExecutableNotFound { .. })
        ));
    }
}
