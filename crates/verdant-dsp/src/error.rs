use std::fmt;

/// Errors raised by analyzer setup and sample sources.
#[derive(Debug, Clone, PartialEq)]
pub enum DspError {
    /// An [`AnalyzerConfig`](crate::AnalyzerConfig) field is out of range.
    InvalidConfig { field: &'static str, reason: String },
    /// A sample source could not deliver samples.
    Source(String),
    /// The analysis thread could not be started.
    Spawn(String),
}

impl DspError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid analyzer config: {field} {reason}")
            }
            Self::Source(msg) => write!(f, "sample source error: {msg}"),
            Self::Spawn(msg) => write!(f, "failed to start analysis thread: {msg}"),
        }
    }
}

impl std::error::Error for DspError {}
