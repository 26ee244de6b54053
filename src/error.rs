// Error types for metric sources, collectors and the sampler facade

use thiserror::Error;

/// Why a single poll produced no usable reading.
///
/// Collectors never surface these to `Sampler::snapshot` callers: the error is
/// logged, the previously stored values stay in place and the collector retries
/// on its next cycle.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The data source could not be read at all (missing file, failed query).
    #[error("{what} unavailable: {reason}")]
    SourceUnavailable { what: &'static str, reason: String },

    /// Data was read but was not in the expected shape.
    #[error("malformed {what} sample: {reason}")]
    MalformedSample { what: &'static str, reason: String },

    /// The derived metric is mathematically undefined for this pair of samples.
    #[error("degenerate computation: {0}")]
    DegenerateComputation(&'static str),
}

impl SampleError {
    pub fn unavailable(what: &'static str, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            what,
            reason: reason.to_string(),
        }
    }

    pub fn malformed(what: &'static str, reason: impl ToString) -> Self {
        Self::MalformedSample {
            what,
            reason: reason.to_string(),
        }
    }
}

/// Misuse of the `Sampler` lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("sampler is already running on interface {0}")]
    AlreadyRunning(String),

    #[error("interface name must be non-empty")]
    EmptyInterface,

    #[error("sampler must be started from within a tokio runtime")]
    NoRuntime,
}
