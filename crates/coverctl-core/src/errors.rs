use crate::model::Report;

/// Error taxonomy for the coverage pipeline.
///
/// The orchestrator surfaces these unwrapped; only the CLI collapses them
/// into exit codes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Policy document invalid (bad YAML, duplicate domains, out-of-range
    /// thresholds, unsupported version).
    #[error("config error: {0}")]
    ConfigFormat(String),

    /// Coverage profile malformed (missing mode header, bad block line).
    #[error("profile error: {0}")]
    ProfileFormat(String),

    /// Pattern resolution failed outright (e.g. the build tool errored).
    /// A pattern matching zero directories is a warning, not this.
    #[error("resolve error: {0}")]
    Resolve(String),

    /// One or more domains failed their threshold. Carries the full report
    /// so callers can render it.
    #[error("coverage policy violated")]
    PolicyViolation(Box<Report>),

    /// History JSON did not parse.
    #[error("history corrupt: {0}")]
    HistoryCorrupt(String),

    /// Filesystem read/write failure.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Cooperative cancellation observed.
    #[error("operation canceled")]
    Canceled,

    /// Caller misuse (missing required option).
    #[error("usage error: {0}")]
    Usage(String),
}

impl Error {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
