use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a [`RecordStore`](crate::store::RecordStore).
///
/// The writer's retry policy dispatches on the variant: `Throttled` is the
/// only response that is ever retried by default.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("throughput exceeded: {0}")]
    Throttled(String),

    #[error("store backend error: {0}")]
    Backend(#[source] BoxError),
}

impl StoreError {
    pub fn throttled(message: impl Into<String>) -> Self {
        Self::Throttled(message.into())
    }

    pub fn backend(error: impl Into<BoxError>) -> Self {
        Self::Backend(error.into())
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled(_))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to parse {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("{store}: exhausted retries after {attempts} attempts: {source}")]
    RetryExhausted {
        store: String,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            key: key.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn retry_exhausted(store: impl Into<String>, attempts: u32, source: StoreError) -> Self {
        Self::RetryExhausted {
            store: store.into(),
            attempts,
            source,
        }
    }
}
