use thiserror::Error;

/// Errors from message store operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by a chat exchange.
///
/// Completion failures are not here: the service answers them with the
/// fallback reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}

/// Startup configuration errors. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is missing; set it in the environment or a .env file")]
    MissingApiKey(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
