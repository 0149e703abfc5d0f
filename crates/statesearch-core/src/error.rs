use thiserror::Error;

/// Rejected engine or heuristic settings. Raised at construction time, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("max depth must be unset or positive, got {0}")]
    NonPositiveDepth(i64),
    #[error("unknown search strategy: {0}")]
    UnknownStrategy(String),
    #[error("unknown heuristic: {0}")]
    UnknownHeuristic(String),
    #[error("unknown verbosity level: {0}")]
    UnknownVerbosity(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("action {0} is already in the catalog")]
    DuplicateAction(String),
}
