use oxigraph::model::Triple;
use thiserror::Error;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Invalid store specification: {0}")]
    InvalidSpec(String),

    #[error("Unknown store backend: {0}")]
    UnknownBackend(String),

    #[error("Store query failed: {0}")]
    Query(String),
}

/// Capability interface for a backing triple store.
///
/// The filesystem consumes a store through exactly two operations: the
/// enumeration of graph identifiers taken once at mount time, and the
/// retrieval of a single graph's triples performed on every open. Both are
/// blocking calls with no upper bound on result size.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait GraphStore: Send + Sync {
    /// Identifiers of every named graph currently held in the store.
    fn graph_identifiers(&self) -> StoreResult<Vec<String>>;

    /// All triples belonging to the graph with the given identifier.
    fn graph_triples(&self, identifier: &str) -> StoreResult<Vec<Triple>>;
}
