// Oxigraph store backend
//
// Wraps an oxigraph::store::Store behind the GraphStore trait. The same
// struct serves both shipped backends: a persistent store opened at a
// directory path, and an in-memory store optionally bulk-loaded from an
// RDF dataset file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::{GraphNameRef, NamedNode, NamedOrBlankNode, Triple};
use oxigraph::store::Store;

use super::traits::{GraphStore, StoreError, StoreResult};

pub struct OxigraphStore {
    store: Store,
}

impl OxigraphStore {
    /// Opens or creates a persistent store at the given directory path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let store = Store::open(path)
            .map_err(|e| StoreError::Open(format!("{}: {e}", path.display())))?;
        tracing::debug!("opened persistent store at {}", path.display());
        Ok(Self { store })
    }

    /// Creates an empty in-memory store.
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    /// Creates an in-memory store bulk-loaded from an RDF file.
    ///
    /// The format is inferred from the file extension. Only dataset formats
    /// (TriG, N-Quads) can populate named graphs; loading a triples-only
    /// file yields an empty namespace since its triples land in the default
    /// graph.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format = RdfFormat::from_extension(extension).ok_or_else(|| {
            StoreError::Open(format!(
                "cannot infer RDF format from extension of {}",
                path.display()
            ))
        })?;

        let this = Self::in_memory()?;
        let file = File::open(path)
            .map_err(|e| StoreError::Open(format!("{}: {e}", path.display())))?;
        this.store
            .load_from_reader(format, BufReader::new(file))
            .map_err(|e| StoreError::Open(format!("{}: {e}", path.display())))?;

        tracing::debug!("loaded {} into in-memory store", path.display());
        Ok(this)
    }

    /// Direct access to the underlying store, for populating test fixtures.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl GraphStore for OxigraphStore {
    fn graph_identifiers(&self) -> StoreResult<Vec<String>> {
        let mut identifiers = Vec::new();
        for name in self.store.named_graphs() {
            let name = name.map_err(|e| StoreError::Query(e.to_string()))?;
            match name {
                NamedOrBlankNode::NamedNode(node) => identifiers.push(node.into_string()),
                // A blank graph name has no URI and therefore no filesystem path.
                NamedOrBlankNode::BlankNode(node) => {
                    tracing::debug!("ignoring blank node graph name {node}");
                }
            }
        }
        Ok(identifiers)
    }

    fn graph_triples(&self, identifier: &str) -> StoreResult<Vec<Triple>> {
        let graph = NamedNode::new(identifier)
            .map_err(|e| StoreError::Query(format!("invalid graph identifier {identifier}: {e}")))?;

        let mut triples = Vec::new();
        let pattern = self.store.quads_for_pattern(
            None,
            None,
            None,
            Some(GraphNameRef::NamedNode(graph.as_ref())),
        );
        for quad in pattern {
            let quad = quad.map_err(|e| StoreError::Query(e.to_string()))?;
            triples.push(Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(triples)
    }
}
