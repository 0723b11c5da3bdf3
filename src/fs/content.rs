// Graph content rendering
//
// A leaf file's bytes are the full serialization of one graph, recomputed
// on every open with no caching. Triples are first copied into a fresh
// dataset carrying the graph's identifier, so the serializer never sees
// namespace-prefix state inherited from the store.

use std::sync::Arc;

use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{Dataset, GraphName, NamedNode, Quad};

use crate::fs::codec;
use crate::fs::error::{FsError, FsResult};
use crate::store::GraphStore;

/// Resolves a serialization format name from the CLI surface.
pub fn format_from_name(name: &str) -> Option<RdfFormat> {
    match name.to_ascii_lowercase().as_str() {
        "turtle" | "ttl" => Some(RdfFormat::Turtle),
        "ntriples" | "n-triples" | "nt" => Some(RdfFormat::NTriples),
        "nquads" | "n-quads" | "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "rdfxml" | "rdf-xml" | "xml" => Some(RdfFormat::RdfXml),
        "n3" => Some(RdfFormat::N3),
        _ => None,
    }
}

#[derive(Clone)]
pub struct ContentProvider {
    store: Arc<dyn GraphStore>,
    format: RdfFormat,
}

impl ContentProvider {
    pub fn new(store: Arc<dyn GraphStore>, format: RdfFormat) -> Self {
        Self { store, format }
    }

    /// Serializes the graph a leaf path stands for.
    ///
    /// The path must have resolved to a leaf; the graph identifier is
    /// recovered from the path itself. Store and serialization failures
    /// propagate to the caller instead of being swallowed.
    pub fn content(&self, path: &str) -> FsResult<Vec<u8>> {
        let uri = codec::decode(path);
        let identifier = NamedNode::new(&uri)
            .map_err(|e| FsError::Serialization(format!("invalid graph identifier {uri}: {e}")))?;

        let triples = self.store.graph_triples(identifier.as_str())?;

        // Dataset formats keep the graph name; triples-only formats get the
        // content in the default graph, as a bare serializer would.
        let graph_name = match self.format {
            RdfFormat::NQuads | RdfFormat::TriG => GraphName::NamedNode(identifier),
            _ => GraphName::DefaultGraph,
        };

        let mut dataset = Dataset::new();
        for triple in triples {
            dataset.insert(&Quad::new(
                triple.subject,
                triple.predicate,
                triple.object,
                graph_name.clone(),
            ));
        }

        let mut buffer = Vec::new();
        let mut serializer = RdfSerializer::from_format(self.format).for_writer(&mut buffer);
        for quad in dataset.iter() {
            serializer
                .serialize_quad(quad)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
        }
        serializer
            .finish()
            .map_err(|e| FsError::Serialization(e.to_string()))?;

        Ok(buffer)
    }
}
