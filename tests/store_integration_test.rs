// Integration tests for the store boundary
//
// Covers backend selection through the registry, the persistent backend on
// a real scratch directory, and bulk-loading the memory backend from an
// RDF dataset file.

use std::io::Write;

use oxigraph::model::{GraphName, NamedNode, Quad};
use rdffs::store::{OxigraphStore, StoreError, StoreRegistry};
use tempfile::TempDir;

fn named(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

#[test]
fn test_registry_rejects_unknown_backend() {
    let registry = StoreRegistry::default();
    let err = registry.open(":sleepycat:/tmp/db").unwrap_err();
    assert!(matches!(err, StoreError::UnknownBackend(_)));
}

#[test]
fn test_registry_rejects_malformed_spec() {
    let registry = StoreRegistry::default();
    assert!(matches!(registry.open(":"), Err(StoreError::InvalidSpec(_))));
}

#[test]
fn test_plain_path_opens_persistent_backend() {
    let dir = TempDir::new().unwrap();
    let spec = dir.path().join("store").to_str().unwrap().to_string();

    let registry = StoreRegistry::default();
    let store = registry.open(&spec).unwrap();
    assert!(store.graph_identifiers().unwrap().is_empty());
}

#[test]
fn test_persistent_backend_sees_stored_graphs_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");
    let path_str = path.to_str().unwrap();

    {
        let store = OxigraphStore::open(path_str).unwrap();
        store
            .store()
            .insert(&Quad::new(
                named("http://example.org/s"),
                named("http://example.org/p"),
                named("http://example.org/o"),
                GraphName::NamedNode(named("http://example.org/graphs/alpha")),
            ))
            .unwrap();
    }

    let registry = StoreRegistry::default();
    let store = registry.open(path_str).unwrap();
    assert_eq!(
        store.graph_identifiers().unwrap(),
        vec!["http://example.org/graphs/alpha".to_string()]
    );
}

#[test]
fn test_memory_backend_loads_dataset_file() {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("data.nq");
    let mut file = std::fs::File::create(&file_path).unwrap();
    writeln!(
        file,
        "<http://example.org/s> <http://example.org/p> <http://example.org/o> <http://example.org/graphs/alpha> ."
    )
    .unwrap();
    writeln!(
        file,
        "<http://example.org/s> <http://example.org/p> <http://example.org/o> <http://example.org/graphs/beta> ."
    )
    .unwrap();
    drop(file);

    let spec = format!(":memory:{}", file_path.display());
    let registry = StoreRegistry::default();
    let store = registry.open(&spec).unwrap();

    let mut identifiers = store.graph_identifiers().unwrap();
    identifiers.sort();
    assert_eq!(
        identifiers,
        vec![
            "http://example.org/graphs/alpha".to_string(),
            "http://example.org/graphs/beta".to_string(),
        ]
    );

    let triples = store.graph_triples("http://example.org/graphs/alpha").unwrap();
    assert_eq!(triples.len(), 1);
}

#[test]
fn test_memory_backend_rejects_missing_file() {
    let registry = StoreRegistry::default();
    let err = registry.open(":memory:/nonexistent/data.nq").unwrap_err();
    assert!(matches!(err, StoreError::Open(_)));
}
