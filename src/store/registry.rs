// Store backend registry
//
// Backends are interchangeable implementations of GraphStore selected by
// name from the store specification string ":{backend}:{config}". A
// specification without a leading ':' is treated as a filesystem path for
// the default persistent backend. Resolution happens once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use super::oxigraph::OxigraphStore;
use super::traits::{GraphStore, StoreError, StoreResult};

pub const DEFAULT_BACKEND: &str = "oxigraph";

type Opener = fn(&str) -> StoreResult<Arc<dyn GraphStore>>;

pub struct StoreRegistry {
    backends: HashMap<&'static str, Opener>,
}

impl Default for StoreRegistry {
    fn default() -> Self {
        let mut registry = Self { backends: HashMap::new() };
        registry.register("oxigraph", open_oxigraph);
        registry.register("memory", open_memory);
        registry
    }
}

impl StoreRegistry {
    pub fn register(&mut self, name: &'static str, opener: Opener) {
        self.backends.insert(name, opener);
    }

    /// Opens the store named by a specification string.
    pub fn open(&self, spec: &str) -> StoreResult<Arc<dyn GraphStore>> {
        let (backend, config) = parse_store_spec(spec)?;
        let opener = self
            .backends
            .get(backend)
            .ok_or_else(|| StoreError::UnknownBackend(backend.to_string()))?;
        tracing::info!("opening {backend} store with config {config:?}");
        opener(config)
    }
}

/// Splits a store specification into backend name and configuration string.
pub fn parse_store_spec(spec: &str) -> StoreResult<(&str, &str)> {
    match spec.strip_prefix(':') {
        Some(rest) => match rest.split_once(':') {
            Some((backend, config)) if !backend.is_empty() => Ok((backend, config)),
            _ => Err(StoreError::InvalidSpec(spec.to_string())),
        },
        None => Ok((DEFAULT_BACKEND, spec)),
    }
}

fn open_oxigraph(config: &str) -> StoreResult<Arc<dyn GraphStore>> {
    Ok(Arc::new(OxigraphStore::open(config)?))
}

fn open_memory(config: &str) -> StoreResult<Arc<dyn GraphStore>> {
    if config.is_empty() {
        Ok(Arc::new(OxigraphStore::in_memory()?))
    } else {
        Ok(Arc::new(OxigraphStore::load(config)?))
    }
}
