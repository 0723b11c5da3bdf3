// Backing store boundary
//
// The filesystem consumes a triple store through the GraphStore capability
// interface; concrete backends are registered by name and selected via the
// store specification string.

pub mod oxigraph;
pub mod registry;
pub mod traits;

pub use oxigraph::OxigraphStore;
pub use registry::{parse_store_spec, StoreRegistry, DEFAULT_BACKEND};
pub use traits::{GraphStore, StoreError, StoreResult};

#[cfg(any(test, feature = "mockall"))]
pub use traits::MockGraphStore;
