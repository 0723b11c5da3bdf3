// Core filesystem model
//
// The pieces the rest of the crate is built on: the URI/path codec, the
// immutable namespace tree with its resolver, graph content rendering, and
// the filesystem error taxonomy.

pub mod codec;
pub mod content;
pub mod error;
pub mod tree;

pub use content::{format_from_name, ContentProvider};
pub use error::{FsError, FsResult};
pub use tree::{build_tree, Node};
