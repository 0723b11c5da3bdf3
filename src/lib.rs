//! rdffs - read-only FUSE filesystem over the named graphs of an RDF store
//!
//! Every graph identifier in the backing store is turned into a filesystem
//! path; reading the file at that path yields the whole graph serialized in
//! a configurable RDF format. The namespace is a one-time snapshot taken at
//! mount time and the filesystem is permanently read-only.

pub mod fs;
pub mod fuse;
pub mod store;
