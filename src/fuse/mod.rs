// FUSE interface implementation
//
// This module provides FUSE (Filesystem in Userspace) support, exposing
// the graph namespace as a mountable read-only POSIX filesystem.

pub mod adapter;
pub mod backend;
pub mod interface;
pub mod mount;

pub use adapter::FuseAdapter;
pub use backend::RdfFsBackend;
pub use interface::{DirEntry, FileAttr, FileType, FilesystemInterface, FsError, FsResult, StatFs};
pub use mount::{mount, spawn_mount, unmount, MountOptions};
