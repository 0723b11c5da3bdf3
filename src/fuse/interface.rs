// Filesystem interface abstraction
//
// Defines the read-only interface the FUSE adapter is written against. The
// graph namespace never offers write, create, delete or rename operations,
// so the surface is exactly: attribute lookup, directory listing, open,
// read by handle, release, and filesystem statistics.

use chrono::{DateTime, Utc};

pub use crate::fs::error::{FsError, FsResult};

/// File type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    RegularFile,
    Directory,
}

/// File attributes structure
#[derive(Debug, Clone)]
pub struct FileAttr {
    pub inode: u64,
    pub kind: FileType,
    pub size: u64,
    pub atime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
    pub ctime: DateTime<Utc>,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlinks: u32,
}

/// Directory entry structure
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub kind: FileType,
}

/// Filesystem statistics
#[derive(Debug, Clone)]
pub struct StatFs {
    pub blocks: u64,
    pub bfree: u64,
    pub bavail: u64,
    pub files: u64,
    pub ffree: u64,
    pub bsize: u32,
    pub namelen: u32,
}

/// Read-only filesystem interface
///
/// `open` allocates an opaque handle and buffers the file's content for the
/// duration of the read session; `read` and `release` operate on that
/// handle. Keying the buffer by handle rather than by path keeps two
/// concurrent opens of the same path from racing on one buffer.
#[async_trait::async_trait]
pub trait FilesystemInterface: Send + Sync {
    async fn get_attr(&self, path: &str) -> FsResult<FileAttr>;
    async fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>>;
    async fn open(&self, path: &str, write_requested: bool) -> FsResult<u64>;
    async fn read(&self, fh: u64, offset: u64, size: u32) -> FsResult<Vec<u8>>;
    async fn release(&self, fh: u64) -> FsResult<()>;
    async fn statfs(&self) -> FsResult<StatFs>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_equality() {
        assert_eq!(FileType::RegularFile, FileType::RegularFile);
        assert_ne!(FileType::RegularFile, FileType::Directory);
    }

    #[test]
    fn test_file_attr_construction() {
        let now = Utc::now();
        let attr = FileAttr {
            inode: 1,
            kind: FileType::RegularFile,
            size: 1024,
            atime: now,
            mtime: now,
            ctime: now,
            mode: 0o444,
            uid: 1000,
            gid: 1000,
            nlinks: 1,
        };
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.size, 1024);
        assert_eq!(attr.mode, 0o444);
    }

    #[test]
    fn test_dir_entry_construction() {
        let entry = DirEntry { name: "example.org".to_string(), kind: FileType::Directory };
        assert_eq!(entry.name, "example.org");
        assert_eq!(entry.kind, FileType::Directory);
    }
}
