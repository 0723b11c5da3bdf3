// FUSE adapter - bridges sync FUSE callbacks to the async FilesystemInterface
//
// Implements the fuser::Filesystem trait and delegates every operation to
// the FilesystemInterface implementation. It handles:
// - Async to sync conversion using a dedicated tokio runtime
// - Inode to path mapping
// - FUSE types to FilesystemInterface types conversion
// - Error code translation
// - Rejection of every mutating operation on the read-only namespace
//
// IMPORTANT: The adapter uses its own dedicated runtime to avoid deadlocks.
// FUSE callbacks are synchronous, but the backend is async. If we used the
// caller's runtime (via Handle::current()), calling block_on() inside a
// runtime context would cause a deadlock. By creating a dedicated runtime,
// we ensure FUSE operations can safely block without affecting the caller.

use super::interface::{FileAttr, FilesystemInterface, FileType, FsError};
use fuser::{
    FileType as FuseFileType, Filesystem, ReplyAttr, ReplyData, ReplyDirectory, ReplyEmpty,
    ReplyEntry, ReplyOpen, ReplyStatfs, ReplyWrite, Request,
};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::runtime::Runtime;

/// FUSE adapter over a read-only FilesystemInterface
pub struct FuseAdapter {
    /// The underlying filesystem implementation
    backend: Arc<dyn FilesystemInterface>,

    /// Dedicated tokio runtime for async operations
    runtime: Arc<Runtime>,

    /// Inode to path mapping
    /// FUSE uses inodes, but the backend uses paths
    inode_map: Arc<RwLock<InodeMap>>,
}

/// Manages inode <-> path bidirectional mapping
///
/// The namespace is fixed at mount time, so mappings are only ever added.
struct InodeMap {
    inode_to_path: HashMap<u64, String>,
    path_to_inode: HashMap<String, u64>,
    next_inode: u64,
}

impl InodeMap {
    fn new() -> Self {
        let mut map = Self {
            inode_to_path: HashMap::new(),
            path_to_inode: HashMap::new(),
            next_inode: 2, // 1 is reserved for root
        };
        map.insert(1, "/".to_string());
        map
    }

    fn insert(&mut self, inode: u64, path: String) {
        self.inode_to_path.insert(inode, path.clone());
        self.path_to_inode.insert(path, inode);
    }

    /// Get or create inode for path
    fn get_or_create(&mut self, path: &str) -> u64 {
        if let Some(&inode) = self.path_to_inode.get(path) {
            return inode;
        }

        let inode = self.next_inode;
        self.next_inode += 1;
        self.insert(inode, path.to_string());
        inode
    }

    fn get_path(&self, inode: u64) -> Option<&str> {
        self.inode_to_path.get(&inode).map(|s| s.as_str())
    }
}

impl FuseAdapter {
    /// Create a new FUSE adapter with a dedicated runtime
    pub fn new(backend: Arc<dyn FilesystemInterface>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .thread_name("rdffs-fuse")
            .enable_all()
            .build()
            .expect("Failed to create FUSE runtime");

        Self::with_runtime(backend, Arc::new(runtime))
    }

    /// Create a new FUSE adapter with a provided runtime
    ///
    /// WARNING: If the provided runtime is the same as the caller's runtime,
    /// this may cause deadlocks.
    pub fn with_runtime(backend: Arc<dyn FilesystemInterface>, runtime: Arc<Runtime>) -> Self {
        Self { backend, runtime, inode_map: Arc::new(RwLock::new(InodeMap::new())) }
    }

    /// Get path from inode
    fn get_path(&self, inode: u64) -> Result<String, libc::c_int> {
        let map = self.inode_map.read().unwrap();
        map.get_path(inode).map(|s| s.to_string()).ok_or(libc::ENOENT)
    }

    /// Build a child path under a parent directory path
    fn child_path(parent_path: &str, name: &str) -> String {
        if parent_path == "/" {
            format!("/{}", name)
        } else {
            format!("{}/{}", parent_path, name)
        }
    }

    /// Execute async operation in the dedicated tokio runtime
    fn block_on<F, T>(&self, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.runtime.block_on(future)
    }

    /// Convert FsError to errno
    fn error_to_errno(error: FsError) -> libc::c_int {
        error.to_errno()
    }

    /// Convert our FileAttr to fuser FileAttr
    fn to_fuse_attr(attr: &FileAttr) -> fuser::FileAttr {
        fuser::FileAttr {
            ino: attr.inode,
            size: attr.size,
            blocks: attr.size.div_ceil(512),
            atime: datetime_to_systemtime(attr.atime),
            mtime: datetime_to_systemtime(attr.mtime),
            ctime: datetime_to_systemtime(attr.ctime),
            crtime: UNIX_EPOCH,
            kind: match attr.kind {
                FileType::RegularFile => FuseFileType::RegularFile,
                FileType::Directory => FuseFileType::Directory,
            },
            perm: attr.mode as u16,
            nlink: attr.nlinks,
            uid: attr.uid,
            gid: attr.gid,
            rdev: 0,
            blksize: 4096,
            flags: 0,
        }
    }
}

/// Convert chrono DateTime to SystemTime
fn datetime_to_systemtime(dt: chrono::DateTime<chrono::Utc>) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(dt.timestamp() as u64)
}

/// Default TTL for file attributes
///
/// The namespace and the attributes never change after mount, so the
/// kernel may cache them for a long time.
const ATTR_TTL: Duration = Duration::from_secs(60);

/// Default TTL for directory entries
const ENTRY_TTL: Duration = Duration::from_secs(60);

impl Filesystem for FuseAdapter {
    /// Initialize filesystem
    fn init(
        &mut self,
        _req: &Request,
        _config: &mut fuser::KernelConfig,
    ) -> Result<(), libc::c_int> {
        tracing::info!("FUSE filesystem initialized");
        Ok(())
    }

    /// Cleanup filesystem
    fn destroy(&mut self) {
        tracing::info!("FUSE filesystem destroyed");
    }

    /// Look up a directory entry by name
    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let name = match name.to_str() {
            Some(n) => n,
            None => {
                reply.error(libc::EINVAL);
                return;
            }
        };

        let parent_path = match self.get_path(parent) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        let path = Self::child_path(&parent_path, name);
        let result = self.block_on(self.backend.get_attr(&path));

        match result {
            Ok(mut attr) => {
                let inode = {
                    let mut map = self.inode_map.write().unwrap();
                    map.get_or_create(&path)
                };
                attr.inode = inode;

                let fuse_attr = Self::to_fuse_attr(&attr);
                reply.entry(&ENTRY_TTL, &fuse_attr, 0);
            }
            Err(e) => {
                reply.error(Self::error_to_errno(e));
            }
        }
    }

    /// Get file attributes
    fn getattr(&mut self, _req: &Request, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        let path = match self.get_path(ino) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        let result = self.block_on(self.backend.get_attr(&path));

        match result {
            Ok(mut attr) => {
                attr.inode = ino; // Use FUSE inode
                let fuse_attr = Self::to_fuse_attr(&attr);
                reply.attr(&ATTR_TTL, &fuse_attr);
            }
            Err(e) => {
                reply.error(Self::error_to_errno(e));
            }
        }
    }

    /// Read directory entries
    fn readdir(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let path = match self.get_path(ino) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        let result = self.block_on(self.backend.read_dir(&path));

        match result {
            Ok(entries) => {
                let mut all_entries = vec![
                    (ino, FuseFileType::Directory, ".".to_string()),
                    (ino, FuseFileType::Directory, "..".to_string()),
                ];

                for entry in entries {
                    let entry_path = Self::child_path(&path, &entry.name);
                    let inode = {
                        let mut map = self.inode_map.write().unwrap();
                        map.get_or_create(&entry_path)
                    };

                    let kind = match entry.kind {
                        FileType::RegularFile => FuseFileType::RegularFile,
                        FileType::Directory => FuseFileType::Directory,
                    };

                    all_entries.push((inode, kind, entry.name));
                }

                for (i, (inode, kind, name)) in all_entries.iter().enumerate().skip(offset as usize)
                {
                    let buffer_full = reply.add(*inode, (i + 1) as i64, *kind, name);
                    if buffer_full {
                        break;
                    }
                }

                reply.ok();
            }
            Err(e) => {
                reply.error(Self::error_to_errno(e));
            }
        }
    }

    /// Open a file
    ///
    /// The returned file handle owns the buffered graph serialization for
    /// the duration of the read session.
    fn open(&mut self, _req: &Request, ino: u64, flags: i32, reply: ReplyOpen) {
        let path = match self.get_path(ino) {
            Ok(p) => p,
            Err(e) => {
                reply.error(e);
                return;
            }
        };

        let write_requested = (flags & libc::O_ACCMODE) != libc::O_RDONLY;
        let result = self.block_on(self.backend.open(&path, write_requested));

        match result {
            Ok(fh) => {
                reply.opened(fh, 0);
            }
            Err(e) => {
                reply.error(Self::error_to_errno(e));
            }
        }
    }

    /// Read data from an open file handle
    fn read(
        &mut self,
        _req: &Request,
        _ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let offset = u64::try_from(offset).unwrap_or(0);
        let result = self.block_on(self.backend.read(fh, offset, size));

        match result {
            Ok(data) => {
                reply.data(&data);
            }
            Err(e) => {
                reply.error(Self::error_to_errno(e));
            }
        }
    }

    /// Release (close) a file handle
    fn release(
        &mut self,
        _req: &Request,
        _ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        match self.block_on(self.backend.release(fh)) {
            Ok(()) => reply.ok(),
            Err(e) => reply.error(Self::error_to_errno(e)),
        }
    }

    /// Get filesystem statistics
    fn statfs(&mut self, _req: &Request, _ino: u64, reply: ReplyStatfs) {
        let result = self.block_on(self.backend.statfs());

        match result {
            Ok(stats) => {
                reply.statfs(
                    stats.blocks,
                    stats.bfree,
                    stats.bavail,
                    stats.files,
                    stats.ffree,
                    stats.bsize,
                    stats.namelen,
                    0, // frsize
                );
            }
            Err(e) => {
                reply.error(Self::error_to_errno(e));
            }
        }
    }

    // Every mutating operation is denied: the namespace is read-only.

    fn setattr(
        &mut self,
        _req: &Request,
        _ino: u64,
        _mode: Option<u32>,
        _uid: Option<u32>,
        _gid: Option<u32>,
        _size: Option<u64>,
        _atime: Option<fuser::TimeOrNow>,
        _mtime: Option<fuser::TimeOrNow>,
        _ctime: Option<SystemTime>,
        _fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        reply.error(libc::EACCES);
    }

    fn mknod(
        &mut self,
        _req: &Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        _rdev: u32,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EACCES);
    }

    fn mkdir(
        &mut self,
        _req: &Request,
        _parent: u64,
        _name: &OsStr,
        _mode: u32,
        _umask: u32,
        reply: ReplyEntry,
    ) {
        reply.error(libc::EACCES);
    }

    fn unlink(&mut self, _req: &Request, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::EACCES);
    }

    fn rmdir(&mut self, _req: &Request, _parent: u64, _name: &OsStr, reply: ReplyEmpty) {
        reply.error(libc::EACCES);
    }

    fn rename(
        &mut self,
        _req: &Request,
        _parent: u64,
        _name: &OsStr,
        _newparent: u64,
        _newname: &OsStr,
        _flags: u32,
        reply: ReplyEmpty,
    ) {
        reply.error(libc::EACCES);
    }

    fn write(
        &mut self,
        _req: &Request,
        _ino: u64,
        _fh: u64,
        _offset: i64,
        _data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        reply.error(libc::EACCES);
    }
}
