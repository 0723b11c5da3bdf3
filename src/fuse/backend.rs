// RdfFsBackend - read-only filesystem over a graph store
//
// Holds the namespace tree built once at construction time, the content
// provider, and the open-handle table. The tree is immutable afterwards,
// so concurrent lookups and listings need no locking; the handle table is
// the only shared mutable state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use oxigraph::io::RdfFormat;

use super::interface::{DirEntry, FileAttr, FileType, FilesystemInterface, FsResult, StatFs};
use crate::fs::error::FsError;
use crate::fs::{build_tree, ContentProvider, Node};
use crate::store::{GraphStore, StoreResult};

const DIRECTORY_SIZE: u64 = 4096;
const BLOCK_SIZE: u32 = 4096;
const MAX_NAME_LENGTH: u32 = 255;

pub struct RdfFsBackend {
    tree: Node,
    provider: ContentProvider,
    graph_count: u64,
    mounted_at: DateTime<Utc>,
    uid: u32,
    gid: u32,
    handles: RwLock<HashMap<u64, Arc<Vec<u8>>>>,
    next_handle: AtomicU64,
}

impl RdfFsBackend {
    /// Builds the namespace tree from a snapshot of the store's graph
    /// identifiers and prepares the content provider.
    pub fn new(store: Arc<dyn GraphStore>, format: RdfFormat) -> StoreResult<Self> {
        let identifiers = store.graph_identifiers()?;
        tracing::info!("building namespace tree from {} graphs", identifiers.len());
        let tree = build_tree(&identifiers);

        Ok(Self {
            graph_count: tree.leaf_count(),
            tree,
            provider: ContentProvider::new(store, format),
            mounted_at: Utc::now(),
            uid: unsafe { libc::getuid() },
            gid: unsafe { libc::getgid() },
            handles: RwLock::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        })
    }

    fn leaf_attr(&self, size: u64) -> FileAttr {
        FileAttr {
            inode: 0,
            kind: FileType::RegularFile,
            size,
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            mode: 0o444,
            uid: self.uid,
            gid: self.gid,
            nlinks: 1,
        }
    }

    fn directory_attr(&self) -> FileAttr {
        FileAttr {
            inode: 0,
            kind: FileType::Directory,
            size: DIRECTORY_SIZE,
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            mode: 0o755,
            uid: self.uid,
            gid: self.gid,
            nlinks: 2,
        }
    }

    /// Serializes a leaf's graph off the async dispatch threads; content
    /// size is unbounded and the store call blocks.
    async fn render(&self, path: &str) -> FsResult<Arc<Vec<u8>>> {
        let provider = self.provider.clone();
        let path = path.to_string();
        let content = tokio::task::spawn_blocking(move || provider.content(&path))
            .await
            .map_err(|e| FsError::Serialization(format!("render task failed: {e}")))??;
        Ok(Arc::new(content))
    }
}

#[async_trait::async_trait]
impl FilesystemInterface for RdfFsBackend {
    async fn get_attr(&self, path: &str) -> FsResult<FileAttr> {
        match self.tree.resolve(path) {
            None => Err(FsError::PathNotFound(path.to_string())),
            Some(Node::Leaf) => {
                let content = self.render(path).await?;
                Ok(self.leaf_attr(content.len() as u64))
            }
            Some(Node::Directory(_)) => Ok(self.directory_attr()),
        }
    }

    async fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let node = self
            .tree
            .resolve(path)
            .ok_or_else(|| FsError::PathNotFound(path.to_string()))?;

        // iterating a leaf is a normal empty-result case, not an error
        let mut entries = Vec::new();
        if let Some(children) = node.children() {
            for (name, child) in children {
                let kind = if child.is_leaf() { FileType::RegularFile } else { FileType::Directory };
                entries.push(DirEntry { name: name.clone(), kind });
            }
        }
        Ok(entries)
    }

    async fn open(&self, path: &str, write_requested: bool) -> FsResult<u64> {
        match self.tree.resolve(path) {
            Some(Node::Leaf) => {}
            _ => return Err(FsError::PathNotFound(path.to_string())),
        }
        if write_requested {
            return Err(FsError::PermissionDenied(path.to_string()));
        }

        let content = self.render(path).await?;
        let fh = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.handles.write().unwrap().insert(fh, content);
        tracing::debug!("opened {path} as handle {fh}");
        Ok(fh)
    }

    async fn read(&self, fh: u64, offset: u64, size: u32) -> FsResult<Vec<u8>> {
        let buffer = self
            .handles
            .read()
            .unwrap()
            .get(&fh)
            .cloned()
            .ok_or(FsError::UnknownHandle(fh))?;

        let start = offset as usize;
        if start >= buffer.len() {
            return Ok(Vec::new());
        }
        let end = std::cmp::min(start + size as usize, buffer.len());
        Ok(buffer[start..end].to_vec())
    }

    async fn release(&self, fh: u64) -> FsResult<()> {
        if self.handles.write().unwrap().remove(&fh).is_none() {
            tracing::debug!("release of unknown handle {fh}");
        }
        Ok(())
    }

    async fn statfs(&self) -> FsResult<StatFs> {
        Ok(StatFs {
            blocks: 0,
            bfree: 0,
            bavail: 0,
            files: self.graph_count,
            ffree: 0,
            bsize: BLOCK_SIZE,
            namelen: MAX_NAME_LENGTH,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OxigraphStore;
    use oxigraph::model::{GraphName, NamedNode, Quad};

    fn named(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn backend_with_graphs(graphs: &[&str]) -> RdfFsBackend {
        let store = OxigraphStore::in_memory().unwrap();
        for graph in graphs {
            store
                .store()
                .insert(&Quad::new(
                    named("http://example.org/s"),
                    named("http://example.org/p"),
                    named("http://example.org/o"),
                    GraphName::NamedNode(named(graph)),
                ))
                .unwrap();
        }
        RdfFsBackend::new(Arc::new(store), RdfFormat::NTriples).unwrap()
    }

    #[tokio::test]
    async fn test_root_attr_is_directory() {
        let backend = backend_with_graphs(&[]);
        let attr = backend.get_attr("/").await.unwrap();
        assert_eq!(attr.kind, FileType::Directory);
        assert_eq!(attr.mode, 0o755);
        assert_eq!(attr.nlinks, 2);
        assert_eq!(attr.size, DIRECTORY_SIZE);
    }

    #[tokio::test]
    async fn test_leaf_attr_size_matches_content() {
        let backend = backend_with_graphs(&["http://example.org/graphs/alpha"]);
        let path = "/http:/%/example.org/graphs/alpha";

        let attr = backend.get_attr(path).await.unwrap();
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.mode, 0o444);
        assert_eq!(attr.nlinks, 1);

        let fh = backend.open(path, false).await.unwrap();
        let content = backend.read(fh, 0, u32::MAX).await.unwrap();
        assert_eq!(attr.size, content.len() as u64);
    }

    #[tokio::test]
    async fn test_get_attr_not_found() {
        let backend = backend_with_graphs(&["http://example.org/graphs/alpha"]);
        let err = backend.get_attr("/nosuch").await.unwrap_err();
        assert!(matches!(err, FsError::PathNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_dir_lists_children() {
        let backend =
            backend_with_graphs(&["http://example.org/a/x", "http://example.org/a/y"]);
        let mut names: Vec<String> = backend
            .read_dir("/http:/%/example.org/a")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_read_dir_of_leaf_is_empty() {
        let backend = backend_with_graphs(&["http://example.org/a/x"]);
        let entries = backend.read_dir("/http:/%/example.org/a/x").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_open_write_intent_denied() {
        let backend = backend_with_graphs(&["http://example.org/a/x"]);
        let err = backend.open("/http:/%/example.org/a/x", true).await.unwrap_err();
        assert!(matches!(err, FsError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_open_directory_is_not_found() {
        let backend = backend_with_graphs(&["http://example.org/a/x"]);
        let err = backend.open("/http:/%/example.org/a", false).await.unwrap_err();
        assert!(matches!(err, FsError::PathNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_clips_to_buffer_length() {
        let backend = backend_with_graphs(&["http://example.org/a/x"]);
        let path = "/http:/%/example.org/a/x";
        let fh = backend.open(path, false).await.unwrap();
        let full = backend.read(fh, 0, u32::MAX).await.unwrap();
        let length = full.len() as u64;

        assert!(backend.read(fh, length, 10).await.unwrap().is_empty());
        assert!(backend.read(fh, length + 5, 10).await.unwrap().is_empty());
        let tail = backend.read(fh, length - 3, 10).await.unwrap();
        assert_eq!(tail.len(), 3);
        assert_eq!(tail, full[full.len() - 3..]);
    }

    #[tokio::test]
    async fn test_concurrent_opens_get_distinct_handles() {
        let backend = backend_with_graphs(&["http://example.org/a/x"]);
        let path = "/http:/%/example.org/a/x";
        let first = backend.open(path, false).await.unwrap();
        let second = backend.open(path, false).await.unwrap();
        assert_ne!(first, second);

        // both handles stay readable independently
        assert_eq!(
            backend.read(first, 0, u32::MAX).await.unwrap(),
            backend.read(second, 0, u32::MAX).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_read_after_release_is_not_found() {
        let backend = backend_with_graphs(&["http://example.org/a/x"]);
        let fh = backend.open("/http:/%/example.org/a/x", false).await.unwrap();
        backend.release(fh).await.unwrap();
        let err = backend.read(fh, 0, 10).await.unwrap_err();
        assert!(matches!(err, FsError::UnknownHandle(_)));
    }

    #[tokio::test]
    async fn test_read_unknown_handle() {
        let backend = backend_with_graphs(&[]);
        let err = backend.read(42, 0, 10).await.unwrap_err();
        assert_eq!(err.to_errno(), libc::ENOENT);
    }

    #[tokio::test]
    async fn test_statfs_counts_graphs() {
        let backend =
            backend_with_graphs(&["http://example.org/a/x", "http://example.org/a/y"]);
        let stats = backend.statfs().await.unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.namelen, MAX_NAME_LENGTH);
    }
}
