use thiserror::Error;

use crate::store::StoreError;

pub type FsResult<T> = Result<T, FsError>;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Unknown file handle: {0}")]
    UnknownHandle(u64),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl FsError {
    /// Convert to POSIX errno.
    pub fn to_errno(&self) -> i32 {
        match self {
            FsError::PathNotFound(_) | FsError::UnknownHandle(_) => libc::ENOENT,
            FsError::PermissionDenied(_) => libc::EACCES,
            // retrieval failures surface as generic I/O errors
            FsError::Store(_) | FsError::Serialization(_) => libc::EIO,
        }
    }
}
