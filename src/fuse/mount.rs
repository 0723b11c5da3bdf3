// FUSE mount management
//
// Provides functions to mount and unmount the graph filesystem via FUSE.

use super::adapter::FuseAdapter;
use super::interface::FilesystemInterface;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

/// Mount options for the FUSE filesystem
#[derive(Debug, Clone)]
pub struct MountOptions {
    /// Allow other users to access the filesystem
    pub allow_other: bool,

    /// Allow root to access the filesystem
    pub allow_root: bool,

    /// Filesystem name (for mtab)
    pub fsname: Option<String>,

    /// Auto-unmount on process exit
    pub auto_unmount: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            allow_other: false,
            allow_root: false,
            fsname: Some("rdffs".to_string()),
            auto_unmount: true,
        }
    }
}

impl MountOptions {
    /// Convert to fuser mount options
    ///
    /// The namespace is read-only by construction, so RO is always set.
    fn to_fuser_options(&self) -> Vec<fuser::MountOption> {
        let mut options = vec![fuser::MountOption::RO];

        if self.allow_other {
            options.push(fuser::MountOption::AllowOther);
        }

        if self.allow_root {
            options.push(fuser::MountOption::AllowRoot);
        }

        if let Some(ref fsname) = self.fsname {
            options.push(fuser::MountOption::FSName(fsname.clone()));
        }

        if self.auto_unmount {
            options.push(fuser::MountOption::AutoUnmount);
        }

        options
    }
}

fn validate_mountpoint(mountpoint: &Path) -> Result<()> {
    if !mountpoint.exists() {
        anyhow::bail!("Mount point does not exist: {}", mountpoint.display());
    }
    if !mountpoint.is_dir() {
        anyhow::bail!("Mount point is not a directory: {}", mountpoint.display());
    }
    Ok(())
}

/// Mount the graph filesystem and serve until it is unmounted
///
/// Blocks the calling thread for the lifetime of the mount.
pub fn mount(
    backend: Arc<dyn FilesystemInterface>,
    mountpoint: impl AsRef<Path>,
    options: MountOptions,
) -> Result<()> {
    let mountpoint = mountpoint.as_ref();
    validate_mountpoint(mountpoint)?;

    let adapter = FuseAdapter::new(backend);
    let fuser_options = options.to_fuser_options();

    tracing::info!("mounting graph filesystem at {}", mountpoint.display());

    fuser::mount2(adapter, mountpoint, &fuser_options).context("Failed to mount filesystem")?;

    tracing::info!("filesystem unmounted");
    Ok(())
}

/// Mount the graph filesystem in the background
///
/// # Returns
/// A session handle that keeps the filesystem mounted until dropped
pub fn spawn_mount(
    backend: Arc<dyn FilesystemInterface>,
    mountpoint: impl AsRef<Path>,
    options: MountOptions,
) -> Result<fuser::BackgroundSession> {
    let mountpoint = mountpoint.as_ref();
    validate_mountpoint(mountpoint)?;

    let adapter = FuseAdapter::new(backend);
    let fuser_options = options.to_fuser_options();

    tracing::info!("mounting graph filesystem at {}", mountpoint.display());

    let session = fuser::spawn_mount2(adapter, mountpoint, &fuser_options)
        .context("Failed to mount filesystem")?;

    tracing::info!("filesystem mounted");
    Ok(session)
}

/// Unmount a FUSE filesystem
///
/// Note: This is automatically handled when the BackgroundSession is dropped,
/// but this function can be used for explicit unmounting.
pub fn unmount(mountpoint: impl AsRef<Path>) -> Result<()> {
    let mountpoint = mountpoint.as_ref();

    tracing::info!("unmounting filesystem at {}", mountpoint.display());

    #[cfg(target_os = "linux")]
    {
        use std::process::Command;

        let output = Command::new("fusermount")
            .arg("-u")
            .arg(mountpoint)
            .output()
            .context("Failed to execute fusermount")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to unmount: {}", stderr);
        }
    }

    #[cfg(target_os = "macos")]
    {
        use std::process::Command;

        let output =
            Command::new("umount").arg(mountpoint).output().context("Failed to execute umount")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to unmount: {}", stderr);
        }
    }

    Ok(())
}
