use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rdffs::fs::format_from_name;
use rdffs::fuse::{mount, MountOptions, RdfFsBackend};
use rdffs::store::StoreRegistry;

#[derive(Parser)]
#[command(name = "rdffs")]
#[command(about = "read-only FUSE filesystem exposing the named graphs of an RDF store")]
#[command(version)]
struct Cli {
    /// directory to mount the filesystem at
    mountpoint: PathBuf,

    /// store specification, of the form :{backend}:{config-string}
    /// (a plain path selects the default persistent backend)
    #[arg(short = 'S', long, env = "RDFFS_STORE")]
    store: String,

    /// RDF format in which to expose graphs
    #[arg(short = 'F', long, env = "RDFFS_FORMAT", default_value = "turtle")]
    format: String,

    /// allow other users to access the mount
    #[arg(long)]
    allow_other: bool,

    /// allow root to access the mount
    #[arg(long)]
    allow_root: bool,

    /// keep the mount alive after the process exits
    #[arg(long)]
    no_auto_unmount: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rdffs=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let format = format_from_name(&cli.format)
        .with_context(|| format!("unsupported RDF format: {}", cli.format))?;

    let store = StoreRegistry::default()
        .open(&cli.store)
        .with_context(|| format!("failed to open store {}", cli.store))?;

    let backend =
        RdfFsBackend::new(store, format).context("failed to build the graph namespace")?;

    let options = MountOptions {
        allow_other: cli.allow_other,
        allow_root: cli.allow_root,
        auto_unmount: !cli.no_auto_unmount,
        ..Default::default()
    };

    mount(Arc::new(backend), &cli.mountpoint, options)
}
