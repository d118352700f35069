use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use sprig_config::SprigConfig;
use sprig_core::FileUri;
use sprig_ide::SpringIde;
use sprig_index::{FileStamp, FsSourceStore, IndexReport, SpringIndexer};
use walkdir::{DirEntry, WalkDir};

/// Directories never searched for sources.
const SKIPPED_DIRS: [&str; 4] = ["target", "build", "out", "node_modules"];

/// An indexed source tree.
pub struct Workspace {
    pub root: PathBuf,
    pub report: IndexReport,
    indexer: SpringIndexer,
}

impl Workspace {
    /// Index every `*.java` file under `path` (a directory, or a file inside the tree).
    pub fn open(path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = if path.is_file() {
            path.parent().unwrap_or(path).to_path_buf()
        } else {
            path.to_path_buf()
        };
        if !root.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }

        let (config, base) = match config_path {
            Some(config_path) => {
                let config = SprigConfig::load_from_path(config_path)?;
                let base = config_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                (config, base)
            }
            None => sprig_config::load_for_workspace(&root)?,
        };
        sprig_config::init_tracing(&config.logging);

        let indexer = SpringIndexer::new(config.indexer_config(&base), Arc::new(FsSourceStore))
            .context("failed to set up the indexer")?;
        let stamps = java_sources(&root)?;
        tracing::debug!(target: "sprig.cli", root = %root.display(), files = stamps.len(), "indexing");

        let report = indexer
            .index_files(stamps)
            .join_blocking()
            .context("indexing did not finish")?;
        Ok(Self {
            root,
            report,
            indexer,
        })
    }

    pub fn ide(&self) -> SpringIde {
        SpringIde::from_indexer(&self.indexer)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

/// Stamps for the Java sources under `root`, in path order. Modification times in
/// milliseconds serve as the last-modified stamp.
fn java_sources(root: &Path) -> Result<Vec<FileStamp>> {
    let mut stamps = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
    {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("java")
        {
            continue;
        }
        let modified = entry
            .metadata()
            .ok()
            .and_then(|metadata| metadata.modified().ok())
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        stamps.push(FileStamp::new(FileUri::from_path(path), modified));
    }
    Ok(stamps)
}
