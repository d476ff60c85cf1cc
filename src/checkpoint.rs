use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::checkpoint::LEDGER_SUFFIX;
use crate::errors::Result;

/// Durable ledger of fully-processed input files, enabling resumable runs.
///
/// The ledger is a plain-text sidecar file holding one absolute path per
/// line. Entries are appended the moment a file completes, so a crash loses
/// at most the in-flight file, never a previously completed one.
pub struct CheckpointLedger {
    path: PathBuf,
    done: HashSet<PathBuf>,
}

impl CheckpointLedger {
    /// Ledger file location for a given output prefix: a dotfile beside the
    /// shards (`out/.corpus.checkpoint` for prefix `out/corpus`).
    pub fn ledger_path(output_prefix: &Path) -> PathBuf {
        let base = output_prefix
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string());
        let file = format!(".{base}{LEDGER_SUFFIX}");
        match output_prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(file),
            _ => PathBuf::from(file),
        }
    }

    /// Open the ledger at `path`, loading any existing entries.
    ///
    /// A fresh (non-resuming) run deletes the pre-existing ledger first, so
    /// stale completions never leak into a new run.
    pub fn open(path: impl Into<PathBuf>, resume: bool) -> Result<Self> {
        let path = path.into();
        if !resume && path.exists() {
            fs::remove_file(&path)?;
        }
        let done = if path.exists() {
            fs::read_to_string(&path)?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
                .collect()
        } else {
            HashSet::new()
        };
        debug!(ledger = %path.display(), entries = done.len(), "opened checkpoint ledger");
        Ok(Self { path, done })
    }

    /// Whether `file` was fully processed in this or a prior run.
    pub fn is_done(&self, file: &Path) -> bool {
        self.done.contains(&absolute(file))
    }

    /// Record `file` as fully processed, appending to the ledger on disk
    /// immediately. Marking an already-done file is a no-op.
    pub fn mark_done(&mut self, file: &Path) -> Result<()> {
        let abs = absolute(file);
        if self.done.contains(&abs) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut ledger = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(ledger, "{}", abs.display())?;
        ledger.flush()?;
        self.done.insert(abs);
        Ok(())
    }

    /// Number of completed files recorded in the ledger.
    pub fn len(&self) -> usize {
        self.done.len()
    }

    /// Whether the ledger holds no completed files.
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// On-disk location of the ledger.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
