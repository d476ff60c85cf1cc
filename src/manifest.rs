use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::manifest::MANIFEST_FILENAME;
use crate::constants::shards::{EXT_GZIP, EXT_PLAIN};
use crate::errors::{PipelineError, Result};
use crate::hash::sha256_file;
use crate::types::HexDigest;

/// Integrity metadata for one sealed shard.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ManifestEntry {
    /// Shard file name (base name, no directory).
    pub filename: String,
    /// Streamed SHA-256 digest of the shard's bytes, lowercase hex.
    pub sha256: HexDigest,
    /// Shard size in bytes.
    pub size_bytes: u64,
}

/// Integrity document summarizing every shard produced by one run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// RFC 3339 UTC time the manifest was generated.
    pub timestamp: String,
    /// Total accepted records across all shards, as reported by the run.
    pub total_records: u64,
    /// Number of shard files listed.
    pub total_files: usize,
    /// Per-shard integrity entries, sorted by file name.
    pub files: Vec<ManifestEntry>,
}

/// Hashes sealed shards and writes `manifest.json` beside them.
pub struct ManifestBuilder {
    output_dir: PathBuf,
    base_name: String,
}

impl ManifestBuilder {
    /// Create a builder for the shards written under `output_prefix`.
    pub fn new(output_prefix: &Path) -> Self {
        let output_dir = match output_prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let base_name = output_prefix
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            output_dir,
            base_name,
        }
    }

    /// Location the manifest document is written to.
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILENAME)
    }

    /// Sealed shard files matching this run's prefix, sorted by file name
    /// so shard order is deterministic regardless of directory enumeration.
    pub fn shard_files(&self) -> Result<Vec<PathBuf>> {
        let prefix = format!("{}-", self.base_name);
        let mut shards = Vec::new();
        let entries = fs::read_dir(&self.output_dir)
            .map_err(|err| manifest_error("reading output directory", &err))?;
        for entry in entries {
            let entry = entry.map_err(|err| manifest_error("reading output directory", &err))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix)
                && (name.ends_with(EXT_PLAIN) || name.ends_with(EXT_GZIP))
            {
                shards.push(entry.path());
            }
        }
        shards.sort();
        Ok(shards)
    }

    /// Hash every shard and write the manifest document.
    ///
    /// Failures here abort the run: a manifest that cannot be produced
    /// breaks the integrity guarantee for otherwise-successful output.
    pub fn generate(&self, total_records: u64) -> Result<Manifest> {
        let shards = self.shard_files()?;
        let mut files = Vec::with_capacity(shards.len());
        for shard in &shards {
            debug!(shard = %shard.display(), "hashing shard");
            let sha256 =
                sha256_file(shard).map_err(|err| manifest_error("hashing shard", &err))?;
            let size_bytes = fs::metadata(shard)
                .map_err(|err| manifest_error("reading shard metadata", &err))?
                .len();
            files.push(ManifestEntry {
                filename: shard
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                sha256,
                size_bytes,
            });
        }

        let manifest = Manifest {
            timestamp: Utc::now().to_rfc3339(),
            total_records,
            total_files: files.len(),
            files,
        };

        let path = self.manifest_path();
        let file =
            File::create(&path).map_err(|err| manifest_error("creating manifest file", &err))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &manifest)
            .map_err(|err| manifest_error("writing manifest", &err))?;
        info!(
            manifest = %path.display(),
            shards = manifest.total_files,
            records = total_records,
            "wrote integrity manifest"
        );
        Ok(manifest)
    }
}

fn manifest_error(context: &str, err: &dyn std::fmt::Display) -> PipelineError {
    PipelineError::Manifest(format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_shard(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("write shard");
    }

    #[test]
    fn manifest_lists_only_matching_shards_in_sorted_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_shard(dir.path(), "corpus-0001.jsonl", "{\"text\":\"b\"}\n");
        write_shard(dir.path(), "corpus-0000.jsonl", "{\"text\":\"a\"}\n");
        write_shard(dir.path(), "other-0000.jsonl", "{\"text\":\"x\"}\n");
        write_shard(dir.path(), "corpus-notes.md", "not a shard");

        let builder = ManifestBuilder::new(&dir.path().join("corpus"));
        let manifest = builder.generate(2).expect("generate");

        assert_eq!(manifest.total_files, 2);
        assert_eq!(manifest.total_records, 2);
        assert_eq!(manifest.files[0].filename, "corpus-0000.jsonl");
        assert_eq!(manifest.files[1].filename, "corpus-0001.jsonl");
        assert!(builder.manifest_path().exists());
    }

    #[test]
    fn entry_hashes_match_recomputation() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_shard(dir.path(), "corpus-0000.jsonl", "{\"text\":\"hello\"}\n");

        let builder = ManifestBuilder::new(&dir.path().join("corpus"));
        let manifest = builder.generate(1).expect("generate");

        let recomputed =
            sha256_file(&dir.path().join("corpus-0000.jsonl")).expect("rehash");
        assert_eq!(manifest.files[0].sha256, recomputed);
        assert_eq!(manifest.files[0].size_bytes, 17);
    }

    #[test]
    fn written_document_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_shard(dir.path(), "corpus-0000.jsonl.gz", "pretend gzip bytes");

        let builder = ManifestBuilder::new(&dir.path().join("corpus"));
        let manifest = builder.generate(7).expect("generate");

        let raw = fs::read_to_string(builder.manifest_path()).expect("read manifest");
        let parsed: Manifest = serde_json::from_str(&raw).expect("parse manifest");
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.files[0].filename, "corpus-0000.jsonl.gz");
    }

    #[test]
    fn missing_output_directory_is_a_manifest_error() {
        let builder = ManifestBuilder::new(Path::new("/nonexistent/corpus"));
        assert!(matches!(
            builder.generate(1),
            Err(PipelineError::Manifest(_))
        ));
    }
}
