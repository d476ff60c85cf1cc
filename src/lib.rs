#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Checkpoint ledger for file-level resumability.
pub mod checkpoint;
/// Run and validation configuration types.
pub mod config;
/// Centralized constants used across discovery, sharding, and manifests.
pub mod constants;
/// Record payload type.
pub mod data;
/// Recursive extension-filtered input discovery.
pub mod discover;
/// Streaming SHA-256 file digests.
pub mod hash;
/// Shard integrity manifest generation.
pub mod manifest;
/// Run orchestration: discovery through manifest.
pub mod pipeline;
/// Deterministic row sampling and the global record limit.
pub mod sampling;
/// Size-bounded, optionally compressed shard output.
pub mod shard;
/// Row-outcome counters and throughput reporting.
pub mod stats;
/// Lazy per-file row streaming (CSV and plain text).
pub mod stream;
/// Shared type aliases.
pub mod types;
/// Record quality rules.
pub mod validate;

mod errors;

pub use checkpoint::CheckpointLedger;
pub use config::{IngestConfig, ValidationConfig};
pub use data::Record;
pub use discover::Discovery;
pub use errors::{PipelineError, Result};
pub use manifest::{Manifest, ManifestBuilder, ManifestEntry};
pub use pipeline::{ingest, IngestPipeline, RunReport};
pub use sampling::SamplingGate;
pub use shard::ShardedSink;
pub use stats::{RunStats, StatsReport};
pub use stream::RowStream;
pub use types::{ColumnName, Extension, HexDigest, ShardIndex};
pub use validate::validate;
