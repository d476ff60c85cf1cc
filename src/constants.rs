use crate::types::Extension;

/// Constants used by run configuration defaults.
pub mod defaults {
    /// Default minimum character length a record must reach to be kept.
    pub const MIN_LENGTH: usize = 10;
    /// Default ceiling on the non-alphabetic character ratio.
    pub const MAX_SYMBOL_RATIO: f64 = 0.30;
    /// Default number of records per output shard.
    pub const SHARD_SIZE: usize = 10_000;
    /// Default RNG seed for the sampling gate.
    pub const SAMPLING_SEED: u64 = 42;
    /// Default column name holding text content in delimited inputs.
    pub const TEXT_COLUMN: &str = "text";
    /// Extensions accepted by file discovery when none are configured.
    pub const EXTENSIONS: [&str; 2] = [".csv", ".txt"];
}

/// Constants used by shard naming and rotation.
pub mod shards {
    /// Zero-pad width of the shard index in file names (`corpus-0000.jsonl`).
    pub const INDEX_WIDTH: usize = 4;
    /// Extension for uncompressed shards.
    pub const EXT_PLAIN: &str = ".jsonl";
    /// Extension for gzip-compressed shards.
    pub const EXT_GZIP: &str = ".jsonl.gz";
}

/// Constants used by manifest generation and shard hashing.
pub mod manifest {
    /// File name of the integrity manifest, written beside the shards.
    pub const MANIFEST_FILENAME: &str = "manifest.json";
    /// Read chunk size used when streaming a shard through the hasher.
    pub const HASH_CHUNK_SIZE: usize = 8192;
}

/// Constants used by checkpoint ledger naming.
pub mod checkpoint {
    /// Suffix appended to the dotted output base name to form the ledger
    /// file (`.corpus.checkpoint` for prefix `out/corpus`).
    pub const LEDGER_SUFFIX: &str = ".checkpoint";
}

/// Build the default accepted-extension list as owned values.
pub fn default_extensions() -> Vec<Extension> {
    defaults::EXTENSIONS.iter().map(|e| e.to_string()).collect()
}
