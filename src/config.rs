use std::path::PathBuf;

use crate::constants::{default_extensions, defaults};
use crate::errors::{PipelineError, Result};
use crate::types::{ColumnName, Extension};

/// Quality rules applied to each record by the validator.
///
/// Immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationConfig {
    /// Minimum character count of the trimmed text.
    pub min_length: usize,
    /// Whether to run English-language detection (fail-closed on ambiguity).
    pub check_language: bool,
    /// Maximum tolerated fraction of non-alphabetic characters, in `[0, 1]`.
    pub max_symbol_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_length: defaults::MIN_LENGTH,
            check_language: true,
            max_symbol_ratio: defaults::MAX_SYMBOL_RATIO,
        }
    }
}

/// Top-level configuration for one ingestion run.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// Raw input file or directory to crawl.
    pub input_path: PathBuf,
    /// Output path prefix; shards land at `{prefix}-NNNN.jsonl[.gz]`.
    pub output_prefix: PathBuf,
    /// Column holding text content in delimited inputs.
    pub text_column: ColumnName,
    /// Extensions accepted during discovery (case-insensitive, with dot).
    pub extensions: Vec<Extension>,
    /// Record quality rules.
    pub validation: ValidationConfig,
    /// Records per shard before rotation.
    pub shard_size: usize,
    /// Global cap on accepted records; `0` means unlimited.
    pub record_limit: u64,
    /// Row-level keep probability in `(0, 1]`; `1.0` keeps every row.
    pub sample_probability: f64,
    /// RNG seed that controls deterministic row sampling.
    pub seed: u64,
    /// Resume from an existing checkpoint ledger instead of starting fresh.
    pub resume: bool,
    /// Gzip-compress output shards.
    pub compress: bool,
}

impl IngestConfig {
    /// Create a config with explicit input path and output prefix and
    /// defaults everywhere else.
    pub fn new(input_path: impl Into<PathBuf>, output_prefix: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_prefix: output_prefix.into(),
            text_column: defaults::TEXT_COLUMN.to_string(),
            extensions: default_extensions(),
            validation: ValidationConfig::default(),
            shard_size: defaults::SHARD_SIZE,
            record_limit: 0,
            sample_probability: 1.0,
            seed: defaults::SAMPLING_SEED,
            resume: false,
            compress: false,
        }
    }

    /// Override the text column name for delimited inputs.
    pub fn with_text_column(mut self, column: impl Into<ColumnName>) -> Self {
        self.text_column = column.into();
        self
    }

    /// Override the accepted discovery extensions.
    pub fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Override the minimum kept text length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.validation.min_length = min_length;
        self
    }

    /// Enable or disable the English-language check.
    pub fn with_check_language(mut self, check_language: bool) -> Self {
        self.validation.check_language = check_language;
        self
    }

    /// Override the non-alphabetic ratio ceiling.
    pub fn with_max_symbol_ratio(mut self, max_symbol_ratio: f64) -> Self {
        self.validation.max_symbol_ratio = max_symbol_ratio;
        self
    }

    /// Override the per-shard record count.
    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = shard_size;
        self
    }

    /// Cap the number of accepted records across the whole run (`0` = unlimited).
    pub fn with_record_limit(mut self, record_limit: u64) -> Self {
        self.record_limit = record_limit;
        self
    }

    /// Set the row sampling probability.
    pub fn with_sample_probability(mut self, sample_probability: f64) -> Self {
        self.sample_probability = sample_probability;
        self
    }

    /// Set the sampling RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Resume from the checkpoint ledger of a previous run.
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Gzip-compress output shards.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.text_column.is_empty() {
            return Err(PipelineError::Configuration(
                "text_column must not be empty".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(PipelineError::Configuration(
                "at least one accepted extension is required".to_string(),
            ));
        }
        if self.shard_size == 0 {
            return Err(PipelineError::Configuration(
                "shard_size must be at least 1".to_string(),
            ));
        }
        if !(self.sample_probability > 0.0 && self.sample_probability <= 1.0) {
            return Err(PipelineError::Configuration(format!(
                "sample_probability must be in (0, 1], got {}",
                self.sample_probability
            )));
        }
        if !(0.0..=1.0).contains(&self.validation.max_symbol_ratio) {
            return Err(PipelineError::Configuration(format!(
                "max_symbol_ratio must be in [0, 1], got {}",
                self.validation.max_symbol_ratio
            )));
        }
        Ok(())
    }
}
