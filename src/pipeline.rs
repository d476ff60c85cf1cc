use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::checkpoint::CheckpointLedger;
use crate::config::IngestConfig;
use crate::discover::Discovery;
use crate::errors::{PipelineError, Result};
use crate::manifest::{Manifest, ManifestBuilder};
use crate::sampling::SamplingGate;
use crate::shard::ShardedSink;
use crate::stats::{RunStats, StatsReport};
use crate::stream::RowStream;
use crate::validate::validate;

/// Final summary of one ingestion run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Row-level counters and throughput snapshot.
    pub stats: StatsReport,
    /// Shards sealed by this run.
    pub shards_written: usize,
    /// Input files matched by discovery.
    pub files_discovered: usize,
    /// Files skipped because the checkpoint ledger already held them.
    pub files_skipped: usize,
    /// Files abandoned after an isolated per-file error.
    pub files_failed: usize,
    /// Completed files recorded in the checkpoint ledger after the run.
    pub checkpoint_entries: usize,
    /// Whether the global record limit cut the run short.
    pub limit_reached: bool,
    /// Integrity manifest, present when any records were accepted.
    pub manifest: Option<Manifest>,
}

/// Per-run bookkeeping shared between the drive loop and the final report.
#[derive(Default)]
struct DriveOutcome {
    files_skipped: usize,
    files_failed: usize,
    stop: bool,
}

/// Drives one ingestion run end to end.
///
/// For each discovered file: stream rows, pass each through the sampling
/// gate and the validator, write accepted records to the sharded sink, and
/// record file completion in the checkpoint ledger. Files are processed
/// strictly one at a time in discovery order; a failing file is logged and
/// skipped without aborting the run. The sink is closed on every exit path,
/// and the integrity manifest is generated only when records were accepted.
pub struct IngestPipeline {
    config: IngestConfig,
}

impl IngestPipeline {
    /// Validate `config` and build a pipeline around it.
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Execute the run and produce its final report.
    ///
    /// Fatal conditions are an empty discovery set, checkpoint/sink I/O
    /// failures outside any single file, and manifest generation failures.
    /// Everything else is isolated per file.
    pub fn run(&self) -> Result<RunReport> {
        if !self.config.input_path.exists() {
            return Err(PipelineError::NotFound {
                path: self.config.input_path.clone(),
            });
        }

        let discovery = Discovery::new(self.config.extensions.clone());
        let files: Vec<PathBuf> = discovery.files(&self.config.input_path).collect();
        if files.is_empty() {
            return Err(PipelineError::EmptyInput {
                path: self.config.input_path.clone(),
            });
        }
        info!(
            files = files.len(),
            input = %self.config.input_path.display(),
            resume = self.config.resume,
            "starting ingestion run"
        );

        let ledger_path = CheckpointLedger::ledger_path(&self.config.output_prefix);
        let mut ledger = CheckpointLedger::open(ledger_path, self.config.resume)?;
        let mut sink = ShardedSink::new(
            &self.config.output_prefix,
            self.config.shard_size,
            self.config.compress,
        );
        let mut gate = SamplingGate::new(
            self.config.sample_probability,
            self.config.seed,
            self.config.record_limit,
        )?;
        let mut stats = RunStats::new();
        let mut outcome = DriveOutcome::default();

        let drive_result = self.drive(
            &files,
            &mut ledger,
            &mut sink,
            &mut gate,
            &mut stats,
            &mut outcome,
        );
        // The sink must seal its open shard even when the drive loop bailed
        // out, otherwise the last shard is left truncated.
        let close_result = sink.close();
        drive_result?;
        close_result?;

        let manifest = if stats.valid_count() > 0 {
            Some(ManifestBuilder::new(&self.config.output_prefix).generate(stats.valid_count())?)
        } else {
            None
        };

        let report = RunReport {
            stats: stats.report(),
            shards_written: sink.shards_sealed(),
            files_discovered: files.len(),
            files_skipped: outcome.files_skipped,
            files_failed: outcome.files_failed,
            checkpoint_entries: ledger.len(),
            limit_reached: outcome.stop,
            manifest,
        };
        info!(
            total = report.stats.total_processed,
            valid = report.stats.valid_rows,
            dropped = report.stats.dropped_rows,
            shards = report.shards_written,
            failed_files = report.files_failed,
            "ingestion run complete"
        );
        Ok(report)
    }

    fn drive(
        &self,
        files: &[PathBuf],
        ledger: &mut CheckpointLedger,
        sink: &mut ShardedSink,
        gate: &mut SamplingGate,
        stats: &mut RunStats,
        outcome: &mut DriveOutcome,
    ) -> Result<()> {
        for file in files {
            if outcome.stop {
                break;
            }
            if self.config.resume && ledger.is_done(file) {
                debug!(file = %file.display(), "skipping checkpointed file");
                outcome.files_skipped += 1;
                continue;
            }
            match self.process_file(file, sink, gate, stats, &mut outcome.stop) {
                Ok(true) => ledger.mark_done(file)?,
                // Interrupted by the record limit: deliberately not marked
                // done, so a resumed run reprocesses it from the start.
                Ok(false) => {}
                Err(err) => {
                    warn!(file = %file.display(), error = %err, "skipping failed input file");
                    outcome.files_failed += 1;
                }
            }
        }
        Ok(())
    }

    /// Stream one file through gate, validator, and sink.
    ///
    /// Returns `Ok(true)` when every row was offered to the chain and
    /// `Ok(false)` when the global record limit cut the file short.
    fn process_file(
        &self,
        file: &Path,
        sink: &mut ShardedSink,
        gate: &mut SamplingGate,
        stats: &mut RunStats,
        stop: &mut bool,
    ) -> Result<bool> {
        debug!(file = %file.display(), "processing file");
        let stream = RowStream::open(file, &self.config.text_column)?;
        for row in stream {
            let record = row?;
            if !gate.admit() {
                stats.update(false);
                continue;
            }
            let valid = validate(&record, &self.config.validation);
            stats.update(valid);
            if valid {
                sink.write(&record)?;
                if gate.limit_reached(stats.valid_count()) {
                    info!(
                        limit = self.config.record_limit,
                        "record limit reached, stopping run"
                    );
                    *stop = true;
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

/// Convenience wrapper: build a pipeline from `config` and run it.
pub fn ingest(config: IngestConfig) -> Result<RunReport> {
    IngestPipeline::new(config)?.run()
}
