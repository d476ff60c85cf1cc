use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, info};

use crate::constants::shards::{EXT_GZIP, EXT_PLAIN, INDEX_WIDTH};
use crate::data::Record;
use crate::errors::Result;
use crate::types::ShardIndex;

/// Writes accepted records into size-bounded JSONL shards.
///
/// Shard files are named `{prefix}-{index:04}.jsonl`, with `.gz` appended
/// when compression is on. A shard holds at most `shard_size` records; when
/// full it is sealed and never reopened, and the next index is opened for
/// writing. Shard 0 opens lazily on the first write, so a run that accepts
/// nothing creates no output files.
pub struct ShardedSink {
    output_prefix: PathBuf,
    shard_size: usize,
    compress: bool,
    current: Option<OpenShard>,
    next_index: ShardIndex,
    sealed: usize,
    records_written: u64,
}

struct OpenShard {
    writer: ShardWriter,
    count: usize,
}

enum ShardWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl ShardWriter {
    fn write_line(&mut self, line: &[u8]) -> std::io::Result<()> {
        match self {
            ShardWriter::Plain(writer) => {
                writer.write_all(line)?;
                writer.write_all(b"\n")
            }
            ShardWriter::Gzip(writer) => {
                writer.write_all(line)?;
                writer.write_all(b"\n")
            }
        }
    }

    fn finish(self) -> std::io::Result<()> {
        match self {
            ShardWriter::Plain(mut writer) => writer.flush(),
            ShardWriter::Gzip(writer) => writer.finish()?.flush(),
        }
    }
}

impl ShardedSink {
    /// Create a sink writing shards at `output_prefix`, rotating every
    /// `shard_size` records.
    pub fn new(output_prefix: impl Into<PathBuf>, shard_size: usize, compress: bool) -> Self {
        Self {
            output_prefix: output_prefix.into(),
            shard_size: shard_size.max(1),
            compress,
            current: None,
            next_index: 0,
            sealed: 0,
            records_written: 0,
        }
    }

    /// Deterministic file name of the shard at `index`.
    pub fn shard_path(&self, index: ShardIndex) -> PathBuf {
        let ext = if self.compress { EXT_GZIP } else { EXT_PLAIN };
        PathBuf::from(format!(
            "{}-{:0width$}{}",
            self.output_prefix.display(),
            index,
            ext,
            width = INDEX_WIDTH
        ))
    }

    /// Append one record as a line of JSON to the open shard, rotating
    /// first when the shard is full.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        if self
            .current
            .as_ref()
            .map(|shard| shard.count >= self.shard_size)
            .unwrap_or(false)
        {
            self.seal_current()?;
        }
        if self.current.is_none() {
            self.open_next()?;
        }
        let shard = self.current.as_mut().expect("shard opened above");
        let line = serde_json::to_vec(record).map_err(std::io::Error::from)?;
        shard.writer.write_line(&line)?;
        shard.count += 1;
        self.records_written += 1;
        Ok(())
    }

    /// Flush and seal the open shard, if any.
    ///
    /// Idempotent: closing an already-closed sink is a no-op, so cleanup
    /// paths may call this unconditionally.
    pub fn close(&mut self) -> Result<()> {
        self.seal_current()
    }

    /// Number of shards sealed so far.
    pub fn shards_sealed(&self) -> usize {
        self.sealed
    }

    /// Total records written across all shards.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    fn open_next(&mut self) -> Result<()> {
        let path = self.shard_path(self.next_index);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        debug!(shard = %path.display(), "opening shard");
        let file = BufWriter::new(File::create(&path)?);
        let writer = if self.compress {
            ShardWriter::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            ShardWriter::Plain(file)
        };
        self.current = Some(OpenShard { writer, count: 0 });
        self.next_index += 1;
        Ok(())
    }

    fn seal_current(&mut self) -> Result<()> {
        if let Some(shard) = self.current.take() {
            let index = self.next_index - 1;
            let count = shard.count;
            shard.writer.finish()?;
            self.sealed += 1;
            info!(
                shard = %self.shard_path(index).display(),
                records = count,
                "sealed shard"
            );
        }
        Ok(())
    }
}
