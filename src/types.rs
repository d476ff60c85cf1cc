/// Lowercase hex-encoded SHA-256 digest of a shard's bytes.
/// Example: `b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9`
pub type HexDigest = String;
/// Name of the column holding text content in delimited inputs.
/// Example: `text`
pub type ColumnName = String;
/// Zero-based index of an output shard within one run.
/// Example: `0` for `corpus-0000.jsonl`
pub type ShardIndex = u32;
/// File-name extension used for input filtering, including the leading dot.
/// Examples: `.csv`, `.txt`
pub type Extension = String;
