use whatlang::{detect, Lang};

use crate::config::ValidationConfig;
use crate::data::Record;

/// Decide whether a record is clean enough to keep.
///
/// Pure and deterministic: the same record and config always produce the
/// same answer. Rules run in a fixed order and short-circuit on the first
/// failure:
///
/// 1. trimmed text must be non-empty,
/// 2. character length must reach `min_length`,
/// 3. the non-alphabetic character ratio must not exceed `max_symbol_ratio`,
/// 4. when language checking is on, detection must conclusively say English.
///
/// The language rule is fail-closed: an inconclusive detection rejects the
/// record, trading recall for corpus cleanliness.
pub fn validate(record: &Record, config: &ValidationConfig) -> bool {
    let text = record.text.trim();

    if text.is_empty() {
        return false;
    }

    let total_chars = text.chars().count();
    if total_chars < config.min_length {
        return false;
    }

    let alpha_chars = text.chars().filter(|ch| ch.is_alphabetic()).count();
    let non_alpha_ratio = 1.0 - (alpha_chars as f64 / total_chars as f64);
    if non_alpha_ratio > config.max_symbol_ratio {
        return false;
    }

    if config.check_language {
        return match detect(text) {
            Some(info) => info.lang() == Lang::Eng,
            None => false,
        };
    }

    true
}
