use serde::{Deserialize, Serialize};

/// One cleaned row of corpus text plus optional provenance.
///
/// Records are created at the stream boundary, immutable once yielded, and
/// consumed exactly once by the validate/write chain. The pipeline keeps no
/// record history, so identical rows in different files are not deduplicated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Trimmed text content. The only field downstream training consumes.
    pub text: String,
    /// Base name of the input file that produced this record (plain-text inputs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Raw delimited row this record was extracted from (CSV inputs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_row: Option<String>,
}

impl Record {
    /// Build a record holding bare text with no provenance.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
            original_row: None,
        }
    }

    /// Attach the producing file's name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the raw row representation this record came from.
    pub fn with_original_row(mut self, row: impl Into<String>) -> Self {
        self.original_row = Some(row.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_provenance_is_omitted_from_json() {
        let record = Record::from_text("hello");
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"text":"hello"}"#);
    }

    #[test]
    fn provenance_round_trips() {
        let record = Record::from_text("hello")
            .with_source("a.txt")
            .with_original_row("hello,1");
        let json = serde_json::to_string(&record).expect("serialize");
        let back: Record = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }
}
