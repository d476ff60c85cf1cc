use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};

use crate::data::Record;
use crate::errors::{PipelineError, Result};
use crate::types::ColumnName;

const UTF8_BOM: char = '\u{feff}';

/// Lazy per-file record stream.
///
/// Delimited (`.csv`) inputs are parsed with a header row; the designated
/// text column must exist or opening fails with [`PipelineError::Schema`].
/// Every other input is read as plain text, one record per non-empty line.
/// Rows whose text is empty after trimming are skipped, not yielded.
pub struct RowStream {
    path: PathBuf,
    inner: StreamKind,
}

enum StreamKind {
    Delimited {
        rows: StringRecordsIntoIter<File>,
        column_index: usize,
    },
    Plain {
        lines: Lines<BufReader<File>>,
        source: String,
        first_line: bool,
    },
}

impl RowStream {
    /// Open `path` for streaming, resolving the text column for delimited
    /// inputs up front.
    pub fn open(path: &Path, text_column: &ColumnName) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let inner = if is_delimited(path) {
            let mut reader = ReaderBuilder::new()
                .from_path(path)
                .map_err(|err| stream_error(path, &err))?;
            let headers = reader
                .headers()
                .map_err(|err| stream_error(path, &err))?
                .clone();
            let column_index = headers
                .iter()
                .position(|header| header.trim_start_matches(UTF8_BOM) == text_column)
                .ok_or_else(|| PipelineError::Schema {
                    path: path.to_path_buf(),
                    column: text_column.clone(),
                    headers: headers.iter().map(String::from).collect(),
                })?;
            StreamKind::Delimited {
                rows: reader.into_records(),
                column_index,
            }
        } else {
            let file = File::open(path).map_err(|err| stream_error(path, &err))?;
            StreamKind::Plain {
                lines: BufReader::new(file).lines(),
                source: file_name(path),
                first_line: true,
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// The input file this stream reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for RowStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.inner {
                StreamKind::Delimited { rows, column_index } => {
                    let row = match rows.next()? {
                        Ok(row) => row,
                        Err(err) => return Some(Err(stream_error(&self.path, &err))),
                    };
                    let text = row.get(*column_index).unwrap_or("").trim();
                    if text.is_empty() {
                        continue;
                    }
                    let raw = row.iter().collect::<Vec<&str>>().join(",");
                    return Some(Ok(Record::from_text(text).with_original_row(raw)));
                }
                StreamKind::Plain {
                    lines,
                    source,
                    first_line,
                } => {
                    let line = match lines.next()? {
                        Ok(line) => line,
                        Err(err) => return Some(Err(stream_error(&self.path, &err))),
                    };
                    let line = if *first_line {
                        *first_line = false;
                        line.trim_start_matches(UTF8_BOM).to_string()
                    } else {
                        line
                    };
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    return Some(Ok(Record::from_text(text).with_source(source.clone())));
                }
            }
        }
    }
}

fn is_delimited(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn stream_error(path: &Path, err: &dyn std::fmt::Display) -> PipelineError {
    PipelineError::Stream {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn collect(stream: RowStream) -> Vec<Record> {
        stream.map(|row| row.expect("stream row")).collect()
    }

    #[test]
    fn missing_file_fails_with_not_found() {
        let err = RowStream::open(Path::new("/nonexistent/rows.csv"), &"text".to_string())
            .err()
            .expect("error");
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn csv_rows_are_trimmed_and_empty_rows_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.csv");
        fs::write(&path, "id,text\n1,  hello there \n2,\n3,world\n").expect("write");

        let records = collect(RowStream::open(&path, &"text".to_string()).expect("open"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "hello there");
        assert_eq!(records[0].original_row.as_deref(), Some("1,  hello there "));
        assert_eq!(records[1].text, "world");
    }

    #[test]
    fn missing_column_fails_with_schema_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rows.csv");
        fs::write(&path, "id,content\n1,hello\n").expect("write");

        let err = RowStream::open(&path, &"text".to_string())
            .err()
            .expect("error");
        match err {
            PipelineError::Schema {
                column, headers, ..
            } => {
                assert_eq!(column, "text");
                assert_eq!(headers, vec!["id".to_string(), "content".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_text_lines_become_records_with_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        fs::write(&path, "first line\n\n  second line  \n").expect("write");

        let records = collect(RowStream::open(&path, &"text".to_string()).expect("open"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "first line");
        assert_eq!(records[0].source.as_deref(), Some("notes.txt"));
        assert_eq!(records[1].text, "second line");
    }

    #[test]
    fn leading_bom_is_tolerated_in_plain_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bom.txt");
        fs::write(&path, "\u{feff}hello\n").expect("write");

        let records = collect(RowStream::open(&path, &"text".to_string()).expect("open"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "hello");
    }

    #[test]
    fn leading_bom_is_tolerated_in_csv_headers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}text\nhello\n").expect("write");

        let records = collect(RowStream::open(&path, &"text".to_string()).expect("open"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "hello");
    }

    #[test]
    fn invalid_utf8_surfaces_as_stream_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0xffu8, 0xfe, 0x0a]).expect("write");

        let mut stream = RowStream::open(&path, &"text".to_string()).expect("open");
        let first = stream.next().expect("one item");
        assert!(matches!(first, Err(PipelineError::Stream { .. })));
    }
}
