//! Transcript reader: line-delimited records -> ordered utterances.
//!
//! Each line is `[tag] {"role": "...", "dialogue": "...", ...}`. The tag (a source
//! marker, chapter label, etc.) is ignored. Lines that do not hold a usable record are
//! skipped with a warning; only I/O failures on the file itself are fatal.

use crate::error::{DatasetError, DatasetResult};
use persona_core::Utterance;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Where a record normally starts on a tagged line.
pub const RECORD_MARKER: &str = r#"{"role":"#;

/// Why a single line could not be turned into an utterance.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("no record found")]
    NoRecord,

    #[error("line is not valid UTF-8")]
    NotUtf8,

    #[error("invalid record: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A skipped line, kept for the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub reason: String,
}

/// Counters for one pass over a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub total_lines: usize,
    pub blank_lines: usize,
    pub utterances: usize,
    pub malformed: Vec<MalformedLine>,
}

impl ParseReport {
    pub fn malformed_count(&self) -> usize {
        self.malformed.len()
    }
}

/// Parsed transcript: utterances in conversation order plus the parse report.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub utterances: Vec<Utterance>,
    pub report: ParseReport,
}

/// Byte offset where the record begins: the `{"role":` marker if present, else the first `{`.
pub fn record_start(line: &str) -> Option<usize> {
    line.find(RECORD_MARKER).or_else(|| line.find('{'))
}

/// Parse one line. `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Utterance>, RecordError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let start = record_start(line).ok_or(RecordError::NoRecord)?;
    let utterance = serde_json::from_str::<Utterance>(&line[start..])?;
    Ok(Some(utterance))
}

/// Read the whole input into memory and parse it line by line.
///
/// Malformed lines are logged and recorded in the report; they never abort the read.
pub fn read_transcript<R: Read>(mut reader: R) -> DatasetResult<Transcript> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    Ok(parse_transcript(&raw))
}

/// Parse an in-memory transcript.
pub fn parse_transcript(raw: &[u8]) -> Transcript {
    let mut transcript = Transcript::default();
    if raw.is_empty() {
        return transcript;
    }

    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    for (idx, bytes) in raw.split(|b| *b == b'\n').enumerate() {
        let line_no = idx + 1;
        transcript.report.total_lines += 1;

        let parsed = std::str::from_utf8(bytes)
            .map_err(|_| RecordError::NotUtf8)
            .and_then(parse_line);

        match parsed {
            Ok(Some(utterance)) => {
                transcript.report.utterances += 1;
                transcript.utterances.push(utterance);
            }
            Ok(None) => transcript.report.blank_lines += 1,
            Err(e) => {
                let preview = String::from_utf8_lossy(bytes);
                warn!(line = line_no, error = %e, "skipping malformed transcript line: {}", preview.trim());
                transcript.report.malformed.push(MalformedLine {
                    line: line_no,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        lines = transcript.report.total_lines,
        utterances = transcript.report.utterances,
        malformed = transcript.report.malformed_count(),
        "transcript parsed"
    );
    transcript
}

/// Open and parse the transcript at `path`. A missing or unreadable file is fatal.
pub fn load_transcript(path: &Path) -> DatasetResult<Transcript> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::ReadTranscript {
        path: path.to_path_buf(),
        source,
    })?;
    read_transcript(std::io::BufReader::new(file)).map_err(|e| match e {
        DatasetError::Io(source) => DatasetError::ReadTranscript {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
