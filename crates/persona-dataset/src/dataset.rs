//! SFT dataset output: one JSON array of `{instruction, input, output}` records.

use crate::error::{DatasetError, DatasetResult};
use crate::segment::{segment_dialogue, SegmentStats};
use crate::transcript::{load_transcript, ParseReport};
use persona_core::{DatasetConfig, DatasetRecord, QaPair};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Indentation used for the dataset file.
const DATASET_INDENT: &[u8] = b"    ";

/// What a `build_dataset` run read and wrote.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_speaker: String,
    pub parse: ParseReport,
    pub segments: SegmentStats,
}

pub fn to_records(pairs: &[QaPair]) -> Vec<DatasetRecord> {
    pairs.iter().map(DatasetRecord::from).collect()
}

/// Serialize records as pretty JSON (4-space indent, non-ASCII kept as-is).
pub fn render_dataset(records: &[DatasetRecord]) -> DatasetResult<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(DATASET_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut ser)?;
    Ok(out)
}

/// Write `pairs` to `path`, creating parent directories. Returns the number of records.
pub fn write_dataset(path: &Path, pairs: &[QaPair]) -> DatasetResult<usize> {
    let records = to_records(pairs);
    let body = render_dataset(&records)?;

    let write_err = |source| DatasetError::WriteDataset {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, body).map_err(write_err)?;
    Ok(records.len())
}

/// Load the transcript, extract the target speaker's pairs, and write the dataset.
pub fn build_dataset(config: &DatasetConfig) -> DatasetResult<DatasetSummary> {
    info!(
        input = %config.input_path.display(),
        speaker = %config.target_speaker,
        "building persona dataset"
    );

    let transcript = load_transcript(&config.input_path)?;
    let segmentation = segment_dialogue(&transcript.utterances, &config.target_speaker);
    let written = write_dataset(&config.output_path, &segmentation.pairs)?;

    info!(
        output = %config.output_path.display(),
        pairs = written,
        utterances = transcript.report.utterances,
        malformed = transcript.report.malformed_count(),
        dropped = segmentation.stats.dropped,
        "dataset written"
    );

    Ok(DatasetSummary {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        target_speaker: config.target_speaker.clone(),
        parse: transcript.report,
        segments: segmentation.stats,
    })
}
