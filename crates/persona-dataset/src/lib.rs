//! # Persona Dataset: transcript to SFT pairs
//!
//! Line-delimited transcript → utterances → instruction/response pairs for one
//! target speaker → Alpaca-style JSON dataset.

pub mod dataset;
pub mod error;
pub mod segment;
pub mod transcript;

pub use dataset::{build_dataset, render_dataset, to_records, write_dataset, DatasetSummary};
pub use error::{DatasetError, DatasetResult};
pub use segment::{extract_qa_pairs, segment_dialogue, SegmentStats, Segmentation};
pub use transcript::{
    load_transcript, parse_line, parse_transcript, read_transcript, MalformedLine, ParseReport,
    RecordError, Transcript,
};
