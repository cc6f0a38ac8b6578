pub mod config;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod transcript;
pub mod types;

use std::path::Path;

pub use config::{TierRoles, TranscriptConfig};
pub use error::{AlignmentError, FormatError, ParseStep, PipelineError, TextGridError};
pub use grid::{parse_textgrid, read_textgrid, write_textgrid};
pub use pipeline::builder::EventPipelineBuilder;
pub use pipeline::runtime::EventPipeline;
pub use pipeline::traits::{LabelFilter, SentenceSegmenter};
pub use transcript::{align_transcript, select_tiers, SentenceSpan, StopLabels};
pub use types::{
    Dialect, Event, EventKind, EventTable, Interval, Point, TextGrid, Tier, TierType,
};

/// Reads a TextGrid and aligns it with the default transcript config.
pub fn parse_and_align(path: impl AsRef<Path>) -> Result<EventTable, PipelineError> {
    EventPipelineBuilder::default().build().parse_and_align(path)
}
