pub mod document;
pub mod resync;
pub mod srt;
pub mod timestamp;

pub use document::{LineEnding, SubtitleDocument};
pub use resync::{resynchronize, resynchronize_with, ResyncStats, ShiftPolicy};
pub use srt::{is_timing_line, TimingLine, TIMING_SEPARATOR};
pub use timestamp::{difference, difference_between, parse_offset, Timestamp};
