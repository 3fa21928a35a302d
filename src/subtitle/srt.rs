// SRT timing line grammar
use super::timestamp::Timestamp;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Separator between the start and end timestamps of a timing line.
pub const TIMING_SEPARATOR: &str = " --> ";

static TIMING_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3} --> [0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3}$")
        .expect("Invalid regex")
});

/// Whether `line` is exactly `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
///
/// The match is anchored and fixed-width: surrounding whitespace, missing zero
/// padding, or a different separator all make the line opaque content.
pub fn is_timing_line(line: &str) -> bool {
    TIMING_LINE_RE.is_match(line)
}

/// Start and end of a subtitle cue as written on its timing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingLine {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimingLine {
    /// Parse a timing line, or `None` if `line` is opaque content.
    pub fn parse(line: &str) -> Option<Self> {
        if !is_timing_line(line) {
            return None;
        }
        let (start, end) = line.split_once(TIMING_SEPARATOR)?;
        Some(TimingLine {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        })
    }

    /// Apply `f` to both timestamps.
    pub fn try_map<E>(
        self,
        mut f: impl FnMut(Timestamp) -> std::result::Result<Timestamp, E>,
    ) -> std::result::Result<Self, E> {
        Ok(TimingLine {
            start: f(self.start)?,
            end: f(self.end)?,
        })
    }
}

impl fmt::Display for TimingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, TIMING_SEPARATOR, self.end)
    }
}
