// SRT timestamp codec: HH:MM:SS,mmm <-> milliseconds
use crate::error::{Result, SrtSyncError};
use std::fmt;
use std::str::FromStr;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Length of the canonical `HH:MM:SS,mmm` form.
const TIMESTAMP_LEN: usize = 12;

/// A point on the subtitle timeline, stored as milliseconds since zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    /// Largest value that still renders with a two-digit hour field (99:59:59,999).
    pub const MAX: Timestamp = Timestamp(100 * MS_PER_HOUR - 1);

    pub const fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Shift by a signed offset, or `None` if the result falls outside `ZERO..=MAX`.
    pub fn checked_shift(self, offset_ms: i64) -> Option<Self> {
        let shifted = i128::from(self.0) + i128::from(offset_ms);
        if shifted < 0 || shifted > i128::from(Self::MAX.0) {
            return None;
        }
        u64::try_from(shifted).ok().map(Timestamp)
    }

    /// Shift by a signed offset, clamping the result to `ZERO..=MAX`.
    ///
    /// A parsed value above `MAX` (such as `99:99:99,999`) lands on `MAX` even
    /// under a positive offset, so the result always renders in `HH:MM:SS,mmm`.
    pub fn saturating_shift(self, offset_ms: i64) -> Self {
        let shifted = i128::from(self.0) + i128::from(offset_ms);
        let clamped = shifted.clamp(0, i128::from(Self::MAX.0));
        u64::try_from(clamped).map(Timestamp).unwrap_or(Self::MAX)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / MS_PER_HOUR;
        let minutes = (self.0 % MS_PER_HOUR) / MS_PER_MINUTE;
        let seconds = (self.0 % MS_PER_MINUTE) / MS_PER_SECOND;
        let millis = self.0 % MS_PER_SECOND;
        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl FromStr for Timestamp {
    type Err = SrtSyncError;

    /// Accepts exactly `HH:MM:SS,mmm` with ASCII digits. Minute and second fields
    /// above 59 are summed as-is, so `00:00:75,000` reads as 75 seconds.
    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == TIMESTAMP_LEN
            && bytes.iter().enumerate().all(|(i, b)| match i {
                2 | 5 => *b == b':',
                8 => *b == b',',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(SrtSyncError::MalformedTimestamp(s.to_string()));
        }

        let field = |range: std::ops::Range<usize>| -> u64 {
            bytes[range]
                .iter()
                .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
        };

        Ok(Timestamp(
            field(0..2) * MS_PER_HOUR
                + field(3..5) * MS_PER_MINUTE
                + field(6..8) * MS_PER_SECOND
                + field(9..12),
        ))
    }
}

/// Decode `HH:MM:SS,mmm` into milliseconds.
pub fn parse(text: &str) -> Result<u64> {
    text.parse::<Timestamp>().map(Timestamp::as_millis)
}

/// Encode milliseconds as `HH:MM:SS,mmm`.
pub fn format(ms: u64) -> String {
    Timestamp::from_millis(ms).to_string()
}

/// Shift a timestamp text by `offset_ms`, failing if the result leaves the valid range.
pub fn shift(text: &str, offset_ms: i64) -> Result<String> {
    let timestamp: Timestamp = text.parse()?;
    timestamp
        .checked_shift(offset_ms)
        .map(|shifted| shifted.to_string())
        .ok_or_else(|| SrtSyncError::OutOfRange {
            timestamp: text.to_string(),
            offset: offset_ms,
        })
}

/// Signed difference `minuend - subtrahend` in milliseconds, saturating at the
/// `i64` bounds.
pub fn difference(minuend: i64, subtrahend: i64) -> i64 {
    minuend.saturating_sub(subtrahend)
}

/// Signed difference between two timestamp texts in milliseconds.
pub fn difference_between(minuend: &str, subtrahend: &str) -> Result<i64> {
    let minuend = millis_as_i64(minuend.parse()?);
    let subtrahend = millis_as_i64(subtrahend.parse()?);
    Ok(difference(minuend, subtrahend))
}

fn millis_as_i64(timestamp: Timestamp) -> i64 {
    // Parsed timestamps never exceed 99:99:99,999.
    timestamp.as_millis() as i64
}

/// Parse a user-supplied offset.
///
/// Accepts an optionally signed millisecond count (`1500`, `-250`, `+60000`) or an
/// optionally signed timestamp (`-00:00:02,500`).
pub fn parse_offset(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(SrtSyncError::InvalidOffset(text.to_string()));
    }

    let magnitude = if rest.contains(':') {
        rest.parse::<Timestamp>()
            .map_err(|_| SrtSyncError::InvalidOffset(text.to_string()))?
            .as_millis()
    } else {
        rest.parse::<u64>()
            .map_err(|_| SrtSyncError::InvalidOffset(text.to_string()))?
    };

    let magnitude =
        i64::try_from(magnitude).map_err(|_| SrtSyncError::InvalidOffset(text.to_string()))?;
    Ok(if negative { -magnitude } else { magnitude })
}
