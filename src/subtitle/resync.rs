use super::document::SubtitleDocument;
use super::srt::TimingLine;
use super::timestamp::Timestamp;
use crate::error::{Result, SrtSyncError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::convert::Infallible;
use tracing::debug;

/// What to do when a shift pushes a timestamp below zero or past 99:59:59,999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftPolicy {
    /// Saturate at the range bounds.
    #[default]
    Clamp,
    /// Fail with `OutOfRange`.
    Reject,
}

impl std::fmt::Display for ShiftPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftPolicy::Clamp => write!(f, "clamp"),
            ShiftPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for ShiftPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(ShiftPolicy::Clamp),
            "reject" => Ok(ShiftPolicy::Reject),
            _ => Err(format!(
                "Unknown shift policy: {}. Use 'clamp' or 'reject'",
                s
            )),
        }
    }
}

/// Counters from one resynchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResyncStats {
    /// Lines in the document.
    pub lines: usize,
    /// Timing lines rewritten.
    pub timing_lines: usize,
    /// Timestamps that hit a range bound under `ShiftPolicy::Clamp`.
    pub clamped: usize,
}

/// Shift every timing line of `document` by `offset_ms`, clamping at the range bounds.
///
/// An empty document or a zero offset is returned as-is without copying.
/// Otherwise the result has the same number of lines, with every non-timing
/// line byte-identical to the input.
pub fn resynchronize(document: &SubtitleDocument, offset_ms: i64) -> Cow<'_, SubtitleDocument> {
    if document.is_empty() || offset_ms == 0 {
        return Cow::Borrowed(document);
    }

    match rewrite_lines(document, |ts| {
        Ok::<_, Infallible>(ts.saturating_shift(offset_ms))
    }) {
        Ok((lines, _)) => Cow::Owned(document.with_lines(lines)),
        Err(never) => match never {},
    }
}

/// Like [`resynchronize`], with an explicit out-of-range policy and statistics.
pub fn resynchronize_with(
    document: &SubtitleDocument,
    offset_ms: i64,
    policy: ShiftPolicy,
) -> Result<(Cow<'_, SubtitleDocument>, ResyncStats)> {
    let mut stats = ResyncStats {
        lines: document.line_count(),
        ..ResyncStats::default()
    };

    if document.is_empty() || offset_ms == 0 {
        debug!("Nothing to shift (lines: {}, offset: {}ms)", stats.lines, offset_ms);
        return Ok((Cow::Borrowed(document), stats));
    }

    let mut clamped = 0;
    let (lines, timing_lines) = rewrite_lines(document, |ts| match ts.checked_shift(offset_ms) {
        Some(shifted) => Ok(shifted),
        None => match policy {
            ShiftPolicy::Clamp => {
                clamped += 1;
                debug!("Clamping {} shifted by {}ms", ts, offset_ms);
                Ok(ts.saturating_shift(offset_ms))
            }
            ShiftPolicy::Reject => Err(SrtSyncError::OutOfRange {
                timestamp: ts.to_string(),
                offset: offset_ms,
            }),
        },
    })?;

    stats.timing_lines = timing_lines;
    stats.clamped = clamped;
    debug!(
        "Shifted {} timing lines across {} lines by {}ms",
        stats.timing_lines, stats.lines, offset_ms
    );

    Ok((Cow::Owned(document.with_lines(lines)), stats))
}

/// Rewrite each timing line through `shift`, copying every other line verbatim.
/// Returns the new lines and how many were timing lines.
fn rewrite_lines<E>(
    document: &SubtitleDocument,
    mut shift: impl FnMut(Timestamp) -> std::result::Result<Timestamp, E>,
) -> std::result::Result<(Vec<String>, usize), E> {
    let mut lines = Vec::with_capacity(document.line_count());
    let mut timing_lines = 0;

    for line in document.lines() {
        match TimingLine::parse(line) {
            Some(timing) => {
                lines.push(timing.try_map(&mut shift)?.to_string());
                timing_lines += 1;
            }
            None => lines.push(line.clone()),
        }
    }

    Ok((lines, timing_lines))
}
