use crate::config::{TextEncoding, DEFAULT_NAME};
use std::fmt;

/// Terminator that ended a line when the document was read, reused when it is
/// written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// A lone `\r`, as in classic Mac files.
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// An SRT file held as lines, with the name and encoding it will be saved under.
///
/// Documents are immutable values: transformations return new documents and
/// leave their input untouched. A document is empty when it has zero lines,
/// which is exactly what the empty text produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleDocument {
    lines: Vec<String>,
    /// Terminator of each line; `None` only for the last one.
    endings: Vec<Option<LineEnding>>,
    name: String,
    encoding: TextEncoding,
}

impl SubtitleDocument {
    /// Split `text` into lines at `\r\n`, `\n` or a lone `\r`, remembering each
    /// line's terminator. A trailing terminator yields a final empty line, so
    /// joining the lines again reproduces the text byte for byte.
    pub fn new(text: &str, name: impl Into<String>, encoding: TextEncoding) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        if !text.is_empty() {
            let mut rest = text;
            while let Some(pos) = rest.find(|c: char| c == '\r' || c == '\n') {
                let ending = if rest[pos..].starts_with("\r\n") {
                    LineEnding::CrLf
                } else if rest[pos..].starts_with('\r') {
                    LineEnding::Cr
                } else {
                    LineEnding::Lf
                };
                lines.push(rest[..pos].to_string());
                endings.push(Some(ending));
                rest = &rest[pos + ending.as_str().len()..];
            }
            lines.push(rest.to_string());
            endings.push(None);
        }

        Self {
            lines,
            endings,
            name: name.into(),
            encoding,
        }
    }

    /// Document with the default name and encoding.
    pub fn from_text(text: &str) -> Self {
        Self::new(text, DEFAULT_NAME, TextEncoding::default())
    }

    /// Document from already-split lines, joined with `\n`.
    pub fn from_lines<I, S>(lines: I, name: impl Into<String>, encoding: TextEncoding) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let endings = (0..lines.len())
            .map(|i| (i + 1 < lines.len()).then_some(LineEnding::Lf))
            .collect();

        Self {
            lines,
            endings,
            name: name.into(),
            encoding,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Terminator of each line, parallel to [`lines`](Self::lines).
    pub fn line_endings(&self) -> &[Option<LineEnding>] {
        &self.endings
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// New document with replaced line contents and this document's terminators
    /// and metadata. `lines` must correspond one to one with the current lines.
    pub(crate) fn with_lines(&self, lines: Vec<String>) -> Self {
        debug_assert_eq!(lines.len(), self.lines.len());
        Self {
            lines,
            endings: self.endings.clone(),
            name: self.name.clone(),
            encoding: self.encoding,
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (line, ending) in self.lines.iter().zip(&self.endings) {
            text.push_str(line);
            if let Some(ending) = ending {
                text.push_str(ending.as_str());
            }
        }
        text
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
