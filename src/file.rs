use std::ffi::OsStr;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::TextEncoding;
use crate::error::{Result, SrtSyncError};
use crate::subtitle::SubtitleDocument;

/// Read a file and decode it as `encoding`.
///
/// Bytes that are not valid in the encoding are an error rather than being
/// replaced, so a wrong guess never silently corrupts the subtitle text.
pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SrtSyncError::NotFound(path.display().to_string()),
        _ => SrtSyncError::Io(e),
    })?;
    debug!("Read {} bytes from {:?}", bytes.len(), path);

    decode(&bytes, encoding).ok_or_else(|| {
        SrtSyncError::Encoding(format!(
            "{} is not valid {} text",
            path.display(),
            encoding
        ))
    })
}

fn decode(bytes: &[u8], encoding: TextEncoding) -> Option<String> {
    encoding
        .encoding()
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn encode(text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
    if !encoding.is_writable() {
        return Err(SrtSyncError::Encoding(format!(
            "cannot write text as {}",
            encoding
        )));
    }

    let (bytes, _, had_errors) = encoding.encoding().encode(text);
    if had_errors {
        return Err(SrtSyncError::Encoding(format!(
            "text contains characters that cannot be represented in {}",
            encoding
        )));
    }
    Ok(bytes.into_owned())
}

/// Encode `text` and write it to `path`, replacing any existing file.
///
/// The bytes go to a temporary file next to `path` that is renamed into place
/// once fully written. On any failure the temporary file is removed and the
/// existing file, if any, is left as it was.
pub fn write_text(text: &str, encoding: TextEncoding, path: &Path) -> Result<()> {
    let bytes = encode(text, encoding)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.persist(path).map_err(|e| SrtSyncError::Io(e.error))?;

    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Read a subtitle file. The document is named after the file.
pub fn read_document(path: &Path, encoding: TextEncoding) -> Result<SubtitleDocument> {
    let text = read_text(path, encoding)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::config::DEFAULT_NAME.to_string());

    let document = SubtitleDocument::new(&text, name, encoding);
    info!(
        "Loaded {:?}: {} lines as {}",
        path,
        document.line_count(),
        encoding
    );
    Ok(document)
}

/// Work out which file a document saved to `path` lands in.
///
/// An existing file is overwritten. An existing directory, or a new path without
/// an `.srt` extension, is treated as a directory and receives `name`. A new
/// path ending in `.srt` is the file itself.
pub fn resolve_destination(path: &Path, name: &str) -> PathBuf {
    if path.is_file() {
        path.to_path_buf()
    } else if path.is_dir() || !has_srt_extension(path) {
        path.join(name)
    } else {
        path.to_path_buf()
    }
}

fn has_srt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("srt"))
}

/// A name is usable as a file name only if it is a single, normal path component.
fn validate_name(name: &str) -> Result<()> {
    let path = Path::new(name);
    if name.is_empty() || path.file_name() != Some(OsStr::new(name)) {
        return Err(SrtSyncError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Save a document under its own encoding and line ending. Returns the file written.
pub fn save_document(document: &SubtitleDocument, path: &Path) -> Result<PathBuf> {
    validate_name(document.name())?;

    let destination = resolve_destination(path, document.name());
    debug!("Resolved destination {:?} -> {:?}", path, destination);

    write_text(&document.to_text(), document.encoding(), &destination)?;
    info!(
        "Saved {} lines to {:?} as {}",
        document.line_count(),
        destination,
        document.encoding()
    );
    Ok(destination)
}
