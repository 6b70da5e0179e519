//! File export: write the XML document to disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::PromptError;

/// Default filename when the caller does not pick one.
pub const DEFAULT_FILENAME: &str = "prompt.xml";

/// Write `xml` to `path` as UTF-8, creating parent directories.
///
/// Writes to a temp file in the same directory and renames it into place, so
/// a crash mid-write never leaves a truncated document behind.
pub fn write_xml_file(xml: &str, path: &Path) -> Result<(), PromptError> {
    let fail = |detail: String| PromptError::OutputWriteFailed {
        path: path.to_path_buf(),
        detail,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
        }
    }

    let tmp_path = path.with_extension("xml.tmp");
    (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(xml.as_bytes())?;
        f.sync_all()?;
        Ok(())
    })()
    .map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        fail(e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        fail(e.to_string())
    })?;

    info!(path = %path.display(), bytes = xml.len(), "wrote XML document");
    Ok(())
}
