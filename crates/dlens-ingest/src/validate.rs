//! Upload-level file checks.
//!
//! These run before any CSV text is read so oversized or obviously wrong
//! files are rejected cheaply.  Parsing itself never enforces size limits.

use std::fmt;
use std::path::Path;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Rejection reasons for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// File name does not end in `.csv` (case-insensitive).
    NotCsv(String),
    /// File exists but has zero length.
    Empty,
    /// File exceeds [`MAX_UPLOAD_BYTES`].
    TooLarge { size: u64 },
    Io(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::NotCsv(name) => {
                write!(f, "'{name}' is not a csv file (.csv extension required)")
            }
            UploadError::Empty => write!(f, "file is empty"),
            UploadError::TooLarge { size } => write!(
                f,
                "file is {size} bytes, larger than the {MAX_UPLOAD_BYTES} byte limit"
            ),
            UploadError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}

/// Validate an upload candidate: `.csv` extension, non-empty, within the
/// size cap.  Does not read the file contents.
pub fn validate_upload(path: &Path) -> Result<(), UploadError> {
    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(UploadError::NotCsv(path.display().to_string()));
    }

    let meta = std::fs::metadata(path).map_err(|e| UploadError::Io(e.to_string()))?;
    let size = meta.len();
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size });
    }

    Ok(())
}
