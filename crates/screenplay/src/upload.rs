use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "txt", "docx", "fountain"];
pub const MAX_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Upload rejections are inline, dismissible messages, never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type \"{0}\" (accepted: pdf, txt, docx, fountain)")]
    UnsupportedType(String),
    #[error("file is {size} bytes, over the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
    #[error("file is empty")]
    Empty,
}

/// A validated script upload. Only the name and size matter here; the file
/// contents belong to the mocked parsing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptUpload {
    pub file_name: String,
    pub size_bytes: u64,
}

impl ScriptUpload {
    pub fn validate(file_name: &str, size_bytes: u64) -> Result<Self, UploadError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::UnsupportedType(extension));
        }
        if size_bytes == 0 {
            return Err(UploadError::Empty);
        }
        if size_bytes > MAX_SIZE_BYTES {
            return Err(UploadError::TooLarge {
                size: size_bytes,
                max: MAX_SIZE_BYTES,
            });
        }
        Ok(Self {
            file_name: file_name.to_string(),
            size_bytes,
        })
    }

    /// File name without its extension: the working title shown in the UI.
    pub fn stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name)
    }
}
