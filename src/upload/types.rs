//! Upload validation types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Which rule set an upload is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Cover art and other pictures
    Image,
    /// PDF and plain-text documents
    Document,
}

/// An upload as received from the client
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Client-supplied filename
    pub name: String,
    /// Declared MIME type, absent when the client sent none
    pub mime_type: Option<String>,
    /// Declared size in bytes
    pub size: u64,
    /// Payload content
    pub bytes: Bytes,
    /// Client-reported modification time in unix milliseconds
    pub last_modified: Option<i64>,
}

impl FileUpload {
    /// Build an upload whose declared size matches the payload
    pub fn new<N: Into<String>, M: Into<String>>(name: N, mime_type: M, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: Some(mime_type.into()),
            size: bytes.len() as u64,
            bytes,
            last_modified: None,
        }
    }
}

/// Descriptive snapshot of an accepted upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Original client-supplied filename
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Declared MIME type, lowercased
    pub mime_type: String,
    /// Client-reported modification time in unix milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

/// Outcome of running an upload through every validation stage
///
/// All stages run even after one fails, so the report carries the complete
/// list of problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValidationReport {
    /// Whether every stage passed
    pub is_valid: bool,
    /// Failed checks, in stage order
    pub errors: Vec<String>,
    /// Collision-resistant storage name, present only when valid
    pub sanitized_file_name: Option<String>,
    /// Snapshot of the accepted file, present only when valid
    pub file_info: Option<FileInfo>,
}
