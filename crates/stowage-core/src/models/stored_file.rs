use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file_type::FileType;
use super::visibility::Visibility;

/// Metadata describing a file written by the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Extension as reported by the client.
    pub extension: String,
    /// Extension detected from content, falling back to the reported one.
    #[serde(rename = "_extension")]
    pub normalized_extension: String,
    /// Sanitized base name (without timestamp or extension).
    pub name: String,
    pub original_name: String,
    pub size: u64,
    pub mime_type: String,
    /// `WIDTHxHEIGHT` for decodable raster images.
    pub dimensions: Option<String>,
    pub path: String,
    pub url: String,
    pub user_id: i64,
    pub disk: String,
    pub visibility: Visibility,
    pub uuid: Uuid,
}

/// On-demand description of an already stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub path: String,
    pub url: String,
    pub visibility: Visibility,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: String,
    pub last_modified: String,
    pub name: String,
}
