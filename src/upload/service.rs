//! Media transport descriptors and response vetting
//!
//! The crate never talks to the media service itself; it builds the upload
//! descriptor the caller hands to its transport and vets what comes back
//! before the URL is stored or shown.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::validator::FileValidator;
use crate::error::Result;

/// Markers in a public id that request a remote fetch instead of a stored asset
const REMOTE_FETCH_MARKERS: &[&str] = &["fetch:", "url:", "http://", "https://"];

/// Upload descriptor handed to the media transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadParams {
    /// Target asset id, folder-prefixed
    pub public_id: String,
    /// Folder the asset is stored under
    pub folder: String,
    /// Unix seconds at which the descriptor was built
    pub timestamp: i64,
    /// Output formats the transport may produce
    pub allowed_formats: Vec<String>,
    /// Byte cap the transport must enforce
    pub max_bytes: u64,
}

/// Response shape returned by the media transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    /// Asset id the transport stored the upload under
    pub public_id: String,
    /// Delivery URL for the stored asset
    pub secure_url: String,
    /// Transport resource class, for example `image`
    pub resource_type: String,
    /// Output format the transport produced
    pub format: String,
}

/// Verdict on a media transport response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCheck {
    /// Whether the response may be stored and shown
    pub is_valid: bool,
    /// Failed checks
    pub errors: Vec<String>,
}

/// Media transport contract implemented by the host application
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Upload `bytes` as described by `params`
    async fn upload(&self, params: &UploadParams, bytes: Bytes) -> Result<MediaUploadResponse>;
}

impl FileValidator {
    /// Build the upload descriptor for a vetted file
    ///
    /// The public id reuses the sanitized stem, so the stored asset name
    /// carries no client-controlled characters.
    pub fn secure_upload_params(&self, file_name: &str) -> UploadParams {
        let sanitized = self.sanitize_name(file_name);
        let stem = sanitized
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&sanitized);
        let settings = self.settings();
        UploadParams {
            public_id: format!("{}/{stem}", settings.upload_folder),
            folder: settings.upload_folder.clone(),
            timestamp: self.now_ms() / 1000,
            allowed_formats: settings.allowed_output_formats.clone(),
            max_bytes: settings.max_upload_bytes,
        }
    }

    /// Vet a media transport response before its URL is stored
    pub fn validate_service_response(&self, response: &MediaUploadResponse) -> ResponseCheck {
        let mut errors = Vec::new();

        match Url::parse(&response.secure_url) {
            Ok(url) => {
                if url.scheme() != "https" {
                    errors.push("Delivery URL does not use https".to_string());
                }
                let trusted_host = self.settings().trusted_media_host.as_str();
                if url.host_str() != Some(trusted_host) {
                    errors.push(format!(
                        "Delivery URL host is not the trusted media host `{trusted_host}`"
                    ));
                }
                if url.path().contains("/fetch/") || url.path().contains("/url/") {
                    errors.push("Delivery URL requests a remote fetch".to_string());
                }
            }
            Err(_) => errors.push("Delivery URL could not be parsed".to_string()),
        }

        let public_id = response.public_id.to_ascii_lowercase();
        if REMOTE_FETCH_MARKERS
            .iter()
            .any(|marker| public_id.contains(marker))
        {
            errors.push("Asset id requests a remote fetch".to_string());
        }

        if !errors.is_empty() {
            warn!(
                public_id = %response.public_id,
                failures = errors.len(),
                "media transport response rejected"
            );
        }
        ResponseCheck {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
