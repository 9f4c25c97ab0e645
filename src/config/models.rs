//! Configuration data models
//!
//! Settings for all four filters, deserializable from YAML or JSON. Every
//! field has a default so partial documents load cleanly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the defense pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    /// Rate limiter and abuse detector settings
    pub rate_limit: RateLimitSettings,
    /// File upload validator settings
    pub upload: UploadSettings,
    /// Input validator settings
    pub input: InputSettings,
    /// Retry engine settings
    pub retry: RetrySettings,
}

/// Request budget for one action inside one window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLimit {
    /// Requests allowed inside one window
    pub requests: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl ActionLimit {
    /// Build a budget of `requests` per `window_ms`
    pub const fn new(requests: u32, window_ms: u64) -> Self {
        Self {
            requests,
            window_ms,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Per-action budgets; actions not listed fall back to `default_limit`
    #[serde(default = "default_action_limits")]
    pub actions: HashMap<String, ActionLimit>,
    /// Budget applied to actions without an entry in `actions`
    #[serde(default = "default_fallback_limit")]
    pub default_limit: ActionLimit,
    /// Counters whose window expired longer ago than this are purged
    #[serde(default = "default_cleanup_max_age_ms")]
    pub cleanup_max_age_ms: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            actions: default_action_limits(),
            default_limit: default_fallback_limit(),
            cleanup_max_age_ms: default_cleanup_max_age_ms(),
        }
    }
}

/// Allow-lists and size cap for one kind of uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeRules {
    /// Largest accepted payload in bytes
    pub max_size: u64,
    /// Accepted declared MIME types
    pub allowed_mime_types: Vec<String>,
    /// Accepted filename extensions, lowercase without the dot
    pub allowed_extensions: Vec<String>,
}

/// File upload validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Rules applied to image uploads
    #[serde(default = "default_image_rules")]
    pub image: FileTypeRules,
    /// Rules applied to document uploads
    #[serde(default = "default_document_rules")]
    pub document: FileTypeRules,
    /// Largest accepted image side in pixels
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
    /// Host that media transport result URLs must resolve to
    #[serde(default = "default_trusted_media_host")]
    pub trusted_media_host: String,
    /// Folder prefix stamped into generated upload descriptors
    #[serde(default = "default_upload_folder")]
    pub upload_folder: String,
    /// Output formats the media transport may produce
    #[serde(default = "default_output_formats")]
    pub allowed_output_formats: Vec<String>,
    /// Byte cap passed to the media transport
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            image: default_image_rules(),
            document: default_document_rules(),
            max_image_dimension: default_max_image_dimension(),
            trusted_media_host: default_trusted_media_host(),
            upload_folder: default_upload_folder(),
            allowed_output_formats: default_output_formats(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Input validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    /// Minimum length for free-text fields
    #[serde(default = "default_text_min_len")]
    pub text_min_len: usize,
    /// Maximum length for free-text fields
    #[serde(default = "default_text_max_len")]
    pub text_max_len: usize,
    /// Hosts that user-supplied resource URLs may point at
    #[serde(default = "default_trusted_resource_hosts")]
    pub trusted_resource_hosts: Vec<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            text_min_len: default_text_min_len(),
            text_max_len: default_text_max_len(),
            trusted_resource_hosts: default_trusted_resource_hosts(),
        }
    }
}

/// Retry engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries allowed beyond the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each retry
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Whether delays are jittered to spread out retry storms
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

fn default_action_limits() -> HashMap<String, ActionLimit> {
    let mut actions = HashMap::new();
    actions.insert("login".to_string(), ActionLimit::new(5, 15 * 60 * 1000));
    actions.insert("signup".to_string(), ActionLimit::new(3, 60 * 60 * 1000));
    actions.insert("createOrder".to_string(), ActionLimit::new(10, 60 * 1000));
    actions.insert("uploadFile".to_string(), ActionLimit::new(20, 60 * 60 * 1000));
    actions.insert("search".to_string(), ActionLimit::new(120, 60 * 1000));
    actions.insert("api".to_string(), ActionLimit::new(60, 60 * 1000));
    actions
}

fn default_fallback_limit() -> ActionLimit {
    ActionLimit::new(60, 60 * 1000)
}

fn default_cleanup_max_age_ms() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_image_rules() -> FileTypeRules {
    FileTypeRules {
        max_size: 10 * 1024 * 1024,
        allowed_mime_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/gif".to_string(),
            "image/webp".to_string(),
        ],
        allowed_extensions: vec![
            "jpg".to_string(),
            "jpeg".to_string(),
            "png".to_string(),
            "gif".to_string(),
            "webp".to_string(),
        ],
    }
}

fn default_document_rules() -> FileTypeRules {
    FileTypeRules {
        max_size: 5 * 1024 * 1024,
        allowed_mime_types: vec!["application/pdf".to_string(), "text/plain".to_string()],
        allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
    }
}

fn default_max_image_dimension() -> u32 {
    8000
}

fn default_trusted_media_host() -> String {
    "media.bookstore.example".to_string()
}

fn default_upload_folder() -> String {
    "bookstore/uploads".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["jpg".to_string(), "png".to_string(), "webp".to_string()]
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_text_min_len() -> usize {
    1
}

fn default_text_max_len() -> usize {
    2000
}

fn default_trusted_resource_hosts() -> Vec<String> {
    vec!["books.bookstore.example".to_string()]
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    300
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}
