//! Factories for uploads, payloads, and collaborator doubles

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use storeguard::error::Result;
use storeguard::input::{CustomerDetails, OrderItem, OrderPayload};
use storeguard::upload::{FileUpload, MediaTransport, MediaUploadResponse, UploadParams};

/// Wall-clock anchor shared by tests that inject a manual clock
pub const TEST_NOW_MS: i64 = 1_700_000_000_000;

/// Minimal PNG header carrying the given dimensions
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

/// Well-formed PNG upload
pub fn png_upload(name: &str, width: u32, height: u32) -> FileUpload {
    FileUpload::new(name, "image/png", Bytes::from(png_bytes(width, height)))
}

/// Checkout payload that passes validation untouched
pub fn valid_order() -> OrderPayload {
    OrderPayload {
        customer: CustomerDetails {
            name: "Anna Reader".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            note: String::new(),
        },
        items: vec![OrderItem {
            id: "book-101".to_string(),
            title: "The Long Shelf".to_string(),
            quantity: 1,
            unit_price: 19.99,
        }],
    }
}

/// Delivery response the vetting checks accept
pub fn trusted_response(public_id: &str) -> MediaUploadResponse {
    MediaUploadResponse {
        public_id: public_id.to_string(),
        secure_url: format!("https://media.bookstore.example/image/upload/v1/{public_id}.png"),
        resource_type: "image".to_string(),
        format: "png".to_string(),
    }
}

/// Media transport double that records calls and returns a fixed response
pub struct StubTransport {
    response: MediaUploadResponse,
    calls: Mutex<Vec<UploadParams>>,
}

impl StubTransport {
    pub fn returning(response: MediaUploadResponse) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Descriptors this transport has been invoked with
    pub fn calls(&self) -> Vec<UploadParams> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MediaTransport for StubTransport {
    async fn upload(&self, params: &UploadParams, _bytes: Bytes) -> Result<MediaUploadResponse> {
        self.calls.lock().push(params.clone());
        Ok(self.response.clone())
    }
}
