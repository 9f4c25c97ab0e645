//! Upload pipeline integration tests
//!
//! Walks a file from client submission through validation, descriptor
//! generation, the media transport, and response vetting.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use storeguard::clock::ManualClock;
    use storeguard::config::UploadSettings;
    use storeguard::upload::{FileKind, FileUpload, FileValidator, MediaTransport};

    use crate::common::assertions::assert_rejected_with;
    use crate::common::fixtures::{png_bytes, png_upload, trusted_response};
    use crate::common::{StubTransport, TEST_NOW_MS};

    fn validator() -> FileValidator {
        FileValidator::with_clock(
            UploadSettings::default(),
            Arc::new(ManualClock::new(TEST_NOW_MS)),
        )
    }

    // ==================== Happy Path Tests ====================

    #[tokio::test]
    async fn test_clean_image_flows_to_the_transport() {
        let validator = validator();
        let upload = png_upload("book cover.png", 800, 600);

        let report = validator.validate(&upload, FileKind::Image);
        assert!(report.is_valid, "unexpected errors: {:?}", report.errors);
        assert_eq!(
            report.sanitized_file_name.as_deref(),
            Some(format!("book_cover_{TEST_NOW_MS}.png").as_str())
        );

        let params = validator.secure_upload_params(&upload.name);
        assert_eq!(
            params.public_id,
            format!("bookstore/uploads/book_cover_{TEST_NOW_MS}")
        );
        assert_eq!(params.folder, "bookstore/uploads");
        assert_eq!(params.timestamp, TEST_NOW_MS / 1000);

        let transport = StubTransport::returning(trusted_response(&params.public_id));
        let response = transport.upload(&params, upload.bytes.clone()).await.unwrap();

        let check = validator.validate_service_response(&response);
        assert!(check.is_valid, "unexpected errors: {:?}", check.errors);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].public_id, params.public_id);
    }

    #[tokio::test]
    async fn test_pdf_document_flow() {
        let validator = validator();
        let mut bytes = b"%PDF-1.7\n".to_vec();
        bytes.extend_from_slice(&[0u8; 128]);
        let upload = FileUpload::new("invoice 2024.pdf", "application/pdf", Bytes::from(bytes));

        let report = validator.validate(&upload, FileKind::Document);
        assert!(report.is_valid, "unexpected errors: {:?}", report.errors);
        assert_eq!(
            report.sanitized_file_name.as_deref(),
            Some(format!("invoice_2024_{TEST_NOW_MS}.pdf").as_str())
        );

        let info = report.file_info.unwrap();
        assert_eq!(info.name, "invoice 2024.pdf");
        assert_eq!(info.mime_type, "application/pdf");
    }

    // ==================== Hostile Upload Tests ====================

    #[tokio::test]
    async fn test_masquerading_executable_is_stopped() {
        let validator = validator();
        let mut bytes = vec![0x4D, 0x5A, 0x90, 0x00];
        bytes.extend_from_slice(&[0u8; 256]);
        let upload = FileUpload::new("cover.png", "image/png", Bytes::from(bytes));

        let report = validator.validate(&upload, FileKind::Image);
        assert_rejected_with(&report, "does not match the declared type");
        assert_rejected_with(&report, "dangerous content (windows_executable)");
        assert!(report.sanitized_file_name.is_none());
        assert!(report.file_info.is_none());
    }

    #[tokio::test]
    async fn test_polyglot_gif_with_php_payload_is_stopped() {
        let validator = validator();
        let mut bytes = b"GIF89a".to_vec();
        bytes.extend_from_slice(&[0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00]);
        bytes.extend_from_slice(b"<?php system($_GET[\"c\"]); ?>");
        let upload = FileUpload::new("pixel.gif", "image/gif", Bytes::from(bytes));

        let report = validator.validate(&upload, FileKind::Image);
        assert_rejected_with(&report, "dangerous content (php_source)");
    }

    #[tokio::test]
    async fn test_declared_size_is_honored_without_reading_payload() {
        let validator = validator();
        let upload = FileUpload {
            name: "huge.png".to_string(),
            mime_type: Some("image/png".to_string()),
            size: 50 * 1024 * 1024,
            bytes: Bytes::from(png_bytes(10, 10)),
            last_modified: None,
        };

        let report = validator.validate(&upload, FileKind::Image);
        assert_rejected_with(&report, "exceeds the maximum size");
    }

    // ==================== Response Vetting Tests ====================

    #[test]
    fn test_untrusted_responses_are_refused() {
        let validator = validator();

        let mut plain_http = trusted_response("bookstore/uploads/cover");
        plain_http.secure_url = plain_http.secure_url.replace("https://", "http://");
        let check = validator.validate_service_response(&plain_http);
        assert!(!check.is_valid);
        assert!(check.errors.iter().any(|error| error.contains("https")));

        let mut wrong_host = trusted_response("bookstore/uploads/cover");
        wrong_host.secure_url =
            "https://evil.example/image/upload/v1/bookstore/uploads/cover.png".to_string();
        let check = validator.validate_service_response(&wrong_host);
        assert!(!check.is_valid);
        assert!(check
            .errors
            .iter()
            .any(|error| error.contains("trusted media host")));

        let mut fetch_path = trusted_response("bookstore/uploads/cover");
        fetch_path.secure_url =
            "https://media.bookstore.example/image/fetch/https://evil.example/x.png".to_string();
        let check = validator.validate_service_response(&fetch_path);
        assert!(!check.is_valid);
        assert!(check
            .errors
            .iter()
            .any(|error| error.contains("remote fetch")));

        let mut fetch_id = trusted_response("bookstore/uploads/cover");
        fetch_id.public_id = "fetch:https://evil.example/x".to_string();
        let check = validator.validate_service_response(&fetch_id);
        assert!(!check.is_valid);
        assert!(check
            .errors
            .iter()
            .any(|error| error.contains("remote fetch")));
    }
}
