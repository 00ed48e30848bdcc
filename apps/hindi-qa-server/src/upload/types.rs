//! Upload types for the OCR endpoint

use axum::body::Bytes;

// ============================================================================
// Constants
// ============================================================================

/// Maximum upload size: 16MB
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Extensions accepted by the OCR endpoint, matched case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

// ============================================================================
// Uploaded Image
// ============================================================================

/// Raw image bytes plus the file name the client declared
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedImage {
    /// Validate the declared file name and size.
    ///
    /// Content is not inspected here: an allowed name with undecodable bytes
    /// is accepted and reported later as an unreadable image.
    pub fn new(filename: Option<&str>, data: Bytes) -> Result<Self, UploadError> {
        // A part without a file name is a plain form value, not a file
        let filename = filename.ok_or(UploadError::NoImage)?.trim();
        if filename.is_empty() {
            return Err(UploadError::NoFileSelected);
        }

        if !is_allowed_file(filename) {
            return Err(UploadError::InvalidFormat);
        }

        if data.len() > MAX_UPLOAD_SIZE {
            return Err(UploadError::FileTooLarge {
                size: data.len(),
                max: MAX_UPLOAD_SIZE,
            });
        }

        Ok(Self {
            filename: filename.to_string(),
            data,
        })
    }
}

fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

/// Whether the file name ends in one of [`ALLOWED_EXTENSIONS`]
pub fn is_allowed_file(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

// ============================================================================
// Error Types
// ============================================================================

/// Upload error types. Display strings are returned verbatim to clients.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No image provided")]
    NoImage,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Invalid file format. Allowed formats are: {}", ALLOWED_EXTENSIONS.join(", "))]
    InvalidFormat,

    #[error("File too large: {size} bytes (max: {max})")]
    FileTooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        for name in ["scan.png", "SCAN.JPG", "a.b.jpeg", "x.tiff", "x.webp", "x.gif", "x.bmp"] {
            assert!(is_allowed_file(name), "{} should be allowed", name);
        }
        assert!(!is_allowed_file("notes.pdf"));
        assert!(!is_allowed_file("png"));
        assert!(!is_allowed_file("archive.png.zip"));
    }

    #[test]
    fn test_empty_filename_rejected() {
        let err = UploadedImage::new(Some(""), Bytes::from_static(b"x")).unwrap_err();
        assert!(matches!(err, UploadError::NoFileSelected));

        let err = UploadedImage::new(Some("  "), Bytes::from_static(b"x")).unwrap_err();
        assert!(matches!(err, UploadError::NoFileSelected));
    }

    #[test]
    fn test_missing_filename_is_no_image() {
        let err = UploadedImage::new(None, Bytes::from_static(b"x")).unwrap_err();
        assert!(matches!(err, UploadError::NoImage));
    }

    #[test]
    fn test_invalid_format_message() {
        let err = UploadedImage::new(Some("doc.txt"), Bytes::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file format. Allowed formats are: png, jpg, jpeg, gif, bmp, tiff, webp"
        );
    }

    #[test]
    fn test_empty_content_is_accepted() {
        let image = UploadedImage::new(Some("page.PNG"), Bytes::new()).unwrap();
        assert_eq!(image.filename, "page.PNG");
        assert!(image.data.is_empty());
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let data = Bytes::from(vec![0u8; MAX_UPLOAD_SIZE + 1]);
        let err = UploadedImage::new(Some("big.png"), data).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { .. }));
    }
}
