//! Image Upload Module
//!
//! Validates images posted to the OCR endpoint before any decoding happens:
//! - the multipart field must be named `image`
//! - the file name must be present and carry an allowed extension
//! - the body must fit in [`MAX_UPLOAD_SIZE`]

pub mod types;

pub use types::*;
