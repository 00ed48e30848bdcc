//! Image Enhancement Module
//!
//! Decodes uploaded rasters and derives the variants the OCR engines consume:
//! grayscale, adaptive threshold, dilated ("enhanced") and a three-channel copy
//! of the dilated raster. Enhancement degrades to the original raster on failure.

mod enhance;
mod types;

pub use enhance::{decode, enhance, encode_png, try_enhance};
pub use types::{EnhanceError, ImageVariantSet, Variant};
