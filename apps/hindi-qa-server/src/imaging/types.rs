//! Image variant types

use std::collections::BTreeMap;

use image::DynamicImage;

/// Named raster derived from the upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    Original,
    Grayscale,
    Threshold,
    Enhanced,
    ColorEnhanced,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Grayscale => "grayscale",
            Self::Threshold => "threshold",
            Self::Enhanced => "enhanced",
            Self::ColorEnhanced => "color_enhanced",
        }
    }
}

/// Request-scoped set of rasters keyed by variant.
///
/// Always holds [`Variant::Original`].
#[derive(Debug, Clone)]
pub struct ImageVariantSet {
    variants: BTreeMap<Variant, DynamicImage>,
}

impl ImageVariantSet {
    /// A set holding only the untouched original
    pub fn original_only(original: DynamicImage) -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(Variant::Original, original);
        Self { variants }
    }

    pub(crate) fn insert(&mut self, variant: Variant, image: DynamicImage) {
        self.variants.insert(variant, image);
    }

    pub fn get(&self, variant: Variant) -> Option<&DynamicImage> {
        self.variants.get(&variant)
    }

    pub fn original(&self) -> &DynamicImage {
        // Every constructor inserts the original
        &self.variants[&Variant::Original]
    }

    /// The dilated raster, or the original when enhancement was skipped
    pub fn enhanced_or_original(&self) -> &DynamicImage {
        self.get(Variant::Enhanced).unwrap_or_else(|| self.original())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.variants.keys().map(Variant::as_str).collect()
    }
}

/// Image enhancement errors
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("Failed to encode image: {0}")]
    Encode(String),
}
