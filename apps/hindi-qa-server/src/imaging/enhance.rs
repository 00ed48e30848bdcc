//! Raster enhancement for Devanagari OCR
//!
//! Mirrors the classic OpenCV recipe: 5x5 Gaussian blur, adaptive Gaussian
//! threshold (block 11, C = 2), polarity fix, 2x2 dilation.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::{grayscale_dilate, Mask};

use super::types::{EnhanceError, ImageVariantSet, Variant};

/// Blur kernel size used for noise suppression
const BLUR_KERNEL: usize = 5;

/// Neighbourhood of the adaptive threshold
const THRESHOLD_BLOCK: usize = 11;

/// Offset subtracted from the local mean before comparing
const THRESHOLD_C: i16 = 2;

/// Mean below which the thresholded raster is inverted
const POLARITY_MIDPOINT: f64 = 127.0;

/// Decode uploaded bytes into an RGB raster
pub fn decode(data: &[u8]) -> Result<DynamicImage, EnhanceError> {
    let image = image::load_from_memory(data)?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Encode a raster as PNG for engines that take file bytes
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, EnhanceError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| EnhanceError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Derive every variant, falling back to the original alone on failure
pub fn enhance(original: DynamicImage) -> ImageVariantSet {
    match try_enhance(&original) {
        Ok(variants) => variants,
        Err(e) => {
            tracing::error!("Error enhancing image: {}", e);
            ImageVariantSet::original_only(original)
        }
    }
}

/// Derive every variant or report why enhancement is impossible
pub fn try_enhance(original: &DynamicImage) -> Result<ImageVariantSet, EnhanceError> {
    let (width, height) = (original.width(), original.height());
    if width == 0 || height == 0 {
        return Err(EnhanceError::EmptyRaster { width, height });
    }

    let gray = match original {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    };

    let blurred = separable_filter_equal(&gray, &gaussian_kernel(BLUR_KERNEL));

    let mut threshold = adaptive_gaussian_threshold(&blurred, THRESHOLD_BLOCK, THRESHOLD_C);
    if enforce_dark_on_light(&mut threshold) {
        tracing::debug!("Inverted thresholded image to dark-on-light polarity");
    }

    let dilated = dilate_2x2(&threshold);
    let color_enhanced = DynamicImage::ImageLuma8(dilated.clone()).into_rgb8();

    let mut variants = ImageVariantSet::original_only(original.clone());
    variants.insert(Variant::Grayscale, DynamicImage::ImageLuma8(gray));
    variants.insert(Variant::Threshold, DynamicImage::ImageLuma8(threshold));
    variants.insert(Variant::Enhanced, DynamicImage::ImageLuma8(dilated));
    variants.insert(Variant::ColorEnhanced, DynamicImage::ImageRgb8(color_enhanced));

    tracing::debug!(width, height, "Derived enhanced image variants");
    Ok(variants)
}

/// Gaussian kernel with OpenCV's automatic sigma for `ksize`.
///
/// Sizes 1, 3, 5 and 7 use the fixed binomial tables OpenCV substitutes
/// when no sigma is given.
fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    match ksize {
        1 => return vec![1.0],
        3 => return vec![0.25, 0.5, 0.25],
        5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => return vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {}
    }

    let sigma = 0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (ksize as f64 - 1.0) / 2.0;
    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - center;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Binary threshold against a Gaussian-weighted local mean
fn adaptive_gaussian_threshold(image: &GrayImage, block: usize, c: i16) -> GrayImage {
    let local_mean = separable_filter_equal(image, &gaussian_kernel(block));

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let src = image.get_pixel(x, y)[0] as i16;
        let mean = local_mean.get_pixel(x, y)[0] as i16;
        if src - mean > -c {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Invert a mostly-dark raster. Brightness only; text content is not inspected.
fn enforce_dark_on_light(image: &mut GrayImage) -> bool {
    if mean_intensity(image) < POLARITY_MIDPOINT {
        image::imageops::invert(image);
        true
    } else {
        false
    }
}

fn mean_intensity(image: &GrayImage) -> f64 {
    let pixels = image.as_raw();
    if pixels.is_empty() {
        return 0.0;
    }
    pixels.iter().map(|&p| p as u64).sum::<u64>() as f64 / pixels.len() as f64
}

/// One iteration of dilation with a 2x2 structuring element anchored at its
/// bottom-right cell. Pixels outside the raster are ignored.
fn dilate_2x2(image: &GrayImage) -> GrayImage {
    let mask = Mask::from_image(&GrayImage::from_pixel(2, 2, Luma([255])), 1, 1);
    grayscale_dilate(image, &mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Light page with a dark horizontal stroke
    fn page_with_stroke() -> DynamicImage {
        let img = RgbImage::from_fn(64, 32, |_, y| {
            if (14..18).contains(&y) {
                Rgb([20, 20, 20])
            } else {
                Rgb([230, 230, 230])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_gaussian_kernel_sums_to_one() {
        for ksize in [5, 11, 15] {
            let kernel = gaussian_kernel(ksize);
            assert_eq!(kernel.len(), ksize);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "ksize {} sums to {}", ksize, sum);
        }
    }

    #[test]
    fn test_all_variants_present() {
        let variants = enhance(page_with_stroke());
        assert_eq!(
            variants.names(),
            vec!["original", "grayscale", "threshold", "enhanced", "color_enhanced"]
        );

        let color = variants.get(Variant::ColorEnhanced).unwrap();
        assert!(matches!(color, DynamicImage::ImageRgb8(_)));
        let enhanced = variants.get(Variant::Enhanced).unwrap();
        assert!(matches!(enhanced, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_threshold_is_binary_and_light_background() {
        let variants = enhance(page_with_stroke());
        let threshold = variants.get(Variant::Threshold).unwrap().to_luma8();

        assert!(threshold.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(mean_intensity(&threshold) >= POLARITY_MIDPOINT);
    }

    #[test]
    fn test_dark_background_is_inverted() {
        let mut mostly_dark = GrayImage::from_pixel(8, 8, Luma([0]));
        mostly_dark.put_pixel(0, 0, Luma([255]));

        assert!(enforce_dark_on_light(&mut mostly_dark));
        assert_eq!(mostly_dark.get_pixel(0, 0)[0], 0);
        assert_eq!(mostly_dark.get_pixel(4, 4)[0], 255);

        let mut light = GrayImage::from_pixel(8, 8, Luma([255]));
        assert!(!enforce_dark_on_light(&mut light));
        assert_eq!(light.get_pixel(4, 4)[0], 255);
    }

    #[test]
    fn test_dilate_spreads_bright_pixels_down_and_right() {
        let mut image = GrayImage::new(4, 4);
        image.put_pixel(1, 1, Luma([255]));

        let dilated = dilate_2x2(&image);
        assert_eq!(dilated.get_pixel(1, 1)[0], 255);
        assert_eq!(dilated.get_pixel(2, 1)[0], 255);
        assert_eq!(dilated.get_pixel(1, 2)[0], 255);
        assert_eq!(dilated.get_pixel(2, 2)[0], 255);
        assert_eq!(dilated.get_pixel(0, 0)[0], 0);
        assert_eq!(dilated.get_pixel(3, 3)[0], 0);
    }

    #[test]
    fn test_dilate_does_not_wrap_at_edges() {
        let mut image = GrayImage::from_pixel(4, 4, Luma([0]));
        image.put_pixel(3, 3, Luma([200]));
        image.put_pixel(3, 0, Luma([90]));

        let dilated = dilate_2x2(&image);
        assert_eq!(dilated.get_pixel(3, 3)[0], 200);
        assert_eq!(dilated.get_pixel(3, 1)[0], 90);
        assert_eq!(dilated.get_pixel(0, 0)[0], 0);
        assert_eq!(dilated.get_pixel(0, 1)[0], 0);
        assert_eq!(dilated.get_pixel(2, 3)[0], 0);
        assert_eq!(dilated.iter().filter(|&&p| p > 0).count(), 3);
    }

    #[test]
    fn test_empty_raster_degrades_to_original() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(
            try_enhance(&empty),
            Err(EnhanceError::EmptyRaster { .. })
        ));

        let variants = enhance(empty);
        assert!(variants.get(Variant::Enhanced).is_none());
        assert_eq!(variants.names(), vec!["original"]);
        assert_eq!(variants.enhanced_or_original().width(), 0);
    }

    #[test]
    fn test_enhancement_is_deterministic() {
        let png = encode_png(&page_with_stroke()).unwrap();

        let first = enhance(decode(&png).unwrap());
        let second = enhance(decode(&png).unwrap());

        for variant in [
            Variant::Original,
            Variant::Grayscale,
            Variant::Threshold,
            Variant::Enhanced,
            Variant::ColorEnhanced,
        ] {
            assert_eq!(
                first.get(variant).unwrap().as_bytes(),
                second.get(variant).unwrap().as_bytes(),
                "variant {} differs",
                variant.as_str()
            );
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode(b""), Err(EnhanceError::Decode(_))));
        assert!(matches!(decode(b"not an image"), Err(EnhanceError::Decode(_))));
    }
}
