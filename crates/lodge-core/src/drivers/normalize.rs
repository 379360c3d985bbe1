//! Array → 8-bit pixel normalization for the image driver.

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

use crate::error::SaveError;
use crate::options::ImageOptions;
use crate::outcome::{SaveWarning, Warnings};
use crate::value::NdArray;

const EXPECTED_SHAPE: &str = "a 2-D array or a 3-D array with 1 to 4 channels";

/// Convert a numeric array into a displayable image.
///
/// Every unit axis is squeezed away first. Float arrays map `options.domain` (or their own min/max with
/// `auto_domain`) onto 0..=255; integer arrays are taken as pixel values.
/// Values outside the range are clipped with a `DomainClipped` warning.
pub fn normalize_array(
    array: &NdArray,
    options: &ImageOptions,
    warnings: &mut Warnings,
) -> Result<DynamicImage, SaveError> {
    let (height, width, channels) =
        image_dims(array.shape()).ok_or_else(|| shape_error(array, EXPECTED_SHAPE))?;

    let values = array.to_f64();
    if values.iter().any(|v| v.is_nan()) {
        return Err(shape_error(array, "an array without NaN values"));
    }
    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let is_float = array.element_type().is_float();
    let domain = if !is_float {
        (0.0, 255.0)
    } else if options.auto_domain && !values.is_empty() {
        (low, high)
    } else {
        (options.domain[0], options.domain[1])
    };
    if !values.is_empty() && (low < domain.0 || high > domain.1) {
        warnings.raise(SaveWarning::DomainClipped { low, high, domain });
    }

    let (offset, scale) = if is_float && domain.1 > domain.0 {
        (domain.0, 255.0 / (domain.1 - domain.0))
    } else if is_float {
        (domain.0, 1.0)
    } else {
        (0.0, 1.0)
    };
    let pixels: Vec<u8> = values
        .iter()
        .map(|&v| {
            let clipped = v.max(domain.0).min(domain.1);
            ((clipped - offset) * scale).max(0.0).min(255.0) as u8
        })
        .collect();

    let w = u32::try_from(width).map_err(|_| shape_error(array, "image dimensions within u32"))?;
    let h = u32::try_from(height).map_err(|_| shape_error(array, "image dimensions within u32"))?;
    let image = match channels {
        1 => GrayImage::from_raw(w, h, pixels).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(w, h, pixels).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgba8),
        _ => None,
    };
    image.ok_or_else(|| shape_error(array, EXPECTED_SHAPE))
}

/// (height, width, channels) after squeezing every unit axis.
///
/// The input must have at least two axes. Squeezing never leaves fewer than
/// two: missing leading axes come back as height 1, so `(1, 1)` is a single
/// gray pixel and `(1, 5)` a one-row image. Dropping unit axes keeps the
/// row-major element order, so the flat pixel data needs no reshuffling.
fn image_dims(shape: &[usize]) -> Option<(usize, usize, usize)> {
    if shape.len() < 2 {
        return None;
    }
    let mut dims: Vec<usize> = shape.iter().copied().filter(|&d| d != 1).collect();
    while dims.len() < 2 {
        dims.insert(0, 1);
    }
    match dims.as_slice() {
        [h, w] => Some((*h, *w, 1)),
        [h, w, c] if (2..=4).contains(c) => Some((*h, *w, *c)),
        _ => None,
    }
}

fn shape_error(array: &NdArray, expected: &'static str) -> SaveError {
    SaveError::UnsupportedValueType {
        driver: "image",
        expected,
        found: array.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3, Array4};

    fn normalize(array: NdArray) -> (DynamicImage, Warnings) {
        let mut warnings = Warnings::new();
        let img = normalize_array(&array, &ImageOptions::default(), &mut warnings).unwrap();
        (img, warnings)
    }

    #[test]
    fn float_gray_scales_unit_domain() {
        let (img, warnings) = normalize(NdArray::from(array![[0.0f64, 0.5], [1.0, 0.25]]));
        assert!(warnings.is_empty());
        let gray = img.as_luma8().unwrap();
        assert_eq!(gray.dimensions(), (2, 2));
        assert_eq!(gray.as_raw(), &vec![0, 127, 255, 63]);
    }

    #[test]
    fn out_of_domain_floats_are_clipped_with_warning() {
        let (img, warnings) = normalize(NdArray::from(array![[-1.0f32, 2.0]]));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings.as_slice()[0],
            SaveWarning::DomainClipped { low, high, .. } if low == -1.0 && high == 2.0
        ));
        assert_eq!(img.as_luma8().unwrap().as_raw(), &vec![0, 255]);
    }

    #[test]
    fn integer_arrays_are_pixel_values() {
        let (img, warnings) = normalize(NdArray::from(array![[0i32, 128, 300]]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(img.as_luma8().unwrap().as_raw(), &vec![0, 128, 255]);
    }

    #[test]
    fn auto_domain_uses_min_max() {
        let opts = ImageOptions {
            auto_domain: true,
            ..ImageOptions::default()
        };
        let mut warnings = Warnings::new();
        let img = normalize_array(
            &NdArray::from(array![[10.0f64, 20.0]]),
            &opts,
            &mut warnings,
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(img.as_luma8().unwrap().as_raw(), &vec![0, 255]);
    }

    #[test]
    fn channel_layouts() {
        let (rgb, _) = normalize(NdArray::from(Array3::<u8>::zeros((2, 3, 3))));
        assert!(matches!(rgb, DynamicImage::ImageRgb8(_)));
        assert_eq!((rgb.width(), rgb.height()), (3, 2));

        let (rgba, _) = normalize(NdArray::from(Array3::<f32>::zeros((4, 4, 4))));
        assert!(matches!(rgba, DynamicImage::ImageRgba8(_)));

        let (gray, _) = normalize(NdArray::from(Array4::<u8>::zeros((1, 5, 6, 1))));
        assert!(matches!(gray, DynamicImage::ImageLuma8(_)));
        assert_eq!((gray.width(), gray.height()), (6, 5));
    }

    #[test]
    fn squeezes_every_unit_axis() {
        let (batch, _) = normalize(NdArray::from(Array3::<f32>::zeros((1, 28, 28))));
        assert!(matches!(batch, DynamicImage::ImageLuma8(_)));
        assert_eq!((batch.width(), batch.height()), (28, 28));

        let (row, _) = normalize(NdArray::from(Array3::<f32>::zeros((1, 5, 3))));
        assert!(matches!(row, DynamicImage::ImageLuma8(_)));
        assert_eq!((row.width(), row.height()), (3, 5));

        let (tail, _) = normalize(NdArray::from(Array4::<u8>::zeros((6, 7, 1, 1))));
        assert!(matches!(tail, DynamicImage::ImageLuma8(_)));
        assert_eq!((tail.width(), tail.height()), (7, 6));
    }

    #[test]
    fn all_unit_shape_is_one_pixel() {
        let (pixel, _) = normalize(NdArray::from(Array3::<f64>::ones((1, 1, 1))));
        assert_eq!((pixel.width(), pixel.height()), (1, 1));
        assert_eq!(pixel.as_luma8().unwrap().as_raw(), &vec![255]);
    }

    #[test]
    fn squeezed_layout_keeps_pixel_order() {
        let array = ndarray::Array::from_shape_vec((1, 2, 3), vec![0u8, 1, 2, 3, 4, 5])
            .unwrap()
            .into_dyn();
        let (img, _) = normalize(NdArray::U8(array));
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.as_luma8().unwrap().as_raw(), &vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn rejects_bad_shapes_and_nan() {
        let mut warnings = Warnings::new();
        let opts = ImageOptions::default();
        let one_d = NdArray::from(array![1.0f64, 2.0]);
        assert!(normalize_array(&one_d, &opts, &mut warnings).is_err());
        let five_channels = NdArray::from(Array3::<u8>::zeros((2, 2, 5)));
        assert!(normalize_array(&five_channels, &opts, &mut warnings).is_err());
        let nan = NdArray::from(array![[f64::NAN, 0.0]]);
        assert!(normalize_array(&nan, &opts, &mut warnings).is_err());
    }
}
