//! Image driver (PNG, JPEG, and any other codec the `image` crate enables).

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::io::Cursor;

use crate::error::SaveError;
use crate::extension::extension_token;
use crate::options::{ImageOptions, PngCompression, PngFilter, SaveOptions};
use crate::outcome::{Descriptor, SaveWarning, Warnings};
use crate::sink::Sink;
use crate::value::Value;

use super::normalize::normalize_array;
use super::{unsupported, FormatDriver};

/// Accepts a decoded image or a numeric array (normalized first). The codec
/// comes from the sink name's suffix, not from this driver.
pub struct ImageDriver;

impl FormatDriver for ImageDriver {
    fn name(&self) -> &'static str {
        "image"
    }

    fn save(
        &self,
        value: &Value,
        sink: &mut dyn Sink,
        options: &SaveOptions,
        warnings: &mut Warnings,
    ) -> Result<Descriptor, SaveError> {
        let image: Cow<'_, DynamicImage> = match value {
            Value::Image(image) => Cow::Borrowed(image),
            Value::Array(array) => Cow::Owned(normalize_array(array, &options.image, warnings)?),
            other => {
                return Err(unsupported(
                    self.name(),
                    "a numeric array or decoded image",
                    other,
                ))
            }
        };

        let extension = extension_token(sink.name()).unwrap_or_default();
        let format = ImageFormat::from_extension(extension.trim_start_matches('.'))
            .ok_or_else(|| SaveError::UnsupportedCodec {
                extension: extension.clone(),
            })?;

        let mut buf = Vec::new();
        let saved = encode(image, format, &options.image, &mut buf, warnings)?;
        sink.write_all(&buf)?;

        let shape = vec![
            saved.width() as usize,
            saved.height() as usize,
            usize::from(saved.color().channel_count()),
        ];
        Ok(Descriptor::new(self.name(), sink.name()).with_shape(shape))
    }
}

/// Encode into `buf`, returning the image actually encoded.
fn encode<'a>(
    image: Cow<'a, DynamicImage>,
    format: ImageFormat,
    options: &ImageOptions,
    buf: &mut Vec<u8>,
    warnings: &mut Warnings,
) -> Result<Cow<'a, DynamicImage>, SaveError> {
    match format {
        ImageFormat::Jpeg => {
            let image = jpeg_compatible(image, warnings);
            let encoder = JpegEncoder::new_with_quality(&mut *buf, options.jpeg_quality.clamp(1, 100));
            image.write_with_encoder(encoder)?;
            Ok(image)
        }
        ImageFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut *buf,
                png_compression(options.png_compression),
                png_filter(options.png_filter),
            );
            image.write_with_encoder(encoder)?;
            Ok(image)
        }
        other => {
            image.write_to(&mut Cursor::new(&mut *buf), other)?;
            Ok(image)
        }
    }
}

/// JPEG stores 8-bit gray or RGB only; anything else is converted.
fn jpeg_compatible<'a>(image: Cow<'a, DynamicImage>, warnings: &mut Warnings) -> Cow<'a, DynamicImage> {
    let color = image.color();
    match color {
        ColorType::L8 | ColorType::Rgb8 => image,
        _ if !color.has_color() && !color.has_alpha() => {
            warnings.raise(SaveWarning::ColorConverted {
                from: color_name(color),
                to: "l8",
            });
            Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
        }
        _ => {
            warnings.raise(SaveWarning::ColorConverted {
                from: color_name(color),
                to: "rgb8",
            });
            Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
        }
    }
}

fn color_name(color: ColorType) -> String {
    format!("{:?}", color).to_lowercase()
}

fn png_compression(c: PngCompression) -> CompressionType {
    match c {
        PngCompression::Default => CompressionType::Default,
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Best => CompressionType::Best,
    }
}

fn png_filter(f: PngFilter) -> FilterType {
    match f {
        PngFilter::None => FilterType::NoFilter,
        PngFilter::Sub => FilterType::Sub,
        PngFilter::Up => FilterType::Up,
        PngFilter::Avg => FilterType::Avg,
        PngFilter::Paeth => FilterType::Paeth,
        PngFilter::Adaptive => FilterType::Adaptive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use ndarray::Array3;

    fn save(value: &Value, name: &str) -> Result<(MemorySink, Descriptor, Warnings), SaveError> {
        let mut sink = MemorySink::new(name);
        let mut warnings = Warnings::new();
        let d = ImageDriver.save(value, &mut sink, &SaveOptions::default(), &mut warnings)?;
        Ok((sink, d, warnings))
    }

    #[test]
    fn array_to_png() {
        let value = Value::array(Array3::<f64>::ones((2, 3, 3)));
        let (sink, d, warnings) = save(&value, "out.png").unwrap();
        assert!(warnings.is_empty());
        assert_eq!(d.kind, "image");
        assert_eq!(d.shape, Some(vec![3, 2, 3]));

        let decoded = image::load_from_memory(sink.contents()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(decoded.to_rgb8().get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn decoded_image_to_jpeg() {
        let value = Value::Image(DynamicImage::new_rgb8(8, 4));
        let (sink, d, warnings) = save(&value, "photo.JPG").unwrap();
        assert!(warnings.is_empty());
        assert_eq!(d.shape, Some(vec![8, 4, 3]));
        assert_eq!(
            image::guess_format(sink.contents()).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn rgba_to_jpeg_drops_alpha_with_warning() {
        let value = Value::array(Array3::<u8>::zeros((4, 4, 4)));
        let (_, d, warnings) = save(&value, "x.jpeg").unwrap();
        assert_eq!(d.shape, Some(vec![4, 4, 3]));
        assert_eq!(
            warnings.as_slice(),
            &[SaveWarning::ColorConverted {
                from: "rgba8".to_string(),
                to: "rgb8"
            }]
        );
    }

    #[test]
    fn deep_gray_to_jpeg_converts_to_l8() {
        let value = Value::Image(DynamicImage::new_luma16(3, 2));
        let (sink, d, warnings) = save(&value, "depth.jpg").unwrap();
        assert_eq!(d.shape, Some(vec![3, 2, 1]));
        assert_eq!(
            warnings.as_slice(),
            &[SaveWarning::ColorConverted {
                from: "l16".to_string(),
                to: "l8"
            }]
        );
        let decoded = image::load_from_memory(sink.contents()).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn rejects_non_image_values() {
        let err = save(&Value::Str("nope".into()), "x.png").unwrap_err();
        assert!(matches!(
            err,
            SaveError::UnsupportedValueType { driver: "image", .. }
        ));
    }

    #[test]
    fn unknown_codec_suffix() {
        let value = Value::Image(DynamicImage::new_rgb8(1, 1));
        let err = save(&value, "x.notanimage").unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedCodec { .. }));
    }
}
