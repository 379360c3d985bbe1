//! Driver options passed through the dispatcher unchanged.

use serde::{Deserialize, Serialize};

/// Options for every driver. Each driver reads only its own section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    pub json: JsonOptions,
    pub image: ImageOptions,
}

/// JSON text layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    /// Single-line output; `indent` is ignored.
    pub compact: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            compact: false,
        }
    }
}

/// PNG zlib compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
}

/// PNG row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngFilter {
    None,
    Sub,
    Up,
    Avg,
    Paeth,
    #[default]
    Adaptive,
}

/// Image encoding and array normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    pub png_compression: PngCompression,
    pub png_filter: PngFilter,
    /// Value range of float arrays that maps onto 0..=255.
    pub domain: [f64; 2],
    /// Use each array's own min/max as its domain instead of `domain`.
    pub auto_domain: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            png_compression: PngCompression::Default,
            png_filter: PngFilter::Adaptive,
            domain: [0.0, 1.0],
            auto_domain: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = SaveOptions::default();
        assert_eq!(opts.json.indent, 2);
        assert!(!opts.json.compact);
        assert_eq!(opts.image.jpeg_quality, 90);
        assert_eq!(opts.image.domain, [0.0, 1.0]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml = r#"
            [image]
            jpeg_quality = 75
            png_compression = "best"
        "#;
        let opts: SaveOptions = toml::from_str(toml).unwrap();
        assert_eq!(opts.image.jpeg_quality, 75);
        assert_eq!(opts.image.png_compression, PngCompression::Best);
        assert_eq!(opts.image.png_filter, PngFilter::Adaptive);
        assert_eq!(opts.json, JsonOptions::default());
    }
}
