//! Background floor-plan image attached to a floor.
//!
//! The core never decodes pixels. It keeps the encoded bytes (base64, so the
//! snapshot stays plain JSON), the natural size reported by the host, and
//! computes the fitted display size.

use crate::coords::fit_to_bounds;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Encoded image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/gif" => Some(ImageFormat::Gif),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A floor's background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub format: ImageFormat,
    /// Natural width in pixels.
    pub source_width: u32,
    /// Natural height in pixels.
    pub source_height: u32,
    pub data_base64: String,
}

impl BackgroundImage {
    /// Wrap encoded image bytes. Returns `None` if the format is not recognized.
    pub fn from_bytes(data: &[u8], source_width: u32, source_height: u32) -> Option<Self> {
        let format = ImageFormat::from_magic_bytes(data)?;
        Some(Self {
            format,
            source_width,
            source_height,
            data_base64: STANDARD.encode(data),
        })
    }

    pub fn data(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.data_base64).ok()
    }

    /// `data:` URL for hosts that display the image in a browser.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data_base64)
    }

    pub fn source_size(&self) -> Size {
        Size::new(f64::from(self.source_width), f64::from(self.source_height))
    }

    /// Display size when fitted into `max_width` x `max_height`.
    pub fn display_size(&self, max_width: f64, max_height: f64) -> Size {
        fit_to_bounds(self.source_size(), Size::new(max_width, max_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_magic_bytes(&PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a.."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBP"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"BM"), None);
    }

    #[test]
    fn test_mime_lookup() {
        assert_eq!(ImageFormat::from_mime_type("image/jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime_type("image/tiff"), None);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let image = BackgroundImage::from_bytes(&PNG_HEADER, 1000, 500).unwrap();
        assert_eq!(image.data().unwrap(), PNG_HEADER.to_vec());
        assert!(image.data_url().starts_with("data:image/png;base64,"));
        assert!(BackgroundImage::from_bytes(b"nope", 1, 1).is_none());
    }

    #[test]
    fn test_display_size() {
        let image = BackgroundImage::from_bytes(&PNG_HEADER, 1000, 500).unwrap();
        let size = image.display_size(800.0, 600.0);
        assert!((size.width - 800.0).abs() < 0.01);
        assert!((size.height - 400.0).abs() < 0.01);
    }
}
