use crate::error::PipelineError;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageOutputFormat};
use std::fmt;
use std::io::Cursor;

const JPEG_QUALITY: u8 = 90;

/// What kind of upload the extraction pipeline is dealing with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    /// PNG or JPEG, sent inline to the model.
    RasterImage,
    /// PDF, uploaded to the provider and referenced by file id.
    Document,
    /// Anything else; carries the offending extension for diagnostics.
    Unsupported(String),
}

impl MediaKind {
    /// Classifies an upload by its filename extension, ignoring case.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.trim().to_ascii_lowercase();
        let extension = lower
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" => MediaKind::RasterImage,
            "pdf" => MediaKind::Document,
            _ => MediaKind::Unsupported(extension),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::RasterImage => write!(f, "image"),
            MediaKind::Document => write!(f, "pdf"),
            MediaKind::Unsupported(ext) if ext.is_empty() => write!(f, "unknown"),
            MediaKind::Unsupported(ext) => write!(f, ".{}", ext),
        }
    }
}

/// Decodes any supported raster image and re-encodes it as RGB JPEG.
pub fn normalize_image(bytes: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PipelineError::InvalidImage(e.to_string()))?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut encoded = Cursor::new(Vec::new());
    rgb.write_to(&mut encoded, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| PipelineError::InvalidImage(e.to_string()))?;

    Ok(encoded.into_inner())
}

/// Wraps JPEG bytes in a `data:` URI suitable for inline model attachments.
pub fn jpeg_data_uri(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 30, 30, 128]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .unwrap();
    buffer.into_inner()
}
