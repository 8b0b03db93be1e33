// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Thumbnail pipeline.
//!
//! Uploads are validated by name, mime type and size before any decode is
//! attempted. Accepted images are resized so the longer side fits within
//! [`ThumbnailOptions::max_size`], flattened onto an opaque white backing,
//! and encoded as WebP when the build can write it, JPEG otherwise.

use std::io::Cursor;
use std::sync::OnceLock;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};

use crate::error::{Result, ValidationError};

/// Largest original accepted for thumbnailing (10 MB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Default cap on the longer side of a thumbnail, in pixels.
pub const DEFAULT_MAX_SIZE: u32 = 512;

/// Encoder quality factor (0.75) for lossy output.
pub const DEFAULT_QUALITY: u8 = 75;

const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const HEIF_MIME_TYPES: &[&str] = &["image/heic", "image/heif"];
const HEIF_EXTENSIONS: &[&str] = &["heic", "heif"];
const HEIF_BRANDS: &[&[u8; 4]] = &[b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis"];

/// Metadata describing an upload candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub name: String,
    /// Declared mime type; may be empty when unknown.
    pub mime: String,
    pub size: u64,
}

impl ImageSource {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        ImageSource {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    /// Builds a source whose mime type is guessed from the file extension.
    pub fn from_name(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let mime = match extension(&name).as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("heic") => "image/heic",
            Some("heif") => "image/heif",
            _ => "",
        };
        ImageSource::new(name, mime, size)
    }

    fn extension(&self) -> Option<String> {
        extension(&self.name)
    }
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// True if the source is a HEIC/HEIF image, judged by mime or extension.
pub fn is_heic(source: &ImageSource) -> bool {
    let mime = source.mime.to_ascii_lowercase();
    HEIF_MIME_TYPES.contains(&mime.as_str())
        || source.extension().is_some_and(|ext| HEIF_EXTENSIONS.contains(&ext.as_str()))
}

/// Checks an upload candidate without decoding it.
///
/// HEIC/HEIF is rejected first with its own message so the user learns how
/// to convert, rather than seeing a generic type rejection.
pub fn validate_image(source: &ImageSource) -> std::result::Result<(), ValidationError> {
    if is_heic(source) {
        return Err(ValidationError::HeicUnsupported);
    }

    let mime = source.mime.to_ascii_lowercase();
    let type_ok = ACCEPTED_MIME_TYPES.contains(&mime.as_str())
        || source.extension().is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
    if !type_ok {
        return Err(ValidationError::InvalidType);
    }

    if source.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: source.size,
            max_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
        });
    }

    Ok(())
}

/// True if the bytes start with an ISO-BMFF `ftyp` box carrying a HEIF brand.
pub fn sniff_heif(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    HEIF_BRANDS.iter().any(|brand| &bytes[8..12] == *brand)
}

/// Output format of a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbFormat {
    WebP,
    Jpeg,
}

impl ThumbFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ThumbFormat::WebP => "image/webp",
            ThumbFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ThumbFormat::WebP => "webp",
            ThumbFormat::Jpeg => "jpg",
        }
    }
}

/// Which output formats this build can write.
///
/// Detection encodes a 1x1 probe image. Use [`EncoderSupport::cached`] so the
/// probe runs once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSupport {
    pub webp: bool,
}

impl EncoderSupport {
    /// Probes the encoders.
    pub fn detect() -> Self {
        let probe = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])));
        let mut buf = Cursor::new(Vec::new());
        EncoderSupport {
            webp: probe.write_to(&mut buf, ImageFormat::WebP).is_ok(),
        }
    }

    /// Process-wide detection result.
    pub fn cached() -> Self {
        static SUPPORT: OnceLock<EncoderSupport> = OnceLock::new();
        *SUPPORT.get_or_init(EncoderSupport::detect)
    }

    /// Capabilities of a runtime without a WebP encoder.
    pub fn jpeg_only() -> Self {
        EncoderSupport { webp: false }
    }

    pub fn preferred(&self) -> ThumbFormat {
        if self.webp {
            ThumbFormat::WebP
        } else {
            ThumbFormat::Jpeg
        }
    }
}

/// Pipeline knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// Cap on the longer side, in pixels.
    pub max_size: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        ThumbnailOptions {
            max_size: DEFAULT_MAX_SIZE,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// An encoded thumbnail ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub format: ThumbFormat,
    pub width: u32,
    pub height: u32,
}

/// Scales `(width, height)` so the longer side is at most `max`.
///
/// Aspect ratio is preserved (rounded to the nearest pixel) and images
/// already within bounds are returned unchanged.
pub fn fit_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (f64::from(short) * f64::from(max) / f64::from(long)).round() as u32;
        scaled.max(1)
    };

    if width > height {
        if width > max {
            return (max, scale(height, width));
        }
    } else if height > max {
        return (scale(width, height), max);
    }
    (width, height)
}

/// Composites an RGBA image over opaque white.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    let blend = |c: u8, a: u8| -> u8 {
        let (c, a) = (u32::from(c), u32::from(a));
        ((c * a + 255 * (255 - a) + 127) / 255) as u8
    };
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        Rgb([blend(r, a), blend(g, a), blend(b, a)])
    })
}

/// Validates, decodes, resizes and encodes an upload.
pub fn create_thumbnail(
    bytes: &[u8],
    source: &ImageSource,
    options: &ThumbnailOptions,
    support: EncoderSupport,
) -> Result<Thumbnail> {
    validate_image(source)?;
    if sniff_heif(bytes) {
        return Err(ValidationError::HeicUnsupported.into());
    }

    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = fit_dimensions(decoded.width(), decoded.height(), options.max_size);
    let resized = if (width, height) == (decoded.width(), decoded.height()) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Lanczos3)
    };
    let flattened = flatten_onto_white(&resized.to_rgba8());

    let (bytes, format) = match support.preferred() {
        ThumbFormat::WebP => match encode_webp(&flattened) {
            Ok(bytes) => (bytes, ThumbFormat::WebP),
            Err(_) => (encode_jpeg(&flattened, options.quality)?, ThumbFormat::Jpeg),
        },
        ThumbFormat::Jpeg => (encode_jpeg(&flattened, options.quality)?, ThumbFormat::Jpeg),
    };

    Ok(Thumbnail {
        bytes,
        format,
        width,
        height,
    })
}

fn encode_webp(image: &RgbImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    // The bundled WebP encoder is lossless, so quality only affects JPEG.
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut buf, ImageFormat::WebP)?;
    Ok(buf.into_inner())
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(image)?;
    Ok(buf)
}

#[cfg(test)]
#[path = "thumb_tests.rs"]
mod tests;
