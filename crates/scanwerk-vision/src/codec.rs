// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec boundary: turns host-supplied image references into pixel grids and
// rectified output back into transportable bytes.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, RgbImage};
use scanwerk_core::error::{Result, ScanError};
use tracing::{debug, info, instrument};

use crate::rectify::encode_jpeg;

/// Where an input image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on the local filesystem (from a `file://` URI).
    Path(PathBuf),
    /// Base64-encoded image bytes.
    Encoded(String),
}

impl ImageSource {
    /// Interpret a host-supplied image string.
    ///
    /// `file://` URIs name a file; everything else is base64, optionally
    /// wrapped in a `data:` URI.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(path) = input.strip_prefix("file://") {
            return Self::Path(PathBuf::from(path));
        }
        if input.starts_with("data:") {
            if let Some((_, payload)) = input.split_once(";base64,") {
                return Self::Encoded(payload.to_string());
            }
        }
        Self::Encoded(input.to_string())
    }
}

/// Decode an image from wherever `source` points.
pub fn decode_source(source: &ImageSource) -> Result<DynamicImage> {
    match source {
        ImageSource::Path(path) => decode_path(path),
        ImageSource::Encoded(data) => decode_base64(data),
    }
}

/// Open and decode an image file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn decode_path(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path)
        .map_err(|err| ScanError::Decode(format!("failed to open {}: {}", path.display(), err)))?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    Ok(img)
}

/// Decode base64 text into an image. ASCII whitespace is ignored.
pub fn decode_base64(data: &str) -> Result<DynamicImage> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| ScanError::Decode(format!("invalid base64 payload: {}", err)))?;
    decode_bytes(&bytes)
}

/// Decode raw encoded bytes (JPEG, PNG, ...).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_bytes(data: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| ScanError::Decode(format!("failed to decode image: {}", err)))?;
    debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
    Ok(img)
}

/// Encode `image` as JPEG and wrap it in base64 for the host.
pub fn encode_base64_jpeg(image: &RgbImage, quality: f64) -> Result<String> {
    let bytes = encode_jpeg(image, quality)?;
    Ok(STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn parse_file_uri() {
        assert_eq!(
            ImageSource::parse("file:///tmp/page.jpg"),
            ImageSource::Path(PathBuf::from("/tmp/page.jpg"))
        );
    }

    #[test]
    fn raw_jpeg_base64_is_not_a_path() {
        assert!(matches!(ImageSource::parse("/9j/4AAQSkZJRg=="), ImageSource::Encoded(_)));
    }

    #[test]
    fn parse_strips_data_uri() {
        assert_eq!(
            ImageSource::parse("data:image/png;base64,iVBORw0KGgo="),
            ImageSource::Encoded("iVBORw0KGgo=".into())
        );
    }

    #[test]
    fn garbage_base64_is_decode_error() {
        let err = decode_source(&ImageSource::Encoded("not base64 at all!".into())).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }

    #[test]
    fn valid_base64_but_not_an_image() {
        let err = decode_base64(&STANDARD.encode(b"hello world")).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = decode_path(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }

    #[test]
    fn base64_jpeg_decodes_back() {
        let img = RgbImage::from_pixel(20, 10, Rgb([90, 120, 200]));
        let encoded = encode_base64_jpeg(&img, 0.9).unwrap();
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        let decoded = decode_source(&ImageSource::parse(&wrapped)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn file_uri_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        RgbImage::from_pixel(8, 6, Rgb([1, 2, 3])).save(&path).unwrap();
        let source = ImageSource::parse(&format!("file://{}", path.display()));
        let img = decode_source(&source).unwrap();
        assert_eq!((img.width(), img.height()), (8, 6));
    }
}
