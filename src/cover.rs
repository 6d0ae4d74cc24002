use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder};

use crate::config::ImageLimits;
use crate::error::{CatalogError, Result};

/// Reads a cover picture from disk and returns it as an embeddable `data:` URL.
///
/// The size cap is checked against file metadata before anything is read.
pub fn ingest_file(path: &Path, limits: &ImageLimits) -> Result<String> {
  let metadata = fs::metadata(path).map_err(|err| {
    CatalogError::ValidationFailed(format!("Cannot read image {}: {}", path.display(), err))
  })?;
  check_size(metadata.len(), limits)?;
  let bytes = fs::read(path).map_err(|err| {
    CatalogError::ValidationFailed(format!("Cannot read image {}: {}", path.display(), err))
  })?;
  ingest_bytes(&bytes, limits)
}

/// Shrinks the picture to fit the limits, re-encodes it as JPEG and wraps it
/// in a base64 `data:` URL.
pub fn ingest_bytes(bytes: &[u8], limits: &ImageLimits) -> Result<String> {
  check_size(bytes.len() as u64, limits)?;

  let img = image::load_from_memory(bytes)
    .map_err(|err| CatalogError::ValidationFailed(format!("Unsupported image: {}", err)))?;

  let (width, height) = fit_within(img.width(), img.height(), limits.max_width, limits.max_height);
  let img = if (width, height) != (img.width(), img.height()) {
    img.resize_exact(width, height, FilterType::Triangle)
  } else {
    img
  };

  let rgb = img.to_rgb8();
  let mut jpeg_bytes: Vec<u8> = Vec::new();
  JpegEncoder::new_with_quality(&mut jpeg_bytes, limits.jpeg_quality)
    .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
    .map_err(|err| CatalogError::ValidationFailed(format!("JPEG encode error: {}", err)))?;

  log::info!(
    "cover encoded: {}x{}, {} bytes in, {} bytes out",
    width,
    height,
    bytes.len(),
    jpeg_bytes.len()
  );

  Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg_bytes)))
}

fn check_size(len: u64, limits: &ImageLimits) -> Result<()> {
  if len > limits.max_bytes {
    log::warn!("rejected image of {} bytes (limit {})", len, limits.max_bytes);
    return Err(CatalogError::ValidationFailed(format!(
      "⚠️ Image is too large! Please choose an image under {} MB",
      limits.max_bytes / (1024 * 1024)
    )));
  }
  Ok(())
}

/// Proportional size that fits inside `max_width` × `max_height`. Never upscales.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
  if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
    return (width, height);
  }
  let scale = f64::min(
    max_width as f64 / width as f64,
    max_height as f64 / height as f64,
  );
  let scaled_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
  let scaled_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
  (scaled_width, scaled_height)
}

#[cfg(test)]
mod tests {
  use super::*;
  use base64::Engine as _;
  use image::codecs::png::PngEncoder;
  use image::{ImageBuffer, Rgba};

  fn png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
      ImageBuffer::from_pixel(width, height, Rgba([250u8, 245, 235, 255]));
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
      .write_image(&img, width, height, ExtendedColorType::Rgba8)
      .unwrap();
    bytes
  }

  fn decode_data_url(url: &str) -> image::DynamicImage {
    let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
    let jpeg = STANDARD.decode(payload).unwrap();
    image::load_from_memory(&jpeg).unwrap()
  }

  #[test]
  fn fit_within_keeps_aspect_ratio() {
    assert_eq!(fit_within(1600, 1000, 800, 1200), (800, 500));
    assert_eq!(fit_within(1000, 2400, 800, 1200), (500, 1200));
    assert_eq!(fit_within(1000, 1100, 800, 1200), (800, 880));
    assert_eq!(fit_within(640, 480, 800, 1200), (640, 480));
  }

  #[test]
  fn oversized_input_is_rejected_before_decoding() {
    let limits = ImageLimits::default();
    let too_big = vec![0u8; (limits.max_bytes + 1) as usize];
    let err = ingest_bytes(&too_big, &limits).unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(_)));
  }

  #[test]
  fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.jpg");
    let limits = ImageLimits {
      max_bytes: 16,
      ..ImageLimits::default()
    };
    fs::write(&path, vec![1u8; 17]).unwrap();
    assert!(matches!(
      ingest_file(&path, &limits),
      Err(CatalogError::ValidationFailed(_))
    ));
  }

  #[test]
  fn large_image_is_resized_and_reencoded() {
    let url = ingest_bytes(&png(1600, 1000), &ImageLimits::default()).unwrap();
    let decoded = decode_data_url(&url);
    assert_eq!((decoded.width(), decoded.height()), (800, 500));
  }

  #[test]
  fn small_image_keeps_its_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cover.png");
    fs::write(&path, png(120, 180)).unwrap();
    let url = ingest_file(&path, &ImageLimits::default()).unwrap();
    let decoded = decode_data_url(&url);
    assert_eq!((decoded.width(), decoded.height()), (120, 180));
  }

  #[test]
  fn garbage_bytes_fail_validation() {
    let err = ingest_bytes(b"not an image", &ImageLimits::default()).unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(_)));
  }
}
