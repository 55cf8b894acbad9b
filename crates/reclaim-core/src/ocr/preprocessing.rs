//! Image preprocessing for OCR.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::OcrError;

/// Grayscale and contrast normalization ahead of recognition.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Contrast adjustment passed to `adjust_contrast`.
    contrast: f32,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self { contrast: 30.0 }
    }

    /// Set the contrast adjustment.
    pub fn with_contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    /// Grayscale and contrast-adjust an in-memory image.
    pub fn enhance(&self, image: &DynamicImage) -> DynamicImage {
        image.grayscale().adjust_contrast(self.contrast)
    }

    /// Write an enhanced copy of `image` to a temporary PNG.
    ///
    /// Decoding and encoding run on the blocking pool.
    pub async fn prepare(&self, image: &Path) -> Result<NamedTempFile, OcrError> {
        let source: PathBuf = image.to_path_buf();
        let this = self.clone();

        tokio::task::spawn_blocking(move || this.prepare_blocking(&source))
            .await
            .map_err(|e| OcrError::Preprocessing(format!("preprocessing task failed: {}", e)))?
    }

    fn prepare_blocking(&self, image: &Path) -> Result<NamedTempFile, OcrError> {
        let decoded = image::open(image)
            .map_err(|e| OcrError::Preprocessing(format!("{}: {}", image.display(), e)))?;
        let enhanced = self.enhance(&decoded);

        let target = tempfile::Builder::new()
            .prefix("reclaim-")
            .suffix(".png")
            .tempfile()?;
        enhanced
            .save_with_format(target.path(), image::ImageFormat::Png)
            .map_err(|e| OcrError::Preprocessing(e.to_string()))?;

        debug!(
            "Preprocessed {} ({}x{}) into {}",
            image.display(),
            decoded.width(),
            decoded.height(),
            target.path().display()
        );
        Ok(target)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    #[test]
    fn test_enhance_produces_grayscale() {
        let mut rgb = RgbImage::new(4, 2);
        rgb.put_pixel(0, 0, Rgb([200, 30, 30]));
        let enhanced = ImagePreprocessor::new().enhance(&DynamicImage::ImageRgb8(rgb));

        assert_eq!(enhanced.dimensions(), (4, 2));
        assert!(matches!(enhanced, DynamicImage::ImageLuma8(_)));
    }

    #[tokio::test]
    async fn test_prepare_writes_png_copy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.png");
        DynamicImage::ImageRgb8(RgbImage::new(8, 8)).save(&input).unwrap();

        let prepared = ImagePreprocessor::new().prepare(&input).await.unwrap();

        let reread = image::open(prepared.path()).unwrap();
        assert_eq!(reread.dimensions(), (8, 8));
    }

    #[tokio::test]
    async fn test_prepare_reports_unreadable_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.jpg");
        std::fs::write(&input, b"not an image").unwrap();

        let err = ImagePreprocessor::new().prepare(&input).await.unwrap_err();
        assert!(matches!(err, OcrError::Preprocessing(_)));
    }
}
