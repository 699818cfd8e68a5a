//! `image`-crate implementation of [`ImageTransformer`].
//!
//! | Step | Implementation |
//! |---|---|
//! | Sniff | `image::guess_format` on the leading bytes |
//! | Decode | `image::load_from_memory_with_format` |
//! | Fill | `crop_imm` the box's aspect ratio at the gravity anchor, then `resize_exact` (Lanczos3) |
//! | Encode | source format; JPEG via `JpegEncoder` at the configured quality |

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use super::{FALLBACK_MIME, ImageTransformer, ResizeOptions, TransformError};

/// Renders above this many output pixels are refused before any buffer is allocated.
pub const MAX_OUTPUT_PIXELS: u64 = 8192 * 8192;

/// Pure-Rust transformer. Output keeps the source's container format.
#[derive(Debug, Clone)]
pub struct RustTransformer {
    jpeg_quality: u8,
}

impl RustTransformer {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}

impl Default for RustTransformer {
    fn default() -> Self {
        Self::new(85)
    }
}

/// Cover `width` x `height` with `img`: cut the largest region of the source
/// with the box's aspect ratio at the gravity anchor, then scale it to the box.
///
/// Cropping first keeps every intermediate buffer no larger than the source
/// or the output.
fn fill(img: &DynamicImage, options: &ResizeOptions) -> DynamicImage {
    let (src_w, src_h) = img.dimensions();
    let scale = f64::max(
        f64::from(options.width) / f64::from(src_w),
        f64::from(options.height) / f64::from(src_h),
    );
    let crop_w = ((f64::from(options.width) / scale).round() as u32).clamp(1, src_w);
    let crop_h = ((f64::from(options.height) / scale).round() as u32).clamp(1, src_h);

    let (x, y) = options.gravity.anchor(src_w, src_h, crop_w, crop_h);
    img.crop_imm(x, y, crop_w, crop_h)
        .resize_exact(options.width, options.height, FilterType::Lanczos3)
}

impl ImageTransformer for RustTransformer {
    fn resize(&self, source: &[u8], options: &ResizeOptions) -> Result<Vec<u8>, TransformError> {
        let pixels = u64::from(options.width) * u64::from(options.height);
        if pixels > MAX_OUTPUT_PIXELS {
            return Err(TransformError::TooLarge {
                width: options.width,
                height: options.height,
            });
        }

        let format = image::guess_format(source)
            .map_err(|e| TransformError::Unsupported(e.to_string()))?;
        let img = image::load_from_memory_with_format(source, format)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(TransformError::Unsupported("image has no pixels".into()));
        }

        let rendered = fill(&img, options);

        let mut out = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgb8(rendered.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, self.jpeg_quality))?;
            }
            other => rendered.write_to(&mut Cursor::new(&mut out), other)?,
        }
        Ok(out)
    }

    fn determine_type(&self, buf: &[u8]) -> &'static str {
        image::guess_format(buf)
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_MIME)
    }
}
