//! Upright image loading.
//!
//! Phone cameras store the sensor image as-is and record the rotation in the
//! EXIF `Orientation` tag. The detector expects the ingredient the way the user
//! saw it, so the tag is applied before inference.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use exif::{In, Reader, Tag, Value};
use image::{imageops, RgbImage};

/// EXIF orientation values (tag 0x0112).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExifOrientation {
    Undefined = 0,
    TopLeft = 1,
    TopRight = 2,
    BottomRight = 3,
    BottomLeft = 4,
    LeftTop = 5,
    RightTop = 6,
    RightBottom = 7,
    LeftBottom = 8,
}

impl From<u32> for ExifOrientation {
    fn from(value: u32) -> Self {
        match value {
            1 => ExifOrientation::TopLeft,
            2 => ExifOrientation::TopRight,
            3 => ExifOrientation::BottomRight,
            4 => ExifOrientation::BottomLeft,
            5 => ExifOrientation::LeftTop,
            6 => ExifOrientation::RightTop,
            7 => ExifOrientation::RightBottom,
            8 => ExifOrientation::LeftBottom,
            _ => ExifOrientation::Undefined,
        }
    }
}

/// Decode `image_path` and rotate it upright according to its EXIF tag.
///
/// Files without EXIF data (PNGs, screenshots) are returned unchanged.
pub fn load_upright_image(image_path: &Path) -> Result<RgbImage> {
    let bytes = std::fs::read(image_path)
        .with_context(|| format!("Failed to read image: {}", image_path.display()))?;

    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode image: {}", image_path.display()))?
        .to_rgb8();

    let orientation = match read_exif_orientation(&bytes) {
        Ok(orientation) => orientation,
        Err(e) => {
            tracing::trace!(path = %image_path.display(), error = %e, "no EXIF orientation");
            ExifOrientation::Undefined
        }
    };

    Ok(apply_orientation(img, orientation))
}

fn read_exif_orientation(bytes: &[u8]) -> Result<ExifOrientation> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .context("Failed to read EXIF data")?;

    if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
        if let Value::Short(values) = &field.value {
            if let Some(&value) = values.first() {
                return Ok(ExifOrientation::from(value as u32));
            }
        }
    }

    Ok(ExifOrientation::Undefined)
}

/// Undo the camera orientation so the image reads top-left first.
pub fn apply_orientation(img: RgbImage, orientation: ExifOrientation) -> RgbImage {
    match orientation {
        ExifOrientation::Undefined | ExifOrientation::TopLeft => img,
        ExifOrientation::TopRight => imageops::flip_horizontal(&img),
        ExifOrientation::BottomRight => imageops::rotate180(&img),
        ExifOrientation::BottomLeft => imageops::flip_vertical(&img),
        // Transpose
        ExifOrientation::LeftTop => imageops::flip_horizontal(&imageops::rotate90(&img)),
        ExifOrientation::RightTop => imageops::rotate90(&img),
        // Transverse
        ExifOrientation::RightBottom => imageops::flip_horizontal(&imageops::rotate270(&img)),
        ExifOrientation::LeftBottom => imageops::rotate270(&img),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn marker_image() -> RgbImage {
        // 3x2, red marker in the top-left corner
        ImageBuffer::from_fn(3, 2, |x, y| {
            if x == 0 && y == 0 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_exif_orientation_from_u32() {
        assert_eq!(ExifOrientation::from(1), ExifOrientation::TopLeft);
        assert_eq!(ExifOrientation::from(6), ExifOrientation::RightTop);
        assert_eq!(ExifOrientation::from(8), ExifOrientation::LeftBottom);
        assert_eq!(ExifOrientation::from(99), ExifOrientation::Undefined);
    }

    #[test]
    fn test_quarter_turns_swap_dimensions() {
        let rotated = apply_orientation(marker_image(), ExifOrientation::RightTop);
        assert_eq!(rotated.dimensions(), (2, 3));
        // Top-left moves to top-right on a clockwise quarter turn
        assert_eq!(rotated.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_mirrored_quarter_turns() {
        // Transpose keeps the top-left corner in place
        let transposed = apply_orientation(marker_image(), ExifOrientation::LeftTop);
        assert_eq!(transposed.dimensions(), (2, 3));
        assert_eq!(transposed.get_pixel(0, 0), &Rgb([255, 0, 0]));

        // Transverse sends it to the opposite corner
        let transversed = apply_orientation(marker_image(), ExifOrientation::RightBottom);
        assert_eq!(transversed.dimensions(), (2, 3));
        assert_eq!(transversed.get_pixel(1, 2), &Rgb([255, 0, 0]));
        assert_eq!(transversed.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_upright_is_untouched() {
        let img = apply_orientation(marker_image(), ExifOrientation::TopLeft);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_png_without_exif_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.png");
        marker_image().save(&path).unwrap();

        let img = load_upright_image(&path).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(load_upright_image(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_upright_image(&dir.path().join("absent.jpg")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read image"));
    }
}
