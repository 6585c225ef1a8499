//! Loading an input file into an opaque RGB source image.
//!
//! The JPEG encoder at the end of the pipeline has no alpha channel and no
//! palette support, so every input is flattened to RGB8 here, once, before
//! any resampling happens. Alpha is dropped (not composited), palette and
//! gray inputs are expanded.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{ColorLayout, DecodeError, DecodedImage, Orientation, SourceImage};

/// Decode an image from bytes and normalize it to opaque RGB.
///
/// The format is guessed from the content. EXIF orientation, when present, is
/// applied so that width and height match what a viewer shows.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized
/// image format, and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Io(e.to_string()))?;

    let Some(format) = reader.format() else {
        return Err(DecodeError::InvalidFormat);
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    // The decoder hands back palettes already expanded.
    let layout = if format == ImageFormat::Png && is_indexed_png(bytes) {
        ColorLayout::Indexed
    } else {
        ColorLayout::from_color_type(img.color())
    };
    match layout {
        ColorLayout::Indexed => log::debug!("expanding palette input to RGB"),
        _ if layout.has_alpha() => log::debug!("dropping alpha channel from {:?} input", layout),
        _ => {}
    }

    let oriented = apply_orientation(img, orientation);
    let image = DecodedImage::from_rgb_image(oriented.into_rgb8());

    Ok(SourceImage {
        image,
        layout,
        orientation,
    })
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns `DecodeError::Io` if the file cannot be read, otherwise the same
/// errors as [`decode_image`].
pub fn decode_file(path: &Path) -> Result<SourceImage, DecodeError> {
    let bytes =
        std::fs::read(path).map_err(|e| DecodeError::Io(format!("{}: {}", path.display(), e)))?;
    decode_image(&bytes)
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// Whether the IHDR chunk declares a palette image.
///
/// IHDR is always the first chunk: signature (8), length (4), type (4),
/// width (4), height (4), bit depth (1), then the colour type.
fn is_indexed_png(bytes: &[u8]) -> bool {
    bytes.len() > 25
        && bytes[..8] == PNG_SIGNATURE
        && &bytes[12..16] == b"IHDR"
        && bytes[25] == PNG_COLOR_TYPE_INDEXED
}

/// EXIF orientation from the container, `Normal` when absent or unreadable.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_rgba_png_drops_alpha() {
        let mut rgba = RgbaImage::new(4, 3);
        for pixel in rgba.pixels_mut() {
            *pixel = Rgba([200, 100, 50, 0]);
        }
        let bytes = png_bytes(DynamicImage::ImageRgba8(rgba));

        let source = decode_image(&bytes).unwrap();
        assert_eq!(source.layout, ColorLayout::Rgba);
        assert_eq!(source.image.width, 4);
        assert_eq!(source.image.height, 3);
        assert_eq!(source.image.pixels.len(), 4 * 3 * 3);
        assert_eq!(&source.image.pixels[0..3], &[200, 100, 50]);
    }

    #[test]
    fn test_decode_gray_png_expands_to_rgb() {
        let gray = image::GrayImage::from_pixel(5, 5, image::Luma([77]));
        let bytes = png_bytes(DynamicImage::ImageLuma8(gray));

        let source = decode_image(&bytes).unwrap();
        assert_eq!(source.layout, ColorLayout::Luma);
        assert_eq!(source.image.pixels.len(), 5 * 5 * 3);
        assert!(source.image.pixels.iter().all(|&v| v == 77));
    }

    fn indexed_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, width, height);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255u8, 0, 0, 0, 0, 255]);
            let mut writer = encoder.write_header().unwrap();
            let data: Vec<u8> = (0..width * height).map(|i| (i % 2) as u8).collect();
            writer.write_image_data(&data).unwrap();
        }
        bytes
    }

    #[test]
    fn test_decode_indexed_png_reports_palette() {
        let bytes = indexed_png_bytes(2, 2);

        let source = decode_image(&bytes).unwrap();
        assert_eq!(source.layout, ColorLayout::Indexed);
        assert!(!source.layout.has_alpha());
        assert_eq!((source.image.width, source.image.height), (2, 2));
        assert_eq!(&source.image.pixels[0..6], &[255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_truecolor_png_is_not_indexed() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(image::RgbImage::new(3, 3)));
        assert!(!is_indexed_png(&bytes));
        assert!(is_indexed_png(&indexed_png_bytes(3, 3)));
        assert!(!is_indexed_png(&bytes[..20]));
    }

    #[test]
    fn test_decode_jpeg() {
        let jpeg = crate::encode::encode_jpeg(&vec![128u8; 16 * 8 * 3], 16, 8, 90).unwrap();
        let source = decode_image(&jpeg).unwrap();

        assert_eq!(source.layout, ColorLayout::Rgb);
        assert_eq!(source.orientation, Orientation::Normal);
        assert_eq!((source.image.width, source.image.height), (16, 8));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(image::RgbImage::new(32, 32)));
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_file(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_orientation_extraction_invalid_data() {
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let rgb_img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb_img), Orientation::Rotate90CW);

        assert_eq!(result.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let rgb_img = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result =
            apply_orientation(DynamicImage::ImageRgb8(rgb_img), Orientation::FlipHorizontal);
        let rgb_result = result.into_rgb8();

        assert_eq!(rgb_result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rgb_result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
