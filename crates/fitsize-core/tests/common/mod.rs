//! Synthetic test images.

#![allow(dead_code)]

use fitsize_core::DecodedImage;

/// Smooth gradients with deterministic grain, so JPEG size tracks pixel count
/// the way it does for photographs.
pub fn photo_like(width: u32, height: u32, seed: u32) -> DecodedImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let grain = (state >> 26) as i32 - 32;
            let base = [
                (x * 255 / width.max(1)) as i32,
                (y * 255 / height.max(1)) as i32,
                ((x + y) * 255 / (width + height).max(1)) as i32,
            ];
            for channel in base {
                pixels.push((channel + grain).clamp(0, 255) as u8);
            }
        }
    }
    DecodedImage::new(width, height, pixels)
}

/// Independent random bytes in every channel.
pub fn noise(width: u32, height: u32, seed: u32) -> DecodedImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let pixels = (0..width * height * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    DecodedImage::new(width, height, pixels)
}

pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DecodedImage {
    let pixels = (0..width * height).flat_map(|_| rgb).collect();
    DecodedImage::new(width, height, pixels)
}

pub fn to_rgb_image(image: &DecodedImage) -> image::RgbImage {
    image::RgbImage::from_raw(image.width, image.height, image.pixels.clone()).unwrap()
}
