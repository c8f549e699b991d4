//! Shared raster and JPEG fixtures for the sabor-core test suite.

use crate::decode::RasterBuffer;
use crate::encode::compress;

/// Smooth diagonal gradient. Compresses well and survives JPEG nearly intact.
pub fn gradient_raster(width: u32, height: u32) -> RasterBuffer {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(((x + y) * 127 / (width + height).max(1)) as u8);
        }
    }
    RasterBuffer::new(width, height, pixels)
}

/// Gradient with deterministic high-frequency noise, standing in for a
/// camera photo where quality visibly changes the compressed size.
pub fn photo_raster(width: u32, height: u32) -> RasterBuffer {
    let mut raster = gradient_raster(width, height);
    let mut state: u32 = 0x2545_F491;
    for value in raster.pixels.iter_mut() {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let noise = (state >> 26) as i16 - 32;
        *value = (*value as i16 + noise).clamp(0, 255) as u8;
    }
    raster
}

/// Untagged JPEG bytes of a gradient raster.
pub fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    compress(&gradient_raster(width, height), 90)
        .expect("fixture encodes")
        .bytes
}
