//! PNG encoding for RGBA texture data.
//!
//! Textures are always written as 8-bit RGBA (color type 6). Indexed output
//! would change channel values for GPU sampling, so no palette path exists.

use std::io::Write;

use forecast_common::{ForecastError, ForecastResult};

/// PNG file signature
const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create a PNG image from RGBA pixel data (color type 6).
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> ForecastResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(ForecastError::Encode(format!(
            "cannot encode empty image {}x{}",
            width, height
        )));
    }
    if pixels.len() != width * height * 4 {
        return Err(ForecastError::Encode(format!(
            "pixel buffer has {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            width * height * 4,
            width,
            height
        )));
    }

    let mut png = Vec::with_capacity(pixels.len() / 2 + 64);
    png.extend_from_slice(&SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgba(pixels, width, height)
        .map_err(|e| ForecastError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGBA image data for IDAT chunk.
fn deflate_idat_rgba(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * 4;

    // Add filter byte (0 = no filter) to each scanline
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride).take(height) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature_and_header() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            0, 0, 0, 255, // black
        ];
        let png = create_png(&pixels, 2, 2).unwrap();

        assert_eq!(&png[0..8], &SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 2);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 2);
        assert_eq!(png[24], 8); // bit depth
        assert_eq!(png[25], 6); // RGBA
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        let result = create_png(&[0, 0, 0], 1, 1);
        assert!(matches!(result, Err(ForecastError::Encode(_))));

        let result = create_png(&[], 0, 0);
        assert!(matches!(result, Err(ForecastError::Encode(_))));
    }
}
