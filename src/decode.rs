use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ndarray::Array2;
use tracing::debug;

use crate::error::{AnnotationError, Result};
use crate::record::DATA_URI_PREFIX;

/// Decode a `data:image/png;base64,` mask string back into a boolean plane.
pub fn mask_from_data_uri(uri: &str) -> Result<Array2<bool>> {
    let encoded = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or(AnnotationError::MaskUriScheme)?;
    let bytes = STANDARD.decode(encoded)?;
    mask_from_png(&bytes)
}

/// Decode PNG bytes into a boolean plane.
///
/// Only single-channel grayscale images of bit depth 1 or 8 are accepted;
/// anything else is a data-integrity error, never coerced. 8-bit samples
/// are thresholded with `255 -> true`, everything else false.
pub fn mask_from_png(bytes: &[u8]) -> Result<Array2<bool>> {
    let mut decoder = png::Decoder::new(bytes);
    // keep samples at their stored bit depth; both depths are handled below
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    let (width, height) = (info.width as usize, info.height as usize);
    let data = &buf[..info.buffer_size()];

    let mask = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            Array2::from_shape_fn((height, width), |(r, c)| data[r * info.line_size + c] == 255)
        }
        (png::ColorType::Grayscale, png::BitDepth::One) => {
            Array2::from_shape_fn((height, width), |(r, c)| {
                data[r * info.line_size + c / 8] & (0x80 >> (c % 8)) != 0
            })
        }
        (color_type, bit_depth) => {
            return Err(AnnotationError::NotBinaryImage {
                color_type,
                bit_depth,
            })
        }
    };

    debug!(width, height, "decoded mask image");
    Ok(mask)
}
