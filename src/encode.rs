use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ndarray::{ArrayD, ArrayView2, Ix2};
use tracing::debug;

use crate::error::{AnnotationError, Result};
use crate::mask::mask_bounds;
use crate::record::{AnnotationKind, MaskPayload, Roi, Uploadable, DATA_URI_PREFIX, MASK_FORMAT};

/// Encode a boolean plane as a 1-bit grayscale PNG, true pixels white.
pub fn mask_to_png(mask: ArrayView2<'_, bool>) -> Result<Vec<u8>> {
    let (height, width) = mask.dim();
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(AnnotationError::MaskDimensions { width, height }),
    };

    // 1-bit scanlines, most significant bit first, rows padded to a byte
    let row_bytes = (width + 7) / 8;
    let mut packed = vec![0u8; row_bytes * height];
    for (r, row) in mask.outer_iter().enumerate() {
        for (c, &set) in row.iter().enumerate() {
            if set {
                packed[r * row_bytes + c / 8] |= 0x80 >> (c % 8);
            }
        }
    }

    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, w, h);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::One);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&packed)?;
    writer.finish()?;
    Ok(bytes)
}

/// Encode a boolean plane as a `data:image/png;base64,` string.
pub fn mask_to_data_uri(mask: ArrayView2<'_, bool>) -> Result<String> {
    let png = mask_to_png(mask)?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(png)))
}

impl Uploadable {
    /// Build an upload package from a boolean mask and its class label.
    ///
    /// The mask must be exactly 2-dimensional (height, width); anything
    /// else is rejected before any encoding work happens. The package
    /// carries no score.
    pub fn from_bool_mask(mask: &ArrayD<bool>, class_id: i64) -> Result<Self> {
        let plane = mask
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| AnnotationError::MaskShape {
                expected: "2 (height, width)",
                ndim: mask.ndim(),
                shape: mask.shape().to_vec(),
            })?;
        let (height, width) = plane.dim();

        let mask_uri = mask_to_data_uri(plane)?;
        let bounds = mask_bounds(mask)?;
        debug!(width, height, ?bounds, class_id, "encoded mask annotation");

        Ok(Self {
            kind: AnnotationKind::Mask,
            format: MASK_FORMAT.to_owned(),
            annotation: MaskPayload {
                mask: mask_uri,
                width: width as u32,
                height: height as u32,
                score: None,
                roi: Roi::from(bounds),
            },
            class_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{mask_from_data_uri, mask_from_png};
    use assert_matches::assert_matches;
    use ndarray::{Array2, ArrayD, IxDyn};

    fn square_mask() -> ArrayD<bool> {
        Array2::from_shape_fn((4, 4), |(r, c)| (1..=2).contains(&r) && (1..=2).contains(&c))
            .into_dyn()
    }

    #[test]
    fn png_round_trips_exactly() {
        let mask = Array2::from_shape_fn((11, 13), |(r, c)| (r * 13 + c) % 3 == 0);
        let png = mask_to_png(mask.view()).unwrap();
        assert_eq!(mask_from_png(&png).unwrap(), mask);
    }

    #[test]
    fn data_uri_round_trips_exactly() {
        let mask = Array2::from_shape_fn((5, 9), |(r, c)| r == c);
        let uri = mask_to_data_uri(mask.view()).unwrap();
        assert!(uri.starts_with(DATA_URI_PREFIX));
        assert_eq!(mask_from_data_uri(&uri).unwrap(), mask);
    }

    #[test]
    fn square_uploadable_matches_expected_roi() {
        let uploadable = Uploadable::from_bool_mask(&square_mask(), 7).unwrap();

        assert_eq!(uploadable.kind, AnnotationKind::Mask);
        assert_eq!(uploadable.format, MASK_FORMAT);
        assert_eq!(uploadable.class_id, 7);
        assert_eq!(uploadable.annotation.width, 4);
        assert_eq!(uploadable.annotation.height, 4);
        assert_eq!(uploadable.annotation.score, None);
        assert_eq!(
            uploadable.annotation.roi,
            Roi {
                xmin: 1,
                xmax: 2,
                ymin: 1,
                ymax: 2,
                width: 1,
                height: 1
            }
        );

        let decoded = uploadable.annotation.mask_bool().unwrap();
        assert_eq!(decoded.into_dyn(), square_mask());
    }

    #[test]
    fn all_false_mask_has_zero_roi() {
        let mask = ArrayD::from_elem(IxDyn(&[8, 8]), false);
        let uploadable = Uploadable::from_bool_mask(&mask, 0).unwrap();
        assert_eq!(
            uploadable.annotation.roi,
            Roi {
                xmin: 0,
                xmax: 0,
                ymin: 0,
                ymax: 0,
                width: 0,
                height: 0
            }
        );
        assert_eq!(uploadable.annotation.mask_bool().unwrap().into_dyn(), mask);
    }

    #[test]
    fn non_2d_masks_are_rejected() {
        let flat = ArrayD::from_elem(IxDyn(&[16]), true);
        assert_matches!(
            Uploadable::from_bool_mask(&flat, 1),
            Err(AnnotationError::MaskShape { ndim: 1, .. })
        );

        let deep = ArrayD::from_elem(IxDyn(&[2, 2, 2, 2]), true);
        assert_matches!(
            Uploadable::from_bool_mask(&deep, 1),
            Err(AnnotationError::MaskShape { ndim: 4, .. })
        );
    }

    #[test]
    fn zero_sized_mask_is_rejected() {
        let empty = ArrayD::from_elem(IxDyn(&[0, 4]), false);
        assert_matches!(
            Uploadable::from_bool_mask(&empty, 1),
            Err(AnnotationError::MaskDimensions { .. })
        );
    }

    #[test]
    fn wide_mask_packs_row_padding() {
        // width not a multiple of 8 exercises the per-row bit padding
        let mask = Array2::from_shape_fn((3, 10), |(_, c)| c >= 8);
        let png = mask_to_png(mask.view()).unwrap();
        assert_eq!(mask_from_png(&png).unwrap(), mask);
    }
}
