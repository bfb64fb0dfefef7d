use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::decode;
use crate::error::Result;
use crate::mask::Bounds;

/// Format tag of a 1-bit single-channel mask image.
pub const MASK_FORMAT: &str = "1UC1";

/// Scheme prefix of an encoded mask string.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Variant tag of an annotation. Dispatch happens on this tag; new
/// annotation shapes become new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Mask,
}

impl AnnotationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mask => "mask",
        }
    }
}

/// Bounding region of interest of a mask, in pixel coordinates.
///
/// `width` and `height` are the edge deltas (`xmax - xmin`, `ymax - ymin`),
/// so a single-pixel mask has zero width and height, as does an all-false
/// mask where every corner is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
    pub width: u32,
    pub height: u32,
}

impl From<Bounds> for Roi {
    fn from(bounds: Bounds) -> Self {
        Self {
            xmin: bounds.left as u32,
            xmax: bounds.right as u32,
            ymin: bounds.top as u32,
            ymax: bounds.bottom as u32,
            width: (bounds.right - bounds.left) as u32,
            height: (bounds.bottom - bounds.top) as u32,
        }
    }
}

/// The mask annotation payload: the encoded image plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskPayload {
    /// `data:image/png;base64,` string wrapping a 1-bit grayscale PNG.
    pub mask: String,
    pub width: u32,
    pub height: u32,
    pub score: Option<f64>,
    pub roi: Roi,
}

impl MaskPayload {
    /// Decode the stored mask string back into a boolean plane.
    pub fn mask_bool(&self) -> Result<Array2<bool>> {
        decode::mask_from_data_uri(&self.mask)
    }
}

/// A self-contained package ready to hand to an external upload mechanism.
///
/// This is not itself a stored annotation; once persisted and retrieved it
/// comes back as an [`AnnotationRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uploadable {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub format: String,
    pub annotation: MaskPayload,
    pub class_id: i64,
}

/// A stored annotation as retrieved from a collection.
///
/// Only the kind tag is guaranteed present; `image_index` is mandatory at
/// access time (see [`MaskAnnotation::image_index`]) but tolerated here so
/// partial records can still be inspected.
///
/// [`MaskAnnotation::image_index`]: crate::entity::MaskAnnotation::image_index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imageset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_index: Option<u64>,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<MaskPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Bounds;
    use serde_json::json;

    #[test]
    fn roi_from_bounds_derives_sizes() {
        let roi = Roi::from(Bounds {
            top: 1,
            bottom: 2,
            left: 1,
            right: 2,
        });
        assert_eq!(
            roi,
            Roi {
                xmin: 1,
                xmax: 2,
                ymin: 1,
                ymax: 2,
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn roi_from_zero_bounds_is_all_zero() {
        let roi = Roi::from(Bounds {
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
        });
        assert_eq!(roi.width, 0);
        assert_eq!(roi.height, 0);
    }

    #[test]
    fn record_parses_with_optional_fields_absent() {
        let record: AnnotationRecord = serde_json::from_value(json!({ "type": "mask" })).unwrap();
        assert_eq!(record.kind, AnnotationKind::Mask);
        assert_eq!(record.image_index, None);
        assert_eq!(record.imageset_id, None);
        assert!(record.annotation.is_none());
    }

    #[test]
    fn record_rejects_unknown_kind() {
        let parsed = serde_json::from_value::<AnnotationRecord>(json!({ "type": "polygon" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn uploadable_serializes_with_wire_field_names() {
        let uploadable = Uploadable {
            kind: AnnotationKind::Mask,
            format: MASK_FORMAT.to_owned(),
            annotation: MaskPayload {
                mask: format!("{DATA_URI_PREFIX}AAAA"),
                width: 4,
                height: 4,
                score: None,
                roi: Roi {
                    xmin: 0,
                    xmax: 0,
                    ymin: 0,
                    ymax: 0,
                    width: 0,
                    height: 0,
                },
            },
            class_id: 3,
        };

        let value = serde_json::to_value(&uploadable).unwrap();
        assert_eq!(value["type"], "mask");
        assert_eq!(value["format"], "1UC1");
        assert_eq!(value["class_id"], 3);
        // score is kept as an explicit null, not dropped
        assert!(value["annotation"]["score"].is_null());
        assert!(value["annotation"].get("score").is_some());
    }
}
