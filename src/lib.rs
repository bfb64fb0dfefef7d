//! Mask annotations for image collections: encode a boolean mask as a
//! compact uploadable package (1-bit PNG, base64 data URI, bounding ROI),
//! and read stored annotations back into boolean planes.

pub mod decode;
pub mod encode;
pub mod entity;
pub mod error;
pub mod mask;
pub mod record;
pub mod segment;

pub use decode::{mask_from_data_uri, mask_from_png};
pub use encode::{mask_to_data_uri, mask_to_png};
pub use entity::{Collection, MaskAnnotation};
pub use error::AnnotationError;
pub use mask::{ensure_plane_axis, mask_bounds, Bounds};
pub use record::{
    AnnotationKind, AnnotationRecord, MaskPayload, Roi, Uploadable, DATA_URI_PREFIX, MASK_FORMAT,
};
pub use segment::Segment;
