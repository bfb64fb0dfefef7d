use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_with::{
    base64::{Base64, Standard},
    formats::Unpadded,
    serde_as,
};

use crate::decode;
use crate::error::Result;
use crate::record::Uploadable;

/// One entry of an inference sidecar file: a label, an optional confidence,
/// and a PNG-encoded mask as unpadded base64.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub label: String,
    #[serde_as(as = "Base64<Standard, Unpadded>")]
    pub mask: Vec<u8>,
}

impl Segment {
    /// Decode the segment's PNG mask into a boolean plane.
    pub fn mask_bool(&self) -> Result<Array2<bool>> {
        decode::mask_from_png(&self.mask)
    }

    /// Package the segment as an uploadable mask annotation under the
    /// given class label.
    pub fn to_uploadable(&self, class_id: i64) -> Result<Uploadable> {
        let mask = self.mask_bool()?.into_dyn();
        Uploadable::from_bool_mask(&mask, class_id)
    }
}
