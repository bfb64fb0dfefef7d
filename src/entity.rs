use ndarray::Array2;

use crate::error::{AnnotationError, Result};
use crate::record::{AnnotationKind, AnnotationRecord, MaskPayload};

/// Read-only view of the collection context an annotation belongs to.
///
/// Implementations are externally owned; the entity only ever reads from
/// them and must be able to assume they do not change for the duration of
/// a call.
pub trait Collection {
    type Source;

    /// Ordered image indices of a source, in row order.
    fn image_meta_lookup(&self, source: Option<&Self::Source>) -> Vec<u64>;

    /// Identifier of the image set backing a source.
    fn imageset_id(&self, source: Option<&Self::Source>) -> String;
}

/// A stored mask annotation bound to its owning collection and source.
///
/// The entity is a read-only view over an [`AnnotationRecord`]: it holds
/// non-owning references to its context, exposes derived positional fields,
/// and can materialize the mask for display. It has no mutation methods.
pub struct MaskAnnotation<'c, C: Collection> {
    collection: &'c C,
    source: Option<&'c C::Source>,
    record: AnnotationRecord,
}

impl<'c, C: Collection> MaskAnnotation<'c, C> {
    /// Wrap a retrieved record together with its context references.
    ///
    /// Fails when the record's kind tag is not [`AnnotationKind::Mask`].
    pub fn new(
        collection: &'c C,
        record: AnnotationRecord,
        source: Option<&'c C::Source>,
    ) -> Result<Self> {
        if record.kind != AnnotationKind::Mask {
            return Err(AnnotationError::KindMismatch {
                expected: AnnotationKind::Mask.as_str(),
                found: record.kind.as_str().to_owned(),
            });
        }
        Ok(Self {
            collection,
            source,
            record,
        })
    }

    pub fn collection(&self) -> &C {
        self.collection
    }

    pub fn source(&self) -> Option<&C::Source> {
        self.source
    }

    pub fn record(&self) -> &AnnotationRecord {
        &self.record
    }

    /// Position of the target image within its image set.
    pub fn image_index(&self) -> Result<u64> {
        self.record
            .image_index
            .ok_or(AnnotationError::MissingField("image_index"))
    }

    /// Row of the target image within the source's image meta lookup.
    ///
    /// The lookup is consulted fresh on every call; a stale table yields a
    /// stale row, and an image index absent from it is a lookup error.
    pub fn row_index(&self) -> Result<usize> {
        let image_index = self.image_index()?;
        self.collection
            .image_meta_lookup(self.source)
            .iter()
            .position(|&index| index == image_index)
            .ok_or(AnnotationError::ImageIndexNotFound(image_index))
    }

    /// Identifier of the image set this annotation belongs to.
    pub fn imageset_id(&self) -> String {
        self.collection.imageset_id(self.source)
    }

    fn payload(&self) -> Result<&MaskPayload> {
        self.record
            .annotation
            .as_ref()
            .ok_or(AnnotationError::MissingField("annotation"))
    }

    /// The stored mask as a boolean plane.
    pub fn mask_bool(&self) -> Result<Array2<bool>> {
        self.payload()?.mask_bool()
    }

    /// The stored mask as 8-bit grayscale, true pixels white.
    pub fn mask_u8(&self) -> Result<Array2<u8>> {
        Ok(self.mask_bool()?.mapv(|set| if set { 255 } else { 0 }))
    }
}
