use ndarray::{ArrayD, ArrayViewD, Axis};

use crate::error::{AnnotationError, Result};

/// Tight axis-aligned extent of the true pixels in a single mask plane.
///
/// For an all-false mask every edge is 0; an empty mask has no meaningful
/// extent, and callers still get a well-formed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// Canonicalize a mask array to (height, width, planes).
///
/// A 2-D (height, width) mask gains a trailing singleton plane axis. Any
/// other dimensionality is passed through unchanged; consumers that need a
/// plane stack reject it there.
pub fn ensure_plane_axis(masks: ArrayD<bool>) -> ArrayD<bool> {
    if masks.ndim() == 2 {
        masks.insert_axis(Axis(2))
    } else {
        masks
    }
}

fn first_plane(masks: &ArrayD<bool>) -> Result<ArrayViewD<'_, bool>> {
    match masks.ndim() {
        2 => Ok(masks.view()),
        3 => Ok(masks.view().index_axis_move(Axis(2), 0)),
        ndim => Err(AnnotationError::MaskShape {
            expected: "2 or 3 (height, width, planes)",
            ndim,
            shape: masks.shape().to_vec(),
        }),
    }
}

/// Compute the bounds of the first plane of a mask array.
pub fn mask_bounds(masks: &ArrayD<bool>) -> Result<Bounds> {
    let plane = first_plane(masks)?;

    let row_any: Vec<bool> = plane
        .axis_iter(Axis(0))
        .map(|row| row.iter().any(|&set| set))
        .collect();
    let col_any: Vec<bool> = plane
        .axis_iter(Axis(1))
        .map(|col| col.iter().any(|&set| set))
        .collect();

    let edges = (
        row_any.iter().position(|&any| any),
        row_any.iter().rposition(|&any| any),
        col_any.iter().position(|&any| any),
        col_any.iter().rposition(|&any| any),
    );

    Ok(match edges {
        (Some(top), Some(bottom), Some(left), Some(right)) => Bounds {
            top,
            bottom,
            left,
            right,
        },
        // all-false mask: zero extent by definition, not an error
        _ => Bounds {
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
        },
    })
}
