#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("expected a boolean mask with {expected} dimensions, got {ndim}: {shape:?}")]
    MaskShape {
        expected: &'static str,
        ndim: usize,
        shape: Vec<usize>,
    },

    #[error("mask dimensions {width}x{height} cannot be encoded as an image")]
    MaskDimensions { width: usize, height: usize },

    #[error("annotation data did not contain '{0}'")]
    MissingField(&'static str),

    #[error("image index {0} is not present in the source's image meta lookup")]
    ImageIndexNotFound(u64),

    #[error("expected annotation type '{expected}', got '{found}'")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("mask data is not a 'data:image/png;base64,' payload")]
    MaskUriScheme,

    #[error("invalid base64 in mask data: {0}")]
    MaskBase64(#[from] base64::DecodeError),

    #[error("failed to decode mask image: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("failed to encode mask image: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error(
        "decoded mask is not a single-channel binary image: \
         color type {color_type:?}, bit depth {bit_depth:?}"
    )]
    NotBinaryImage {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
