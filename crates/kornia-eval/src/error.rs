use crate::boxes::BoxError;

/// Error types for the evaluation module.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EvalError {
    /// No detection was matched to a ground truth box, the means are undefined.
    #[error("No matched detections to aggregate")]
    EmptyMatchSet,

    /// Invalid input data - mismatched array lengths with descriptive labels.
    #[error("Mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedArrayLengths {
        /// Label for the left-hand collection.
        left_name: &'static str,
        /// Length of the left-hand collection.
        left_len: usize,
        /// Label for the right-hand collection.
        right_name: &'static str,
        /// Length of the right-hand collection.
        right_len: usize,
    },

    /// Invalid bounding box data.
    #[error(transparent)]
    Box(#[from] BoxError),
}
