//! Error types for autotensor.

use thiserror::Error;

/// Errors that can occur in tensor and autodiff operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// Operand shapes or ranks are incompatible for the requested operation.
    #[error("shape mismatch: {lhs:?} is incompatible with {rhs:?}")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    /// A linear, positional or axis index lies outside its valid range.
    #[error("index out of range: index {index} is not below {bound}")]
    IndexOutOfRange { index: usize, bound: usize },

    /// The operation is not valid for the given operands or graph state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl TensorError {
    pub(crate) fn shape_mismatch(lhs: &[usize], rhs: &[usize]) -> Self {
        TensorError::ShapeMismatch {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_shape_mismatch() {
        let err = TensorError::shape_mismatch(&[2, 3], &[3, 2]);
        assert_eq!(
            err.to_string(),
            "shape mismatch: [2, 3] is incompatible with [3, 2]"
        );
    }

    #[test]
    fn test_display_index_out_of_range() {
        let err = TensorError::IndexOutOfRange { index: 7, bound: 6 };
        assert_eq!(
            err.to_string(),
            "index out of range: index 7 is not below 6"
        );
    }

    #[test]
    fn test_display_invalid_operation() {
        let err = TensorError::InvalidOperation("backward() on 3 elements".to_string());
        assert_eq!(err.to_string(), "invalid operation: backward() on 3 elements");
    }
}
