//! Concatenation along an axis.

use crate::error::TensorError;
use crate::shape::Shape;
use crate::tensor::Tensor;
use tracing::instrument;

impl Tensor {
    /// Join two tensors along `axis`.
    ///
    /// Both tensors must have equal rank and agree on every extent except
    /// `axis`. In storage order the output alternates a contiguous block of
    /// `a` and a block of `b`, where a block spans axes `0..=axis`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if ranks or non-`axis` extents
    /// differ, or `TensorError::IndexOutOfRange` if `axis` is not below the
    /// rank.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let a = Tensor::from_values(&[1, 2], &[1.0, 2.0], false).unwrap();
    /// let b = Tensor::from_values(&[2, 2], &[3.0, 4.0, 5.0, 6.0], false).unwrap();
    ///
    /// let c = Tensor::concatenate(&a, &b, 0).unwrap();
    /// assert_eq!(c.shape(), &[3, 2]);
    /// assert_eq!(c.values(), vec![1.0, 3.0, 4.0, 2.0, 5.0, 6.0]);
    /// ```
    #[instrument(level = "debug", skip(a, b), fields(lhs = ?a.shape(), rhs = ?b.shape()))]
    pub fn concatenate(a: &Tensor, b: &Tensor, axis: usize) -> Result<Tensor, TensorError> {
        if a.dimensions() != b.dimensions() {
            return Err(TensorError::shape_mismatch(a.shape(), b.shape()));
        }
        if axis >= a.dimensions() {
            return Err(TensorError::IndexOutOfRange {
                index: axis,
                bound: a.dimensions(),
            });
        }
        let extents_agree = a
            .shape()
            .iter()
            .zip(b.shape())
            .enumerate()
            .all(|(i, (da, db))| i == axis || da == db);
        if !extents_agree {
            return Err(TensorError::shape_mismatch(a.shape(), b.shape()));
        }

        let block_a: usize = a.shape()[..=axis].iter().product();
        let block_b: usize = b.shape()[..=axis].iter().product();

        let mut out_shape = Shape::from_slice(a.shape());
        out_shape[axis] += b.shape()[axis];

        // A zero-sized block means that operand has no elements, so the
        // output is the other operand unchanged.
        let elements = if block_a == 0 {
            b.elements().to_vec()
        } else if block_b == 0 {
            a.elements().to_vec()
        } else {
            let mut elements = Vec::with_capacity(a.num_elements() + b.num_elements());
            for (chunk_a, chunk_b) in a
                .elements()
                .chunks(block_a)
                .zip(b.elements().chunks(block_b))
            {
                elements.extend_from_slice(chunk_a);
                elements.extend_from_slice(chunk_b);
            }
            elements
        };

        Ok(Tensor::from_parts(out_shape, elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenate_last_axis_appends() {
        let a = Tensor::from_values(&[2, 1], &[1.0, 2.0], false).unwrap();
        let b = Tensor::from_values(&[2, 2], &[3.0, 4.0, 5.0, 6.0], false).unwrap();
        let c = Tensor::concatenate(&a, &b, 1).unwrap();
        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_concatenate_middle_axis() {
        let a = Tensor::from_values(&[1, 1, 2], &[1.0, 2.0], false).unwrap();
        let b = Tensor::from_values(&[1, 2, 2], &[3.0, 4.0, 5.0, 6.0], false).unwrap();
        let c = Tensor::concatenate(&a, &b, 1).unwrap();
        assert_eq!(c.shape(), &[1, 3, 2]);
        assert_eq!(c.values(), vec![1.0, 3.0, 4.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_concatenate_rank_mismatch() {
        let a = Tensor::zeros(&[2], false);
        let b = Tensor::zeros(&[2, 1], false);
        assert_eq!(
            Tensor::concatenate(&a, &b, 0).unwrap_err(),
            TensorError::shape_mismatch(&[2], &[2, 1])
        );
    }

    #[test]
    fn test_concatenate_extent_mismatch() {
        let a = Tensor::zeros(&[2, 3], false);
        let b = Tensor::zeros(&[2, 4], false);
        assert!(Tensor::concatenate(&a, &b, 1).is_ok());
        assert!(matches!(
            Tensor::concatenate(&a, &b, 0),
            Err(TensorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_concatenate_axis_out_of_range() {
        let a = Tensor::zeros(&[2, 3], false);
        assert_eq!(
            Tensor::concatenate(&a, &a, 2).unwrap_err(),
            TensorError::IndexOutOfRange { index: 2, bound: 2 }
        );
    }

    #[test]
    fn test_concatenate_with_empty_operand() {
        let empty = Tensor::zeros(&[0, 2], false);
        let b = Tensor::from_values(&[1, 2], &[1.0, 2.0], false).unwrap();

        let c = Tensor::concatenate(&empty, &b, 0).unwrap();
        assert_eq!(c.shape(), &[1, 2]);
        assert_eq!(c.values(), vec![1.0, 2.0]);

        let c = Tensor::concatenate(&b, &empty, 0).unwrap();
        assert_eq!(c.shape(), &[1, 2]);
        assert_eq!(c.values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_concatenate_both_empty() {
        let a = Tensor::zeros(&[0, 2], false);
        let b = Tensor::zeros(&[0, 2], false);
        let c = Tensor::concatenate(&a, &b, 1).unwrap();
        assert_eq!(c.shape(), &[0, 4]);
        assert_eq!(c.num_elements(), 0);
    }

    #[test]
    fn test_concatenate_routes_gradients() {
        let a = Tensor::from_values(&[2], &[1.0, 2.0], true).unwrap();
        let b = Tensor::from_values(&[1], &[3.0], true).unwrap();
        let weights = Tensor::from_values(&[3], &[10.0, 20.0, 30.0], false).unwrap();

        let c = Tensor::concatenate(&a, &b, 0).unwrap();
        let total = c.hadamard_mult(&weights).unwrap().sum(0).unwrap();
        total.backward().unwrap();

        assert_eq!(a.grad().unwrap().values(), vec![10.0, 20.0]);
        assert_eq!(b.grad().unwrap().values(), vec![30.0]);
    }
}
