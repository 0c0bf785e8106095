//! Matrix multiplication.

use crate::error::TensorError;
use crate::shape::Shape;
use crate::tensor::Tensor;
use smallvec::smallvec;
use tracing::instrument;

impl Tensor {
    /// Matrix product of two rank-2 tensors.
    ///
    /// Matrices have shape `[rows, cols]` and are stored column-major. Each
    /// output cell is an element sum of element products, so the result is
    /// differentiable with respect to both operands.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if either operand is not rank 2
    /// or the inner dimensions differ.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let a = Tensor::ones(&[2, 3], false);
    /// let b = Tensor::ones(&[3, 2], false);
    /// let c = a.matrix_mult(&b).unwrap();
    /// assert_eq!(c.shape(), &[2, 2]);
    /// assert_eq!(c.values(), vec![3.0; 4]);
    /// ```
    #[instrument(level = "debug", skip_all, fields(lhs = ?self.shape(), rhs = ?other.shape()))]
    pub fn matrix_mult(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        let (&[rows, inner], &[other_inner, cols]) = (self.shape(), other.shape()) else {
            return Err(TensorError::shape_mismatch(self.shape(), other.shape()));
        };
        if inner != other_inner {
            return Err(TensorError::shape_mismatch(self.shape(), other.shape()));
        }

        let lhs = self.elements();
        let rhs = other.elements();
        let mut elements = Vec::with_capacity(rows * cols);
        for j in 0..cols {
            for i in 0..rows {
                let cell = (0..inner)
                    .map(|k| &lhs[i + k * rows] * &rhs[k + j * inner])
                    .reduce(|acc, product| acc + product)
                    .unwrap_or_default();
                elements.push(cell);
            }
        }

        let out_shape: Shape = smallvec![rows, cols];
        Ok(Tensor::from_parts(out_shape, elements))
    }
}
