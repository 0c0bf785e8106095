//! Axis reduction, broadcast-repeat and argument search.

use crate::autodiff::Element;
use crate::error::TensorError;
use crate::shape::{Shape, num_elements};
use crate::strides::fold_linear;
use crate::tensor::Tensor;
use tracing::instrument;

impl Tensor {
    fn check_axis(&self, axis: usize) -> Result<(), TensorError> {
        if axis >= self.dimensions() {
            return Err(TensorError::IndexOutOfRange {
                index: axis,
                bound: self.dimensions(),
            });
        }
        Ok(())
    }

    /// Sum over one axis, keeping it with extent 1.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if `axis` is not below the rank.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// // Columns [1, 2], [3, 4], [5, 6]
    /// let t = Tensor::from_values(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false).unwrap();
    ///
    /// let rows = t.sum(1).unwrap();
    /// assert_eq!(rows.shape(), &[2, 1]);
    /// assert_eq!(rows.values(), vec![9.0, 12.0]);
    ///
    /// let cols = t.sum(0).unwrap();
    /// assert_eq!(cols.shape(), &[1, 3]);
    /// assert_eq!(cols.values(), vec![3.0, 7.0, 11.0]);
    /// ```
    #[instrument(level = "debug", skip(self), fields(shape = ?self.shape()))]
    pub fn sum(&self, axis: usize) -> Result<Tensor, TensorError> {
        self.check_axis(axis)?;

        let mut out_shape = Shape::from_slice(self.shape());
        out_shape[axis] = 1;

        let mut sums: Vec<Element> = (0..num_elements(&out_shape))
            .map(|_| Element::constant(0.0))
            .collect();
        for (linear, element) in self.elements().iter().enumerate() {
            let target = fold_linear(linear, self.shape(), &out_shape);
            sums[target] = &sums[target] + element;
        }

        Ok(Tensor::from_parts(out_shape, sums))
    }

    /// Repeat the tensor along one axis.
    ///
    /// The output extent on `axis` is multiplied by `repetitions`; each cell
    /// copies the source cell whose `axis` coordinate is the output
    /// coordinate modulo the source extent.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if `axis` is not below the rank,
    /// or `TensorError::InvalidOperation` if `repetitions` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let t = Tensor::from_values(&[2, 1], &[1.0, 2.0], false).unwrap();
    /// let r = t.repeat(1, 3).unwrap();
    /// assert_eq!(r.shape(), &[2, 3]);
    /// assert_eq!(r.values(), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    /// ```
    #[instrument(level = "debug", skip(self), fields(shape = ?self.shape()))]
    pub fn repeat(&self, axis: usize, repetitions: usize) -> Result<Tensor, TensorError> {
        self.check_axis(axis)?;
        if repetitions == 0 {
            return Err(TensorError::InvalidOperation(
                "repeat() needs at least one repetition".to_string(),
            ));
        }

        let mut out_shape = Shape::from_slice(self.shape());
        out_shape[axis] *= repetitions;

        let elements = (0..num_elements(&out_shape))
            .map(|linear| {
                let source = fold_linear(linear, &out_shape, self.shape());
                self.elements()[source].clone()
            })
            .collect();

        Ok(Tensor::from_parts(out_shape, elements))
    }

    /// Linear index of the element selected by a running comparison.
    ///
    /// Scans in storage order. The first element starts as the best; each
    /// later candidate replaces it when `predicate(best, candidate)` holds.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if the tensor is empty.
    pub fn arg_find(&self, mut predicate: impl FnMut(f64, f64) -> bool) -> Result<usize, TensorError> {
        let mut values = self.elements().iter().map(Element::value).enumerate();
        let (mut best_index, mut best) = values
            .next()
            .ok_or(TensorError::IndexOutOfRange { index: 0, bound: 0 })?;

        for (index, candidate) in values {
            if predicate(best, candidate) {
                best_index = index;
                best = candidate;
            }
        }
        Ok(best_index)
    }

    /// Linear index of the largest element; ties keep the earliest.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if the tensor is empty.
    pub fn arg_max(&self) -> Result<usize, TensorError> {
        self.arg_find(|best, candidate| best < candidate)
    }
}
