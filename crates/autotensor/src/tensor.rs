//! N-dimensional tensor of gradient-tracking elements.
//!
//! A tensor owns a flat buffer of [`Element`]s in axis-0-fastest order plus
//! its [`Shape`]. Shape-aware operations live in [`crate::operations`] and
//! fan out to the element operations, so every result is differentiable.

use crate::autodiff::Element;
use crate::error::TensorError;
use crate::shape::{Shape, num_elements};
use crate::strides::{cartesian_to_linear, compute_strides, linear_to_cartesian};
use tracing::info;

/// A n-dimensional tensor of [`Element`]s.
///
/// Tensors are never aliased: `Clone` copies the element buffer, and each
/// tracking copy gets its own identity node forwarding to the source.
/// The `Default` tensor is the empty sentinel.
#[derive(Debug, Clone, Default)]
pub struct Tensor {
    elements: Vec<Element>,
    shape: Shape,
}

impl Tensor {
    /// Build a tensor from parts already known to agree.
    pub(crate) fn from_parts(shape: Shape, elements: Vec<Element>) -> Self {
        debug_assert_eq!(num_elements(&shape), elements.len());
        Self { elements, shape }
    }

    fn filled(shape: &[usize], value: f64, requires_grad: bool) -> Self {
        let elements = (0..num_elements(shape))
            .map(|_| Element::new(value, requires_grad))
            .collect();
        Self::from_parts(Shape::from_slice(shape), elements)
    }

    /// Create a zero-initialized tensor.
    ///
    /// Every element of a tracking tensor is its own leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let t = Tensor::zeros(&[2, 3, 4], false);
    /// assert_eq!(t.shape(), &[2, 3, 4]);
    /// assert_eq!(t.num_elements(), 24);
    /// ```
    pub fn zeros(shape: &[usize], requires_grad: bool) -> Self {
        Self::filled(shape, 0.0, requires_grad)
    }

    /// Create a tensor filled with ones.
    pub fn ones(shape: &[usize], requires_grad: bool) -> Self {
        Self::filled(shape, 1.0, requires_grad)
    }

    /// Create a one-element tensor of shape `[1]`.
    pub fn scalar(value: f64, requires_grad: bool) -> Self {
        Self::filled(&[1], value, requires_grad)
    }

    /// The empty sentinel: no shape and no elements.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a tensor from values in axis-0-fastest order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the value count differs from
    /// the element count of `shape`.
    ///
    /// # Examples
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let t = Tensor::from_values(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false).unwrap();
    /// assert_eq!(t.element_value_at(1).unwrap(), 2.0);
    /// assert_eq!(t.position_to_index(&[0, 1]).unwrap(), 2);
    /// ```
    pub fn from_values(
        shape: &[usize],
        values: &[f64],
        requires_grad: bool,
    ) -> Result<Self, TensorError> {
        if values.len() != num_elements(shape) {
            return Err(TensorError::shape_mismatch(shape, &[values.len()]));
        }
        let elements = values
            .iter()
            .map(|&value| Element::new(value, requires_grad))
            .collect();
        Ok(Self::from_parts(Shape::from_slice(shape), elements))
    }

    /// Create a tensor that takes ownership of existing elements.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the element count differs from
    /// that of `shape`.
    pub fn from_elements(shape: &[usize], elements: Vec<Element>) -> Result<Self, TensorError> {
        if elements.len() != num_elements(shape) {
            return Err(TensorError::shape_mismatch(shape, &[elements.len()]));
        }
        Ok(Self::from_parts(Shape::from_slice(shape), elements))
    }

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get total number of elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Get the rank (number of axes).
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.shape.len()
    }

    /// Get the element buffer.
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Forward values in storage order.
    pub fn values(&self) -> Vec<f64> {
        self.elements.iter().map(Element::value).collect()
    }

    /// Whether any element tracks gradients.
    pub fn requires_grad(&self) -> bool {
        self.elements.iter().any(Element::requires_grad)
    }

    fn check_index(&self, index: usize) -> Result<(), TensorError> {
        if index >= self.elements.len() {
            return Err(TensorError::IndexOutOfRange {
                index,
                bound: self.elements.len(),
            });
        }
        Ok(())
    }

    /// Get an element by linear index.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if `index` is out of range.
    pub fn element(&self, index: usize) -> Result<&Element, TensorError> {
        self.elements
            .get(index)
            .ok_or(TensorError::IndexOutOfRange {
                index,
                bound: self.elements.len(),
            })
    }

    /// Get a forward value by linear index.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if `index` is out of range.
    pub fn element_value_at(&self, index: usize) -> Result<f64, TensorError> {
        self.element(index).map(Element::value)
    }

    /// Convert cartesian coordinates to a linear index.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the number of coordinates
    /// differs from the rank, or `TensorError::IndexOutOfRange` if a
    /// coordinate exceeds its extent.
    pub fn position_to_index(&self, position: &[usize]) -> Result<usize, TensorError> {
        if position.len() != self.dimensions() {
            return Err(TensorError::shape_mismatch(&self.shape, &[position.len()]));
        }
        for (&coordinate, &dim) in position.iter().zip(&self.shape) {
            if coordinate >= dim {
                return Err(TensorError::IndexOutOfRange {
                    index: coordinate,
                    bound: dim,
                });
            }
        }
        Ok(cartesian_to_linear(position, &compute_strides(&self.shape)))
    }

    /// Convert a linear index to cartesian coordinates.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if `index` is out of range.
    pub fn index_to_position(&self, index: usize) -> Result<Vec<usize>, TensorError> {
        self.check_index(index)?;
        Ok(linear_to_cartesian(index, &self.shape))
    }

    /// Overwrite forward values with those of a same-shaped tensor.
    ///
    /// Graph links are kept; only the values change.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if shapes differ.
    pub fn set_element_values(&mut self, source: &Tensor) -> Result<(), TensorError> {
        if self.shape != source.shape {
            return Err(TensorError::shape_mismatch(&self.shape, &source.shape));
        }
        for (element, src) in self.elements.iter_mut().zip(&source.elements) {
            element.set_value(src.value());
        }
        Ok(())
    }

    /// Overwrite forward values from a slice in storage order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the slice length differs from
    /// the element count.
    pub fn set_element_values_from_slice(&mut self, values: &[f64]) -> Result<(), TensorError> {
        if values.len() != self.elements.len() {
            return Err(TensorError::shape_mismatch(&self.shape, &[values.len()]));
        }
        for (element, &value) in self.elements.iter_mut().zip(values) {
            element.set_value(value);
        }
        Ok(())
    }

    /// Overwrite one forward value.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if `index` is out of range.
    pub fn set_single_element_value(&mut self, value: f64, index: usize) -> Result<(), TensorError> {
        self.check_index(index)?;
        self.elements[index].set_value(value);
        Ok(())
    }

    /// Reinterpret the elements under a new shape.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidOperation` if the element counts differ.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let t = Tensor::from_values(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false).unwrap();
    /// let r = t.reshape(&[3, 2]).unwrap();
    /// assert_eq!(r.shape(), &[3, 2]);
    /// assert_eq!(r.values(), t.values());
    ///
    /// assert!(t.reshape(&[4]).is_err());
    /// ```
    pub fn reshape(&self, shape: &[usize]) -> Result<Tensor, TensorError> {
        let new_len = num_elements(shape);
        if new_len != self.num_elements() {
            return Err(TensorError::InvalidOperation(format!(
                "cannot reshape {:?} ({} elements) into {:?} ({} elements)",
                self.shape(),
                self.num_elements(),
                shape,
                new_len
            )));
        }
        Ok(Self::from_parts(
            Shape::from_slice(shape),
            self.elements.clone(),
        ))
    }

    /// Run the backward pass seeded at this one-element tensor.
    ///
    /// A node forwards its gradient only after every live consumer has
    /// contributed. If an intermediate is still used by another live graph
    /// (a sibling head sharing a trunk, say), the pass stops at that
    /// intermediate and the leaves below it are not reached: their `grad()`
    /// fails until the sibling graph is dropped and the pass is rerun.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidOperation` if the tensor does not hold
    /// exactly one element or that element does not track gradients.
    pub fn backward(&self) -> Result<(), TensorError> {
        match self.elements.as_slice() {
            [seed] => seed.backward(),
            _ => Err(TensorError::InvalidOperation(format!(
                "backward() requires a one-element tensor, got {} elements",
                self.num_elements()
            ))),
        }
    }

    /// Gradient snapshot: a same-shaped, non-tracking tensor of gradients.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidOperation` if an element does not track
    /// gradients or was not reached by a backward pass. An element is not
    /// reached when a graph still alive besides the seed's consumes one of
    /// its descendants; see [`Tensor::backward`].
    pub fn grad(&self) -> Result<Tensor, TensorError> {
        let elements = self
            .elements
            .iter()
            .map(|element| element.grad().map(Element::constant))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(self.shape.clone(), elements))
    }

    /// Reset every tracking element's gradient to "never reached".
    pub fn clear_grad(&self) {
        for element in &self.elements {
            element.clear_grad();
        }
    }

    /// Emit every element as an INFO event.
    pub fn log_element_values(&self) {
        info!(shape = ?self.shape(), "tensor values");
        for (index, element) in self.elements.iter().enumerate() {
            info!(index, value = element.value(), "element");
        }
    }
}
