//! Element-wise tensor operations.

use crate::autodiff::Element;
use crate::error::TensorError;
use crate::tensor::Tensor;
use std::ops::Neg;

impl Tensor {
    fn zip_with(
        &self,
        other: &Tensor,
        op: impl Fn(&Element, &Element) -> Element,
    ) -> Result<Tensor, TensorError> {
        if self.shape() != other.shape() {
            return Err(TensorError::shape_mismatch(self.shape(), other.shape()));
        }
        let elements = self
            .elements()
            .iter()
            .zip(other.elements())
            .map(|(a, b)| op(a, b))
            .collect();
        Ok(Tensor::from_parts(self.shape().into(), elements))
    }

    fn map(&self, op: impl Fn(&Element) -> Element) -> Tensor {
        let elements = self.elements().iter().map(op).collect();
        Tensor::from_parts(self.shape().into(), elements)
    }

    fn single_element<'a>(operand: &'a Tensor) -> Result<&'a Element, TensorError> {
        match operand.elements() {
            [element] => Ok(element),
            _ => Err(TensorError::shape_mismatch(operand.shape(), &[1])),
        }
    }

    /// Element-wise sum of two same-shaped tensors.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if shapes differ.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let a = Tensor::from_values(&[2], &[1.0, 2.0], false).unwrap();
    /// let b = Tensor::from_values(&[2], &[10.0, 20.0], false).unwrap();
    /// assert_eq!(a.add(&b).unwrap().values(), vec![11.0, 22.0]);
    /// ```
    pub fn add(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise difference of two same-shaped tensors.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if shapes differ.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shaped tensors.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if shapes differ.
    pub fn hadamard_mult(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Multiply every element by a one-element tensor.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `scalar` does not hold exactly
    /// one element.
    pub fn scalar_mult(&self, scalar: &Tensor) -> Result<Tensor, TensorError> {
        let factor = Self::single_element(scalar)?;
        Ok(self.map(|a| a * factor))
    }

    /// Raise every element to the power held by a one-element tensor.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `exponent` does not hold
    /// exactly one element.
    pub fn elementwise_pow(&self, exponent: &Tensor) -> Result<Tensor, TensorError> {
        let exponent = Self::single_element(exponent)?;
        Ok(self.map(|a| a.pow(exponent)))
    }

    /// Logarithm of every element to the base held by a one-element tensor.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `base` does not hold exactly
    /// one element.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let t = Tensor::from_values(&[3], &[1.0, 4.0, 8.0], false).unwrap();
    /// let base = Tensor::scalar(2.0, false);
    /// let logs = t.elementwise_log(&base).unwrap().values();
    /// assert!((logs[1] - 2.0).abs() < 1e-12);
    /// assert!((logs[2] - 3.0).abs() < 1e-12);
    /// ```
    pub fn elementwise_log(&self, base: &Tensor) -> Result<Tensor, TensorError> {
        let base = Self::single_element(base)?;
        Ok(self.map(|a| a.log(base)))
    }

    /// Exponential of every element.
    pub fn elementwise_exp(tensor: &Tensor) -> Tensor {
        tensor.map(Element::exp)
    }

    /// Position-wise maximum of two same-shaped tensors. Ties select `a`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if shapes differ.
    pub fn elementwise_max(a: &Tensor, b: &Tensor) -> Result<Tensor, TensorError> {
        a.zip_with(b, Element::max)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        self.map(|a| -a)
    }
}

impl Neg for Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        -&self
    }
}
