//! Element - a scalar value with optional gradient tracking.

use super::backward::backward;
use super::node::Node;
use crate::error::TensorError;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

/// A scalar value that optionally tracks gradients.
///
/// An element tracks gradients exactly when it holds a graph node. Every
/// arithmetic operation on a tracking operand records a new operation node
/// with the local partial derivatives, evaluated at the operand values.
///
/// # Example
///
/// ```
/// use autotensor::Element;
///
/// let x = Element::new(3.0, true);
/// let y = &x * &x + &x;
///
/// y.backward().unwrap();
/// assert_eq!(y.value(), 12.0);
/// assert_eq!(x.grad().unwrap(), 7.0);
/// ```
#[derive(Debug)]
pub struct Element {
    value: f64,
    node: Option<Rc<Node>>,
}

impl Element {
    /// Create an element; a tracking element gets a fresh leaf node.
    pub fn new(value: f64, requires_grad: bool) -> Self {
        Self {
            value,
            node: requires_grad.then(Node::leaf),
        }
    }

    /// Create a non-tracking element.
    pub fn constant(value: f64) -> Self {
        Self { value, node: None }
    }

    /// Forward value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the forward value, keeping the graph node.
    #[inline]
    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Whether this element tracks gradients.
    #[inline]
    pub fn requires_grad(&self) -> bool {
        self.node.is_some()
    }

    /// Graph node backing this element, if tracking.
    pub fn node(&self) -> Option<&Rc<Node>> {
        self.node.as_ref()
    }

    /// Gradient deposited by the last backward pass that reached this element.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidOperation` if the element does not track
    /// gradients or no backward pass has reached it.
    pub fn grad(&self) -> Result<f64, TensorError> {
        let node = self.tracked_node("grad()")?;
        node.gradient().ok_or_else(|| {
            TensorError::InvalidOperation(
                "grad() on an element not reached by any backward pass".to_string(),
            )
        })
    }

    /// Run the backward pass seeded at this element.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidOperation` if the element does not track
    /// gradients.
    pub fn backward(&self) -> Result<(), TensorError> {
        let node = self.tracked_node("backward()")?;
        backward(node);
        Ok(())
    }

    /// Forget this element's gradient so it reads as unreached again.
    pub(crate) fn clear_grad(&self) {
        if let Some(node) = &self.node {
            node.clear_gradient();
        }
    }

    fn tracked_node(&self, op: &str) -> Result<&Rc<Node>, TensorError> {
        self.node.as_ref().ok_or_else(|| {
            TensorError::InvalidOperation(format!(
                "{op} on an element that does not require gradients"
            ))
        })
    }

    fn unary(&self, value: f64, partial: impl FnOnce() -> f64) -> Element {
        let node = self
            .node
            .as_ref()
            .map(|parent| Node::operation(Some(parent), None, partial(), 0.0));
        Element { value, node }
    }

    fn binary(&self, other: &Element, value: f64, partials: impl FnOnce() -> (f64, f64)) -> Element {
        let node = if self.requires_grad() || other.requires_grad() {
            let (partial_a, partial_b) = partials();
            Some(Node::operation(
                self.node.as_ref(),
                other.node.as_ref(),
                partial_a,
                partial_b,
            ))
        } else {
            None
        };
        Element { value, node }
    }

    fn add_element(&self, other: &Element) -> Element {
        self.binary(other, self.value + other.value, || (1.0, 1.0))
    }

    fn sub_element(&self, other: &Element) -> Element {
        self.binary(other, self.value - other.value, || (1.0, -1.0))
    }

    fn mul_element(&self, other: &Element) -> Element {
        let (a, b) = (self.value, other.value);
        self.binary(other, a * b, || (b, a))
    }

    fn div_element(&self, other: &Element) -> Element {
        let (a, b) = (self.value, other.value);
        self.binary(other, a / b, || (1.0 / b, -a / (b * b)))
    }

    fn neg_element(&self) -> Element {
        self.unary(-self.value, || -1.0)
    }

    /// Raise to an element-valued power: self^exponent.
    ///
    /// The derivative toward the exponent is `a^b ln a`, taken as zero where
    /// the base is not positive.
    pub fn pow(&self, exponent: &Element) -> Element {
        let (a, b) = (self.value, exponent.value);
        let value = a.powf(b);
        self.binary(exponent, value, || {
            let d_exponent = if a > 0.0 { value * a.ln() } else { 0.0 };
            (b * a.powf(b - 1.0), d_exponent)
        })
    }

    /// Raise to a constant power: self^exponent.
    pub fn powf(&self, exponent: f64) -> Element {
        let a = self.value;
        self.unary(a.powf(exponent), || exponent * a.powf(exponent - 1.0))
    }

    /// Exponential: e^self
    pub fn exp(&self) -> Element {
        let value = self.value.exp();
        self.unary(value, || value)
    }

    /// Natural logarithm: ln(self)
    pub fn ln(&self) -> Element {
        let a = self.value;
        self.unary(a.ln(), || 1.0 / a)
    }

    /// Logarithm to an element-valued base: log_base(self).
    pub fn log(&self, base: &Element) -> Element {
        let (a, b) = (self.value, base.value);
        let (ln_a, ln_b) = (a.ln(), b.ln());
        self.binary(base, ln_a / ln_b, || {
            (1.0 / (a * ln_b), -ln_a / (b * ln_b * ln_b))
        })
    }

    /// Sine: sin(self)
    pub fn sin(&self) -> Element {
        let a = self.value;
        self.unary(a.sin(), || a.cos())
    }

    /// Cosine: cos(self)
    pub fn cos(&self) -> Element {
        let a = self.value;
        self.unary(a.cos(), || -a.sin())
    }

    /// Larger of two elements. Ties select `self`.
    ///
    /// The gradient flows only to the selected operand.
    pub fn max(&self, other: &Element) -> Element {
        if self.value >= other.value {
            self.binary(other, self.value, || (1.0, 0.0))
        } else {
            self.binary(other, other.value, || (0.0, 1.0))
        }
    }
}

impl Clone for Element {
    /// A tracking copy gets its own identity node forwarding to the source.
    fn clone(&self) -> Self {
        self.unary(self.value, || 1.0)
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::constant(0.0)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::constant(value)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl $trait<&Element> for &Element {
            type Output = Element;
            fn $method(self, rhs: &Element) -> Element {
                self.$inner(rhs)
            }
        }

        impl $trait<Element> for &Element {
            type Output = Element;
            fn $method(self, rhs: Element) -> Element {
                self.$inner(&rhs)
            }
        }

        impl $trait<&Element> for Element {
            type Output = Element;
            fn $method(self, rhs: &Element) -> Element {
                (&self).$inner(rhs)
            }
        }

        impl $trait<Element> for Element {
            type Output = Element;
            fn $method(self, rhs: Element) -> Element {
                (&self).$inner(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add_element);
impl_binary_op!(Sub, sub, sub_element);
impl_binary_op!(Mul, mul, mul_element);
impl_binary_op!(Div, div, div_element);

impl Neg for &Element {
    type Output = Element;
    fn neg(self) -> Element {
        self.neg_element()
    }
}

impl Neg for Element {
    type Output = Element;
    fn neg(self) -> Element {
        (&self).neg_element()
    }
}
