//! autotensor - element-level reverse-mode autodiff over n-dimensional tensors
//!
//! Every tensor element is a scalar that can record how it was computed.
//! Tensor operations fan out to element operations, so any composition of
//! them builds a scalar computation graph that a backward pass can drain.
//!
//! # Architecture
//!
//! ```text
//! Tensor { elements: Vec<Element>, shape }      operations module
//!     → sum, repeat, concatenate, matrix_mult, elementwise ops
//!
//! Element { value, node: Option<Rc<Node>> }     autodiff module
//!     → scalar arithmetic, builds Node graph
//!
//! backward()                                     autodiff module
//!     → reverse sweep, gradients left on nodes
//! ```
//!
//! Axis 0 varies fastest; see [`strides`] for the index convention.
//!
//! # Example
//!
//! ```
//! use autotensor::Tensor;
//!
//! // Column-major 2x2 matrix [[1, 3], [2, 4]]
//! let w = Tensor::from_values(&[2, 2], &[1.0, 2.0, 3.0, 4.0], true).unwrap();
//! let x = Tensor::ones(&[2, 1], false);
//!
//! let y = w.matrix_mult(&x).unwrap();
//! let loss = y.sum(0).unwrap();
//! loss.backward().unwrap();
//!
//! assert_eq!(loss.element_value_at(0).unwrap(), 10.0);
//! assert_eq!(w.grad().unwrap().values(), vec![1.0; 4]);
//! ```

pub mod autodiff;
pub mod error;
pub mod operations;
pub mod random;
pub mod shape;
pub mod strides;
pub mod tensor;

pub use autodiff::{Element, Node};
pub use error::TensorError;
pub use shape::Shape;
pub use tensor::Tensor;
