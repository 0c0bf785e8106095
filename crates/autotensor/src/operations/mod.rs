//! Shape-aware tensor operations.
//!
//! Every operation is an inherent method (or associated function) on
//! [`Tensor`](crate::Tensor) that maps coordinates to linear offsets and
//! applies the matching [`Element`](crate::Element) operation per cell:
//!
//! ```text
//! elementwise: add, sub, hadamard_mult, -tensor, scalar_mult,
//!              elementwise_pow, elementwise_log, elementwise_exp,
//!              elementwise_max
//! reduce:      sum, repeat, arg_find, arg_max
//! concat:      concatenate
//! matmul:      matrix_mult
//! ```
//!
//! Shapes are validated before any element is touched.

mod concat;
mod elementwise;
mod matmul;
mod reduce;
