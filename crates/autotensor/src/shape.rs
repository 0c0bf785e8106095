//! Tensor shapes.

use smallvec::SmallVec;

/// Ordered per-axis extents of a tensor. Axis 0 varies fastest.
///
/// Inline capacity covers the ranks used in practice; higher ranks spill to
/// the heap.
pub type Shape = SmallVec<[usize; 4]>;

/// Number of elements described by `shape`.
///
/// The empty shape describes the empty sentinel tensor and has no elements.
///
/// # Examples
///
/// ```
/// use autotensor::shape::num_elements;
///
/// assert_eq!(num_elements(&[2, 3, 4]), 24);
/// assert_eq!(num_elements(&[1]), 1);
/// assert_eq!(num_elements(&[]), 0);
/// ```
#[inline]
pub fn num_elements(shape: &[usize]) -> usize {
    if shape.is_empty() {
        0
    } else {
        shape.iter().product()
    }
}
