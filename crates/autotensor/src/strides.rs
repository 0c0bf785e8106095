//! Index arithmetic shared by every shape-aware operation.
//!
//! Axis 0 is the fastest-varying axis (column-major order). For a shape
//! `[d0, d1, d2, ...]` the strides are `[1, d0, d0*d1, ...]`, and a linear
//! index `i` decomposes into coordinates as
//!
//! ```text
//! coordinate[k] = (i / stride[k]) mod shape[k]
//! ```
//!
//! Sum, repeat, concatenate, matrix multiply and the position/index
//! conversions on [`Tensor`](crate::Tensor) all use this convention.

/// Compute column-major strides from shape.
///
/// # Examples
///
/// ```
/// use autotensor::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![1, 3, 12]);
/// assert_eq!(compute_strides(&[2, 3]), vec![1, 2]);
/// assert_eq!(compute_strides(&[]), Vec::<usize>::new());
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut stride = 1;

    for &dim in shape {
        strides.push(stride);
        stride *= dim;
    }

    strides
}

/// Convert cartesian coordinates to a linear index.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides)
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear index to cartesian coordinates.
pub fn linear_to_cartesian(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(shape.len());

    for &dim in shape {
        indices.push(linear % dim);
        linear /= dim;
    }

    indices
}

/// Map a linear index of a tensor with shape `shape` to the linear index of
/// the cell it lands on in a tensor of shape `target`, where every
/// coordinate is reduced modulo the target extent.
///
/// With `target[axis] == 1` this folds `axis` away (reduction); with
/// `shape[axis] == k * target[axis]` it finds the source of a repeated cell.
pub(crate) fn fold_linear(linear: usize, shape: &[usize], target: &[usize]) -> usize {
    let mut rest = linear;
    let mut target_pos = 0;
    let mut target_stride = 1;

    for (&dim, &target_dim) in shape.iter().zip(target) {
        let coordinate = rest % dim;
        rest /= dim;
        target_pos += (coordinate % target_dim) * target_stride;
        target_stride *= target_dim;
    }

    target_pos
}
