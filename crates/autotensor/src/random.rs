//! Random tensor construction.
//!
//! This module provides constructors for tensors with random values, used to
//! initialize learnable parameters.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::autodiff::Element;
use crate::shape::{Shape, num_elements};
use crate::tensor::Tensor;

impl Tensor {
    fn sampled(shape: &[usize], requires_grad: bool, mut sample: impl FnMut() -> f64) -> Self {
        let elements = (0..num_elements(shape))
            .map(|_| Element::new(sample(), requires_grad))
            .collect();
        Tensor::from_parts(Shape::from_slice(shape), elements)
    }

    /// Create a tensor with uniform random values in [0, 1).
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    ///
    /// let t = Tensor::random_uniform(&[2, 3], true);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert!(t.values().iter().all(|&v| (0.0..1.0).contains(&v)));
    /// ```
    pub fn random_uniform(shape: &[usize], requires_grad: bool) -> Self {
        Self::random_uniform_with_rng(shape, requires_grad, &mut rand::rng())
    }

    /// Create a tensor with uniform random values using a specific RNG.
    ///
    /// This is useful for reproducible results with a seeded RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use autotensor::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t1 = Tensor::random_uniform_with_rng(&[2, 3], false, &mut rng);
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t2 = Tensor::random_uniform_with_rng(&[2, 3], false, &mut rng);
    ///
    /// assert_eq!(t1.values(), t2.values());
    /// ```
    pub fn random_uniform_with_rng<R: Rng>(
        shape: &[usize],
        requires_grad: bool,
        rng: &mut R,
    ) -> Self {
        Self::sampled(shape, requires_grad, || rng.sample(StandardUniform))
    }

    /// Create a tensor with standard normal random values.
    pub fn random_normal(shape: &[usize], requires_grad: bool) -> Self {
        Self::random_normal_with_rng(shape, requires_grad, &mut rand::rng())
    }

    /// Create a tensor with standard normal random values using a specific RNG.
    pub fn random_normal_with_rng<R: Rng>(
        shape: &[usize],
        requires_grad: bool,
        rng: &mut R,
    ) -> Self {
        Self::sampled(shape, requires_grad, || rng.sample(StandardNormal))
    }
}
