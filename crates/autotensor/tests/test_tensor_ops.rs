//! Integration tests for tensor operations.
//!
//! Shape laws and end-to-end scenarios over the public tensor surface.

use approx::assert_relative_eq;
use autotensor::{Tensor, TensorError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_shape(rng: &mut StdRng) -> Vec<usize> {
    let rank = rng.random_range(1..=4);
    (0..rank).map(|_| rng.random_range(1..=4)).collect()
}

/// A + B - B == A for random equal-shaped tensors.
#[test]
fn test_add_then_sub_roundtrip() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let shape = random_shape(&mut rng);
        let a = Tensor::random_normal_with_rng(&shape, false, &mut rng);
        let b = Tensor::random_normal_with_rng(&shape, false, &mut rng);

        let back = a.add(&b).unwrap().sub(&b).unwrap();
        assert_eq!(back.shape(), a.shape());
        for (x, y) in back.values().iter().zip(a.values()) {
            assert_relative_eq!(*x, y, epsilon = 1e-12);
        }
    }
}

/// Repeating k times along an axis then summing that axis scales by k.
#[test]
fn test_repeat_then_sum_scales() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let shape = random_shape(&mut rng);
        let axis = rng.random_range(0..shape.len());
        let k = rng.random_range(1..=3);
        let t = Tensor::random_uniform_with_rng(&shape, false, &mut rng);

        let summed = t.sum(axis).unwrap();
        let round = t.repeat(axis, k).unwrap().sum(axis).unwrap();
        assert_eq!(round.shape(), summed.shape());
        for (x, y) in round.values().iter().zip(summed.values()) {
            assert_relative_eq!(*x, y * k as f64, epsilon = 1e-12, max_relative = 1e-12);
        }
    }
}

/// Repeat along an axis of extent 1 then sum recovers the input scaled.
#[test]
fn test_repeat_unit_axis_then_sum() {
    let t = Tensor::from_values(&[3, 1], &[1.0, 2.0, 3.0], false).unwrap();
    let round = t.repeat(1, 4).unwrap().sum(1).unwrap();
    assert_eq!(round.shape(), &[3, 1]);
    assert_eq!(round.values(), vec![4.0, 8.0, 12.0]);
}

/// Reshape there and back reproduces the element sequence.
#[test]
fn test_reshape_roundtrip() {
    let mut rng = StdRng::seed_from_u64(11);
    let t = Tensor::random_uniform_with_rng(&[2, 3, 4], true, &mut rng);

    let flat = t.reshape(&[24]).unwrap();
    let back = flat.reshape(&[2, 3, 4]).unwrap();

    assert_eq!(flat.shape(), &[24]);
    assert_eq!(back.shape(), t.shape());
    assert_eq!(back.values(), t.values());
}

/// The first |A| block along the axis equals A and the rest equals B.
#[test]
fn test_concatenate_blocks() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = Tensor::random_uniform_with_rng(&[2, 3, 2], false, &mut rng);
    let b = Tensor::random_uniform_with_rng(&[2, 1, 2], false, &mut rng);

    let c = Tensor::concatenate(&a, &b, 1).unwrap();
    assert_eq!(c.shape(), &[2, 4, 2]);

    for i in 0..2 {
        for k in 0..2 {
            for j in 0..4 {
                let value = c.element_value_at(c.position_to_index(&[i, j, k]).unwrap()).unwrap();
                let expected = if j < 3 {
                    a.element_value_at(a.position_to_index(&[i, j, k]).unwrap())
                } else {
                    b.element_value_at(b.position_to_index(&[i, j - 3, k]).unwrap())
                }
                .unwrap();
                assert_eq!(value, expected);
            }
        }
    }
}

/// 2x3 ones times 3x2 ones is a 2x2 tensor of 3s.
#[test]
fn test_matrix_mult_ones() {
    let a = Tensor::ones(&[2, 3], false);
    let b = Tensor::ones(&[3, 2], false);
    let c = a.matrix_mult(&b).unwrap();
    assert_eq!(c.shape(), &[2, 2]);
    assert_eq!(c.values(), vec![3.0; 4]);
}

/// Identity matrix is neutral on both sides.
#[test]
fn test_matrix_mult_identity() {
    let mut rng = StdRng::seed_from_u64(9);
    let m = Tensor::random_normal_with_rng(&[3, 3], false, &mut rng);
    let identity =
        Tensor::from_values(&[3, 3], &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0], false)
            .unwrap();

    assert_eq!(m.matrix_mult(&identity).unwrap().values(), m.values());
    assert_eq!(identity.matrix_mult(&m).unwrap().values(), m.values());
}

/// position_to_index inverts index_to_position for every valid index.
#[test]
fn test_position_index_roundtrip() {
    let t = Tensor::zeros(&[3, 1, 4, 2], false);
    for i in 0..t.num_elements() {
        let position = t.index_to_position(i).unwrap();
        assert_eq!(t.position_to_index(&position).unwrap(), i);
    }
}

#[test]
fn test_backward_on_multi_element_fails() {
    let t = Tensor::ones(&[3], true);
    let doubled = t.add(&t).unwrap();
    assert!(matches!(
        doubled.backward(),
        Err(TensorError::InvalidOperation(_))
    ));
}

#[test]
fn test_errors_leave_operands_untouched() {
    let mut t = Tensor::from_values(&[2], &[1.0, 2.0], false).unwrap();
    assert!(t.set_element_values_from_slice(&[9.0]).is_err());
    assert!(t.set_single_element_value(9.0, 2).is_err());
    assert_eq!(t.values(), vec![1.0, 2.0]);
}

#[test]
fn test_arg_max_after_operations() {
    let logits = Tensor::from_values(&[4], &[0.1, 0.7, 0.2, 0.4], false).unwrap();
    let boosted = logits
        .add(&Tensor::from_values(&[4], &[0.0, 0.0, 1.0, 0.0], false).unwrap())
        .unwrap();

    assert_eq!(logits.arg_max().unwrap(), 1);
    assert_eq!(boosted.arg_max().unwrap(), 2);
}

/// One gradient-descent step on a linear layer lowers the squared error.
#[test]
fn test_dense_layer_training_step_reduces_loss() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut weights = Tensor::random_normal_with_rng(&[1, 3], true, &mut rng);
    let inputs = Tensor::from_values(&[3, 2], &[1.0, 0.5, -1.0, 2.0, 0.0, 1.0], false).unwrap();
    let targets = Tensor::from_values(&[1, 2], &[1.0, -1.0], false).unwrap();

    let loss_of = |w: &Tensor| {
        let prediction = w.matrix_mult(&inputs).unwrap();
        let error = prediction.sub(&targets).unwrap();
        error.hadamard_mult(&error).unwrap().sum(1).unwrap()
    };

    let before = {
        let loss = loss_of(&weights);
        loss.backward().unwrap();
        loss.element_value_at(0).unwrap()
    };

    let grad = weights.grad().unwrap();
    let step = grad.scalar_mult(&Tensor::scalar(0.05, false)).unwrap();
    let updated = weights.sub(&step).unwrap();
    weights.set_element_values(&updated).unwrap();
    drop(updated);

    let after = loss_of(&weights).element_value_at(0).unwrap();
    assert!(after < before, "loss {before} -> {after}");
}
