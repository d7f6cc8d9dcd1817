//! Property-based tests for the view algebra.
//!
//! Each property is checked over random shapes of order one to four, which
//! covers scalars-in-disguise (all dimensions `1`), vectors, matrices and
//! batched matrices.

use lazytensor::shape::{increment_indices};
use lazytensor::{Cursor, Tensor, View};
use proptest::prelude::*;

// ============================================================================
// Test Utilities
// ============================================================================

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Strategy for generating valid shapes.
fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..5, 1..=4)
}

/// A tensor whose elements are distinct, so that misplaced reads show up.
fn iota(shape: &[usize]) -> Tensor<i64> {
    let mut n = 0;
    Tensor::from_fn(shape, |_| {
        n += 1;
        n - 1
    })
    .unwrap()
}

/// Asserts that the iterator and `at()` agree on every element, and that a
/// cursor driven by `steps` agrees with `at()` wherever it lands.
fn assert_agrees<V: View>(v: &V, steps: &[isize]) -> Result<(), TestCaseError>
where
    V::T: PartialEq + std::fmt::Debug,
{
    let mut index = vec![0; v.order()];
    for x in v.iter() {
        prop_assert_eq!(x, v.at(&index));
        increment_indices(v.shape(), &mut index);
    }
    let len = v.len() as isize;
    let mut cursor = v.cursor();
    let mut address = 0;
    for &step in steps {
        let target = step.rem_euclid(len);
        cursor.advance(target - address);
        address = target;
        prop_assert_eq!(cursor.read(), v.at(&v.layout().indices(address as usize)));
    }
    let forwards: Vec<_> = v.iter().collect();
    let mut backwards: Vec<_> = v.iter().rev().collect();
    backwards.reverse();
    prop_assert_eq!(forwards, backwards);
    Ok(())
}

// ============================================================================
// Transpose Properties
// ============================================================================

proptest! {
    /// Property: transposing twice by the same axes is the identity
    #[test]
    fn prop_transpose_involution(shape in shape_strategy(), x in 0usize..4, y in 0usize..4) {
        init();
        let a = iota(&shape);
        let (x, y) = ((x % shape.len()) as isize, (y % shape.len()) as isize);
        let b = (&a).transpose(x, y).unwrap().transpose(x, y).unwrap();
        prop_assert_eq!(b.collect(), a);
    }

    /// Property: negative axes mean the same as their positive counterparts
    #[test]
    fn prop_negative_axes(shape in shape_strategy(), x in 0usize..4, y in 0usize..4) {
        let a = iota(&shape);
        let order = shape.len() as isize;
        let (x, y) = (x as isize % order, y as isize % order);
        prop_assert_eq!(
            (&a).transpose(x - order, y - order).unwrap().collect(),
            (&a).transpose(x, y).unwrap().collect()
        );
    }

    /// Property: a chain of transposes reads like the permuted tensor
    #[test]
    fn prop_transpose_chain(
        shape in prop::collection::vec(1usize..5, 2..=4),
        swaps in prop::collection::vec((0usize..4, 0usize..4), 1..6),
        steps in prop::collection::vec(any::<isize>(), 0..20),
    ) {
        let a = iota(&shape);
        let order = shape.len();
        let mut permutation: Vec<usize> = (0..order).collect();
        let (x, y) = (swaps[0].0 % order, swaps[0].1 % order);
        permutation.swap(x, y);
        let mut m = (&a).transpose(x as isize, y as isize).unwrap().t().unwrap();
        permutation.swap(order - 1, order - 2);
        for &(x, y) in &swaps[1..] {
            let (x, y) = (x % order, y % order);
            m.transpose_mut(x as isize, y as isize).unwrap();
            permutation.swap(x, y);
        }
        prop_assert_eq!(m.permutation(), permutation.as_slice());
        let expected: Vec<usize> = permutation.iter().map(|&axis| shape[axis]).collect();
        prop_assert_eq!(m.shape(), expected.as_slice());
        prop_assert_eq!(m.len(), a.len());
        assert_agrees(&m, &steps)?;
    }
}

// ============================================================================
// Reshape and Pad Properties
// ============================================================================

proptest! {
    /// Property: reshaping and reshaping back reproduces the elements
    #[test]
    fn prop_reshape_round_trip(shape in shape_strategy(), steps in prop::collection::vec(any::<isize>(), 0..20)) {
        let a = iota(&shape);
        let reversed: Vec<usize> = shape.iter().rev().cloned().collect();
        let b = (&a).reshape(&reversed).unwrap();
        assert_agrees(&b, &steps)?;
        prop_assert!(b.iter().eq(a.iter()));
        let flat = (&a).reshape(&[a.len()]).unwrap().reshape(&shape).unwrap();
        prop_assert_eq!(flat.collect(), a);
    }

    /// Property: padding keeps upstream elements and fills the rest
    #[test]
    fn prop_pad(
        (shape, target) in shape_strategy().prop_flat_map(|shape| {
            let target = prop::collection::vec(1usize..6, shape.len());
            (Just(shape), target)
        }),
        steps in prop::collection::vec(any::<isize>(), 0..20),
    ) {
        let a = iota(&shape);
        let b = (&a).pad(&target, -1).unwrap();
        prop_assert_eq!(b.shape(), target.as_slice());
        let mut index = vec![0; target.len()];
        for x in b.iter() {
            let inside = index.iter().zip(&shape).all(|(&i, &d)| i < d);
            prop_assert_eq!(x, if inside { a.at(&index) } else { -1 });
            increment_indices(&target, &mut index);
        }
        assert_agrees(&b, &steps)?;
    }
}

// ============================================================================
// Broadcast, Reduction and Product Properties
// ============================================================================

proptest! {
    /// Property: a column plus a row is the table of sums
    #[test]
    fn prop_broadcast_sum(m in 1usize..6, n in 1usize..6, steps in prop::collection::vec(any::<isize>(), 0..20)) {
        let a = Tensor::from_fn(&[m, 1], |i| 7 * i[0] as i64).unwrap();
        let b = Tensor::from_fn(&[1, n], |i| 1000 * i[1] as i64).unwrap();
        let c = &a + &b;
        prop_assert_eq!(c.shape(), &[m, n][..]);
        for i in 0..m {
            for j in 0..n {
                prop_assert_eq!(c.at(&[i, j]), a.at(&[i, 0]) + b.at(&[0, j]));
            }
        }
        assert_agrees(&c, &steps)?;
    }

    /// Property: summing an axis adds up exactly the elements along it
    #[test]
    fn prop_sum_axis(shape in shape_strategy(), axis in 0usize..4, steps in prop::collection::vec(any::<isize>(), 0..20)) {
        let a = iota(&shape);
        let axis = axis % shape.len();
        let s = (&a).sum_axis(axis as isize).unwrap();
        let mut expected_shape = shape.clone();
        expected_shape.remove(axis);
        if expected_shape.is_empty() { expected_shape.push(1); }
        prop_assert_eq!(s.shape(), expected_shape.as_slice());
        prop_assert_eq!(s.iter().sum::<i64>(), a.iter().sum::<i64>());
        assert_agrees(&s, &steps)?;
    }

    /// Property: the product matches the textbook triple loop
    #[test]
    fn prop_matmul(m in 1usize..5, k in 1usize..5, n in 1usize..5, batch in 1usize..4) {
        init();
        let a = Tensor::from_fn(&[batch, m, k], |i| (i[0] + 2 * i[1]) as i64 - i[2] as i64).unwrap();
        let b = Tensor::from_fn(&[k, n], |i| (3 * i[0] + i[1]) as i64).unwrap();
        let ab = a.matmul(&b).unwrap();
        prop_assert_eq!(ab.shape(), &[batch, m, n][..]);
        for x in 0..batch {
            for r in 0..m {
                for c in 0..n {
                    let expected: i64 = (0..k).map(|i| a.at(&[x, r, i]) * b.at(&[i, c])).sum();
                    prop_assert_eq!(ab.at(&[x, r, c]), expected);
                }
            }
        }
        let wrong = Tensor::full(&[k + 1, n], 0i64).unwrap();
        prop_assert!(a.matmul(&wrong).is_err());
    }
}
