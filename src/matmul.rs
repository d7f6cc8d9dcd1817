use std::ops::{Add, Mul};

use num_traits::{Zero};

use super::{Error, Result, Layout, View, Cursor, Tensor, DenseCursor};
use super::broadcast::{broadcast_strides};
use super::shape::{broadcast_shapes};
use super::cursor::{Odometer};
use super::ops::{impl_ops_for_view};

/// The return type of [`View::matmul()`] and of the `*` operator.
///
/// Unlike every other `View` in this crate, a `MatMul` is not lazy: the whole
/// product is computed when it is constructed, and stored in a [`Tensor`].
/// Construction costs `O(m * k * n)` per batch. After that, a `MatMul`
/// behaves exactly like the `Tensor` it owns.
///
/// The last two axes of each operand are the matrices. The remaining leading
/// axes are broadcast together, and a product is computed for each
/// combination of leading indices.
///
/// ```
/// use lazytensor::{View, Tensor};
/// let a = Tensor::new(&[2, 1, 1, 2], [1, 0, 0, 1]).unwrap();
/// let b = Tensor::new(&[3, 2, 2], [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();
/// let ab = a.matmul(&b).unwrap();
/// assert_eq!(ab.shape(), [2, 3, 1, 2]);
/// assert_eq!(ab.at(&[0, 2, 0, 1]), 10);
/// assert_eq!(ab.at(&[1, 2, 0, 1]), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MatMul<T> {
    product: Tensor<T>,
}

impl<T> MatMul<T> where T: Clone + Zero + Add<Output=T> + Mul<Output=T> {
    /// Fails with [`Error::DimensionMismatch`] if either operand has fewer
    /// than two axes, or if the number of columns of `a` differs from the
    /// number of rows of `b`. Fails with [`Error::IncompatibleShapes`] if the
    /// leading axes cannot be broadcast together.
    pub fn new<A: View<T=T>, B: View<T=T>>(a: &A, b: &B) -> Result<Self> {
        let mismatch = |reason| Error::DimensionMismatch {
            left: a.shape().to_vec(),
            right: b.shape().to_vec(),
            reason,
        };
        if a.order() < 2 || b.order() < 2 {
            return Err(mismatch("both operands need at least two axes"));
        }
        let (a_lead, a_matrix) = a.shape().split_at(a.order() - 2);
        let (b_lead, b_matrix) = b.shape().split_at(b.order() - 2);
        let (m, k, n) = (a_matrix[0], a_matrix[1], b_matrix[1]);
        if k != b_matrix[0] {
            return Err(mismatch("inner dimensions differ"));
        }
        let lead = broadcast_shapes(a_lead, b_lead)?;
        let mut shape = lead.clone();
        shape.extend_from_slice(&[m, n]);
        let layout = Layout::new(&shape)?;

        // Batch strides, in elements.
        let a_strides = broadcast_strides(&Layout::new(a_lead)?, lead.len()).into_iter()
            .map(|s| s * (m * k) as isize).collect();
        let b_strides = broadcast_strides(&Layout::new(b_lead)?, lead.len()).into_iter()
            .map(|s| s * (k * n) as isize).collect();
        let mut a_odometer = Odometer::new(&lead, a_strides);
        let mut b_odometer = Odometer::new(&lead, b_strides);
        let batches = layout.capacity() / (m * n);

        let mut items = Vec::with_capacity(layout.capacity());
        let mut a_batch = a.cursor();
        let mut b_batch = b.cursor();
        for batch in 0..batches {
            let mut a_row = a_batch.clone();
            for row in 0..m {
                let mut b_col = b_batch.clone();
                for col in 0..n {
                    let mut a_k = a_row.clone();
                    let mut b_k = b_col.clone();
                    let mut sum = T::zero();
                    for i in 0..k {
                        sum = sum + a_k.read() * b_k.read();
                        if i + 1 < k {
                            a_k.advance(1);
                            b_k.advance(n as isize);
                        }
                    }
                    items.push(sum);
                    if col + 1 < n { b_col.advance(1); }
                }
                if row + 1 < m { a_row.advance(k as isize); }
            }
            if batch + 1 < batches {
                let da = a_odometer.advance(1);
                if da != 0 { a_batch.advance(da); }
                let db = b_odometer.advance(1);
                if db != 0 { b_batch.advance(db); }
            }
        }
        log::debug!("multiplied {:?} by {:?} giving {:?}", a.shape(), b.shape(), shape);
        let product = Tensor::new(&shape, items)?;
        Ok(Self {product})
    }
}

impl<T> MatMul<T> {
    /// Returns the product.
    pub fn into_tensor(self) -> Tensor<T> { self.product }

    pub fn tensor(&self) -> &Tensor<T> { &self.product }
}

impl<T> AsRef<[T]> for MatMul<T> {
    fn as_ref(&self) -> &[T] { self.product.as_ref() }
}

impl<T: Clone> View for MatMul<T> {
    type T = T;
    type Cursor<'a> = DenseCursor<'a, T> where Self: 'a;
    #[inline(always)]
    fn layout(&self) -> &Layout { self.product.layout() }
    #[inline(always)]
    fn at(&self, index: &[usize]) -> T { self.product.at(index) }
    #[inline(always)]
    fn cursor(&self) -> Self::Cursor<'_> { self.product.cursor() }
}

impl_ops_for_view!([T] MatMul<T>);

// ----------------------------------------------------------------------------
