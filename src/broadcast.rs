use std::sync::{Arc};

use smallvec::{SmallVec};

use super::{Error, Result, Layout, View};
use super::shape::{Dims, broadcast_shapes};
use super::cursor::{Odometer, StridedCursor};
use super::ops::{impl_ops_for_view};

/// For each axis of a shape with `order` axes, how far to move within
/// `upstream` when that axis moves by one, if `upstream` is broadcast to that
/// shape.
///
/// Leading axes that `upstream` lacks, and axes where `upstream` has size `1`,
/// get stride zero.
pub(crate) fn broadcast_strides(upstream: &Layout, order: usize) -> SmallVec<[isize; 6]> {
    let offset = order - upstream.order();
    (0..order).map(|axis| {
        if axis < offset { return 0; }
        let axis = axis - offset;
        if upstream.shape()[axis] == 1 { 0 } else { upstream.chunks()[axis] as isize }
    }).collect()
}

// ----------------------------------------------------------------------------

/// The return type of [`View::broadcast_to()`]. Also one half of a
/// [`BroadcastPair`].
///
/// Looks like `V` repeated along every axis where `V` has size `1`, and along
/// any leading axes that `V` doesn't have.
#[derive(Debug, Clone)]
pub struct Broadcast<V> {
    upstream: V,
    layout: Arc<Layout>,
    /// The number of leading axes that `upstream` doesn't have.
    offset: usize,
    strides: SmallVec<[isize; 6]>,
}

impl<V: View> Broadcast<V> {
    /// `layout` must be the result of broadcasting `upstream` with something.
    fn new(upstream: V, layout: Arc<Layout>) -> Self {
        let offset = layout.order() - upstream.order();
        let strides = broadcast_strides(upstream.layout(), layout.order());
        Self {upstream, layout, offset, strides}
    }

    pub(crate) fn to_shape(upstream: V, shape: &[usize]) -> Result<Self> {
        let broadcast = broadcast_shapes(upstream.shape(), shape)?;
        if broadcast.as_slice() != shape {
            return Err(Error::IncompatibleShapes {
                left: upstream.shape().to_vec(),
                right: shape.to_vec(),
            });
        }
        Ok(Self::new(upstream, Arc::new(Layout::new(shape)?)))
    }
}

impl<V: View> View for Broadcast<V> {
    type T = V::T;
    type Cursor<'a> = StridedCursor<V::Cursor<'a>> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }

    fn at(&self, index: &[usize]) -> Self::T {
        let index = &index[self.offset..];
        let upstream_index: Dims = self.upstream.shape().iter().zip(index).map(
            |(&dim, &i)| if dim == 1 { 0 } else { i }
        ).collect();
        self.upstream.at(&upstream_index)
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let odometer = Odometer::new(self.layout.shape(), self.strides.clone());
        StridedCursor::new(odometer, self.upstream.cursor())
    }
}

impl_ops_for_view!([V] Broadcast<V>);

// ----------------------------------------------------------------------------

/// Two [`View`]s broadcast to a common shape.
///
/// The common [`Layout`] is computed once and shared by both halves, so they
/// always agree on shape and iteration order.
#[derive(Debug, Clone)]
pub struct BroadcastPair<A, B> {
    layout: Arc<Layout>,
    first: Broadcast<A>,
    second: Broadcast<B>,
}

impl<A: View, B: View> BroadcastPair<A, B> {
    /// Fails with [`Error::IncompatibleShapes`] if the shapes of `first` and
    /// `second` cannot be broadcast together.
    pub fn new(first: A, second: B) -> Result<Self> {
        let shape = broadcast_shapes(first.shape(), second.shape())?;
        log::trace!("broadcasting {:?} with {:?} to {:?}", first.shape(), second.shape(), shape);
        let layout = Arc::new(Layout::new(&shape)?);
        Ok(Self {
            first: Broadcast::new(first, layout.clone()),
            second: Broadcast::new(second, layout.clone()),
            layout,
        })
    }

    /// The common layout.
    pub fn layout(&self) -> &Layout { &self.layout }

    pub fn first(&self) -> &Broadcast<A> { &self.first }

    pub fn second(&self) -> &Broadcast<B> { &self.second }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tensor, Cursor};

    #[test]
    fn strides() {
        let layout = Layout::new(&[3, 1, 4]).unwrap();
        assert_eq!(broadcast_strides(&layout, 4).as_slice(), [0, 4, 0, 1]);
    }

    #[test]
    fn repeat() {
        let a = Tensor::new(&[3, 1], [1, 2, 3]).unwrap();
        let b = (&a).broadcast_to(&[2, 3, 4]).unwrap();
        assert_eq!(b.shape(), [2, 3, 4]);
        assert_eq!(b.len(), 24);
        let mut index = [0; 3];
        for x in b.iter() {
            assert_eq!(x, a.at(&[index[1], 0]));
            assert_eq!(x, b.at(&index));
            crate::shape::increment_indices(b.shape(), &mut index);
        }
    }

    #[test]
    fn incompatible() {
        let a = Tensor::new(&[2, 3], [0; 6]).unwrap();
        assert_eq!(
            (&a).broadcast_to(&[3]).err(),
            Some(Error::IncompatibleShapes { left: vec![2, 3], right: vec![3] }),
        );
        // Broadcasting can't shrink.
        assert!((&a).broadcast_to(&[1, 3]).is_err());
        assert!((&a).broadcast_to(&[4, 3]).is_err());
    }

    #[test]
    fn pair() {
        let a = Tensor::new(&[3, 1], [1, 2, 3]).unwrap();
        let b = Tensor::new(&[4], [10, 20, 30, 40]).unwrap();
        let pair = BroadcastPair::new(&a, &b).unwrap();
        assert_eq!(pair.layout().shape(), [3, 4]);
        assert_eq!(pair.first().shape(), [3, 4]);
        assert_eq!(pair.second().shape(), [3, 4]);
        assert_eq!(pair.first().iter().collect::<Vec<_>>(), [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
        assert_eq!(pair.second().at(&[2, 1]), 20);
        assert!(BroadcastPair::new(&a, &Tensor::new(&[2], [0, 0]).unwrap()).is_ok());
        assert!(BroadcastPair::new(&b, &Tensor::new(&[3], [0, 0, 0]).unwrap()).is_err());
    }

    #[test]
    fn operators() {
        let a = Tensor::new(&[3], [1, 2, 3]).unwrap();
        let b = Tensor::new(&[2, 1], [10, 20]).unwrap();
        let c = (&a).broadcast_to(&[2, 3]).unwrap() + &b;
        assert_eq!(c.shape(), [2, 3]);
        assert_eq!(c.iter().collect::<Vec<_>>(), [11, 12, 13, 21, 22, 23]);
        let d = (&a).broadcast_to(&[2, 3]).unwrap() - (&a).broadcast_to(&[1, 3]).unwrap();
        assert!(d.iter().all(|x| x == 0));
        let ones = Tensor::full(&[3, 2], 1).unwrap();
        let p = (&a).broadcast_to(&[2, 3]).unwrap() * &ones;
        assert_eq!(p.shape(), [2, 2]);
        assert_eq!(p.as_ref(), [6, 6, 6, 6]);
    }

    #[test]
    fn send_and_sync() {
        fn check<T: Send + Sync>(_: &T) {}
        let a = Tensor::new(&[3], [1, 2, 3]).unwrap();
        let b = Tensor::new(&[2, 1], [10, 20]).unwrap();
        check(&(&a).broadcast_to(&[4, 3]).unwrap());
        check(&BroadcastPair::new(&a, &b).unwrap());
        check(&(&a + &b));
    }

    #[test]
    fn cursor_jumps() {
        let a = Tensor::new(&[1, 3], [1, 2, 3]).unwrap();
        let b = a.broadcast_to(&[5, 3]).unwrap();
        let mut c = b.cursor();
        c.advance(13);
        assert_eq!(c.read(), b.at(&[4, 1]));
        c.advance(-8);
        assert_eq!(c.read(), b.at(&[1, 2]));
    }
}
