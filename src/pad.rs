use smallvec::{SmallVec};

use super::{Error, Result, Layout, View, Cursor};
use super::cursor::{Odometer};
use super::ops::{impl_ops_for_view};

/// The return type of [`View::pad()`].
///
/// Grows or shrinks each axis of `V` independently, keeping the origin fixed.
/// Elements at indices that lie beyond the bounds of `V` read as a fixed fill
/// value. Cropping an axis is padding it to a smaller size.
#[derive(Debug, Clone)]
pub struct Pad<V: View> {
    upstream: V,
    layout: Layout,
    fill: V::T,
    /// The axes that grew, each with the size it had upstream.
    padded: SmallVec<[(usize, usize); 6]>,
}

impl<V: View> Pad<V> {
    pub(crate) fn new(upstream: V, shape: &[usize], fill: V::T) -> Result<Self> {
        if shape.len() != upstream.order() {
            return Err(Error::OrderMismatch { expected: upstream.order(), actual: shape.len() });
        }
        let layout = Layout::new(shape)?;
        let padded = upstream.shape().iter().zip(shape).enumerate().filter_map(
            |(axis, (&old, &new))| if new > old { Some((axis, old)) } else { None }
        ).collect();
        Ok(Self {upstream, layout, fill, padded})
    }

    /// The value of elements outside the upstream bounds.
    pub fn fill(&self) -> &V::T { &self.fill }
}

impl<V: View> View for Pad<V> {
    type T = V::T;
    type Cursor<'a> = PadCursor<'a, V::Cursor<'a>, V::T> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }

    fn at(&self, index: &[usize]) -> Self::T {
        for &(axis, bound) in self.padded.iter().rev() {
            if index[axis] >= bound { return self.fill.clone(); }
        }
        self.upstream.at(index)
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let strides = self.upstream.layout().chunks().iter().map(|&c| c as isize).collect();
        PadCursor {
            odometer: Odometer::new(self.layout.shape(), strides),
            address: 0,
            upstream: self.upstream.cursor(),
            upstream_address: 0,
            padded: &self.padded,
            fill: &self.fill,
            inside: true,
        }
    }
}

impl_ops_for_view!([V: View] Pad<V>);

// ----------------------------------------------------------------------------

/// The return type of [`Pad::cursor()`](View::cursor()).
///
/// Tracks where the upstream cursor would be if the upstream view were big
/// enough, and only moves the real upstream cursor when that position is
/// within bounds.
#[derive(Debug, Clone)]
pub struct PadCursor<'a, C, T> {
    odometer: Odometer,
    /// The upstream address of the current index, which may not exist.
    address: isize,
    upstream: C,
    /// The upstream address of `upstream`.
    upstream_address: isize,
    padded: &'a [(usize, usize)],
    fill: &'a T,
    inside: bool,
}

impl<'a, C: Cursor<T=T>, T: Clone> Cursor for PadCursor<'a, C, T> {
    type T = T;

    #[inline(always)]
    fn read(&self) -> T {
        if self.inside { self.upstream.read() } else { self.fill.clone() }
    }

    fn advance(&mut self, steps: isize) {
        self.address += self.odometer.advance(steps);
        let index = self.odometer.index();
        self.inside = self.padded.iter().all(|&(axis, bound)| index[axis] < bound);
        if self.inside && self.address != self.upstream_address {
            self.upstream.advance(self.address - self.upstream_address);
            self.upstream_address = self.address;
        }
    }
}

// ----------------------------------------------------------------------------
