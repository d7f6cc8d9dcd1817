use smallvec::{SmallVec};

use super::{Result, Layout, View, StridedCursor};
use super::shape::{Dims, normalize_axis};
use super::cursor::{Odometer};
use super::ops::{impl_ops_for_view};

/// The upstream chunk sizes as signed strides.
fn strides_of(layout: &Layout) -> SmallVec<[isize; 6]> {
    layout.chunks().iter().map(|&c| c as isize).collect()
}

/// The return type of [`View::transpose()`] and [`View::t()`].
///
/// Looks like `V` with two axes swapped. Calling `transpose()` again on a
/// `Transpose` that you own gives a [`MultiTranspose`], so that a chain of
/// transpositions costs one permutation lookup per element, however long it
/// is.
///
/// ```
/// use lazytensor::{View, Tensor};
/// let a = Tensor::from_fn(&[2, 3, 4, 5], |i| i.to_vec()).unwrap();
/// let b = (&a).transpose(0, 1).unwrap().transpose(1, 2).unwrap().transpose(2, 3).unwrap();
/// assert_eq!(b.shape(), [3, 4, 5, 2]);
/// assert_eq!(b.at(&[2, 1, 4, 0]), [0, 2, 1, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Transpose<V> {
    upstream: V,
    layout: Layout,
    /// The more-trailing of the two axes.
    axis1: usize,
    axis2: usize,
    strides: SmallVec<[isize; 6]>,
}

impl<V: View> Transpose<V> {
    /// Fails with [`Error::AxisOutOfRange`] if either axis is not in
    /// `-order..order`.
    ///
    /// [`Error::AxisOutOfRange`]: super::Error::AxisOutOfRange
    pub(crate) fn new(upstream: V, axis1: isize, axis2: isize) -> Result<Self> {
        let a = normalize_axis(axis1, upstream.order())?;
        let b = normalize_axis(axis2, upstream.order())?;
        let (axis1, axis2) = (a.max(b), a.min(b));
        let mut layout = upstream.layout().clone();
        layout.swap_axes(axis1, axis2);
        let mut strides = strides_of(upstream.layout());
        strides.swap(axis1, axis2);
        Ok(Self {upstream, layout, axis1, axis2, strides})
    }

    /// The two swapped axes, more-trailing first.
    pub fn axes(&self) -> (usize, usize) { (self.axis1, self.axis2) }

    /// Swap two more axes, collapsing `self` into a [`MultiTranspose`].
    ///
    /// This shadows [`View::transpose()`]. To add a layer instead, transpose
    /// a reference: `(&t).transpose(a, b)`.
    pub fn transpose(self, axis1: isize, axis2: isize) -> Result<MultiTranspose<V>> {
        let mut multi = MultiTranspose::from(self);
        multi.transpose_mut(axis1, axis2)?;
        Ok(multi)
    }

    /// Swap the last two axes, collapsing `self` into a [`MultiTranspose`].
    pub fn t(self) -> Result<MultiTranspose<V>> { self.transpose(-1, -2) }
}

impl<V: View> View for Transpose<V> {
    type T = V::T;
    type Cursor<'a> = StridedCursor<V::Cursor<'a>> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }

    #[inline(always)]
    fn at(&self, index: &[usize]) -> Self::T {
        let mut upstream_index: Dims = index.into();
        upstream_index.swap(self.axis1, self.axis2);
        self.upstream.at(&upstream_index)
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let odometer = Odometer::new(self.layout.shape(), self.strides.clone());
        StridedCursor::new(odometer, self.upstream.cursor())
    }
}

impl_ops_for_view!([V] Transpose<V>);

// ----------------------------------------------------------------------------

/// Looks like `V` with its axes permuted.
///
/// You get one of these by calling `transpose()` on a [`Transpose`] that you
/// own. [`MultiTranspose::transpose_mut()`] swaps two more axes in place for
/// free. Calling [`View::transpose()`] wraps `self` in another [`Transpose`].
#[derive(Debug, Clone)]
pub struct MultiTranspose<V> {
    upstream: V,
    layout: Layout,
    /// For each logical axis, the upstream axis it reads.
    to_upstream: Dims,
    /// The inverse of `to_upstream`.
    to_logical: Dims,
    strides: SmallVec<[isize; 6]>,
}

impl<V: View> MultiTranspose<V> {
    /// For each axis of `self`, the corresponding axis of the upstream view.
    pub fn permutation(&self) -> &[usize] { &self.to_upstream }

    /// Swap axes `axis1` and `axis2` of `self` in place.
    ///
    /// Fails with [`Error::AxisOutOfRange`] if either axis is not in
    /// `-order..order`, in which case `self` is unchanged.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::from_fn(&[2, 3, 4], |i| i.to_vec()).unwrap();
    /// let mut b = a.transpose(0, 1).unwrap().transpose(0, 2).unwrap();
    /// b.transpose_mut(-1, -2).unwrap();
    /// assert_eq!(b.shape(), [4, 3, 2]);
    /// assert_eq!(b.permutation(), [2, 1, 0]);
    /// ```
    ///
    /// [`Error::AxisOutOfRange`]: super::Error::AxisOutOfRange
    pub fn transpose_mut(&mut self, axis1: isize, axis2: isize) -> Result<&mut Self> {
        let a = normalize_axis(axis1, self.order())?;
        let b = normalize_axis(axis2, self.order())?;
        self.to_upstream.swap(a, b);
        for (logical, &upstream) in self.to_upstream.iter().enumerate() {
            self.to_logical[upstream] = logical;
        }
        self.layout.swap_axes(a, b);
        self.strides.swap(a, b);
        log::trace!("collapsed transpose({}, {}) into permutation {:?}", a, b, self.to_upstream);
        Ok(self)
    }
}

impl<V: View> From<Transpose<V>> for MultiTranspose<V> {
    fn from(t: Transpose<V>) -> Self {
        let mut to_upstream: Dims = (0..t.order()).collect();
        to_upstream.swap(t.axis1, t.axis2);
        let to_logical = to_upstream.clone();
        Self {upstream: t.upstream, layout: t.layout, to_upstream, to_logical, strides: t.strides}
    }
}

impl<V: View> View for MultiTranspose<V> {
    type T = V::T;
    type Cursor<'a> = StridedCursor<V::Cursor<'a>> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }

    #[inline(always)]
    fn at(&self, index: &[usize]) -> Self::T {
        let upstream_index: Dims = self.to_logical.iter().map(|&axis| index[axis]).collect();
        self.upstream.at(&upstream_index)
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        let odometer = Odometer::new(self.layout.shape(), self.strides.clone());
        StridedCursor::new(odometer, self.upstream.cursor())
    }
}

impl_ops_for_view!([V] MultiTranspose<V>);

// ----------------------------------------------------------------------------
