use std::ops::{Add};

use num_traits::{Zero};

use super::{Result, Layout, View, Cursor};
use super::shape::{Dims, normalize_axis};
use super::ops::{impl_ops_for_view};

/// The return type of [`View::sum_axis()`].
///
/// Each element is the sum of a line of elements of `V` along the removed
/// axis. Nothing is cached: reading one element reads `V` as many times as the
/// removed axis is long.
#[derive(Debug, Clone)]
pub struct SumAxis<V> {
    upstream: V,
    layout: Layout,
    axis: usize,
    /// Upstream chunk size of `axis`.
    minor: usize,
    /// Upstream size of `axis`.
    count: usize,
}

impl<V: View> SumAxis<V> where V::T: Zero + Add<Output=V::T> {
    /// Fails with [`Error::AxisOutOfRange`] if `axis` is not in
    /// `-order..order`.
    ///
    /// [`Error::AxisOutOfRange`]: super::Error::AxisOutOfRange
    pub(crate) fn new(upstream: V, axis: isize) -> Result<Self> {
        let axis = normalize_axis(axis, upstream.order())?;
        let mut shape: Dims = upstream.shape().into();
        shape.remove(axis);
        if shape.is_empty() { shape.push(1); }
        let layout = Layout::new(&shape)?;
        let minor = upstream.layout().chunks()[axis];
        let count = upstream.shape()[axis];
        Ok(Self {upstream, layout, axis, minor, count})
    }

    /// The upstream axis that was removed.
    pub fn axis(&self) -> usize { self.axis }
}

impl<V: View> View for SumAxis<V> where V::T: Zero + Add<Output=V::T> {
    type T = V::T;
    type Cursor<'a> = SumCursor<V::Cursor<'a>> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }

    fn at(&self, index: &[usize]) -> Self::T {
        let mut upstream_index: Dims = if self.upstream.order() == 1 {
            Dims::from_elem(0, 1)
        } else {
            let mut i: Dims = index.into();
            i.insert(self.axis, 0);
            i
        };
        let mut sum = <V::T as Zero>::zero();
        for k in 0..self.count {
            upstream_index[self.axis] = k;
            sum = sum + self.upstream.at(&upstream_index);
        }
        sum
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        SumCursor {
            upstream: self.upstream.cursor(),
            position: 0,
            base: 0,
            minor: self.minor,
            major: self.minor * self.count,
            count: self.count,
        }
    }
}

impl_ops_for_view!([V] SumAxis<V>);

// ----------------------------------------------------------------------------

/// The return type of [`SumAxis::cursor()`](View::cursor()).
#[derive(Debug, Clone)]
pub struct SumCursor<C> {
    /// Positioned at the first summand of the current element.
    upstream: C,
    position: usize,
    /// The upstream address of `upstream`.
    base: usize,
    minor: usize,
    major: usize,
    count: usize,
}

impl<C: Cursor> Cursor for SumCursor<C> where C::T: Zero + Add<Output=C::T> {
    type T = C::T;

    fn read(&self) -> C::T {
        let mut c = self.upstream.clone();
        let mut sum = c.read();
        for _ in 1..self.count {
            c.advance(self.minor as isize);
            sum = sum + c.read();
        }
        sum
    }

    fn advance(&mut self, steps: isize) {
        self.position = (self.position as isize + steps) as usize;
        let base = (self.position / self.minor) * self.major + self.position % self.minor;
        self.upstream.advance(base as isize - self.base as isize);
        self.base = base;
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Tensor};
    use crate::shape::{increment_indices};

    fn check_agrees<V: View>(v: &V) where V::T: PartialEq + std::fmt::Debug {
        let mut index = vec![0; v.order()];
        for x in v.iter() {
            assert_eq!(x, v.at(&index));
            increment_indices(v.shape(), &mut index);
        }
    }

    #[test]
    fn middle_axis() {
        let a = Tensor::from_fn(&[2, 3, 4], |i| (100 * i[0] + 10 * i[1] + i[2]) as i64).unwrap();
        let s = (&a).sum_axis(1).unwrap();
        assert_eq!(s.shape(), [2, 4]);
        assert_eq!(s.axis(), 1);
        for i in 0..2 {
            for k in 0..4 {
                let expected: i64 = (0..3).map(|j| a.at(&[i, j, k])).sum();
                assert_eq!(s.at(&[i, k]), expected);
            }
        }
        assert_eq!(s.at(&[1, 3]), 300 + 30 + 9);
        check_agrees(&s);
    }

    #[test]
    fn every_axis() {
        let a = Tensor::from_fn(&[3, 2, 5], |i| (i[0] * i[1] + i[2]) as f64).unwrap();
        for axis in -3..3 {
            let s = (&a).sum_axis(axis).unwrap();
            assert_eq!(s.order(), 2);
            check_agrees(&s);
        }
        assert_eq!((&a).sum_axis(-1).unwrap().collect(), (&a).sum_axis(2).unwrap().collect());
        let total = (&a).sum_axis(0).unwrap().sum_axis(0).unwrap().sum_axis(0).unwrap();
        assert_eq!(total.shape(), [1]);
        assert_eq!(total.at(&[0]), a.iter().sum::<f64>());
    }

    #[test]
    fn order_one() {
        let a = Tensor::new(&[4], [1, 2, 3, 4]).unwrap();
        let s = (&a).sum_axis(0).unwrap();
        assert_eq!(s.shape(), [1]);
        assert_eq!(s.iter().collect::<Vec<_>>(), [10]);
        assert_eq!(s.at(&[0]), 10);
    }

    #[test]
    fn errors() {
        let a = Tensor::new(&[2, 2], [1, 2, 3, 4]).unwrap();
        assert_eq!((&a).sum_axis(2).err(), Some(Error::AxisOutOfRange { axis: 2, order: 2 }));
        let s = Tensor::new(&[], [1]).unwrap();
        assert_eq!(s.sum_axis(0).err(), Some(Error::AxisOutOfRange { axis: 0, order: 0 }));
    }

    #[test]
    fn cursor_random_steps() {
        let a = Tensor::from_fn(&[3, 4, 2, 5], |i| i.iter().fold(0, |n, &x| 10 * n + x as i32)).unwrap();
        let s = (&a).sum_axis(1).unwrap();
        assert_eq!(s.shape(), [3, 2, 5]);
        let mut cursor = s.cursor();
        let mut address = 0isize;
        for step in [13, -6, 22, 0, -29, 29, -1] {
            cursor.advance(step);
            address += step;
            assert_eq!(cursor.read(), s.at(&s.layout().indices(address as usize)));
        }
        assert!(s.iter().rev().eq(s.collect().as_ref().iter().rev().cloned()));
    }
}
