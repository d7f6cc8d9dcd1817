//! Sequential access to [`View`]s.
//!
//! A [`Cursor`] is a position within the row-major element sequence of a
//! `View`. It can be moved by any number of steps, forwards or backwards, and
//! it maps each move incrementally onto a move of its upstream cursor, rather
//! than recomputing a multi-index from scratch. [`Iter`] wraps a pair of
//! cursors into a standard double-ended iterator.
//!
//! [`View`]: super::View

use smallvec::{SmallVec, smallvec};

use super::shape::{Dims};

/// A movable position within a [`View`].
///
/// A cursor must only ever be moved to positions in `0..len`, where `len` is
/// the length of the `View` it came from.
///
/// [`View`]: super::View
pub trait Cursor: Clone {
    type T;

    /// The element at the current position.
    fn read(&self) -> Self::T;

    /// Move by `steps` positions, which may be negative.
    fn advance(&mut self, steps: isize);
}

// ----------------------------------------------------------------------------

/// A double-ended iterator over the elements of a [`View`] in row-major
/// order.
///
/// `nth()` and `nth_back()` skip elements with a single [`Cursor::advance()`]
/// call instead of reading them.
///
/// [`View`]: super::View
#[derive(Debug, Clone)]
pub struct Iter<C> {
    front: C,
    back: C,
    remaining: usize,
}

impl<C: Cursor> Iter<C> {
    /// Iterate over `len` elements starting at `cursor`.
    pub fn new(cursor: C, len: usize) -> Self {
        let mut back = cursor.clone();
        if len > 1 { back.advance(len as isize - 1); }
        Self {front: cursor, back, remaining: len}
    }
}

impl<C: Cursor> Iterator for Iter<C> {
    type Item = C::T;

    fn next(&mut self) -> Option<C::T> {
        if self.remaining == 0 { return None; }
        let t = self.front.read();
        self.remaining -= 1;
        if self.remaining > 0 { self.front.advance(1); }
        Some(t)
    }

    fn nth(&mut self, n: usize) -> Option<C::T> {
        if n >= self.remaining {
            self.remaining = 0;
            return None;
        }
        if n > 0 {
            self.front.advance(n as isize);
            self.remaining -= n;
        }
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<C: Cursor> DoubleEndedIterator for Iter<C> {
    fn next_back(&mut self) -> Option<C::T> {
        if self.remaining == 0 { return None; }
        let t = self.back.read();
        self.remaining -= 1;
        if self.remaining > 0 { self.back.advance(-1); }
        Some(t)
    }

    fn nth_back(&mut self, n: usize) -> Option<C::T> {
        if n >= self.remaining {
            self.remaining = 0;
            return None;
        }
        if n > 0 {
            self.back.advance(-(n as isize));
            self.remaining -= n;
        }
        self.next_back()
    }
}

impl<C: Cursor> ExactSizeIterator for Iter<C> {}

// ----------------------------------------------------------------------------

/// Tracks a multi-index within a logical shape, and converts moves of the
/// logical flat address into moves along some other set of strides.
///
/// Moving by `k` steps touches only the axes that carry, so stepping by one
/// costs `O(1)` amortized.
#[derive(Debug, Clone)]
pub(crate) struct Odometer {
    shape: Dims,
    index: Dims,
    strides: SmallVec<[isize; 6]>,
}

impl Odometer {
    /// Start at index zero. `strides[axis]` is how far the other address moves
    /// when `axis` of the logical index moves by one.
    pub fn new(shape: &[usize], strides: SmallVec<[isize; 6]>) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {shape: shape.into(), index: smallvec![0; shape.len()], strides}
    }

    pub fn index(&self) -> &[usize] { &self.index }

    /// Move the logical address by `steps` and return the resulting
    /// displacement of the other address.
    #[inline]
    pub fn advance(&mut self, steps: isize) -> isize {
        let mut carry = steps;
        let mut displacement = 0;
        for axis in (0..self.shape.len()).rev() {
            if carry == 0 { break; }
            let dim = self.shape[axis] as isize;
            let old = self.index[axis] as isize;
            let new = old + carry;
            let wrapped = new.rem_euclid(dim);
            carry = new.div_euclid(dim);
            displacement += (wrapped - old) * self.strides[axis];
            self.index[axis] = wrapped as usize;
        }
        debug_assert_eq!(carry, 0, "cursor moved out of range");
        displacement
    }
}

/// A [`Cursor`] that walks a logical shape while moving an upstream cursor
/// along a different set of strides.
///
/// This serves broadcasting (stride zero on broadcast axes) and transposition
/// (permuted strides).
#[derive(Debug, Clone)]
pub struct StridedCursor<C> {
    odometer: Odometer,
    upstream: C,
}

impl<C: Cursor> StridedCursor<C> {
    pub(crate) fn new(odometer: Odometer, upstream: C) -> Self {
        Self {odometer, upstream}
    }
}

impl<C: Cursor> Cursor for StridedCursor<C> {
    type T = C::T;

    #[inline(always)]
    fn read(&self) -> C::T { self.upstream.read() }

    #[inline]
    fn advance(&mut self, steps: isize) {
        let displacement = self.odometer.advance(steps);
        if displacement != 0 { self.upstream.advance(displacement); }
    }
}

// ----------------------------------------------------------------------------
