use super::{Layout, View, Cursor, StridedCursor, BroadcastPair};
use super::ops::{Apply, Combine, impl_ops_for_view};

/// The return type of [`View::map()`] and [`View::scale()`].
#[derive(Debug, Copy, Clone)]
pub struct Map<V, F>(V, F);

impl<V: View, F: Apply<V::T>> Map<V, F> where F::Output: Clone {
    pub fn new(upstream: V, f: F) -> Self { Map(upstream, f) }
}

impl<V: View, F: Apply<V::T>> View for Map<V, F> where F::Output: Clone {
    type T = F::Output;
    type Cursor<'a> = MapCursor<'a, V::Cursor<'a>, F> where Self: 'a;
    #[inline(always)]
    fn layout(&self) -> &Layout { self.0.layout() }
    #[inline(always)]
    fn at(&self, index: &[usize]) -> Self::T { self.1.apply(self.0.at(index)) }
    #[inline(always)]
    fn cursor(&self) -> Self::Cursor<'_> { MapCursor(self.0.cursor(), &self.1) }
}

impl_ops_for_view!([V, F] Map<V, F>);

/// The return type of [`Map::cursor()`](View::cursor()).
#[derive(Debug)]
pub struct MapCursor<'a, C, F>(C, &'a F);

impl<'a, C: Clone, F> Clone for MapCursor<'a, C, F> {
    fn clone(&self) -> Self { MapCursor(self.0.clone(), self.1) }
}

impl<'a, C: Cursor, F: Apply<C::T>> Cursor for MapCursor<'a, C, F> {
    type T = F::Output;
    #[inline(always)]
    fn read(&self) -> Self::T { self.1.apply(self.0.read()) }
    #[inline(always)]
    fn advance(&mut self, steps: isize) { self.0.advance(steps) }
}

// ----------------------------------------------------------------------------

/// The return type of [`View::binary()`], [`View::zip_with()`] and of the
/// `+` and `-` operators.
///
/// Reads the corresponding elements of both halves of a [`BroadcastPair`] and
/// combines them with `F`.
#[derive(Debug, Clone)]
pub struct Zip<A, B, F> {
    pair: BroadcastPair<A, B>,
    f: F,
}

impl<A: View, B: View, F: Combine<A::T, B::T>> Zip<A, B, F> where F::Output: Clone {
    pub fn new(pair: BroadcastPair<A, B>, f: F) -> Self { Self {pair, f} }

    pub fn pair(&self) -> &BroadcastPair<A, B> { &self.pair }
}

impl<A: View, B: View, F: Combine<A::T, B::T>> View for Zip<A, B, F> where F::Output: Clone {
    type T = F::Output;
    type Cursor<'a> = ZipCursor<'a, StridedCursor<A::Cursor<'a>>, StridedCursor<B::Cursor<'a>>, F> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { self.pair.layout() }

    #[inline(always)]
    fn at(&self, index: &[usize]) -> Self::T {
        self.f.combine(self.pair.first().at(index), self.pair.second().at(index))
    }

    fn cursor(&self) -> Self::Cursor<'_> {
        ZipCursor {
            first: self.pair.first().cursor(),
            second: self.pair.second().cursor(),
            f: &self.f,
        }
    }
}

impl_ops_for_view!([A, B, F] Zip<A, B, F>);

/// The return type of [`Zip::cursor()`](View::cursor()). Moves two cursors
/// in lockstep.
#[derive(Debug)]
pub struct ZipCursor<'a, C, D, F> {
    first: C,
    second: D,
    f: &'a F,
}

impl<'a, C: Clone, D: Clone, F> Clone for ZipCursor<'a, C, D, F> {
    fn clone(&self) -> Self {
        Self {first: self.first.clone(), second: self.second.clone(), f: self.f}
    }
}

impl<'a, C: Cursor, D: Cursor, F: Combine<C::T, D::T>> Cursor for ZipCursor<'a, C, D, F> {
    type T = F::Output;

    #[inline(always)]
    fn read(&self) -> Self::T { self.f.combine(self.first.read(), self.second.read()) }

    #[inline(always)]
    fn advance(&mut self, steps: isize) {
        self.first.advance(steps);
        self.second.advance(steps);
    }
}

// ----------------------------------------------------------------------------
