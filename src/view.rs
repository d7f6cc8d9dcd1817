use std::ops::{Add, Mul};

use num_traits::{Zero};

use super::{Error, Result, Layout, Cursor, Iter, Tensor};
use super::shape::{normalize_axis};
use super::ops::{Binary, Op, Apply, Combine, Scale};
use super::{Broadcast, BroadcastPair, Map, Zip, MatMul, Transpose, Reshape, Pad, SumAxis};

/// Implemented by types that behave like a multi-dimensional array of
/// `Self::T`s, but whose elements are computed on demand.
///
/// A `View` knows its [`Layout`] (shape, chunk sizes and length), can compute
/// the element at any multi-index with [`View::at()`], and can produce a
/// [`Cursor`] that walks its elements in row-major order. Walking with a
/// cursor is usually much cheaper than calling `at()` repeatedly, because
/// each step only has to work out how far to move upstream.
///
/// Most methods of `View` construct another `View` that wraps `self`. Nothing
/// is computed until you read an element. You are encouraged to build chains
/// of operations and to [`collect()`] the result into a [`Tensor`] only at
/// the end. The one exception is [`View::matmul()`], which computes its whole
/// result eagerly; see [`MatMul`].
///
/// ### Ownership
///
/// A `View` owns whatever it wraps. If `V` implements `View`, then so does
/// `&V`, so you choose between moving and borrowing at each step:
///
/// ```
/// use lazytensor::{View, Tensor};
/// let a = Tensor::new(&[2, 3], [0, 1, 2, 3, 4, 5]).unwrap();
/// // Borrow `a`; the transposed view cannot outlive it.
/// let t = (&a).transpose(0, 1).unwrap();
/// assert_eq!(t.shape(), [3, 2]);
/// assert_eq!(t.at(&[2, 1]), 5);
/// assert_eq!(t.iter().collect::<Vec<_>>(), [0, 3, 1, 4, 2, 5]);
/// ```
///
/// Views read their sources without any synchronisation. Mutating a
/// [`Tensor`] while a view of it exists is prevented by the borrow checker.
///
/// ### Errors
///
/// Every constructor validates its arguments immediately and returns an
/// [`Error`] describing what is wrong. Once constructed, a view cannot fail.
///
/// [`collect()`]: View::collect()
pub trait View: Sized {
    /// The element type.
    type T: Clone;

    /// The type returned by [`View::cursor()`].
    type Cursor<'a>: Cursor<T=Self::T> where Self: 'a;

    /// The shape of `self`, with its chunk sizes and length.
    fn layout(&self) -> &Layout;

    /// Compute the element at `index`.
    ///
    /// `index` must have one in-bounds coordinate per axis. If it doesn't,
    /// this method may panic or return an arbitrary element. Use
    /// [`View::get()`] for a checked version.
    fn at(&self, index: &[usize]) -> Self::T;

    /// Returns a [`Cursor`] positioned at the first element.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// The size of each axis.
    fn shape(&self) -> &[usize] { self.layout().shape() }

    /// The number of axes.
    fn order(&self) -> usize { self.layout().order() }

    /// The number of elements.
    fn len(&self) -> usize { self.layout().capacity() }

    /// The size of axis `axis`. Negative values count backwards from the last
    /// axis, so `dim(-1)` is the size of the last axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis` is not in `-order..order`.
    fn dim(&self, axis: isize) -> usize {
        self.try_dim(axis).unwrap_or_else(|e| fail(e))
    }

    /// Like [`View::dim()`], but fails with [`Error::AxisOutOfRange`] instead
    /// of panicking.
    ///
    /// ```
    /// use lazytensor::{View, Tensor, Error};
    /// let a = Tensor::new(&[2, 3], [0; 6]).unwrap();
    /// assert_eq!(a.try_dim(-2), Ok(2));
    /// assert_eq!(a.try_dim(2), Err(Error::AxisOutOfRange { axis: 2, order: 2 }));
    /// ```
    fn try_dim(&self, axis: isize) -> Result<usize> {
        Ok(self.shape()[normalize_axis(axis, self.order())?])
    }

    /// Like [`View::at()`], but checks `index` first.
    fn get(&self, index: &[usize]) -> Result<Self::T> {
        self.layout().check(index)?;
        Ok(self.at(index))
    }

    /// Iterate over the elements of `self` in row-major order.
    fn iter(&self) -> Iter<Self::Cursor<'_>> {
        Iter::new(self.cursor(), self.len())
    }

    /// Apply `f` to every element of this `View` in row-major order.
    fn each(&self, f: impl FnMut(Self::T)) {
        self.iter().for_each(f);
    }

    /// Materialises this `View` into a [`Tensor`].
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[2, 2], [1, 2, 3, 4]).unwrap();
    /// let b: Tensor<i32> = a.map(|x: i32| x * x).collect();
    /// assert_eq!(b.as_ref(), [1, 4, 9, 16]);
    /// ```
    fn collect(&self) -> Tensor<Self::T> { Tensor::from_view(self) }

    /// Creates a `View` that applies `f` to the elements of `self`.
    ///
    /// `f` can be a closure or anything else that implements [`Apply`].
    /// There is no guarantee that elements will be passed to `f` in a
    /// particular order, only once, or at all.
    fn map<F: Apply<Self::T>>(self, f: F) -> Map<Self, F> where
        F::Output: Clone,
    {
        Map::new(self, f)
    }

    /// Creates a `View` that multiplies every element by `k`.
    fn scale<K: Clone>(self, k: K) -> Map<Self, Scale<K>> where
        Self::T: Mul<K>,
        <Self::T as Mul<K>>::Output: Clone,
    {
        Map::new(self, Scale(k))
    }

    /// Makes `self` look as if it had shape `shape`, by repeating it along
    /// axes of size `1` and along missing leading axes.
    ///
    /// Fails with [`Error::IncompatibleShapes`] if `shape` is not what you
    /// get by broadcasting `self.shape()` with `shape`.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[3, 1], [1, 2, 3]).unwrap();
    /// let b = a.broadcast_to(&[2, 3, 2]).unwrap();
    /// assert_eq!(b.at(&[1, 2, 0]), 3);
    /// assert!(Tensor::new(&[3], [1, 2, 3]).unwrap().broadcast_to(&[2]).is_err());
    /// ```
    fn broadcast_to(self, shape: &[usize]) -> Result<Broadcast<Self>> {
        Broadcast::to_shape(self, shape)
    }

    /// Creates a `View` that broadcasts `self` and `other` to a common shape
    /// and combines their elements with binary operator `B`.
    ///
    /// Fails with [`Error::IncompatibleShapes`] if the shapes cannot be
    /// broadcast together.
    ///
    /// ```
    /// use lazytensor::{View, Tensor, ops::Sub};
    /// let a = Tensor::new(&[3], [9, 8, 7]).unwrap();
    /// let b = Tensor::new(&[2, 1], [10, 20]).unwrap();
    /// let ab = b.binary::<_, Sub>(a).unwrap();
    /// assert_eq!(ab.shape(), [2, 3]);
    /// assert_eq!(ab.iter().collect::<Vec<_>>(), [1, 2, 3, 11, 12, 13]);
    /// ```
    fn binary<V: View, B>(self, other: V) -> Result<Zip<Self, V, Op<B>>> where
        B: Binary<Self::T, V::T>,
        B::Output: Clone,
    {
        Ok(Zip::new(BroadcastPair::new(self, other)?, Op::new()))
    }

    /// Like [`View::binary()`] but combines elements using `f`, which is
    /// usually a closure.
    fn zip_with<V: View, F>(self, other: V, f: F) -> Result<Zip<Self, V, F>> where
        F: Combine<Self::T, V::T>,
        F::Output: Clone,
    {
        Ok(Zip::new(BroadcastPair::new(self, other)?, f))
    }

    /// Computes the matrix product of `self` and `other`.
    ///
    /// The last two axes of each operand are the matrices; any leading axes
    /// are broadcast together. Unlike other methods, this one does all the
    /// work immediately; see [`MatMul`] for details.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[2, 3], [1, 2, 3, 4, 5, 6]).unwrap();
    /// let b = Tensor::new(&[3, 1], [1, 0, -1]).unwrap();
    /// let ab = a.matmul(&b).unwrap();
    /// assert_eq!(ab.shape(), [2, 1]);
    /// assert_eq!(ab.as_ref(), [-2, -2]);
    /// ```
    fn matmul<V: View<T=Self::T>>(&self, other: &V) -> Result<MatMul<Self::T>> where
        Self::T: Zero + Add<Output=Self::T> + Mul<Output=Self::T>,
    {
        MatMul::new(self, other)
    }

    /// Swaps axes `axis1` and `axis2`. Negative axes count backwards from the
    /// last axis.
    ///
    /// Transposing a [`Transpose`] by value gives a [`MultiTranspose`]
    /// instead of another layer of `Transpose`.
    ///
    /// [`MultiTranspose`]: super::MultiTranspose
    fn transpose(self, axis1: isize, axis2: isize) -> Result<Transpose<Self>> {
        Transpose::new(self, axis1, axis2)
    }

    /// Swaps the last two axes.
    fn t(self) -> Result<Transpose<Self>> { Transpose::new(self, -1, -2) }

    /// Regroups the elements of `self` into a different shape with the same
    /// number of elements, keeping their row-major order.
    ///
    /// Fails with [`Error::CapacityMismatch`] if the lengths differ.
    fn reshape(self, shape: &[usize]) -> Result<Reshape<Self>> {
        Reshape::new(self, shape)
    }

    /// Grows or shrinks each axis independently. Elements beyond the bounds of
    /// `self` are `fill`.
    ///
    /// Fails with [`Error::OrderMismatch`] if `shape` has the wrong number of
    /// axes, or [`Error::InvalidShape`] if any dimension is zero.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[1, 2], [1, 2]).unwrap();
    /// let b = a.pad(&[2, 3], 0).unwrap();
    /// assert_eq!(b.iter().collect::<Vec<_>>(), [1, 2, 0, 0, 0, 0]);
    /// ```
    fn pad(self, shape: &[usize], fill: Self::T) -> Result<Pad<Self>> {
        Pad::new(self, shape, fill)
    }

    /// Sums over axis `axis`, removing it.
    ///
    /// Summing a view with only one axis gives a view of shape `[1]`.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[2, 3], [1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(a.sum_axis(-1).unwrap().iter().collect::<Vec<_>>(), [6, 15]);
    /// ```
    fn sum_axis(self, axis: isize) -> Result<SumAxis<Self>> where
        Self::T: Zero + Add<Output=Self::T>,
    {
        SumAxis::new(self, axis)
    }
}

impl<'r, V: View> View for &'r V {
    type T = V::T;
    type Cursor<'a> = V::Cursor<'a> where Self: 'a;
    #[inline(always)]
    fn layout(&self) -> &Layout { V::layout(self) }
    #[inline(always)]
    fn at(&self, index: &[usize]) -> Self::T { V::at(self, index) }
    #[inline(always)]
    fn cursor(&self) -> Self::Cursor<'_> { V::cursor(self) }
}

/// Panic with the message of `e`. Used by operator overloads, which cannot
/// return a `Result`.
#[cold]
pub(crate) fn fail(e: Error) -> ! { panic!("{}", e) }
