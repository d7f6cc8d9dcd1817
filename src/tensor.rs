use smallvec::{smallvec};

use super::{Error, Result, Layout, View, Cursor};
use super::shape::{Dims, increment_indices, wrapped_indices_to_address};
use super::ops::{impl_ops_for_view};

/// A dense array of `T`s with a run-time shape.
///
/// This is the only type in the crate that owns its elements; every other
/// [`View`] ultimately reads from one of these (or from something else that
/// you implement `View` for). The elements are stored in a [`Box<[T]>`] in
/// row-major order.
///
/// Cloning a `Tensor` copies its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    layout: Layout,
    items: Box<[T]>,
}

impl<T> Tensor<T> {
    fn new_inner(layout: Layout, items: Box<[T]>) -> Self {
        debug_assert_eq!(layout.capacity(), items.len());
        Self {layout, items}
    }

    /// Constructs a `Tensor` of shape `shape` given its elements in row-major
    /// order.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[3, 2], [0.0, 1.0, -1.0, 2.0, 3.0, -2.0]).unwrap();
    /// assert_eq!(a[[0, 1]], 1.0);
    /// assert_eq!(a[[1, 0]], -1.0);
    /// assert_eq!(a[[2, 1]], -2.0);
    /// assert!(Tensor::new(&[3, 3], [0; 6]).is_err());
    /// ```
    pub fn new(shape: &[usize], items: impl Into<Box<[T]>>) -> Result<Self> {
        let layout = Layout::new(shape)?;
        let items = items.into();
        if items.len() != layout.capacity() {
            return Err(Error::LengthMismatch {
                shape: shape.to_vec(),
                expected: layout.capacity(),
                actual: items.len(),
            });
        }
        Ok(Self::new_inner(layout, items))
    }

    /// Construct a `Tensor` of shape `shape` by calling `f` on each
    /// multi-index in row-major order.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::from_fn(&[2, 3], |i| 10 * i[0] + i[1]).unwrap();
    /// assert_eq!(a.as_ref(), [0, 1, 2, 10, 11, 12]);
    /// ```
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Result<Self> {
        let layout = Layout::new(shape)?;
        let mut items = Vec::with_capacity(layout.capacity());
        let mut index: Dims = smallvec![0; shape.len()];
        for _ in 0..layout.capacity() {
            items.push(f(&index));
            increment_indices(shape, &mut index);
        }
        Ok(Self::new_inner(layout, items.into()))
    }

    /// Returns the raw elements.
    pub fn into_raw(self) -> Box<[T]> { self.items }

    /// Mutably borrow the element at `index`.
    ///
    /// The same rules apply to `index` as for [`View::at()`].
    pub fn at_mut(&mut self, index: &[usize]) -> &mut T {
        debug_assert!(self.layout.check(index).is_ok());
        &mut self.items[self.layout.address(index)]
    }

    /// Like [`Tensor::at_mut()`], but checks `index` first.
    pub fn get_mut(&mut self, index: &[usize]) -> Result<&mut T> {
        self.layout.check(index)?;
        Ok(self.at_mut(index))
    }

    /// Borrow an element, counting negative coordinates backwards from the end
    /// of their axis.
    ///
    /// ```
    /// use lazytensor::{View, Tensor};
    /// let a = Tensor::new(&[2, 3], [1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(a.at_wrapped(&[-1, 0]), Ok(&4));
    /// assert_eq!(a.at_wrapped(&[0, -1]), Ok(&3));
    /// assert!(a.at_wrapped(&[0, -4]).is_err());
    /// ```
    pub fn at_wrapped(&self, index: &[isize]) -> Result<&T> {
        let address = wrapped_indices_to_address(self.layout.shape(), self.layout.chunks(), index)?;
        Ok(&self.items[address])
    }

    /// Reinterpret the elements as having shape `shape`. No elements move.
    ///
    /// Fails with [`Error::CapacityMismatch`] if `shape` has a different
    /// number of elements, in which case `self` is unchanged.
    pub fn reshape_mut(&mut self, shape: &[usize]) -> Result<&mut Self> {
        self.layout = reshaped(&self.layout, shape)?;
        Ok(self)
    }
}

impl<T: Clone> Tensor<T> {
    /// Constructs a `Tensor` of shape `shape` with every element `value`.
    pub fn full(shape: &[usize], value: T) -> Result<Self> {
        let layout = Layout::new(shape)?;
        let items = vec![value; layout.capacity()];
        Ok(Self::new_inner(layout, items.into()))
    }

    /// Materialises `v`. This is the implementation of [`View::collect()`].
    pub fn from_view<V: View<T=T>>(v: &V) -> Self {
        Self::new_inner(v.layout().clone(), v.iter().collect())
    }

    /// Pad or crop `self` to shape `shape` in place, filling new elements with
    /// `fill`. Unlike [`View::pad()`], this reallocates the elements.
    ///
    /// Fails for the same reasons as [`View::pad()`], in which case `self` is
    /// unchanged.
    pub fn resize(&mut self, shape: &[usize], fill: T) -> Result<&mut Self> {
        let resized = (&*self).pad(shape, fill)?.collect();
        log::debug!("resized tensor from {:?} to {:?}", self.shape(), shape);
        *self = resized;
        Ok(self)
    }
}

impl<T: Clone + Default> Tensor<T> {
    /// Constructs a `Tensor` of shape `shape` with every element
    /// `T::default()`.
    pub fn with_shape(shape: &[usize]) -> Result<Self> { Self::full(shape, T::default()) }
}

/// Returns the `Layout` of shape `shape`, provided it has the same capacity as
/// `layout`.
pub(crate) fn reshaped(layout: &Layout, shape: &[usize]) -> Result<Layout> {
    let new_layout = Layout::new(shape)?;
    if new_layout.capacity() != layout.capacity() {
        return Err(Error::CapacityMismatch {
            from: layout.shape().to_vec(),
            from_len: layout.capacity(),
            to: shape.to_vec(),
            to_len: new_layout.capacity(),
        });
    }
    Ok(new_layout)
}

impl<T> std::convert::AsRef<[T]> for Tensor<T> {
    fn as_ref(&self) -> &[T] { &self.items }
}

impl<T> std::convert::AsMut<[T]> for Tensor<T> {
    fn as_mut(&mut self) -> &mut [T] { &mut self.items }
}

impl<T, I: AsRef<[usize]>> std::ops::Index<I> for Tensor<T> {
    type Output = T;
    fn index(&self, index: I) -> &T {
        let index = index.as_ref();
        debug_assert!(self.layout.check(index).is_ok());
        &self.items[self.layout.address(index)]
    }
}

impl<T, I: AsRef<[usize]>> std::ops::IndexMut<I> for Tensor<T> {
    fn index_mut(&mut self, index: I) -> &mut T { self.at_mut(index.as_ref()) }
}

impl<T: Clone> View for Tensor<T> {
    type T = T;
    type Cursor<'a> = DenseCursor<'a, T> where Self: 'a;
    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }
    #[inline(always)]
    fn at(&self, index: &[usize]) -> T { self[index].clone() }
    #[inline(always)]
    fn cursor(&self) -> Self::Cursor<'_> { DenseCursor {items: &self.items, address: 0} }
}

impl_ops_for_view!([T] Tensor<T>);
impl_ops_for_view!(['t, T] &'t Tensor<T>);

// ----------------------------------------------------------------------------

/// The return type of [`Tensor::cursor()`](View::cursor()).
#[derive(Debug, Clone)]
pub struct DenseCursor<'a, T> {
    items: &'a [T],
    address: usize,
}

impl<'a, T: Clone> Cursor for DenseCursor<'a, T> {
    type T = T;
    #[inline(always)]
    fn read(&self) -> T { self.items[self.address].clone() }
    #[inline(always)]
    fn advance(&mut self, steps: isize) {
        self.address = (self.address as isize + steps) as usize;
    }
}

// ----------------------------------------------------------------------------
