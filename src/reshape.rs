use super::{Result, Layout, View};
use super::tensor::{reshaped};
use super::ops::{impl_ops_for_view};

/// The return type of [`View::reshape()`].
///
/// Regroups the elements of `V` into a different shape without reordering
/// them. Iterating over a `Reshape` is exactly iterating over `V`.
///
/// ```
/// use lazytensor::{View, Tensor};
/// let a = Tensor::from_fn(&[2, 6], |i| 6 * i[0] + i[1]).unwrap();
/// let b = (&a).reshape(&[3, 2, 2]).unwrap();
/// assert_eq!(b.at(&[1, 0, 1]), 5);
/// assert!((&a).reshape(&[5, 2]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reshape<V> {
    upstream: V,
    layout: Layout,
}

impl<V: View> Reshape<V> {
    /// Fails with [`Error::CapacityMismatch`] if `shape` doesn't have the same
    /// length as `upstream`, or [`Error::InvalidShape`] if any dimension is
    /// zero.
    ///
    /// [`Error::CapacityMismatch`]: super::Error::CapacityMismatch
    /// [`Error::InvalidShape`]: super::Error::InvalidShape
    pub(crate) fn new(upstream: V, shape: &[usize]) -> Result<Self> {
        let layout = reshaped(upstream.layout(), shape)?;
        Ok(Self {upstream, layout})
    }

    /// Replace the shape of `self` in place. Fails for the same reasons as
    /// [`View::reshape()`], in which case `self` is unchanged.
    pub fn reshape_mut(&mut self, shape: &[usize]) -> Result<&mut Self> {
        self.layout = reshaped(&self.layout, shape)?;
        Ok(self)
    }

    /// Like [`Reshape::reshape_mut()`] but by value. This shadows
    /// [`View::reshape()`], so that reshaping twice doesn't nest.
    pub fn reshape(mut self, shape: &[usize]) -> Result<Self> {
        self.reshape_mut(shape)?;
        Ok(self)
    }
}

impl<V: View> View for Reshape<V> {
    type T = V::T;
    type Cursor<'a> = V::Cursor<'a> where Self: 'a;

    #[inline(always)]
    fn layout(&self) -> &Layout { &self.layout }

    fn at(&self, index: &[usize]) -> Self::T {
        let address = self.layout.address(index);
        self.upstream.at(&self.upstream.layout().indices(address))
    }

    #[inline(always)]
    fn cursor(&self) -> Self::Cursor<'_> { self.upstream.cursor() }
}

impl_ops_for_view!([V] Reshape<V>);

// ----------------------------------------------------------------------------
