//! Generic programming over the functions that elementwise views apply.
//!
//! For the binary arithmetic operators in [`std::ops`] this module contains a
//! type of the same name that cannot be instantiated and that implements
//! [`Binary`]. For example, [`Add`] corresponds to [`std::ops::Add`]. This can
//! be passed as a type parameter to generic code, e.g. [`View::binary()`].
//!
//! [`View::binary()`]: super::View::binary()

use std::fmt::{self, Debug};
use std::marker::{PhantomData};

/// A function that combines `T` with `U`.
///
/// This trait has no methods that take `self`. It makes sense to implement it
/// for types that cannot be instantiated, such as empty enumerations.
pub trait Binary<T, U> {
    type Output;

    fn call(t: T, u: U) -> Self::Output;
}

// ----------------------------------------------------------------------------

pub enum Add {}

impl<T, U> Binary<T, U> for Add where T: std::ops::Add<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.add(u) }
}

// ----------------------------------------------------------------------------

pub enum Sub {}

impl<T, U> Binary<T, U> for Sub where T: std::ops::Sub<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.sub(u) }
}

// ----------------------------------------------------------------------------

/// Elementwise multiplication. Note that `*` on views means matrix
/// multiplication, not this.
pub enum Mul {}

impl<T, U> Binary<T, U> for Mul where T: std::ops::Mul<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.mul(u) }
}

// ----------------------------------------------------------------------------

pub enum Div {}

impl<T, U> Binary<T, U> for Div where T: std::ops::Div<U> {
    type Output = T::Output;
    #[inline(always)]
    fn call(t: T, u: U) -> Self::Output { t.div(u) }
}

// ----------------------------------------------------------------------------

/// A function that [`Zip`] can use to combine `T` with `U`.
///
/// Implemented by closures, and by [`Op<B>`] for any [`Binary`] `B`.
///
/// [`Zip`]: super::Zip
pub trait Combine<T, U> {
    type Output;

    fn combine(&self, t: T, u: U) -> Self::Output;
}

impl<T, U, O, F: Fn(T, U) -> O> Combine<T, U> for F {
    type Output = O;
    #[inline(always)]
    fn combine(&self, t: T, u: U) -> O { self(t, u) }
}

/// Adapts a [`Binary`] operator to [`Combine`].
pub struct Op<B>(PhantomData<B>);

impl<B> Op<B> {
    pub const fn new() -> Self { Op(PhantomData) }
}

impl<B> Default for Op<B> {
    fn default() -> Self { Self::new() }
}

impl<B> Clone for Op<B> {
    fn clone(&self) -> Self { Self::new() }
}

impl<B> Copy for Op<B> {}

impl<B> Debug for Op<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Op<{}>", std::any::type_name::<B>())
    }
}

impl<T, U, B: Binary<T, U>> Combine<T, U> for Op<B> {
    type Output = B::Output;
    #[inline(always)]
    fn combine(&self, t: T, u: U) -> B::Output { B::call(t, u) }
}

// ----------------------------------------------------------------------------

/// A function that [`Map`] can apply to each `T`.
///
/// Implemented by closures, and by [`Scale`].
///
/// [`Map`]: super::Map
pub trait Apply<T> {
    type Output;

    fn apply(&self, t: T) -> Self::Output;
}

impl<T, U, F: Fn(T) -> U> Apply<T> for F {
    type Output = U;
    #[inline(always)]
    fn apply(&self, t: T) -> U { self(t) }
}

/// Multiplies by a constant. The return type of [`View::scale()`] uses this.
///
/// [`View::scale()`]: super::View::scale()
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Scale<K>(pub K);

impl<T: std::ops::Mul<K>, K: Clone> Apply<T> for Scale<K> {
    type Output = T::Output;
    #[inline(always)]
    fn apply(&self, t: T) -> T::Output { t * self.0.clone() }
}

// ----------------------------------------------------------------------------

/// Implement [`std::ops::Add`] and [`std::ops::Sub`] (elementwise, with
/// broadcasting) and [`std::ops::Mul`] (matrix multiplication) for a type that
/// implements [`View`].
///
/// The operators panic where the corresponding [`View`] method would return
/// an error.
///
/// [`View`]: super::View
macro_rules! impl_ops_for_view {
    ([$($param:tt)*] $v:ty) => {
        impl<$($param)*, RHS: $crate::View> std::ops::Add<RHS> for $v where
            Self: $crate::View,
            <Self as $crate::View>::T: std::ops::Add<RHS::T>,
            <<Self as $crate::View>::T as std::ops::Add<RHS::T>>::Output: Clone,
        {
            type Output = $crate::Zip<Self, RHS, $crate::ops::Op<$crate::ops::Add>>;
            fn add(self, other: RHS) -> Self::Output {
                $crate::View::binary::<RHS, $crate::ops::Add>(self, other)
                    .unwrap_or_else(|e| $crate::view::fail(e))
            }
        }

        impl<$($param)*, RHS: $crate::View> std::ops::Sub<RHS> for $v where
            Self: $crate::View,
            <Self as $crate::View>::T: std::ops::Sub<RHS::T>,
            <<Self as $crate::View>::T as std::ops::Sub<RHS::T>>::Output: Clone,
        {
            type Output = $crate::Zip<Self, RHS, $crate::ops::Op<$crate::ops::Sub>>;
            fn sub(self, other: RHS) -> Self::Output {
                $crate::View::binary::<RHS, $crate::ops::Sub>(self, other)
                    .unwrap_or_else(|e| $crate::view::fail(e))
            }
        }

        impl<$($param)*, RHS: $crate::View> std::ops::Mul<RHS> for $v where
            Self: $crate::View,
            RHS: $crate::View<T=<Self as $crate::View>::T>,
            <Self as $crate::View>::T: ::num_traits::Zero
                + std::ops::Add<Output=<Self as $crate::View>::T>
                + std::ops::Mul<Output=<Self as $crate::View>::T>,
        {
            type Output = $crate::MatMul<<Self as $crate::View>::T>;
            fn mul(self, other: RHS) -> Self::Output {
                $crate::View::matmul(&self, &other).unwrap_or_else(|e| $crate::view::fail(e))
            }
        }
    };
}

pub(crate) use impl_ops_for_view;

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn call<B: Binary<i32, i32>>(t: i32, u: i32) -> B::Output { Op::<B>::new().combine(t, u) }

    #[test]
    fn binary() {
        assert_eq!(call::<Add>(7, 2), 9);
        assert_eq!(call::<Sub>(7, 2), 5);
        assert_eq!(call::<Mul>(7, 2), 14);
        assert_eq!(call::<Div>(7, 2), 3);
    }

    #[test]
    fn closures() {
        assert_eq!((|t: i32, u: i32| t.max(u)).combine(3, 4), 4);
        assert_eq!((|t: f32| t * 0.5).apply(3.0), 1.5);
        assert_eq!(Scale(3).apply(4i32), 12);
    }
}
