//! A pure-Rust library providing lazily-evaluated multi-dimensional arrays
//! whose shapes are known only at run time.
//!
//! [`Tensor<T>`] represents a dense array of `T`. The `T` values are stored in
//! a [`Box<[T]>`] in row-major order, together with a [`Layout`] that says how
//! to interpret them as a multi-dimensional array: a shape with any number of
//! axes, each of positive size.
//!
//! Trait [`View`] is the main way to access and manipulate `Tensor`s. Unlike
//! `Tensor`, a `View` doesn't store any elements, but instead computes them on
//! demand. In this respect it is a bit like [`std::iter::Iterator`], and
//! indeed `View` offers some of the same methods as `Iterator`, including
//! [`View::map()`] and [`View::collect()`]. However, unlike `Iterator`,
//! `View`s are immutable; reading elements using [`View::at()`] does not
//! mutate the `View`. You are encouraged to use `View`s compositionally, like
//! `Iterator`s, and to `collect()` the result into a `Tensor` only at the end
//! of a chain of operations.
//!
//! ```
//! use lazytensor::{View, Tensor};
//! let a = Tensor::from_fn(&[2, 3], |i| (3 * i[0] + i[1]) as i32).unwrap();
//! let b = Tensor::new(&[2, 1], [100, 200]).unwrap();
//! // Transpose, broadcast-add, and sum out the first axis, lazily.
//! let c = ((&a).t().unwrap().t().unwrap() + &b).sum_axis(0).unwrap();
//! assert_eq!(c.collect().as_ref(), [303, 305, 307]);
//! ```
//!
//! Every `View` can be read in two ways. [`View::at()`] computes one element
//! from a multi-index. [`View::cursor()`] returns a [`Cursor`], which walks
//! the elements in row-major order and can jump by any number of steps in
//! either direction. Each `View` translates a move of its cursor into a move
//! of its upstream cursor, so that iterating over a chain of views costs
//! little more than iterating over the `Tensor` at the bottom.
//!
//! The one operation that is not lazy is matrix multiplication. See
//! [`MatMul`].
//!
//! ### Operators
//!
//! `+` and `-` on `View`s construct elementwise views with broadcasting, and
//! `*` constructs a matrix product. The operators panic if the shapes don't
//! fit. The corresponding methods [`View::binary()`] and [`View::matmul()`]
//! return an [`Error`] instead.

mod error;
pub use error::{Error, Result};

pub mod shape;
pub use shape::{Layout};

pub mod cursor;
pub use cursor::{Cursor, Iter, StridedCursor};

pub mod ops;

mod view;
pub use view::{View};

mod tensor;
pub use tensor::{Tensor, DenseCursor};

mod broadcast;
pub use broadcast::{Broadcast, BroadcastPair};

mod elementwise;
pub use elementwise::{Map, MapCursor, Zip, ZipCursor};

mod matmul;
pub use matmul::{MatMul};

mod transpose;
pub use transpose::{Transpose, MultiTranspose};

mod reshape;
pub use reshape::{Reshape};

mod pad;
pub use pad::{Pad, PadCursor};

mod reduce;
pub use reduce::{SumAxis, SumCursor};
