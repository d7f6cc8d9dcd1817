//! Conversions between shapes, chunk sizes, multi-indices and flat addresses.
//!
//! A shape is a list of positive dimensions, one per axis. Its "chunk sizes"
//! are the row-major strides: `chunks[i]` is the product of `shape[i+1..]`,
//! so the last axis always has chunk size `1`. A multi-index `index` lives at
//! flat address `sum(index[i] * chunks[i])`.

use smallvec::{SmallVec, smallvec};

use super::{Error, Result};

/// Inline storage for a list of per-axis numbers.
pub type Dims = SmallVec<[usize; 6]>;

/// Returns the chunk sizes and the capacity of `shape`.
///
/// An empty shape is a scalar with capacity `1`. Fails with
/// [`Error::InvalidShape`] if any dimension is zero, or with
/// [`Error::CapacityOverflow`] if the capacity doesn't fit in a `usize`.
///
/// ```
/// use lazytensor::shape::capacity_and_chunks;
/// let (chunks, capacity) = capacity_and_chunks(&[2, 3, 4]).unwrap();
/// assert_eq!(chunks.as_slice(), [12, 4, 1]);
/// assert_eq!(capacity, 24);
/// ```
pub fn capacity_and_chunks(shape: &[usize]) -> Result<(Dims, usize)> {
    let mut chunks: Dims = smallvec![0; shape.len()];
    let mut capacity = 1;
    for axis in (0..shape.len()).rev() {
        if shape[axis] == 0 {
            return Err(Error::InvalidShape { shape: shape.to_vec() });
        }
        chunks[axis] = capacity;
        capacity = capacity.checked_mul(shape[axis])
            .ok_or_else(|| Error::CapacityOverflow { shape: shape.to_vec() })?;
    }
    Ok((chunks, capacity))
}

/// Returns the flat address of `index` given the chunk sizes of its shape.
///
/// The caller is responsible for `index` being in bounds.
#[inline(always)]
pub fn indices_to_address(chunks: &[usize], index: &[usize]) -> usize {
    debug_assert_eq!(chunks.len(), index.len());
    index.iter().zip(chunks).map(|(&i, &c)| i * c).sum()
}

/// Like [`indices_to_address()`], but negative coordinates count backwards
/// from the end of their axis, python-style.
///
/// Fails if any coordinate lies outside `-shape[axis]..shape[axis]`.
pub fn wrapped_indices_to_address(
    shape: &[usize],
    chunks: &[usize],
    index: &[isize],
) -> Result<usize> {
    if index.len() != shape.len() {
        return Err(Error::OrderMismatch { expected: shape.len(), actual: index.len() });
    }
    let mut address = 0;
    for axis in 0..shape.len() {
        let dim = shape[axis] as isize;
        let i = if index[axis] < 0 { index[axis] + dim } else { index[axis] };
        if i < 0 || i >= dim {
            return Err(Error::OutOfRange { index: index.to_vec(), shape: shape.to_vec() });
        }
        address += i as usize * chunks[axis];
    }
    Ok(address)
}

/// Returns the multi-index at flat `address` within `shape`.
pub fn address_to_indices(shape: &[usize], mut address: usize) -> Dims {
    let mut index: Dims = smallvec![0; shape.len()];
    for axis in (0..shape.len()).rev() {
        index[axis] = address % shape[axis];
        address /= shape[axis];
    }
    index
}

/// Steps `index` to the next multi-index within `shape`, like an odometer
/// whose last axis turns fastest.
///
/// The two slices are right-aligned: if their lengths differ, only the
/// overlapping suffix is touched, and the prefix of the longer one is left
/// alone. Returns `false` (having reset the touched suffix to zeros) when the
/// odometer wraps around, and also returns `false` if either slice is empty.
///
/// ```
/// use lazytensor::shape::increment_indices;
/// let mut index = [0, 2];
/// assert!(increment_indices(&[2, 3], &mut index));
/// assert_eq!(index, [1, 0]);
/// ```
pub fn increment_indices(shape: &[usize], index: &mut [usize]) -> bool {
    let n = shape.len().min(index.len());
    if n == 0 { return false; }
    let shape = &shape[shape.len() - n..];
    let start = index.len() - n;
    let index = &mut index[start..];
    for axis in (0..n).rev() {
        index[axis] += 1;
        if index[axis] < shape[axis] { return true; }
        index[axis] = 0;
    }
    false
}

/// Returns the shape obtained by broadcasting `left` against `right`.
///
/// The shapes are right-aligned. Each pair of aligned dimensions must be equal
/// or one of them must be `1`. Leading axes of the longer shape are copied.
///
/// ```
/// use lazytensor::shape::broadcast_shapes;
/// assert_eq!(broadcast_shapes(&[3, 1], &[2, 1, 4]).unwrap().as_slice(), [2, 3, 4]);
/// assert!(broadcast_shapes(&[3, 2], &[3]).is_err());
/// ```
pub fn broadcast_shapes(left: &[usize], right: &[usize]) -> Result<Dims> {
    let order = left.len().max(right.len());
    let mut shape: Dims = smallvec![0; order];
    for axis in 0..order {
        let l = aligned_dim(left, order, axis);
        let r = aligned_dim(right, order, axis);
        shape[axis] = if l == r || r == 1 {
            l
        } else if l == 1 {
            r
        } else {
            return Err(Error::IncompatibleShapes { left: left.to_vec(), right: right.to_vec() });
        };
    }
    Ok(shape)
}

/// The dimension of `shape` aligned with `axis` of a longer shape with
/// `order` axes, or `1` if `shape` doesn't reach that far.
#[inline(always)]
fn aligned_dim(shape: &[usize], order: usize, axis: usize) -> usize {
    let offset = order - shape.len();
    if axis < offset { 1 } else { shape[axis - offset] }
}

/// Resolves a possibly negative axis selector against a view with `order`
/// axes.
pub fn normalize_axis(axis: isize, order: usize) -> Result<usize> {
    let resolved = if axis < 0 { axis + order as isize } else { axis };
    if resolved < 0 || resolved >= order as isize {
        return Err(Error::AxisOutOfRange { axis, order });
    }
    Ok(resolved as usize)
}

// ----------------------------------------------------------------------------

/// A shape together with its chunk sizes and capacity.
///
/// Every [`View`] exposes one of these. It is computed once, when the view is
/// constructed.
///
/// [`View`]: super::View
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    shape: Dims,
    chunks: Dims,
    capacity: usize,
}

impl Layout {
    /// Fails with [`Error::InvalidShape`] if any dimension is zero.
    pub fn new(shape: &[usize]) -> Result<Self> {
        let (chunks, capacity) = capacity_and_chunks(shape)?;
        Ok(Self {shape: shape.into(), chunks, capacity})
    }

    pub fn shape(&self) -> &[usize] { &self.shape }

    pub fn chunks(&self) -> &[usize] { &self.chunks }

    /// The number of elements.
    pub fn capacity(&self) -> usize { self.capacity }

    /// The number of axes.
    pub fn order(&self) -> usize { self.shape.len() }

    #[inline(always)]
    pub fn address(&self, index: &[usize]) -> usize { indices_to_address(&self.chunks, index) }

    pub fn indices(&self, address: usize) -> Dims { address_to_indices(&self.shape, address) }

    /// Checks that `index` has one in-bounds coordinate per axis.
    pub fn check(&self, index: &[usize]) -> Result<()> {
        if index.len() != self.order() {
            return Err(Error::OrderMismatch { expected: self.order(), actual: index.len() });
        }
        if index.iter().zip(&self.shape).any(|(&i, &d)| i >= d) {
            return Err(Error::OutOfRange {
                index: index.iter().map(|&i| i as isize).collect(),
                shape: self.shape.to_vec(),
            });
        }
        Ok(())
    }

    /// Swap the dimensions of two (normalized) axes and recompute the chunk
    /// sizes.
    pub(crate) fn swap_axes(&mut self, axis1: usize, axis2: usize) {
        self.shape.swap(axis1, axis2);
        let mut chunk = 1;
        for axis in (0..self.shape.len()).rev() {
            self.chunks[axis] = chunk;
            chunk *= self.shape[axis];
        }
    }
}

// ----------------------------------------------------------------------------
