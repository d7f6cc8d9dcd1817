use thiserror::Error;

/// Everything that can go wrong when constructing a [`View`] or accessing
/// one with a checked method.
///
/// All of these are raised eagerly, when the offending view is built, except
/// [`Error::OutOfRange`], which is raised by checked element access.
///
/// [`View`]: super::View
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid shape {shape:?}: every dimension must be positive")]
    InvalidShape { shape: Vec<usize> },

    #[error("shape {shape:?} has more elements than fit in a usize")]
    CapacityOverflow { shape: Vec<usize> },

    #[error("shapes {left:?} and {right:?} cannot be broadcast together")]
    IncompatibleShapes { left: Vec<usize>, right: Vec<usize> },

    #[error("cannot multiply {left:?} by {right:?}: {reason}")]
    DimensionMismatch { left: Vec<usize>, right: Vec<usize>, reason: &'static str },

    #[error("cannot reshape {from:?} ({from_len} elements) to {to:?} ({to_len} elements)")]
    CapacityMismatch { from: Vec<usize>, from_len: usize, to: Vec<usize>, to_len: usize },

    #[error("expected {expected} axes but got {actual}")]
    OrderMismatch { expected: usize, actual: usize },

    #[error("index {index:?} is out of bounds for shape {shape:?}")]
    OutOfRange { index: Vec<isize>, shape: Vec<usize> },

    #[error("axis {axis} is out of range for a view with {order} axes")]
    AxisOutOfRange { axis: isize, order: usize },

    #[error("shape {shape:?} needs {expected} elements but {actual} were supplied")]
    LengthMismatch { shape: Vec<usize>, expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
