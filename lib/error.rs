//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use num_complex::Complex64 as C64;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }

    pub(crate) fn check_len(expected: usize, got: usize) -> Result<(), Self> {
        (expected == got).then_some(()).ok_or(Self(expected, got))
    }
}

/// Returned when a matrix does not have the `D`×`D` shape required by the
/// dimension of the problem.
#[derive(Debug, Error)]
#[error("expected a {0}x{0} matrix; got shape {1}x{2}")]
pub struct ShapeError(pub usize, pub usize, pub usize);

impl ShapeError {
    pub(crate) fn check<S, A>(dim: usize, m: &nd::ArrayBase<S, nd::Ix2>)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let (r, c) = m.dim();
        (r == dim && c == dim).then_some(()).ok_or(Self(dim, r, c))
    }
}

/// Non-fatal diagnostic emitted by [`eliminate`][crate::schur::eliminate] when
/// a pivot of the Schur form is (numerically) zero.
///
/// This is the "residue" situation of the elimination, for which no corrective
/// strategy exists; computation proceeds with the ill-conditioned value and the
/// affected matrix elements should be treated with suspicion.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[error("degenerate pivot T[{pivot},{pivot}] = {value} encountered in elimination")]
pub struct DegeneratePivot {
    /// Index of the pivot on the diagonal.
    pub pivot: usize,
    /// Value of the pivot.
    pub value: C64,
}

/// Returned from functions computing matrix elements.
#[derive(Debug, Error)]
pub enum QError {
    /// Returned when a matrix that must be inverted is singular. The payload
    /// names the matrix.
    #[error("matrix {0} is singular")]
    SingularMatrix(&'static str),

    /// Returned when the principal square root of the mixed covariance `Q0`
    /// is not well-defined, i.e. `Q0` is not symmetric positive-definite.
    #[error("principal square root of Q0 is not well-defined: {0}")]
    BranchAmbiguity(String),

    /// Returned when the dimension of a quadrature rule does not match that of
    /// the wavepackets.
    #[error("quadrature dimension {0} does not match the wavepacket dimension {1}")]
    DimensionMismatch(usize, usize),

    /// Returned when the complex Schur decomposition fails to converge.
    #[error("complex Schur decomposition failed to converge within {0} iterations")]
    SchurConvergence(usize),

    /// Returned when matrix elements are requested before the quadrature rule
    /// nodes and weights have been cached.
    #[error("quadrature was not prepared; call `prepare` first")]
    Unprepared,

    /// Returned when a non-positive `eps` value is encountered.
    #[error("eps values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a quadrature rule is requested with zero order.
    #[error("quadrature order must be greater than 0; got {0}")]
    BadOrder(usize),

    /// Returned when a zero dimension is encountered.
    #[error("dimension must be greater than 0; got {0}")]
    BadDimension(usize),

    /// Returned when a component index is out of bounds.
    #[error("component index {0} out of bounds for {1} components")]
    BadComponent(usize, usize),

    /// Returned when an operator cannot provide the requested entry.
    #[error("operator has no entry ({0}, {1})")]
    BadEntry(usize, usize),

    /// [`ShapeError`]
    #[error("matrix shape error: {0}")]
    Shape(#[from] ShapeError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`LinalgError`].
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

impl QError {
    pub(crate) fn check_epsilon(eps: f64) -> Result<(), Self> {
        (eps > 0.0).then_some(()).ok_or(Self::BadEpsilon(eps))
    }

    pub(crate) fn check_dimension(rule: usize, packet: usize)
        -> Result<(), Self>
    {
        (rule == packet).then_some(())
            .ok_or(Self::DimensionMismatch(rule, packet))
    }

    pub(crate) fn check_component(k: usize, n: usize) -> Result<(), Self> {
        (k < n).then_some(()).ok_or(Self::BadComponent(k, n))
    }
}

pub type QResult<T> = Result<T, QError>;
