//! Operators `f(x)` sandwiched between wavepacket components.
//!
//! An operator for an `N`-component system is an `N`×`N` matrix of functions,
//! evaluated at (possibly complex) nodes for one entry `(row, col)` at a time.
//! Two calling conventions are supported, as separate implementations of
//! [`Operator`]: [`EntryWise`] evaluates only the requested entry, while
//! [`AtOnce`] evaluates all entries and selects the requested one.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::error::{ QError, QResult };

/// Location of a single operator entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Bra component
    pub row: usize,
    /// Ket component
    pub col: usize,
    /// Total number of components
    pub ncomponents: usize,
}

impl Entry {
    /// Create a new entry.
    pub fn new(row: usize, col: usize, ncomponents: usize) -> Self {
        Self { row, col, ncomponents }
    }

    /// Row-major position of the entry in the full operator matrix, `row *
    /// ncomponents + col`.
    pub fn flat(&self) -> usize { self.row * self.ncomponents + self.col }

    /// Return `true` if the entry lies on the diagonal.
    pub fn is_diagonal(&self) -> bool { self.row == self.col }
}

/// Interface to an operator.
pub trait Operator {
    /// Evaluate `entry` at `nodes` (`D`×`N`), given the mixed center `q0` of
    /// the component pair, returning `N` values.
    fn evaluate(
        &self,
        nodes: nd::ArrayView2<'_, C64>,
        q0: nd::ArrayView1<'_, f64>,
        entry: Entry,
    ) -> QResult<nd::Array1<C64>>;
}

/// The identity operator: one on the diagonal and zero everywhere else.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl Operator for Identity {
    fn evaluate(
        &self,
        nodes: nd::ArrayView2<'_, C64>,
        _q0: nd::ArrayView1<'_, f64>,
        entry: Entry,
    ) -> QResult<nd::Array1<C64>>
    {
        let n = nodes.ncols();
        if entry.is_diagonal() {
            Ok(nd::Array1::ones(n))
        } else {
            Ok(nd::Array1::zeros(n))
        }
    }
}

/// Operator evaluating a single entry per call.
#[derive(Copy, Clone, Debug)]
pub struct EntryWise<F>(pub F);

impl<F> EntryWise<F>
where F: Fn(nd::ArrayView2<'_, C64>, nd::ArrayView1<'_, f64>, Entry) -> nd::Array1<C64>
{
    pub fn new(f: F) -> Self { Self(f) }
}

impl<F> Operator for EntryWise<F>
where F: Fn(nd::ArrayView2<'_, C64>, nd::ArrayView1<'_, f64>, Entry) -> nd::Array1<C64>
{
    fn evaluate(
        &self,
        nodes: nd::ArrayView2<'_, C64>,
        q0: nd::ArrayView1<'_, f64>,
        entry: Entry,
    ) -> QResult<nd::Array1<C64>>
    {
        Ok((self.0)(nodes, q0, entry))
    }
}

/// Operator evaluating all `N²` entries per call, in row-major order.
///
/// This is inefficient when only a few entries are needed, but is the natural
/// form of operators built from a full potential matrix.
#[derive(Copy, Clone, Debug)]
pub struct AtOnce<F>(pub F);

impl<F> AtOnce<F>
where F: Fn(nd::ArrayView2<'_, C64>, nd::ArrayView1<'_, f64>) -> Vec<nd::Array1<C64>>
{
    pub fn new(f: F) -> Self { Self(f) }
}

impl<F> Operator for AtOnce<F>
where F: Fn(nd::ArrayView2<'_, C64>, nd::ArrayView1<'_, f64>) -> Vec<nd::Array1<C64>>
{
    fn evaluate(
        &self,
        nodes: nd::ArrayView2<'_, C64>,
        q0: nd::ArrayView1<'_, f64>,
        entry: Entry,
    ) -> QResult<nd::Array1<C64>>
    {
        (self.0)(nodes, q0).into_iter()
            .nth(entry.flat())
            .ok_or(QError::BadEntry(entry.row, entry.col))
    }
}
