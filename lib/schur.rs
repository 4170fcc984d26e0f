//! Diagonalization of the combined oscillator.
//!
//! The quadratic part `A` of the [bilinear form][crate::bilinear::Bilinear] is
//! brought into upper triangular form by a complex Schur decomposition,
//! ```text
//! A = Uᴴ T U
//! ```
//! after which the off-diagonal coupling between dimensions is eliminated row
//! by row (completing the square in one variable at a time), so that the
//! contour can be deformed one dimension after another.

use nalgebra as na;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ DegeneratePivot, QError, QResult, ShapeError },
    utils::{ conj_t, from_dmatrix, max_norm, to_dmatrix },
    DEF_MAXITERS,
    DEF_PIVOT_TOL,
};

/// Complex Schur factors `(T, U)` of a matrix `A = Uᴴ T U`.
#[derive(Clone, Debug, PartialEq)]
pub struct SchurFactor {
    /// Upper triangular factor
    pub T: nd::Array2<C64>,
    /// Unitary factor
    pub U: nd::Array2<C64>,
}

impl SchurFactor {
    /// Reassemble the decomposed matrix `Uᴴ T U`.
    pub fn recompose(&self) -> nd::Array2<C64> {
        conj_t(&self.U).dot(&self.T).dot(&self.U)
    }
}

/// Compute the complex Schur decomposition `A = Uᴴ T U` with at most
/// `1000` iterations.
///
/// See [`schur_decompose_iters`].
pub fn schur_decompose(A: &nd::Array2<C64>) -> QResult<SchurFactor> {
    schur_decompose_iters(A, DEF_MAXITERS)
}

/// Compute the complex Schur decomposition `A = Uᴴ T U`, with `T` upper
/// triangular and `U` unitary.
///
/// The phase of each Schur vector (row of `U`) is fixed so that its
/// largest-magnitude component is real and positive; `T` is transformed
/// accordingly. For matrices whose Schur vectors can be chosen real, this
/// makes `U` real.
///
/// Returns [`QError::SchurConvergence`] if the QR iteration does not converge
/// within `maxiters` iterations.
pub fn schur_decompose_iters(A: &nd::Array2<C64>, maxiters: usize)
    -> QResult<SchurFactor>
{
    let dim = A.nrows();
    ShapeError::check(dim, A)?;
    let schur
        = na::linalg::Schur::try_new(to_dmatrix(A), f64::EPSILON, maxiters)
        .ok_or(QError::SchurConvergence(maxiters))?;
    let (q, t) = schur.unpack();
    // A = W T Wᴴ
    let mut W = from_dmatrix(&q);
    let mut T = from_dmatrix(&t);

    let phases: Vec<C64>
        = W.columns().into_iter()
        .map(|wj| {
            wj.iter()
                .fold(C64::from(0.0), |acc, wij| {
                    if wij.norm() > acc.norm() { *wij } else { acc }
                })
        })
        .map(|wmax| {
            if wmax.norm() > 0.0 { wmax / wmax.norm() } else { C64::from(1.0) }
        })
        .collect();
    W.columns_mut().into_iter().zip(&phases)
        .for_each(|(mut wj, ph)| { wj.mapv_inplace(|wij| wij * ph.conj()); });
    T.indexed_iter_mut()
        .for_each(|((i, j), tij)| { *tij *= phases[i] * phases[j].conj(); });

    Ok(SchurFactor { T, U: conj_t(&W) })
}

/// Eliminate the coupling between dimensions in an upper triangular `T` in
/// place, using the default pivot tolerance.
///
/// See [`eliminate_tol`].
pub fn eliminate(T: &mut nd::Array2<C64>) -> Vec<DegeneratePivot> {
    eliminate_tol(T, DEF_PIVOT_TOL)
}

/// Eliminate the coupling between dimensions in an upper triangular `T` in
/// place.
///
/// For each pivot `i = 1, ..., D - 1`, this performs
/// ```text
/// T[j, j] ← T[j, j] - T[i - 1, j]² / (4 T[i - 1, i - 1])                 for j ≥ i
/// T[r, c] ← T[r, c] - T[i - 1, r] T[i - 1, c] / (2 T[i - 1, i - 1])      for c > r ≥ i
/// ```
///
/// A pivot whose modulus is at most `tol` times the largest modulus in `T` is
/// degenerate; it is logged and returned as a [`DegeneratePivot`], but
/// elimination continues with the ill-conditioned value. Such a pivot
/// corresponds to a residue of the integrand, which is not handled.
pub fn eliminate_tol(T: &mut nd::Array2<C64>, tol: f64)
    -> Vec<DegeneratePivot>
{
    let dim = T.nrows();
    let scale = max_norm(T);
    let mut degenerate: Vec<DegeneratePivot> = Vec::new();
    for i in 1..dim {
        let pivot = T[[i - 1, i - 1]];
        if pivot.norm() <= tol * scale {
            log::warn!(
                "schur::eliminate: WARNING: encountered a degenerate pivot \
                T[{0},{0}] = {1:e}; the result may be ill-conditioned",
                i - 1, pivot,
            );
            degenerate.push(DegeneratePivot { pivot: i - 1, value: pivot });
        }
        for j in i..dim {
            let t = T[[i - 1, j]];
            T[[j, j]] -= t * t / (4.0 * pivot);
        }
        for r in i..dim {
            for c in r + 1..dim {
                let upd = T[[i - 1, r]] * T[[i - 1, c]] / (2.0 * pivot);
                T[[r, c]] -= upd;
            }
        }
    }
    degenerate
}
