//! Miscellaneous tools.

use nalgebra as na;
use ndarray::{ self as nd, Ix2 };
use ndarray_linalg::{ Eigh, Inverse, Lapack, Scalar, UPLO };
use num_complex::Complex64 as C64;
use num_traits::{ Float, Zero };
use crate::{
    Arr2,
    error::{ QError, QResult, ShapeError },
};

/// Return the conjugate transpose of a complex matrix.
pub fn conj_t<S>(m: &nd::ArrayBase<S, Ix2>) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    m.t().mapv(|mij| mij.conj())
}

/// Invert a square matrix, mapping any failure of the factorization to
/// [`QError::SingularMatrix`] tagged with `name`.
pub fn invert<S, A>(m: &nd::ArrayBase<S, Ix2>, name: &'static str)
    -> QResult<nd::Array2<A>>
where
    S: nd::Data<Elem = A>,
    A: Scalar + Lapack,
{
    let inv = m.inv().map_err(|_| QError::SingularMatrix(name))?;
    inv.iter().all(|x| Float::is_finite(x.abs())).then_some(inv)
        .ok_or(QError::SingularMatrix(name))
}

/// Compute the principal inverse square root of a real, symmetric,
/// positive-definite matrix.
///
/// The matrix is accepted as symmetric if it deviates from its transpose by no
/// more than `sym_tol` relative to its largest element, in which case its
/// symmetric part is used. Returns [`QError::BranchAmbiguity`] otherwise, or if
/// any eigenvalue is non-positive.
pub fn inv_sqrtm_spd<S>(m: &nd::ArrayBase<S, Ix2>, sym_tol: f64)
    -> QResult<nd::Array2<f64>>
where S: nd::Data<Elem = f64>
{
    ShapeError::check(m.nrows(), m)?;
    let scale = m.iter().fold(0.0_f64, |acc, mij| acc.max(mij.abs())).max(1.0);
    let asym = nd::Zip::from(m).and(m.t())
        .fold(0.0_f64, |acc, mij, mji| acc.max((mij - mji).abs()));
    if asym > sym_tol * scale {
        return Err(QError::BranchAmbiguity(
            format!("matrix is not symmetric (deviation {asym:.3e})")));
    }
    let sym: nd::Array2<f64> = (m + &m.t()) * 0.5;
    let (evals, evecs): (nd::Array1<f64>, nd::Array2<f64>)
        = sym.eigh(UPLO::Lower)?;
    if let Some(e) = evals.iter().find(|e| **e <= 0.0) {
        return Err(QError::BranchAmbiguity(
            format!("matrix is not positive-definite (eigenvalue {e:.3e})")));
    }
    let scaled: nd::Array2<f64>
        = &evecs * &evals.mapv(|e| e.sqrt().recip());
    Ok(scaled.dot(&evecs.t()))
}

/// Replace all non-finite (NaN or infinite) entries of a complex array with
/// zero, returning the number of entries replaced.
pub fn nan_to_zero<S, D>(a: &mut nd::ArrayBase<S, D>) -> usize
where
    S: nd::DataMut<Elem = C64>,
    D: nd::Dimension,
{
    let mut count: usize = 0;
    a.iter_mut()
        .filter(|ak| !ak.is_finite())
        .for_each(|ak| { *ak = C64::zero(); count += 1; });
    count
}

/// Return the largest element-wise modulus of a complex array.
pub fn max_norm<S, D>(a: &nd::ArrayBase<S, D>) -> f64
where
    S: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    a.iter().fold(0.0_f64, |acc, ak| acc.max(ak.norm()))
}

// conversion to and from nalgebra for the decompositions ndarray-linalg lacks
pub(crate) fn to_dmatrix<S>(a: &Arr2<S>) -> na::DMatrix<C64>
where S: nd::Data<Elem = C64>
{
    let (r, c) = a.dim();
    na::DMatrix::from_fn(r, c, |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(m: &na::DMatrix<C64>) -> nd::Array2<C64> {
    nd::Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_linalg::close_l2;

    #[test]
    fn inv_sqrtm_spd_squares_to_inverse() {
        let m: nd::Array2<f64> = nd::array![[2.0, 0.5], [0.5, 1.0]];
        let s = inv_sqrtm_spd(&m, 1e-12).unwrap();
        let prod = s.dot(&s).dot(&m);
        close_l2(&prod, &nd::Array2::<f64>::eye(2), 1e-12);
        close_l2(&s, &s.t().to_owned(), 1e-12);
    }

    #[test]
    fn inv_sqrtm_spd_rejects_indefinite() {
        let m: nd::Array2<f64> = nd::array![[1.0, 0.0], [0.0, -1.0]];
        assert!(matches!(
            inv_sqrtm_spd(&m, 1e-12),
            Err(QError::BranchAmbiguity(_))
        ));
        let m: nd::Array2<f64> = nd::array![[1.0, 0.3], [0.0, 1.0]];
        assert!(matches!(
            inv_sqrtm_spd(&m, 1e-12),
            Err(QError::BranchAmbiguity(_))
        ));
    }

    #[test]
    fn invert_reports_singular() {
        let m: nd::Array2<C64> = nd::Array2::zeros((2, 2));
        assert!(matches!(invert(&m, "Q"), Err(QError::SingularMatrix("Q"))));
    }

    #[test]
    fn nan_to_zero_counts() {
        let mut a: nd::Array1<C64> = nd::array![
            C64::new(1.0, 0.0),
            C64::new(f64::NAN, 0.0),
            C64::new(0.0, f64::INFINITY),
        ];
        assert_eq!(nan_to_zero(&mut a), 2);
        assert_eq!(a, nd::array![C64::new(1.0, 0.0), C64::zero(), C64::zero()]);
    }
}
