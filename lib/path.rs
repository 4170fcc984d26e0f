//! Construction of the deformed integration contour.
//!
//! After [elimination][crate::schur::eliminate], the quadratic form `yᵀ T y`
//! separates into a sum of squares, one per dimension, with coefficients given
//! by the diagonal of the eliminated `T'`. Along the path
//! ```text
//! y[d] = √(i / T'[d, d]) τ[d] - Σ_{j > d} T'[d, j] / (2 T'[d, d]) y[j]
//! ```
//! the oscillator `exp(i w yᵀ T y)` becomes the real Gaussian `exp(-w |τ|²)`,
//! which is then integrated with a Gauss-Hermite rule.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr2,
    error::{ QError, QResult, ShapeError },
    utils::conj_t,
};

/// A deformed integration contour sampled at the nodes of a quadrature rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourPath {
    /// Path in the decoupled (Schur) coordinates; `D`×`N`
    pub path: nd::Array2<C64>,
    /// Path in physical coordinates; `D`×`N`
    pub nodes: nd::Array2<C64>,
    /// Jacobian of the parametrization
    pub jacobian: C64,
}

/// Compute the per-dimension path directions `√(i / T'[d, d])`.
pub fn path_derivatives(T: &nd::Array2<C64>) -> nd::Array1<C64> {
    T.diag().mapv(|dk| (C64::i() / dk).sqrt())
}

/// Compute the coupling matrix `Tu = triu(T', 1) / (2 diag(T'))`, where each row
/// is divided by its own diagonal element.
pub fn coupling(T: &nd::Array2<C64>) -> nd::Array2<C64> {
    let dim = T.nrows();
    nd::Array2::from_shape_fn((dim, dim), |(i, j)| {
        if j > i { 0.5 * T[[i, j]] / T[[i, i]] } else { C64::from(0.0) }
    })
}

/// Construct the path in decoupled coordinates from an eliminated `T'` and
/// real quadrature nodes `gamma` (`D`×`N`), returning the path along with its
/// Jacobian `Π_d √(i / T'[d, d])`.
///
/// The nodes are rescaled as `τ = ε γ`.
pub fn path_increments<S>(T: &nd::Array2<C64>, gamma: &Arr2<S>, eps: f64)
    -> QResult<(nd::Array2<C64>, C64)>
where S: nd::Data<Elem = f64>
{
    let dim = T.nrows();
    ShapeError::check(dim, T)?;
    QError::check_dimension(gamma.nrows(), dim)?;
    let derivs = path_derivatives(T);
    let Tu = coupling(T);
    let mut path: nd::Array2<C64>
        = nd::Array2::from_shape_fn(gamma.raw_dim(), |(d, k)| {
            derivs[d] * (eps * gamma[[d, k]])
        });
    for d in (0..dim).rev() {
        let corr = Tu.row(d).dot(&path);
        let mut row = path.row_mut(d);
        row -= &corr;
    }
    let jacobian: C64 = derivs.iter().product();
    Ok((path, jacobian))
}

/// Transform a path from decoupled coordinates back to physical coordinates,
/// `Uᴴ y + x0`, where `x0 = -X b` is the stationary point of the bilinear form.
pub fn backtransform<S>(
    U: &nd::Array2<C64>,
    x0: &nd::Array1<C64>,
    path: &Arr2<S>,
) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    let mut nodes = conj_t(U).dot(path);
    nodes.columns_mut().into_iter()
        .for_each(|mut col| { col += x0; });
    nodes
}

/// Construct the full contour for an eliminated `T'`, Schur factor `U`,
/// stationary point `x0`, and real quadrature nodes `gamma`.
pub fn construct_path<S>(
    T: &nd::Array2<C64>,
    U: &nd::Array2<C64>,
    x0: &nd::Array1<C64>,
    gamma: &Arr2<S>,
    eps: f64,
) -> QResult<ContourPath>
where S: nd::Data<Elem = f64>
{
    let (path, jacobian) = path_increments(T, gamma, eps)?;
    let nodes = backtransform(U, x0, &path);
    Ok(ContourPath { path, nodes, jacobian })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_linalg::random;
    use crate::schur::eliminate;

    #[test]
    fn one_dim_closed_form() {
        let T: nd::Array2<C64> = nd::array![[C64::new(0.3, 1.7)]];
        let gamma: nd::Array2<f64> = nd::array![[-2.0, -0.5, 0.0, 0.7, 1.9]];
        let eps = 0.1;
        let (path, jac) = path_increments(&T, &gamma, eps).unwrap();
        let dk = (C64::i() / T[[0, 0]]).sqrt();
        let expected = gamma.mapv(|g| dk * (eps * g));
        assert_eq!(path, expected);
        assert_eq!(jac, dk);
    }

    #[test]
    fn path_turns_oscillator_into_gaussian() {
        // upper triangular T with a non-trivial coupling
        let mut T: nd::Array2<C64> = nd::Array2::zeros((3, 3));
        T[[0, 0]] = C64::new(0.2, 1.0);
        T[[0, 1]] = C64::new(0.3, -0.1);
        T[[0, 2]] = C64::new(-0.2, 0.2);
        T[[1, 1]] = C64::new(-0.1, 2.0);
        T[[1, 2]] = C64::new(0.1, 0.4);
        T[[2, 2]] = C64::new(0.5, 1.5);
        let T0 = T.clone();
        eliminate(&mut T);
        let gamma: nd::Array2<f64> = random((3, 7));
        let eps = 0.5;
        let (path, _) = path_increments(&T, &gamma, eps).unwrap();
        for (y, g) in path.columns().into_iter().zip(gamma.columns()) {
            let quad: C64
                = T0.indexed_iter()
                .map(|((i, j), tij)| tij * y[i] * y[j])
                .sum();
            let tau2: f64 = g.iter().map(|gk| (eps * gk).powi(2)).sum();
            assert!((quad - C64::i() * tau2).norm() < 1e-12);
        }
    }

    #[test]
    fn backtransform_shifts_and_rotates() {
        let U: nd::Array2<C64> = nd::array![
            [C64::new(0.0, 1.0), C64::new(0.0, 0.0)],
            [C64::new(0.0, 0.0), C64::new(1.0, 0.0)],
        ];
        let x0: nd::Array1<C64> = nd::array![C64::new(1.0, 0.0), C64::new(0.0, -1.0)];
        let path: nd::Array2<C64> = nd::array![[C64::new(2.0, 0.0)], [C64::new(3.0, 0.0)]];
        let nodes = backtransform(&U, &x0, &path);
        assert_eq!(nodes, nd::array![[C64::new(1.0, -2.0)], [C64::new(3.0, -1.0)]]);
    }

    #[test]
    fn dimension_mismatch() {
        let T: nd::Array2<C64> = nd::Array2::eye(2);
        let gamma: nd::Array2<f64> = nd::Array2::zeros((3, 4));
        assert!(matches!(
            path_increments(&T, &gamma, 0.1),
            Err(QError::DimensionMismatch(3, 2))
        ));
    }
}
