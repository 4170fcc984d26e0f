//! Quadrature rules: structs containing nodes and weights, as opposed to the
//! quadratures in [`nsd`][crate::nsd] and [`direct`][crate::direct] that
//! actually compute matrix elements.

use std::fmt;
use itertools::Itertools;
use ndarray as nd;
use ndarray_linalg::{ EighInto, UPLO };
use crate::error::{ QError, QResult };

/// Interface to a quadrature rule Γ = (γ, ω) in `D` dimensions.
pub trait QuadratureRule: fmt::Display {
    /// Get the space dimension `D` of the rule.
    fn dimension(&self) -> usize;

    /// Get the nodes γ as a `D`×`N` array.
    fn nodes(&self) -> nd::ArrayView2<'_, f64>;

    /// Get the weights ω as an array of length `N`.
    fn weights(&self) -> nd::ArrayView1<'_, f64>;

    /// Get the number of nodes `N`.
    fn number_nodes(&self) -> usize { self.weights().len() }
}

/// Specifies the integral that the weights of a [`GaussHermite`] rule are
/// meant for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Weights ω for `∫ f(x) exp(-|x|²) dx ≈ Σ ω f(γ)`.
    ///
    /// This is the weighting required by [numerical steepest
    /// descent][crate::nsd], where the Gaussian is produced by the contour.
    Gaussian,
    /// Weights ω exp(|γ|²) for `∫ f(x) dx ≈ Σ ω f(γ)`, to be used for
    /// integrands that carry their own Gaussian decay, as in [direct
    /// quadrature][crate::direct].
    Scaled,
}

/// Tensor-product Gauss-Hermite quadrature rule of a fixed order in each of `D`
/// dimensions.
///
/// Nodes are ordered lexicographically by their one-dimensional indices, with
/// the last dimension varying fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussHermite {
    dim: usize,
    order: usize,
    weighting: Weighting,
    nodes: nd::Array2<f64>,
    weights: nd::Array1<f64>,
}

/// Compute the nodes and weights of the one-dimensional Gauss-Hermite rule of
/// order `n` for the weight function `exp(-x²)` via the Golub-Welsch
/// eigenproblem of the Jacobi matrix.
///
/// Nodes are returned in ascending order.
pub fn gauss_hermite_1d(n: usize) -> QResult<(nd::Array1<f64>, nd::Array1<f64>)>
{
    (n > 0).then_some(()).ok_or(QError::BadOrder(n))?;
    let mut J: nd::Array2<f64> = nd::Array2::zeros((n, n));
    J.slice_mut(nd::s![1..n, 0..n - 1]).diag_mut()
        .iter_mut().enumerate()
        .for_each(|(k, jk)| { *jk = ((k + 1) as f64 / 2.0).sqrt(); });
    J.slice_mut(nd::s![0..n - 1, 1..n]).diag_mut()
        .iter_mut().enumerate()
        .for_each(|(k, jk)| { *jk = ((k + 1) as f64 / 2.0).sqrt(); });
    let (x, v): (nd::Array1<f64>, nd::Array2<f64>)
        = J.eigh_into(UPLO::Lower)?;
    let sqrt_pi = std::f64::consts::PI.sqrt();
    let w: nd::Array1<f64> = v.row(0).mapv(|v0k| sqrt_pi * v0k.powi(2));
    Ok((x, w))
}

impl GaussHermite {
    /// Construct the tensor-product rule of `order` nodes per dimension in
    /// `dim` dimensions.
    pub fn new(dim: usize, order: usize, weighting: Weighting) -> QResult<Self> {
        (dim > 0).then_some(()).ok_or(QError::BadDimension(dim))?;
        let (x, w) = gauss_hermite_1d(order)?;
        let w = match weighting {
            Weighting::Gaussian => w,
            Weighting::Scaled
                => nd::Zip::from(&w).and(&x).map_collect(|wk, xk| wk * xk.powi(2).exp()),
        };
        let multi: Vec<Vec<usize>>
            = (0..dim).map(|_| 0..order).multi_cartesian_product().collect();
        let n = multi.len();
        let nodes: nd::Array2<f64>
            = nd::Array2::from_shape_fn((dim, n), |(d, k)| x[multi[k][d]]);
        let weights: nd::Array1<f64>
            = multi.iter()
            .map(|idx| idx.iter().map(|i| w[*i]).product::<f64>())
            .collect();
        Ok(Self { dim, order, weighting, nodes, weights })
    }

    /// Get the number of nodes per dimension.
    pub fn order(&self) -> usize { self.order }

    /// Get the weighting of the rule.
    pub fn weighting(&self) -> Weighting { self.weighting }
}

impl QuadratureRule for GaussHermite {
    fn dimension(&self) -> usize { self.dim }

    fn nodes(&self) -> nd::ArrayView2<'_, f64> { self.nodes.view() }

    fn weights(&self) -> nd::ArrayView1<'_, f64> { self.weights.view() }
}

impl fmt::Display for GaussHermite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tensor-product Gauss-Hermite rule (dimension {}, order {}, {:?} weights)",
            self.dim, self.order, self.weighting,
        )
    }
}
