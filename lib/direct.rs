//! Matrix elements between wavepacket components by plain quadrature over
//! real nodes.
//!
//! Nodes are fitted to the mixed parameters of each component pair,
//! ```text
//! x = q0 + ε Qs γ
//! ```
//! so that the product of both Gaussian envelopes becomes `exp(-|γ|²)`. This
//! is exact for identical parameter sets, but degrades as the oscillation
//! between differing parameter sets grows with shrinking ε; it is mostly useful
//! as a reference for [numerical steepest descent][crate::nsd] at moderate ε.

use std::fmt;
use ndarray as nd;
use ndarray_linalg::Determinant;
use num_complex::Complex64 as C64;
use crate::{
    error::{ LengthError, QError, QResult },
    operator::{ Entry, Identity, Operator },
    packet::Wavepacket,
    params::{ mix_parameters, Mixed },
    rule::QuadratureRule,
};

/// Inhomogeneous direct quadrature
/// ```text
/// ⟨Φ_i | f | Φ'_j⟩
/// ```
/// over real nodes.
///
/// The rule must have [scaled][crate::rule::Weighting::Scaled] weights, i.e.
/// integrate unweighted functions.
pub struct DirectInhomogeneous<'a, R> {
    rule: R,
    pacbra: &'a dyn Wavepacket,
    packet: &'a dyn Wavepacket,
    operator: Box<dyn Operator + 'a>,
    cache: Option<(nd::Array2<f64>, nd::Array1<f64>)>,
}

impl<'a, R> fmt::Display for DirectInhomogeneous<'a, R>
where R: QuadratureRule
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inhomogeneous direct quadrature using a {}", self.rule)
    }
}

impl<'a, R> DirectInhomogeneous<'a, R>
where R: QuadratureRule
{
    /// Create a new quadrature over the given rule and packets, with the
    /// identity operator.
    pub fn new(
        rule: R,
        pacbra: &'a dyn Wavepacket,
        packet: &'a dyn Wavepacket,
    ) -> Self
    {
        Self { rule, pacbra, packet, operator: Box::new(Identity), cache: None }
    }

    /// Replace the operator.
    pub fn with_operator<O>(mut self, operator: O) -> Self
    where O: Operator + 'a
    {
        self.operator = Box::new(operator);
        self
    }

    /// Cache the nodes and weights of the rule.
    pub fn prepare(&mut self) {
        self.cache
            = Some((self.rule.nodes().to_owned(), self.rule.weights().to_owned()));
    }

    /// Compute the nodes `q0 + ε Qs γ` for a component pair.
    pub fn transform_nodes(&self, row: usize, col: usize)
        -> QResult<nd::Array2<f64>>
    {
        let (gamma, _) = self.check()?;
        let Mixed { q0, Qs } = self.mixed(row, col)?;
        Ok(fit_nodes(&q0, &Qs, self.packet.eps(), gamma))
    }

    fn check(&self) -> QResult<(&nd::Array2<f64>, &nd::Array1<f64>)> {
        QError::check_dimension(self.rule.dimension(), self.packet.dimension())?;
        QError::check_dimension(self.pacbra.dimension(), self.packet.dimension())?;
        self.cache.as_ref()
            .map(|(x, w)| (x, w))
            .ok_or(QError::Unprepared)
    }

    fn mixed(&self, row: usize, col: usize) -> QResult<Mixed> {
        mix_parameters(self.pacbra.parameters(row)?, self.packet.parameters(col)?)
    }

    /// Compute the matrix `M_kl = ⟨φ_k[Π_i] | f_ij | φ_l[Π'_j]⟩` over all
    /// basis functions of bra component `row` and ket component `col`.
    pub fn compute_matrix(&self, row: usize, col: usize)
        -> QResult<nd::Array2<C64>>
    {
        let (gamma, weights) = self.check()?;
        let dim = self.packet.dimension();
        let eps = self.packet.eps();
        let pibra = self.pacbra.parameters(row)?;
        let piket = self.packet.parameters(col)?;
        let Mixed { q0, Qs } = mix_parameters(pibra, piket)?;
        let nodes: nd::Array2<C64>
            = fit_nodes(&q0, &Qs, eps, gamma).mapv(C64::from);
        let n = nodes.ncols();

        let basisr = self.pacbra.evaluate_basis_at(nodes.view(), row, true)?;
        let basisc = self.packet.evaluate_basis_at(nodes.view(), col, true)?;
        LengthError::check_len(n, basisr.ncols())?;
        LengthError::check_len(n, basisc.ncols())?;
        let entry = Entry::new(row, col, self.packet.number_components());
        let values = self.operator.evaluate(nodes.view(), q0.view(), entry)?;
        LengthError::check_len(n, values.len())?;

        let scale = eps.powi(dim as i32) * Qs.det()?;
        let factor: nd::Array1<C64>
            = nd::Zip::from(&values).and(weights)
            .map_collect(|v, w| v * (scale * w));
        let M: nd::Array2<C64>
            = (&basisr.mapv(|z| z.conj()) * &factor).dot(&basisc.t());
        let phase = (C64::i() / eps.powi(2) * (piket.S - pibra.S.conj())).exp();
        Ok(M * phase)
    }

    /// Compute the overlap `⟨Φ_i | f_ij | Φ'_j⟩ = c_iᴴ M c'_j` of bra
    /// component `row` and ket component `col`.
    pub fn compute_overlap(&self, row: usize, col: usize) -> QResult<C64> {
        let M = self.compute_matrix(row, col)?;
        let cbra = self.pacbra.coefficients(row)?;
        let cket = self.packet.coefficients(col)?;
        LengthError::check_len(M.nrows(), cbra.len())?;
        LengthError::check_len(M.ncols(), cket.len())?;
        Ok(cbra.mapv(|c| c.conj()).dot(&M.dot(&cket)))
    }
}

fn fit_nodes(
    q0: &nd::Array1<f64>,
    Qs: &nd::Array2<f64>,
    eps: f64,
    gamma: &nd::Array2<f64>,
) -> nd::Array2<f64>
{
    let mut nodes = Qs.dot(gamma) * eps;
    nodes.columns_mut().into_iter()
        .for_each(|mut col| { col += q0; });
    nodes
}
