//! Matrix elements between wavepacket components by numerical steepest
//! descent.
//!
//! For a bra component with parameters Π_r and a ket component with Π_c, the
//! product of both zeroth-order Gaussians is an oscillator `exp(i g(x) / ε²)`
//! with a complex [quadratic form][crate::bilinear::Bilinear] `g`. Deforming
//! the real integration domain onto the [steepest-descent contour][crate::path]
//! of `g` turns the oscillator into a real Gaussian, so that a Gauss-Hermite
//! rule integrates the remaining (polynomial) part of the integrand exactly up
//! to the order of the rule, independently of how small ε is.
//!
//! All remaining factors of the basis functions are evaluated along the
//! contour relative to the zeroth basis function, and the constant
//! normalization and phase factors of both components are reapplied at the
//! end.

use std::fmt;
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use crate::{
    bilinear::build_bilinear,
    error::{ LengthError, QError, QResult },
    oracle::SparsityOracle,
    operator::{ Entry, Identity, Operator },
    packet::Wavepacket,
    params::mix_parameters_tol,
    path::{ construct_path, ContourPath },
    rule::QuadratureRule,
    schur::{ eliminate_tol, schur_decompose_iters, SchurFactor },
    utils::nan_to_zero,
    DEF_MAXITERS,
    DEF_PIVOT_TOL,
    DEF_SYM_TOL,
};

/// Numerical settings for [`NSDInhomogeneous`]. Unset values fall back to the
/// crate defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NSDConfig {
    /// Relative modulus below which a Schur pivot is reported as degenerate
    /// (default `1e-14`).
    pub pivot_tol: Option<f64>,
    /// Tolerance on the asymmetry of the mixed covariance `Q0` (default
    /// `1e-8`).
    pub sym_tol: Option<f64>,
    /// Maximum number of iterations of the Schur decomposition (default
    /// `1000`).
    pub maxiters: Option<usize>,
}

/// Node and weight arrays copied out of the quadrature rule by
/// [`NSDInhomogeneous::prepare`].
#[derive(Clone, Debug)]
struct Cache {
    nodes: nd::Array2<f64>,
    weights: nd::Array1<f64>,
}

/// Inhomogeneous numerical steepest descent quadrature
/// ```text
/// ⟨Φ_i | f | Φ'_j⟩
/// ```
/// between the components of a bra and a ket wavepacket that may carry
/// different parameter sets.
///
/// The rule must be [Gaussian-weighted][crate::rule::Weighting::Gaussian].
/// Nodes and weights are cached by [`prepare`][Self::prepare], which must be
/// called before any matrix element is computed.
///
/// The operator must be free of poles and may be at most polynomial; it
/// defaults to the identity.
pub struct NSDInhomogeneous<'a, R> {
    rule: R,
    pacbra: &'a dyn Wavepacket,
    packet: &'a dyn Wavepacket,
    operator: Box<dyn Operator + 'a>,
    config: NSDConfig,
    cache: Option<Cache>,
}

impl<'a, R> fmt::Debug for NSDInhomogeneous<'a, R>
where R: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NSDInhomogeneous")
            .field("rule", &self.rule)
            .field("config", &self.config)
            .field("prepared", &self.cache.is_some())
            .finish()
    }
}

impl<'a, R> fmt::Display for NSDInhomogeneous<'a, R>
where R: QuadratureRule
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inhomogeneous numerical steepest descent using a {}", self.rule)
    }
}

/// Divide every row of a basis evaluation by its first row.
///
/// A vanishing zeroth basis function produces non-finite values here, which
/// are sanitized at the end of the assembly.
fn relative_to_ground(mut basis: nd::Array2<C64>) -> nd::Array2<C64> {
    if basis.nrows() == 0 { return basis; }
    let phi0 = basis.row(0).to_owned();
    basis.rows_mut().into_iter()
        .for_each(|mut phik| { phik /= &phi0; });
    basis
}

impl<'a, R> NSDInhomogeneous<'a, R>
where R: QuadratureRule
{
    /// Create a new quadrature over the given rule and packets, with the
    /// identity operator. `pacbra` and `packet` may be the same wavepacket.
    pub fn new(
        rule: R,
        pacbra: &'a dyn Wavepacket,
        packet: &'a dyn Wavepacket,
    ) -> Self
    {
        Self {
            rule,
            pacbra,
            packet,
            operator: Box::new(Identity),
            config: NSDConfig::default(),
            cache: None,
        }
    }

    /// Replace the operator.
    pub fn with_operator<O>(mut self, operator: O) -> Self
    where O: Operator + 'a
    {
        self.operator = Box::new(operator);
        self
    }

    /// Replace the numerical settings.
    pub fn with_config(mut self, config: NSDConfig) -> Self {
        self.config = config;
        self
    }

    /// Get a reference to the quadrature rule.
    pub fn rule(&self) -> &R { &self.rule }

    /// Get the numerical settings.
    pub fn config(&self) -> NSDConfig { self.config }

    /// Cache the nodes and weights of the rule.
    pub fn prepare(&mut self) {
        self.cache = Some(Cache {
            nodes: self.rule.nodes().to_owned(),
            weights: self.rule.weights().to_owned(),
        });
    }

    /// Return `true` if [`prepare`][Self::prepare] has been called.
    pub fn is_prepared(&self) -> bool { self.cache.is_some() }

    fn check(&self) -> QResult<&Cache> {
        QError::check_dimension(self.rule.dimension(), self.packet.dimension())?;
        QError::check_dimension(self.pacbra.dimension(), self.packet.dimension())?;
        self.cache.as_ref().ok_or(QError::Unprepared)
    }

    fn assemble(&self, cache: &Cache, row: usize, col: usize)
        -> QResult<nd::Array2<C64>>
    {
        let dim = self.packet.dimension();
        let eps = self.packet.eps();
        let pibra = self.pacbra.parameters(row)?;
        let piket = self.packet.parameters(col)?;
        let mixed = mix_parameters_tol(
            pibra, piket, self.config.sym_tol.unwrap_or(DEF_SYM_TOL))?;

        // combine oscillators and decouple dimensions
        let form = build_bilinear(pibra, piket)?;
        let SchurFactor { mut T, U }
            = schur_decompose_iters(
                &form.A, self.config.maxiters.unwrap_or(DEF_MAXITERS))?;
        let degenerate
            = eliminate_tol(&mut T, self.config.pivot_tol.unwrap_or(DEF_PIVOT_TOL));
        let X = form.hessian_inverse()?;
        let ctilde = form.reduced_constant(&X);
        let w = eps.powi(-2);
        let prefactor = (C64::i() * w * ctilde).exp();
        log::debug!(
            "nsd::compute_matrix: pair ({}, {}): c~ = {:e}, {} degenerate pivot(s)",
            row, col, ctilde, degenerate.len(),
        );

        let x0 = form.stationary_point(&X);
        let ContourPath { nodes, jacobian, .. }
            = construct_path(&T, &U, &x0, &cache.nodes, eps)?;
        let n = nodes.ncols();

        let normfactor
            = pibra.norm_prefactor(eps)?.conj() * piket.norm_prefactor(eps)?;
        let phase = (C64::i() * w * (piket.S - pibra.S.conj())).exp();

        let nodes_bar = nodes.mapv(|z| z.conj());
        let basisr = relative_to_ground(
            self.pacbra.evaluate_basis_at(nodes_bar.view(), row, false)?);
        let basisc = relative_to_ground(
            self.packet.evaluate_basis_at(nodes.view(), col, false)?);
        LengthError::check_len(n, basisr.ncols())?;
        LengthError::check_len(n, basisc.ncols())?;

        let entry = Entry::new(row, col, self.packet.number_components());
        let opath
            = self.operator.evaluate(nodes.view(), mixed.q0.view(), entry)?;
        LengthError::check_len(n, opath.len())?;

        let quadrand: nd::Array1<C64>
            = nd::Zip::from(&opath).and(&cache.weights)
            .map_collect(|o, wk| o * jacobian * *wk);
        let M: nd::Array2<C64>
            = (&basisr.mapv(|z| z.conj()) * &quadrand).dot(&basisc.t());
        Ok(M * (phase * normfactor * prefactor / w.sqrt().powi(dim as i32)))
    }

    /// Compute the matrix `M_kl = ⟨φ_k[Π_i] | f_ij | φ_l[Π'_j]⟩` over all
    /// basis functions of bra component `row` and ket component `col`.
    ///
    /// Non-finite entries, which arise when the zeroth basis function vanishes
    /// at a node, are replaced with zero and logged.
    ///
    /// Fails with [`QError::DimensionMismatch`] if the dimensions of the rule
    /// and packets differ, and with [`QError::Unprepared`] if
    /// [`prepare`][Self::prepare] has not been called.
    pub fn compute_matrix(&self, row: usize, col: usize)
        -> QResult<nd::Array2<C64>>
    {
        let cache = self.check()?;
        let mut M = self.assemble(cache, row, col)?;
        let nbad = nan_to_zero(&mut M);
        if nbad > 0 {
            log::warn!(
                "nsd::compute_matrix: WARNING: replaced {} non-finite \
                element(s) with zero for pair ({}, {})",
                nbad, row, col,
            );
        }
        Ok(M)
    }

    /// Compute the overlap `⟨Φ_i | f_ij | Φ'_j⟩ = c_iᴴ M c'_j` of bra
    /// component `row` and ket component `col`.
    ///
    /// See [`compute_matrix`][Self::compute_matrix].
    pub fn compute_overlap(&self, row: usize, col: usize) -> QResult<C64> {
        let M = self.compute_matrix(row, col)?;
        let cbra = self.pacbra.coefficients(row)?;
        let cket = self.packet.coefficients(col)?;
        LengthError::check_len(M.nrows(), cbra.len())?;
        LengthError::check_len(M.ncols(), cket.len())?;
        let I = cbra.mapv(|c| c.conj()).dot(&M.dot(&cket));
        if I.is_finite() {
            Ok(I)
        } else {
            log::warn!(
                "nsd::compute_overlap: WARNING: replaced non-finite overlap \
                with zero for pair ({}, {})",
                row, col,
            );
            Ok(C64::zero())
        }
    }

    /// Compute the overlaps of all pairs of components, returned as a matrix
    /// indexed by `(row, col)`.
    pub fn quadrature(&self) -> QResult<nd::Array2<C64>> {
        let nr = self.pacbra.number_components();
        let nc = self.packet.number_components();
        let mut overlaps: nd::Array2<C64> = nd::Array2::zeros((nr, nc));
        for ((row, col), o) in overlaps.indexed_iter_mut() {
            *o = self.compute_overlap(row, col)?;
        }
        Ok(overlaps)
    }

    /// Compute the sum of the overlaps of all pairs of components.
    pub fn quadrature_summed(&self) -> QResult<C64> {
        Ok(self.quadrature()?.sum())
    }

    /// Like [`quadrature`][Self::quadrature], but skip all pairs that `oracle`
    /// estimates to be negligible, leaving them as exact zeros.
    pub fn quadrature_sparse<O>(&self, oracle: &O) -> QResult<nd::Array2<C64>>
    where O: SparsityOracle + ?Sized
    {
        let nr = self.pacbra.number_components();
        let nc = self.packet.number_components();
        let mut overlaps: nd::Array2<C64> = nd::Array2::zeros((nr, nc));
        for ((row, col), o) in overlaps.indexed_iter_mut() {
            if oracle.is_not_zero(self.pacbra, self.packet, row, col)? {
                *o = self.compute_overlap(row, col)?;
            } else {
                log::debug!(
                    "nsd::quadrature_sparse: skipping negligible pair ({}, {})",
                    row, col,
                );
            }
        }
        Ok(overlaps)
    }

    /// Compute the full block matrix of all pairs of components, where block
    /// `(row, col)` is given by [`compute_matrix`][Self::compute_matrix].
    pub fn build_matrix(&self) -> QResult<nd::Array2<C64>> {
        let sizes = |packet: &dyn Wavepacket| -> QResult<Vec<usize>> {
            (0..packet.number_components())
                .map(|k| packet.coefficients(k).map(|c| c.len()))
                .collect()
        };
        let rsizes = sizes(self.pacbra)?;
        let csizes = sizes(self.packet)?;
        let mut result: nd::Array2<C64>
            = nd::Array2::zeros((rsizes.iter().sum::<usize>(), csizes.iter().sum::<usize>()));
        let mut r0: usize = 0;
        for (row, nr) in rsizes.iter().enumerate() {
            let mut c0: usize = 0;
            for (col, nc) in csizes.iter().enumerate() {
                let block = self.compute_matrix(row, col)?;
                result.slice_mut(nd::s![r0..r0 + nr, c0..c0 + nc])
                    .assign(&block);
                c0 += nc;
            }
            r0 += nr;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        direct::DirectInhomogeneous,
        operator::{ AtOnce, EntryWise },
        oracle::PhaseSpaceOracle,
        packet::{ HagedornWavepacket, HyperCubicShape },
        params::Params,
        rule::{ GaussHermite, Weighting },
        utils::max_norm,
    };

    fn single(eps: f64, params: Params, limits: &[usize], c: nd::Array1<C64>)
        -> HagedornWavepacket
    {
        HagedornWavepacket::new(
            params.dimension(),
            eps,
            vec![(params, HyperCubicShape::new(limits), c)],
        ).unwrap()
    }

    fn coefficients(n: usize) -> nd::Array1<C64> {
        (0..n).map(|k| C64::new(1.0 / (1.0 + k as f64), 0.1 * k as f64)).collect()
    }

    fn rule(dim: usize, order: usize) -> GaussHermite {
        GaussHermite::new(dim, order, Weighting::Gaussian).unwrap()
    }

    fn check_self_overlap(packet: &HagedornWavepacket, order: usize) {
        let mut nsd = NSDInhomogeneous::new(
            rule(packet.dimension(), order), packet, packet);
        nsd.prepare();
        let I = nsd.compute_overlap(0, 0).unwrap();
        let expected = packet.norm().powi(2);
        assert!((I - C64::from(expected)).norm() < 1e-10 * expected);
    }

    #[test]
    fn ground_state_overlap() {
        let packet = single(0.1, Params::ground(1), &[1], nd::array![C64::from(1.0)]);
        let mut nsd = NSDInhomogeneous::new(rule(1, 5), &packet, &packet);
        nsd.prepare();
        let I = nsd.compute_overlap(0, 0).unwrap();
        assert!((I - C64::from(1.0)).norm() < 1e-8);
    }

    #[test]
    fn self_overlap_1d() {
        let params = Params::from_real(
            &nd::array![0.4], &nd::array![-0.7], &nd::array![[0.8]],
            &nd::array![[0.3]], 0.5,
        ).unwrap();
        let packet = single(0.2, params, &[5], coefficients(5));
        check_self_overlap(&packet, 6);
    }

    #[test]
    fn self_overlap_2d() {
        let params = Params::from_real(
            &nd::array![0.3, -0.2],
            &nd::array![0.5, 0.1],
            &nd::array![[1.2, 0.3], [0.2, 0.8]],
            &nd::array![[0.4, 0.1], [0.1, -0.3]],
            0.2,
        ).unwrap();
        let packet = single(0.3, params, &[3, 3], coefficients(9));
        check_self_overlap(&packet, 6);
    }

    #[test]
    fn self_overlap_3d() {
        let params = Params::from_real(
            &nd::array![0.1, 0.0, -0.3],
            &nd::array![0.2, -0.4, 0.6],
            &nd::array![[1.0, 0.2, 0.0], [0.1, 0.9, 0.3], [0.0, -0.2, 1.1]],
            &nd::array![[0.2, 0.0, 0.1], [0.0, -0.1, 0.05], [0.1, 0.05, 0.3]],
            0.0,
        ).unwrap();
        let packet = single(0.25, params, &[2, 2, 2], coefficients(8));
        check_self_overlap(&packet, 5);
    }

    #[test]
    fn position_expectation() {
        let mut params = Params::ground(1);
        params.q = nd::array![C64::from(0.3)];
        let packet = single(0.1, params, &[1], nd::array![C64::from(1.0)]);
        let op = EntryWise::new(
            |x: nd::ArrayView2<C64>, _: nd::ArrayView1<f64>, _: Entry| {
                x.row(0).to_owned()
            }
        );
        let mut nsd = NSDInhomogeneous::new(rule(1, 4), &packet, &packet)
            .with_operator(op);
        nsd.prepare();
        let I = nsd.compute_overlap(0, 0).unwrap();
        assert!((I - C64::from(0.3)).norm() < 1e-10);
    }

    #[test]
    fn at_once_matches_entry_wise() {
        let params = Params::from_real(
            &nd::array![0.4], &nd::array![-0.7], &nd::array![[0.8]],
            &nd::array![[0.3]], 0.0,
        ).unwrap();
        let packet = single(0.2, params, &[3], coefficients(3));
        let mut a = NSDInhomogeneous::new(rule(1, 6), &packet, &packet)
            .with_operator(EntryWise::new(
                |x: nd::ArrayView2<C64>, _: nd::ArrayView1<f64>, _: Entry| {
                    x.row(0).mapv(|xk| xk * xk)
                }
            ));
        let mut b = NSDInhomogeneous::new(rule(1, 6), &packet, &packet)
            .with_operator(AtOnce::new(
                |x: nd::ArrayView2<C64>, _: nd::ArrayView1<f64>| {
                    vec![x.row(0).mapv(|xk| xk * xk)]
                }
            ));
        a.prepare();
        b.prepare();
        let Ma = a.compute_matrix(0, 0).unwrap();
        let Mb = b.compute_matrix(0, 0).unwrap();
        assert!(max_norm(&(Ma - Mb)) < 1e-14);
    }

    #[test]
    fn agrees_with_direct_1d() {
        let eps = 0.5;
        let bra = single(eps, Params::ground(1), &[3], coefficients(3));
        let ket_params = Params::from_real(
            &nd::array![0.3], &nd::array![0.2], &nd::array![[1.2]],
            &nd::array![[0.3]], 0.0,
        ).unwrap();
        let ket = single(eps, ket_params, &[3], coefficients(3));

        let mut nsd = NSDInhomogeneous::new(rule(1, 10), &bra, &ket);
        nsd.prepare();
        let mut direct = DirectInhomogeneous::new(
            GaussHermite::new(1, 30, Weighting::Scaled).unwrap(), &bra, &ket);
        direct.prepare();
        let Mn = nsd.compute_matrix(0, 0).unwrap();
        let Md = direct.compute_matrix(0, 0).unwrap();
        assert!(max_norm(&(&Mn - &Md)) < 1e-9);
        let In = nsd.compute_overlap(0, 0).unwrap();
        let Id = direct.compute_overlap(0, 0).unwrap();
        assert!((In - Id).norm() < 1e-9);
    }

    struct ZeroFirst(HagedornWavepacket);

    impl Wavepacket for ZeroFirst {
        fn dimension(&self) -> usize { self.0.dimension() }

        fn number_components(&self) -> usize { self.0.number_components() }

        fn eps(&self) -> f64 { self.0.eps() }

        fn parameters(&self, component: usize) -> QResult<&Params> {
            self.0.parameters(component)
        }

        fn coefficients(&self, component: usize)
            -> QResult<nd::ArrayView1<'_, C64>>
        {
            self.0.coefficients(component)
        }

        fn largest_index(&self, component: usize) -> QResult<Vec<usize>> {
            self.0.largest_index(component)
        }

        fn evaluate_basis_at(
            &self,
            nodes: nd::ArrayView2<'_, C64>,
            component: usize,
            prefactor: bool,
        ) -> QResult<nd::Array2<C64>>
        {
            let mut basis = self.0.evaluate_basis_at(nodes, component, prefactor)?;
            basis[[0, 0]] = C64::zero();
            Ok(basis)
        }
    }

    #[test]
    fn vanishing_ground_is_sanitized() {
        let packet = ZeroFirst(
            single(0.1, Params::ground(1), &[2], coefficients(2)));
        let mut nsd = NSDInhomogeneous::new(rule(1, 5), &packet, &packet);
        nsd.prepare();
        let M = nsd.compute_matrix(0, 0).unwrap();
        assert!(M.iter().all(|m| m.is_finite()));
        assert!(nsd.compute_overlap(0, 0).unwrap().is_finite());
    }

    #[test]
    fn dimension_mismatch_before_prepare() {
        let packet = single(0.1, Params::ground(1), &[1], nd::array![C64::from(1.0)]);
        let nsd = NSDInhomogeneous::new(rule(2, 3), &packet, &packet);
        assert!(matches!(
            nsd.compute_overlap(0, 0),
            Err(QError::DimensionMismatch(2, 1))
        ));
    }

    #[test]
    fn unprepared() {
        let packet = single(0.1, Params::ground(1), &[1], nd::array![C64::from(1.0)]);
        let nsd = NSDInhomogeneous::new(rule(1, 3), &packet, &packet);
        assert!(!nsd.is_prepared());
        assert!(matches!(nsd.compute_matrix(0, 0), Err(QError::Unprepared)));
    }

    fn two_component(eps: f64) -> HagedornWavepacket {
        let p1 = Params::from_real(
            &nd::array![0.2], &nd::array![0.1], &nd::array![[0.9]],
            &nd::array![[0.2]], 0.0,
        ).unwrap();
        HagedornWavepacket::new(
            1,
            eps,
            vec![
                (Params::ground(1), HyperCubicShape::new(&[2]), coefficients(2)),
                (p1, HyperCubicShape::new(&[3]), coefficients(3)),
            ],
        ).unwrap()
    }

    #[test]
    fn multi_component_identity() {
        let packet = two_component(0.2);
        let mut nsd = NSDInhomogeneous::new(rule(1, 6), &packet, &packet);
        nsd.prepare();
        let overlaps = nsd.quadrature().unwrap();
        assert_eq!(overlaps[[0, 1]], C64::zero());
        assert_eq!(overlaps[[1, 0]], C64::zero());
        for k in 0..2 {
            let expected = packet.norm_component(k).unwrap().powi(2);
            assert!((overlaps[[k, k]] - C64::from(expected)).norm() < 1e-10);
        }
        let total = nsd.quadrature_summed().unwrap();
        assert!((total - C64::from(packet.norm().powi(2))).norm() < 1e-10);
    }

    #[test]
    fn block_matrix_is_identity() {
        let packet = two_component(0.2);
        let mut nsd = NSDInhomogeneous::new(rule(1, 6), &packet, &packet);
        nsd.prepare();
        let M = nsd.build_matrix().unwrap();
        assert_eq!(M.dim(), (5, 5));
        let eye: nd::Array2<C64> = nd::Array2::eye(5);
        assert!(max_norm(&(M - eye)) < 1e-10);
    }

    #[test]
    fn sparse_skips_distant_pairs() {
        let eps = 0.1;
        let mut far = Params::ground(1);
        far.q = nd::array![C64::from(1.0)];
        let mut near = Params::ground(1);
        near.q = nd::array![C64::from(0.05)];
        let bra = single(eps, Params::ground(1), &[1], nd::array![C64::from(1.0)]);
        let ket = HagedornWavepacket::new(
            1,
            eps,
            vec![
                (far, HyperCubicShape::new(&[1]), nd::array![C64::from(1.0)]),
                (near, HyperCubicShape::new(&[1]), nd::array![C64::from(1.0)]),
            ],
        ).unwrap();
        let mut nsd = NSDInhomogeneous::new(rule(1, 5), &bra, &ket);
        nsd.prepare();
        let dense = nsd.quadrature().unwrap();
        let sparse = nsd.quadrature_sparse(&PhaseSpaceOracle::default()).unwrap();
        assert_eq!(sparse[[0, 0]], C64::zero());
        assert!(dense[[0, 0]].norm() < 1e-10);
        assert_eq!(sparse[[0, 1]], dense[[0, 1]]);
        // ⟨φ_0(q) | φ_0(q')⟩ = exp(-(q - q')² / 4 ε²)
        let expected = (-0.05_f64.powi(2) / (4.0 * eps * eps)).exp();
        assert!((dense[[0, 1]] - C64::from(expected)).norm() < 1e-10);
    }

    #[test]
    fn display() {
        let packet = single(0.1, Params::ground(1), &[1], nd::array![C64::from(1.0)]);
        let nsd = NSDInhomogeneous::new(rule(1, 3), &packet, &packet)
            .with_config(NSDConfig { pivot_tol: Some(1e-12), ..Default::default() });
        assert!(format!("{}", nsd).contains("numerical steepest descent"));
        assert_eq!(nsd.config().pivot_tol, Some(1e-12));
    }
}
