//! Wavepackets as seen by the quadratures, with a reference implementation of
//! inhomogeneous Hagedorn wavepackets over hypercubic basis shapes.

use std::f64::consts::SQRT_2;
use indexmap::IndexSet;
use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ LengthError, QError, QResult },
    params::Params,
    utils::invert,
};

/// Interface to a (multi-component) wavepacket.
pub trait Wavepacket {
    /// Get the space dimension `D`.
    fn dimension(&self) -> usize;

    /// Get the number of components.
    fn number_components(&self) -> usize;

    /// Get the semiclassical scaling parameter ε.
    fn eps(&self) -> f64;

    /// Get the parameter set of a component.
    fn parameters(&self, component: usize) -> QResult<&Params>;

    /// Get the coefficient vector of a component.
    fn coefficients(&self, component: usize) -> QResult<nd::ArrayView1<'_, C64>>;

    /// Get the largest multi-index of the basis shape of a component.
    fn largest_index(&self, component: usize) -> QResult<Vec<usize>>;

    /// Evaluate all basis functions of a component at complex nodes (`D`×`N`),
    /// returning a `|K|`×`N` array, with one row per basis function in the
    /// order of the coefficients.
    ///
    /// If `prefactor` is `false`, the leading normalization constant `(π
    /// ε²)^(-D/4) / √det(Q)` is omitted.
    fn evaluate_basis_at(
        &self,
        nodes: nd::ArrayView2<'_, C64>,
        component: usize,
        prefactor: bool,
    ) -> QResult<nd::Array2<C64>>;
}

/// Hypercubic basis shape, containing all multi-indices `k` with `0 ≤ k[d] <
/// K[d]`.
///
/// Multi-indices are stored in lexicographic order with the last dimension
/// varying fastest, so that every index appears after all indices it can be
/// reached from by decrementing components. The zero index is always first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HyperCubicShape {
    limits: Vec<usize>,
    indices: IndexSet<Vec<usize>>,
}

impl HyperCubicShape {
    /// Create a new shape with the given limits `K`.
    ///
    /// *Panics if any limit is zero or no limits are given*.
    pub fn new(limits: &[usize]) -> Self {
        if limits.is_empty() || limits.contains(&0) {
            panic!("HyperCubicShape::new: limits must be non-empty and positive");
        }
        let indices: IndexSet<Vec<usize>>
            = limits.iter().map(|K| 0..*K).multi_cartesian_product().collect();
        Self { limits: limits.to_vec(), indices }
    }

    /// Get the dimension of the multi-indices.
    pub fn dimension(&self) -> usize { self.limits.len() }

    /// Get the number of multi-indices.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.indices.len() }

    /// Get the limits `K`.
    pub fn limits(&self) -> &[usize] { &self.limits }

    /// Return `true` if `k` is part of the shape.
    pub fn contains(&self, k: &[usize]) -> bool { self.indices.contains(k) }

    /// Get the linear position of a multi-index.
    pub fn index_of(&self, k: &[usize]) -> Option<usize> {
        self.indices.get_index_of(k)
    }

    /// Get the multi-index at a linear position.
    pub fn get(&self, i: usize) -> Option<&[usize]> {
        self.indices.get_index(i).map(|k| k.as_slice())
    }

    /// Iterate over all multi-indices in order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.indices.iter().map(|k| k.as_slice())
    }

    /// Get the largest multi-index, `K - 1`.
    pub fn largest_index(&self) -> Vec<usize> {
        self.limits.iter().map(|K| K - 1).collect()
    }
}

/// A single component of a [`HagedornWavepacket`].
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Parameter set
    pub params: Params,
    /// Basis shape
    pub shape: HyperCubicShape,
    /// Expansion coefficients, in the order of `shape`
    pub coefficients: nd::Array1<C64>,
}

/// Inhomogeneous Hagedorn wavepacket, where each component carries its own
/// parameter set.
#[derive(Clone, Debug, PartialEq)]
pub struct HagedornWavepacket {
    dim: usize,
    eps: f64,
    components: Vec<Component>,
}

impl HagedornWavepacket {
    /// Create a new wavepacket from `(parameters, shape, coefficients)` for
    /// each component.
    pub fn new(
        dim: usize,
        eps: f64,
        components: Vec<(Params, HyperCubicShape, nd::Array1<C64>)>,
    ) -> QResult<Self>
    {
        QError::check_epsilon(eps)?;
        (dim > 0).then_some(()).ok_or(QError::BadDimension(dim))?;
        let components: Vec<Component>
            = components.into_iter()
            .map(|(params, shape, coefficients)| -> QResult<Component> {
                LengthError::check_len(dim, params.dimension())?;
                LengthError::check_len(dim, shape.dimension())?;
                LengthError::check_len(shape.len(), coefficients.len())?;
                Ok(Component { params, shape, coefficients })
            })
            .collect::<QResult<_>>()?;
        Ok(Self { dim, eps, components })
    }

    /// Get a reference to a component.
    pub fn component(&self, component: usize) -> QResult<&Component> {
        QError::check_component(component, self.components.len())?;
        Ok(&self.components[component])
    }

    /// Get a mutable reference to a component.
    pub fn component_mut(&mut self, component: usize)
        -> QResult<&mut Component>
    {
        QError::check_component(component, self.components.len())?;
        Ok(&mut self.components[component])
    }

    /// Compute the norm `√(Σ |c|²)` over all components, which is the norm of
    /// the wavepacket by orthonormality of the Hagedorn basis.
    pub fn norm(&self) -> f64 {
        self.components.iter()
            .flat_map(|comp| comp.coefficients.iter())
            .map(|c| c.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Compute the norm `√(Σ |c|²)` of a single component.
    pub fn norm_component(&self, component: usize) -> QResult<f64> {
        let comp = self.component(component)?;
        Ok(comp.coefficients.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt())
    }
}

/// Evaluate the Hagedorn basis functions φ_k over `shape` at complex nodes via
/// the three-term recurrence
/// ```text
/// φ_(k + e_d) = [ √2 / ε (Q⁻¹ (x - q))_d φ_k - Σ_l (Q⁻¹ conj(Q))_dl √k_l φ_(k - e_l) ] / √(k_d + 1)
/// ```
/// starting from
/// ```text
/// φ_0 = exp(i / ε² ((x - q)ᵀ Γ (x - q) / 2 + pᵀ (x - q)))
/// ```
/// optionally times `(π ε²)^(-D/4) / √det(Q)`.
pub fn evaluate_hagedorn(
    params: &Params,
    shape: &HyperCubicShape,
    eps: f64,
    nodes: nd::ArrayView2<'_, C64>,
    prefactor: bool,
) -> QResult<nd::Array2<C64>>
{
    let dim = params.dimension();
    QError::check_dimension(nodes.nrows(), dim)?;
    let n = nodes.ncols();
    let Qinv = invert(&params.Q, "Q")?;
    let QQ = Qinv.dot(&params.Q.mapv(|z| z.conj()));
    let G = params.P.dot(&Qinv);

    let mut df = nodes.to_owned();
    df.columns_mut().into_iter()
        .for_each(|mut col| { col -= &params.q; });
    let pr1 = Qinv.dot(&df) * C64::from(SQRT_2 / eps);
    let Gdf = G.dot(&df);
    let expo: nd::Array1<C64>
        = nd::Zip::from(df.columns()).and(Gdf.columns())
        .map_collect(|dfk, Gdfk| {
            0.5 * dfk.dot(&Gdfk) + params.p.dot(&dfk)
        });
    let mut phi0 = expo.mapv(|e| (C64::i() / eps.powi(2) * e).exp());
    if prefactor {
        phi0 *= params.norm_prefactor(eps)?;
    }

    let mut phi: nd::Array2<C64> = nd::Array2::zeros((shape.len(), n));
    phi.row_mut(0).assign(&phi0);
    for (i, k) in shape.iter().enumerate().skip(1) {
        let Some(d) = k.iter().rposition(|kd| *kd > 0) else { continue; };
        let mut km = k.to_vec();
        km[d] -= 1;
        let Some(im) = shape.index_of(&km) else { continue; };
        let mut acc: nd::Array1<C64> = &pr1.row(d) * &phi.row(im);
        for l in (0..dim).filter(|l| km[*l] > 0) {
            let mut kmm = km.clone();
            kmm[l] -= 1;
            if let Some(imm) = shape.index_of(&kmm) {
                let f = QQ[[d, l]] * (km[l] as f64).sqrt();
                acc.zip_mut_with(&phi.row(imm), |a, p| { *a -= f * p; });
            }
        }
        acc /= C64::from((k[d] as f64).sqrt());
        phi.row_mut(i).assign(&acc);
    }
    Ok(phi)
}

impl Wavepacket for HagedornWavepacket {
    fn dimension(&self) -> usize { self.dim }

    fn number_components(&self) -> usize { self.components.len() }

    fn eps(&self) -> f64 { self.eps }

    fn parameters(&self, component: usize) -> QResult<&Params> {
        Ok(&self.component(component)?.params)
    }

    fn coefficients(&self, component: usize)
        -> QResult<nd::ArrayView1<'_, C64>>
    {
        Ok(self.component(component)?.coefficients.view())
    }

    fn largest_index(&self, component: usize) -> QResult<Vec<usize>> {
        Ok(self.component(component)?.shape.largest_index())
    }

    fn evaluate_basis_at(
        &self,
        nodes: nd::ArrayView2<'_, C64>,
        component: usize,
        prefactor: bool,
    ) -> QResult<nd::Array2<C64>>
    {
        let comp = self.component(component)?;
        evaluate_hagedorn(&comp.params, &comp.shape, self.eps, nodes, prefactor)
    }
}
