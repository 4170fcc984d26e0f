//! Cheap a priori estimates of whether an overlap integral is negligible.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::QResult,
    packet::Wavepacket,
};

/// Interface to a sparsity oracle.
pub trait SparsityOracle {
    /// Return `false` if the overlap of bra component `row` with ket component
    /// `col` is estimated to be negligible.
    fn is_not_zero(
        &self,
        pacbra: &dyn Wavepacket,
        packet: &dyn Wavepacket,
        row: usize,
        col: usize,
    ) -> QResult<bool>;
}

/// Default factor α for [`PhaseSpaceOracle`].
pub const DEF_FACTOR: f64 = 1.5;

/// Oracle comparing the phase space distance of two components to their
/// spreads.
///
/// The spread of a component is estimated from the second moments of its
/// highest-order basis function `φ_k`: with `k̂ = |k| / √D (1, ..., 1)`,
/// ```text
/// σq = ε / √2 √(|Q|² (2 k̂ + 1))
/// σp = ε / √2 √(|P|² (2 k̂ + 1))
/// ```
/// (squares and roots taken element-wise), and an overlap is non-negligible iff
/// ```text
/// |q_bra - q_ket| ≤ α (|σq_bra| + |σq_ket|)
/// |p_bra - p_ket| ≤ α (|σp_bra| + |σp_ket|)
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseSpaceOracle {
    factor: f64,
    bias_bra: Option<Vec<usize>>,
    bias_ket: Option<Vec<usize>>,
}

impl Default for PhaseSpaceOracle {
    fn default() -> Self { Self::new(DEF_FACTOR) }
}

impl PhaseSpaceOracle {
    /// Create a new oracle with factor α.
    pub fn new(factor: f64) -> Self {
        Self { factor, bias_bra: None, bias_ket: None }
    }

    /// Set minimal multi-indices used in place of the largest index of the bra
    /// and/or ket whenever the latter is smaller in norm.
    ///
    /// The spread of small basis shapes tends to be underestimated otherwise.
    pub fn bias(mut self, bra_min_k: Option<Vec<usize>>, ket_min_k: Option<Vec<usize>>)
        -> Self
    {
        if bra_min_k.is_some() { self.bias_bra = bra_min_k; }
        if ket_min_k.is_some() { self.bias_ket = ket_min_k; }
        self
    }

    /// Get the factor α.
    pub fn factor(&self) -> f64 { self.factor }
}

fn index_norm(k: &[usize]) -> f64 {
    k.iter().map(|kd| (*kd as f64).powi(2)).sum::<f64>().sqrt()
}

fn biased(k: Vec<usize>, min_k: &Option<Vec<usize>>) -> Vec<usize> {
    match min_k {
        Some(m) if index_norm(&k) < index_norm(m) => m.clone(),
        _ => k,
    }
}

fn spread(M: &nd::Array2<C64>, k: &[usize], eps: f64) -> f64 {
    let dim = M.nrows() as f64;
    let khat = index_norm(k) / dim.sqrt();
    let rhs = nd::Array1::from_elem(M.ncols(), 2.0 * khat + 1.0);
    let sig: nd::Array1<f64>
        = M.mapv(|m| m.norm_sqr()).dot(&rhs)
        .mapv(|s| eps / 2.0_f64.sqrt() * s.sqrt());
    sig.dot(&sig).sqrt()
}

fn distance(a: &nd::Array1<C64>, b: &nd::Array1<C64>) -> f64 {
    a.iter().zip(b).map(|(ak, bk)| (ak - bk).norm_sqr()).sum::<f64>().sqrt()
}

impl SparsityOracle for PhaseSpaceOracle {
    fn is_not_zero(
        &self,
        pacbra: &dyn Wavepacket,
        packet: &dyn Wavepacket,
        row: usize,
        col: usize,
    ) -> QResult<bool>
    {
        let eps = packet.eps();
        let pibra = pacbra.parameters(row)?;
        let piket = packet.parameters(col)?;
        let kbra = biased(pacbra.largest_index(row)?, &self.bias_bra);
        let kket = biased(packet.largest_index(col)?, &self.bias_ket);

        let sigq = spread(&pibra.Q, &kbra, eps) + spread(&piket.Q, &kket, eps);
        let sigp = spread(&pibra.P, &kbra, eps) + spread(&piket.P, &kket, eps);
        Ok(
            distance(&pibra.q, &piket.q) <= self.factor * sigq
            && distance(&pibra.p, &piket.p) <= self.factor * sigp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        packet::{ HagedornWavepacket, HyperCubicShape },
        params::Params,
    };

    fn packet_at(q: f64, p: f64, K: usize) -> HagedornWavepacket {
        let mut params = Params::ground(1);
        params.q = nd::array![C64::from(q)];
        params.p = nd::array![C64::from(p)];
        HagedornWavepacket::new(
            1,
            0.1,
            vec![(params, HyperCubicShape::new(&[K]), nd::Array1::zeros(K))],
        ).unwrap()
    }

    #[test]
    fn ground_spread() {
        // φ_0 of the standard ground state: σ = ε / √2
        let Q: nd::Array2<C64> = nd::Array2::eye(1);
        assert!((spread(&Q, &[0], 0.1) - 0.1 / 2.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn near_and_far() {
        let oracle = PhaseSpaceOracle::default();
        let a = packet_at(0.0, 0.0, 1);
        let b = packet_at(0.1, 0.0, 1);
        let c = packet_at(5.0, 0.0, 1);
        let d = packet_at(0.0, 5.0, 1);
        assert!(oracle.is_not_zero(&a, &b, 0, 0).unwrap());
        assert!(!oracle.is_not_zero(&a, &c, 0, 0).unwrap());
        assert!(!oracle.is_not_zero(&a, &d, 0, 0).unwrap());
    }

    #[test]
    fn larger_shapes_reach_further() {
        let oracle = PhaseSpaceOracle::default();
        let a = packet_at(0.0, 0.0, 1);
        let b = packet_at(0.5, 0.0, 1);
        assert!(!oracle.is_not_zero(&a, &b, 0, 0).unwrap());
        let a = packet_at(0.0, 0.0, 20);
        let b = packet_at(0.5, 0.0, 20);
        assert!(oracle.is_not_zero(&a, &b, 0, 0).unwrap());
    }

    #[test]
    fn bias_widens_small_shapes() {
        let a = packet_at(0.0, 0.0, 1);
        let b = packet_at(0.5, 0.0, 1);
        let oracle = PhaseSpaceOracle::default()
            .bias(Some(vec![19]), Some(vec![19]));
        assert!(oracle.is_not_zero(&a, &b, 0, 0).unwrap());
    }
}
