//! Merging of the bra and ket oscillators into a single bilinear form.
//!
//! For a bra component with parameters Π_r and a ket component with parameters
//! Π_c, the exponents of the product of both (complex-conjugated bra) Gaussians
//! combine into
//! ```text
//! g(x) = xᵀ A x + bᵀ x + c
//! ```
//! so that the product is, up to normalization and polynomial factors, equal to
//! `exp(i g(x) / ε²)`.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::QResult,
    params::Params,
    utils::{ conj_t, invert },
};

/// The combined oscillator `g(x) = xᵀ A x + bᵀ x + c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bilinear {
    /// Quadratic part
    pub A: nd::Array2<C64>,
    /// Linear part
    pub b: nd::Array1<C64>,
    /// Constant part
    pub c: C64,
}

impl Bilinear {
    /// Compute the inverse of the Hessian, X = (A + Aᵀ)⁻¹.
    pub fn hessian_inverse(&self) -> QResult<nd::Array2<C64>> {
        invert(&(&self.A + &self.A.t()), "A + Aᵀ")
    }

    /// Compute the value of `g` at its stationary point, c̃ = c - bᵀ X b / 2,
    /// given the [Hessian inverse][Self::hessian_inverse] X.
    pub fn reduced_constant(&self, X: &nd::Array2<C64>) -> C64 {
        self.c - 0.5 * self.b.dot(&X.dot(&self.b))
    }

    /// Compute the stationary point of `g`, `-X b`.
    pub fn stationary_point(&self, X: &nd::Array2<C64>) -> nd::Array1<C64> {
        -X.dot(&self.b)
    }
}

/// Convert the oscillator `-conj(g_r) + g_c` occurring in the overlap of a bra
/// and a ket component into a [`Bilinear`] form.
///
/// With Γ = P Q⁻¹ for both parameter sets, this computes
/// ```text
/// A = (Γc - conj(Γr)ᵀ) / 2
/// b = conj((Γr qr - conj(Γc)ᵀ qc + Γrᵀ conj(qr) - conj(Γc) conj(qc)) / 2 + (pc - conj(pr)))
/// c = (conj(qc)ᵀ Γc qc - conj(qr)ᵀ conj(Γr)ᵀ qr) / 2 + (conj(qr)ᵀ pr - conj(pc)ᵀ qc)
/// ```
pub fn build_bilinear(bra: &Params, ket: &Params) -> QResult<Bilinear> {
    let Gr = bra.gamma()?;
    let Gc = ket.gamma()?;
    let Grh = conj_t(&Gr);
    let Gch = conj_t(&Gc);
    let Gc_bar = Gc.mapv(|z| z.conj());
    let (qr, pr) = (&bra.q, &bra.p);
    let (qc, pc) = (&ket.q, &ket.p);
    let qr_bar = qr.mapv(|z| z.conj());
    let qc_bar = qc.mapv(|z| z.conj());
    let pr_bar = pr.mapv(|z| z.conj());
    let pc_bar = pc.mapv(|z| z.conj());

    let A = (&Gc - &Grh) * 0.5;

    let b_lin: nd::Array1<C64>
        = (
            Gr.dot(qr)
            - Gch.dot(qc)
            + Gr.t().dot(&qr_bar)
            - Gc_bar.dot(&qc_bar)
        ) * 0.5
        + (pc - &pr_bar);
    let b = b_lin.mapv(|z| z.conj());

    let c
        = 0.5 * (qc_bar.dot(&Gc.dot(qc)) - qr_bar.dot(&Grh.dot(qr)))
        + (qr_bar.dot(pr) - pc_bar.dot(qc));

    Ok(Bilinear { A, b, c })
}
