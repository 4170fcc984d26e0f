//! Gaussian parameter sets Π = (q, p, Q, P, S) and their mixing.
//!
//! The mixed parameters locate and scale the product of a bra and a ket
//! Gaussian: `q0` is the position of the maximum of its modulus and `Qs` maps
//! the standard Gaussian onto its envelope.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::{ One, Zero };
use crate::{
    error::{ LengthError, QResult, ShapeError },
    utils::{ conj_t, inv_sqrtm_spd, invert },
    DEF_SYM_TOL,
};

/// A single parameter set Π = (q, p, Q, P, S) for one wavepacket component.
///
/// `q` and `p` are the position and momentum centers, `Q` and `P` encode the
/// covariance, and `S` is the global phase. `Q` is required to be invertible
/// wherever Γ = P Q⁻¹ is needed.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    /// Position center
    pub q: nd::Array1<C64>,
    /// Momentum center
    pub p: nd::Array1<C64>,
    /// Position covariance factor
    pub Q: nd::Array2<C64>,
    /// Momentum covariance factor
    pub P: nd::Array2<C64>,
    /// Global phase
    pub S: C64,
}

impl Params {
    /// Create a new parameter set, checking that all shapes agree with the
    /// dimension implied by `q`.
    pub fn new(
        q: nd::Array1<C64>,
        p: nd::Array1<C64>,
        Q: nd::Array2<C64>,
        P: nd::Array2<C64>,
        S: C64,
    ) -> QResult<Self>
    {
        let dim = q.len();
        LengthError::check(&q, &p)?;
        ShapeError::check(dim, &Q)?;
        ShapeError::check(dim, &P)?;
        Ok(Self { q, p, Q, P, S })
    }

    /// Parameters of the standard ground state in `dim` dimensions: `q = p =
    /// 0`, `Q = 1`, `P = i`, `S = 0`.
    pub fn ground(dim: usize) -> Self {
        Self {
            q: nd::Array1::zeros(dim),
            p: nd::Array1::zeros(dim),
            Q: nd::Array2::eye(dim),
            P: nd::Array2::eye(dim) * C64::i(),
            S: C64::zero(),
        }
    }

    /// Create a parameter set from real centers and a real invertible matrix
    /// `L` and real symmetric `R` via
    /// ```text
    /// Q = L
    /// P = i L⁻ᵀ + R L
    /// ```
    /// which satisfies the compatibility conditions `QᵀP - PᵀQ = 0` and `QᴴP -
    /// PᴴQ = 2i` by construction, giving Γ = R + i (L Lᵀ)⁻¹.
    pub fn from_real(
        q: &nd::Array1<f64>,
        p: &nd::Array1<f64>,
        L: &nd::Array2<f64>,
        R: &nd::Array2<f64>,
        S: f64,
    ) -> QResult<Self>
    {
        let dim = q.len();
        LengthError::check(q, p)?;
        ShapeError::check(dim, L)?;
        ShapeError::check(dim, R)?;
        let Linv_t: nd::Array2<f64> = invert(L, "L")?.reversed_axes();
        let Q: nd::Array2<C64> = L.mapv(C64::from);
        let P: nd::Array2<C64>
            = Linv_t.mapv(|x| C64::i() * x) + R.dot(L).mapv(C64::from);
        Ok(Self {
            q: q.mapv(C64::from),
            p: p.mapv(C64::from),
            Q,
            P,
            S: C64::from(S),
        })
    }

    /// Get the dimension D.
    pub fn dimension(&self) -> usize { self.q.len() }

    /// Compute Γ = P Q⁻¹.
    pub fn gamma(&self) -> QResult<nd::Array2<C64>> {
        Ok(self.P.dot(&invert(&self.Q, "Q")?))
    }

    /// Compute det(Q).
    pub fn det_Q(&self) -> QResult<C64> {
        use ndarray_linalg::Determinant;
        Ok(self.Q.det()?)
    }

    /// Compute the normalization prefactor `(π ε²)^(-D/4) / √det(Q)` of the
    /// zeroth basis function, taking the principal branch of the root.
    pub fn norm_prefactor(&self, eps: f64) -> QResult<C64> {
        let D = self.dimension() as f64;
        let f = (std::f64::consts::PI * eps.powi(2)).powf(-0.25 * D);
        Ok(f * C64::one() / self.det_Q()?.sqrt())
    }
}

/// Mixed parameters of a bra/ket pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Mixed {
    /// Center of the mixed Gaussian
    pub q0: nd::Array1<f64>,
    /// Principal inverse square root of the mixed covariance `Q0`
    pub Qs: nd::Array2<f64>,
}

/// Mix the parameter sets of a bra and a ket component.
///
/// This computes
/// ```text
/// Γr = Pr Qr⁻¹
/// Γc = Pc Qc⁻¹
/// r = Im(Γc - Γrᴴ)
/// s = Im(Γc qc - Γrᴴ qr)
/// q0 = r⁻¹ s
/// Q0 = r / 2
/// Qs = Q0^(-1/2)
/// ```
/// Returns [`QError::SingularMatrix`][crate::error::QError::SingularMatrix] if
/// `Qr`, `Qc`, or `r` is not invertible and
/// [`QError::BranchAmbiguity`][crate::error::QError::BranchAmbiguity] if `Q0`
/// is not symmetric positive-definite.
pub fn mix_parameters(bra: &Params, ket: &Params) -> QResult<Mixed> {
    mix_parameters_tol(bra, ket, DEF_SYM_TOL)
}

/// Like [`mix_parameters`], but with an explicit tolerance on the asymmetry of
/// `Q0`.
pub fn mix_parameters_tol(bra: &Params, ket: &Params, sym_tol: f64)
    -> QResult<Mixed>
{
    let Gr = bra.gamma()?;
    let Gc = ket.gamma()?;
    let Grh = conj_t(&Gr);

    let r: nd::Array2<f64> = (&Gc - &Grh).mapv(|z| z.im);
    let s: nd::Array1<f64>
        = (Gc.dot(&ket.q) - Grh.dot(&bra.q)).mapv(|z| z.im);

    let q0 = invert(&r, "r")?.dot(&s);
    let Q0 = r * 0.5;
    let Qs = inv_sqrtm_spd(&Q0, sym_tol)?;
    Ok(Mixed { q0, Qs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_linalg::close_l2;
    use crate::error::QError;

    fn sample_params(q: [f64; 2], p: [f64; 2]) -> Params {
        let L: nd::Array2<f64> = nd::array![[1.2, 0.3], [-0.2, 0.8]];
        let R: nd::Array2<f64> = nd::array![[0.4, 0.1], [0.1, -0.3]];
        Params::from_real(
            &nd::Array1::from(q.to_vec()),
            &nd::Array1::from(p.to_vec()),
            &L,
            &R,
            0.0,
        ).unwrap()
    }

    #[test]
    fn from_real_is_compatible() {
        let pi = sample_params([0.1, -0.2], [0.5, 0.0]);
        let QtP = pi.Q.t().dot(&pi.P) - pi.P.t().dot(&pi.Q);
        let QhP = conj_t(&pi.Q).dot(&pi.P) - conj_t(&pi.P).dot(&pi.Q);
        let two_i: nd::Array2<C64> = nd::Array2::eye(2) * C64::new(0.0, 2.0);
        assert!(crate::utils::max_norm(&QtP) < 1e-12);
        close_l2(&QhP, &two_i, 1e-12);
    }

    #[test]
    fn mix_identical_recovers_center() {
        let pi = sample_params([0.7, -1.1], [0.3, 0.2]);
        let Mixed { q0, Qs } = mix_parameters(&pi, &pi).unwrap();
        close_l2(&q0, &nd::array![0.7, -1.1], 1e-12);
        // Q0 = Im Γ = (L Lᵀ)⁻¹ so Qs² = L Lᵀ
        let Q = pi.Q.mapv(|z| z.re);
        close_l2(&Qs.dot(&Qs), &Q.dot(&Q.t()), 1e-12);
    }

    #[test]
    fn mix_swap_transposes_Qs() {
        let bra = sample_params([0.0, 0.5], [1.0, -0.5]);
        let mut ket = Params::ground(2);
        ket.q = nd::array![C64::new(0.2, 0.0), C64::new(-0.1, 0.0)];
        ket.P = nd::array![
            [C64::new(0.3, 1.0), C64::new(0.1, 0.2)],
            [C64::new(0.1, 0.2), C64::new(-0.2, 0.7)],
        ];
        let m_rc = mix_parameters(&bra, &ket).unwrap();
        let m_cr = mix_parameters(&ket, &bra).unwrap();
        close_l2(&m_cr.Qs, &m_rc.Qs.t().to_owned(), 1e-12);
    }

    #[test]
    fn mix_singular_Q() {
        let mut bra = Params::ground(2);
        bra.Q = nd::Array2::zeros((2, 2));
        let ket = Params::ground(2);
        assert!(matches!(
            mix_parameters(&bra, &ket),
            Err(QError::SingularMatrix("Q"))
        ));
    }

    #[test]
    fn mix_indefinite_Q0() {
        let mut bra = Params::ground(1);
        bra.P = nd::array![[C64::new(0.0, -1.0)]];
        let mut ket = Params::ground(1);
        ket.P = nd::array![[C64::new(0.0, -2.0)]];
        assert!(matches!(
            mix_parameters(&bra, &ket),
            Err(QError::BranchAmbiguity(_))
        ));
    }

    #[test]
    fn ground_norm_prefactor() {
        let eps: f64 = 0.1;
        let f = Params::ground(2).norm_prefactor(eps).unwrap();
        let expected = (std::f64::consts::PI * eps * eps).powf(-0.5);
        assert!((f - C64::from(expected)).norm() < 1e-12);
    }
}
