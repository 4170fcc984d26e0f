//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Hagedorn wavepackets](#hagedorn-wavepackets)
//! - [Steepest descent](#steepest-descent)
//! - [Direct quadrature](#direct-quadrature)
//! - [Conditioning](#conditioning)
//!
//! # Background
//! Semiclassical quantum dynamics in *D* dimensions deals with wavefunctions
//! that oscillate on the scale of a small parameter *ε* (typically *ε*² ~ *ħ*,
//! or the square root of an electron/nucleus mass ratio). Quantities such as
//! energies, couplings between electronic levels, or projections between
//! different representations of the same state all reduce to overlap
//! integrals
//! ```text
//! ⟨Φ | f | Φ'⟩ = ∫ conj(Φ(x)) f(x) Φ'(x) dx
//! ```
//! between two wavepackets *Φ* and *Φ*'. If both wavepackets are centered at
//! different points in phase space, the integrand carries a relative phase
//! exp(*i* *g*(*x*) / *ε*²) that oscillates faster and faster as *ε* → 0, and
//! standard quadrature over real nodes needs a number of nodes that grows
//! without bound.
//!
//! # Hagedorn wavepackets
//! A Hagedorn wavepacket[^1] is a linear combination
//! ```text
//! Φ(x) = exp(i S / ε²) Σ_k c_k φ_k[Π](x)
//! ```
//! over a finite set of multi-indices *k* (the basis shape) of basis functions
//! parametrized by Π = (*q*, *p*, *Q*, *P*, *S*), where *q*, *p* ∊ ℝᴰ are the
//! position and momentum centers and *Q*, *P* ∊ ℂᴰˣᴰ satisfy
//! ```text
//! Qᵀ P - Pᵀ Q = 0
//! Qᴴ P - Pᴴ Q = 2 i
//! ```
//! With Γ = *P* *Q*⁻¹ (complex symmetric with positive-definite imaginary
//! part), the ground state is the complex Gaussian
//! ```text
//!                  -1/4           -1/2      ⎛ i  ⎛ 1                                 ⎞⎞
//! φ_0(x) = (π ε²)      det(Q)           exp ⎜--- ⎜ - (x - q)ᵀ Γ (x - q) + pᵀ (x - q) ⎟⎟
//!                                           ⎝ ε² ⎝ 2                                 ⎠⎠
//! ```
//! (with exponent -*D*/4 in *D* dimensions), and all higher basis functions
//! follow from the three-term recurrence
//! ```text
//!                                 √2                 __
//! √(k_d + 1) φ_(k + e_d) = φ_k * ---- (Q⁻¹ (x - q))_d - \  (Q⁻¹ conj(Q))_dl √k_l φ_(k - e_l)
//!                                  ε                  /_
//!                                                      l
//! ```
//! The basis is orthonormal, so the norm of a wavepacket is simply the norm of
//! its coefficient vector. Each *φ_k* is a polynomial of degree |*k*| times
//! *φ_0*, which is what makes exact quadrature of the non-oscillatory part
//! possible.
//!
//! # Steepest descent
//! For a bra parameter set Π_r and a ket parameter set Π_c, all basis
//! functions share the factor conj(*φ_0*[Π_r]) *φ_0*[Π_c], whose exponent is a
//! quadratic polynomial in *x*:
//! ```text
//! g(x) = -conj(g_r(x)) + g_c(x) = xᵀ A x + bᵀ x + c
//! ```
//! Its stationary point is *x*₀ = -*X* *b* with *X* = (*A* + *A*ᵀ)⁻¹, and
//! *g*(*x*₀) = *c* - *b*ᵀ *X* *b* / 2. The method of numerical steepest descent
//! [^2] [^3] replaces the real integration domain by the complex contour through
//! *x*₀ on which exp(*i* *g* / *ε*²) decays as fast as possible. To find it
//! in more than one dimension, *A* is brought into upper triangular form via a
//! complex Schur decomposition *A* = *U*ᴴ *T* *U*, and the coupling between
//! dimensions is removed by completing the square one dimension at a time:
//! ```text
//!  T[j, j] ← T[j, j] - T[i - 1, j]² / (4 T[i - 1, i - 1])
//!  T[r, c] ← T[r, c] - T[i - 1, r] T[i - 1, c] / (2 T[i - 1, i - 1])
//! ```
//! after which the quadratic form reads Σ_d *T*[*d*, *d*] *z_d*² in shifted
//! coordinates *z*. Along
//! ```text
//! y_d = √(i / T[d, d]) τ_d - Σ_(j > d) T[d, j] / (2 T[d, d]) y_j
//! ```
//! with real *τ* = *ε* *γ*, the oscillator becomes the real Gaussian
//! exp(-|*γ*|²) and the Jacobian of the parametrization is the constant
//! Π_d √(*i* / *T*[*d*, *d*]). The path is mapped back to physical
//! coordinates via *x* = *U*ᴴ *y* + *x*₀.
//!
//! What is left of the integrand along the path is the operator times the
//! ratios *φ_k* / *φ_0*, which are polynomials as long as the operator is, so a
//! Gauss-Hermite rule with enough nodes integrates it exactly for any *ε*.
//! The normalization constants of both ground states, the global phases, and
//! exp(*i* *g*(*x*₀) / *ε*²) are multiplied back in at the end.
//!
//! # Direct quadrature
//! For comparison, the same integrals can be computed over real nodes fitted to
//! the product of both Gaussian envelopes. With
//! ```text
//! r = Im(Γ_c - Γ_rᴴ)
//! s = Im(Γ_c q_c - Γ_rᴴ q_r)
//! q₀ = r⁻¹ s
//! Q₀ = r / 2
//! ```
//! the envelope is proportional to exp(-(*x* - *q*₀)ᵀ *Q*₀ (*x* - *q*₀) /
//! *ε*²), so nodes *x* = *q*₀ + *ε* *Q*₀^(-1/2) *γ* turn it into exp(-|*γ*|²).
//! This is exact for identical parameter sets, and accurate for differing ones
//! as long as *ε* is not too small.
//!
//! # Conditioning
//! Two situations are not handled by the method itself:
//! - A pivot *T*[*i*, *i*] that vanishes during the elimination corresponds to a
//!   residue of the integrand. No corrective strategy exists; such pivots are
//!   reported and the result may be inaccurate.
//! - The zeroth basis function can underflow to zero at far-out nodes, in which
//!   case the ratios *φ_k* / *φ_0* are undefined. Non-finite matrix elements are
//!   replaced with zero.
//!
//! [^1]: G. A. Hagedorn, "Raising and lowering operators for semiclassical wave
//! packets." Annals of Physics **269** 77-104 (1998).
//!
//! [^2]: D. Huybrechs and S. Vandewalle, "On the evaluation of highly
//! oscillatory integrals by analytic continuation." SIAM Journal on Numerical
//! Analysis **44** 3 1026-1048 (2006).
//!
//! [^3]: R. Bourquin, "Numerical algorithms for semiclassical wavepackets."
//! PhD thesis, ETH Zürich (2017).
