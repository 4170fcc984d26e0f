#![allow(dead_code, non_snake_case)]

//! Provides functions and higher-level constructs for the evaluation of highly
//! oscillatory overlap integrals
//! ```text
//! ⟨Φ_i | f | Φ'_j⟩
//! ```
//! between the components of two semiclassical (Hagedorn) wavepackets via the
//! method of numerical steepest descent (NSD).
//!
//! The NSD evaluation proceeds in five stages, each given its own module:
//! - [`params`]: mixing of the bra and ket parameter sets
//! - [`bilinear`]: merging of both oscillatory phases into a single quadratic
//!   form
//! - [`schur`]: complex Schur decomposition of the quadratic form and
//!   elimination of cross-dimension coupling
//! - [`path`]: construction of the deformed (complex) integration contour
//! - [`nsd`]: evaluation of the basis and operator along the contour and final
//!   assembly of the matrix elements
//!
//! For comparison at moderate ε, [`direct`] implements plain quadrature over
//! real nodes fitted to the mixed parameters. Minimal reference
//! implementations of the quadrature rule ([`rule`]), wavepacket ([`packet`]),
//! operator ([`operator`]) and sparsity oracle ([`oracle`]) collaborators are
//! provided as well.
//!
//! ```
//! use ndarray as nd;
//! use num_complex::Complex64 as C64;
//! use nsdquad::{
//!     nsd::NSDInhomogeneous,
//!     packet::{ HagedornWavepacket, HyperCubicShape },
//!     params::Params,
//!     rule::{ GaussHermite, Weighting },
//! };
//!
//! let eps = 0.1;
//! let packet = HagedornWavepacket::new(
//!     1,
//!     eps,
//!     vec![(Params::ground(1), HyperCubicShape::new(&[1]), nd::array![C64::from(1.0)])],
//! ).unwrap();
//! let rule = GaussHermite::new(1, 5, Weighting::Gaussian).unwrap();
//! let mut nsd = NSDInhomogeneous::new(rule, &packet, &packet);
//! nsd.prepare();
//! let overlap = nsd.compute_overlap(0, 0).unwrap();
//! assert!((overlap - C64::from(1.0)).norm() < 1e-8);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod utils;
pub mod params;
pub mod bilinear;
pub mod schur;
pub mod path;
pub mod rule;
pub mod packet;
pub mod operator;
pub mod oracle;
pub mod nsd;
pub mod direct;

pub mod docs;

pub(crate) const DEF_PIVOT_TOL: f64 = 1e-14;
pub(crate) const DEF_SYM_TOL: f64 = 1e-8;
pub(crate) const DEF_MAXITERS: usize = 1000;

pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
