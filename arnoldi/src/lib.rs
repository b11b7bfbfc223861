//! Implicitly restarted Arnoldi/Lanczos eigensolver for real matrices.
//!
//! Two restart engines share one shape: maintain a Krylov factorization `A V = V H + f eₘᵀ` of a
//! small subspace (dimension `m`), extract the `k` wanted Ritz pairs, and implicitly restart by
//! applying shifted-QR steps built from the unwanted ones — repeating until the residual bound
//! is met.
//!
//! - [`sym_eigs::SymmetricEigs`] — Lanczos factorization, real Ritz values, single-shift QR
//!   restart ([`qr::TridiagonalQR`]/[`qr::UpperHessenbergQR`]).
//! - [`gen_eigs::GeneralEigs`] — Arnoldi factorization, complex Ritz values, mixed single- and
//!   double-shift restart ([`qr::UpperHessenbergQR`]/[`qr::DoubleShiftQR`]) depending on whether
//!   the next unwanted shift is part of a detected complex-conjugate pair.
//!
//! [`shift_invert`] wraps either engine to run against `(A - sigma I)^-1` instead of `A`,
//! back-transforming the recovered Ritz values to eigenvalues of `A`.
//!
//! The external matrix-operator capabilities the engines consume ([`operator::Product`],
//! [`operator::RealShiftSolve`], [`operator::ComplexShiftSolve`]) are compile-time generic —
//! there is no `dyn` trait object anywhere in this crate. [`reference_ops`] provides dense
//! `ndarray`-backed implementations of all three, useful for testing and for callers who don't
//! already have a sparse/matrix-free operator of their own.

pub mod dense_eigen;
pub mod error;
pub mod gen_eigs;
pub mod operator;
pub mod qr;
pub mod reference_ops;
pub mod selection;
pub mod shift_invert;
pub mod sym_eigs;
mod util;

pub use error::{Error, Result};
pub use gen_eigs::GeneralEigs;
pub use operator::{ComplexShiftSolve, Product, RealShiftSolve};
pub use selection::SelectionRule;
pub use shift_invert::{GeneralComplexShiftInvert, GeneralRealShiftInvert, SymmetricShiftInvert};
pub use sym_eigs::SymmetricEigs;
