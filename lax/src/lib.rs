//! `ndarray`-free wrapper around the small slice of LAPACK the Arnoldi/Lanczos engine needs:
//! eigendecomposition of a small dense (or already-Hessenberg/tridiagonal) projected matrix.
//!
//! This crate is a trimmed sibling of `ndarray-linalg`'s own `lax` crate: same `Scalar`-generic
//! trait-per-routine shape, same `MatrixLayout`/`Error` plumbing, but scoped to `*geev`/`*syev`/
//! `*heev`/`*getrf`/`*getrs` rather than the full QR/SVD/Cholesky surface, because the restart
//! engine never needs those factorizations of the original `n x n` operator (see crate-level
//! Non-goals); `*getrf`/`*getrs` are included only to support the dense shift-and-invert
//! reference operators, which do need one dense solve of the full operator per shift.

#[cfg(any(feature = "intel-mkl-system", feature = "intel-mkl-static"))]
extern crate intel_mkl_src as _src;

#[cfg(any(feature = "openblas-system", feature = "openblas-static"))]
extern crate openblas_src as _src;

#[cfg(any(feature = "netlib-system", feature = "netlib-static"))]
extern crate netlib_src as _src;

pub mod eig;
pub mod eigh;
pub mod error;
pub mod flags;
pub mod layout;
pub mod solve;

pub use self::eig::Eig_;
pub use self::eigh::Eigh_;
pub use self::error::{Error, Result};
pub use self::flags::{JobEv, UPLO};
pub use self::layout::MatrixLayout;
pub use self::solve::Solve_;

/// Union of the LAPACK routines this crate wraps, implemented for `f32`, `f64`, `c32`, `c64`.
pub trait Lapack: Eig_ + Eigh_ + Solve_ {}

impl<T: Eig_ + Eigh_ + Solve_> Lapack for T {}
