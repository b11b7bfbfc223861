//! Small numeric helpers shared by the symmetric and general restart engines.

use ndarray::{Array1, ArrayView1, ArrayView2};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// `x . y`, written as an explicit loop (rather than `ndarray`'s `Dot`) so it works for any
/// `R: Float` without pulling in BLAS or an extra `'static` bound.
pub fn vec_dot<R: Float>(x: ArrayView1<R>, y: ArrayView1<R>) -> R {
    x.iter().zip(y.iter()).fold(R::zero(), |acc, (&a, &b)| acc + a * b)
}

/// `Aᵀ x` for `a`: `n x p`, `x`: length `n` -> result length `p`.
pub fn mat_t_vec<R: Float>(a: ArrayView2<R>, x: ArrayView1<R>) -> Array1<R> {
    let p = a.ncols();
    let mut out = Array1::zeros(p);
    for j in 0..p {
        out[j] = vec_dot(a.column(j), x);
    }
    out
}

/// `A x` for `a`: `n x p`, `x`: length `p` -> result length `n`.
pub fn mat_vec<R: Float>(a: ArrayView2<R>, x: ArrayView1<R>) -> Array1<R> {
    let n = a.nrows();
    let p = a.ncols();
    let mut out = Array1::zeros(n);
    for i in 0..n {
        let mut acc = R::zero();
        for j in 0..p {
            acc = acc + a[(i, j)] * x[j];
        }
        out[i] = acc;
    }
    out
}

/// A real scalar that can be drawn from a standard normal distribution, used to build the
/// random restart vectors `init()`/`init_random()` and the invariant-subspace reseed inside
/// `factorize_from`.
pub trait RandomReal: Float {
    fn sample_normal<Rg: Rng + ?Sized>(rng: &mut Rg) -> Self;
}

impl RandomReal for f64 {
    fn sample_normal<Rg: Rng + ?Sized>(rng: &mut Rg) -> Self {
        StandardNormal.sample(rng)
    }
}

impl RandomReal for f32 {
    fn sample_normal<Rg: Rng + ?Sized>(rng: &mut Rg) -> Self {
        StandardNormal.sample(rng)
    }
}

pub fn l2_norm<R: Float>(v: ArrayView1<R>) -> R {
    v.iter().fold(R::zero(), |acc, &x| acc + x * x).sqrt()
}

pub fn frobenius_norm<R: Float>(m: ArrayView2<R>) -> R {
    m.iter().fold(R::zero(), |acc, &x| acc + x * x).sqrt()
}

/// Draw a random unit vector of length `n` using `rng`.
pub fn random_unit_vector_with_rng<R: RandomReal, Rg: Rng + ?Sized>(n: usize, rng: &mut Rg) -> Array1<R> {
    let mut v = Array1::from_iter((0..n).map(|_| R::sample_normal(rng)));
    let norm = l2_norm(v.view());
    if !norm.is_zero() {
        v.mapv_inplace(|x| x / norm);
    }
    v
}

pub fn random_unit_vector<R: RandomReal>(n: usize) -> Array1<R> {
    random_unit_vector_with_rng(n, &mut rand::thread_rng())
}

/// Two rounds of modified Gram-Schmidt against the columns of `basis`; used to build a fresh
/// restart vector orthogonal to the already-factorized Krylov basis after an invariant-subspace
/// breakdown (`beta` below the numerical-zero floor in `factorize_from`).
pub fn orthogonalize_against<R: Float>(v: &mut Array1<R>, basis: ArrayView2<R>) {
    for _ in 0..2 {
        let corr = mat_t_vec(basis, v.view());
        *v = &*v - &mat_vec(basis, corr.view());
    }
}
