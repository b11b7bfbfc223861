//! Eigendecomposition of the small `m x m` projected Hessenberg matrix, via `lax`.
//!
//! This is dense decomposition of the *projected* matrix produced by a Krylov factorization,
//! never of the original `n x n` operator — see the crate's Non-goals.

use ndarray::Array2;

use lax::{Eig_, Eigh_, MatrixLayout, UPLO};

/// Eigenvalues (ascending) and orthonormal eigenvectors of a small real symmetric
/// (in practice tridiagonal) matrix, via `lax::Eigh_` (`syev`).
pub fn symmetric_eigen<R: Eigh_>(h: &Array2<R>) -> lax::Result<(Vec<R::Real>, Array2<R>)> {
    let n = h.nrows();
    debug_assert_eq!(h.ncols(), n);
    let mut buf = col_major_buffer(h);
    let layout = MatrixLayout::square_col_major(n);
    let vals = R::eigh(true, layout, UPLO::Upper, &mut buf)?;
    let vecs = from_col_major_buffer(&buf, n);
    Ok((vals, vecs))
}

/// Eigenvalues and right eigenvectors (both possibly complex) of a small real upper-Hessenberg
/// matrix, via `lax::Eig_` (`geev`). `geev` correctly handles an already-Hessenberg input; it
/// just does a little unnecessary balancing/reduction work internally.
pub fn general_eigen<R: Eig_>(h: &Array2<R>) -> lax::Result<(Vec<R::Complex>, Array2<R::Complex>)> {
    let n = h.nrows();
    debug_assert_eq!(h.ncols(), n);
    let mut buf = col_major_buffer(h);
    let layout = MatrixLayout::square_col_major(n);
    let (vals, vecs_flat) = R::eig(true, layout, &mut buf)?;
    let vecs = from_col_major_buffer(&vecs_flat, n);
    Ok((vals, vecs))
}

fn col_major_buffer<R: Copy>(h: &Array2<R>) -> Vec<R> {
    let n = h.nrows();
    let mut buf = Vec::with_capacity(n * n);
    for col in 0..n {
        for row in 0..n {
            buf.push(h[(row, col)]);
        }
    }
    buf
}

fn from_col_major_buffer<R: Copy>(buf: &[R], n: usize) -> Array2<R> {
    let mut out = Array2::from_elem((n, n), buf[0]);
    for col in 0..n {
        for row in 0..n {
            out[(row, col)] = buf[row + col * n];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn symmetric_eigen_diagonal() {
        let h = array![[3.0_f64, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
        let (vals, _vecs) = symmetric_eigen(&h).unwrap();
        assert!((vals[0] - 1.0).abs() < 1e-10);
        assert!((vals[1] - 2.0).abs() < 1e-10);
        assert!((vals[2] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn general_eigen_diagonal() {
        let h = array![[1.0_f64, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]];
        let (vals, _vecs) = general_eigen(&h).unwrap();
        let mut re: Vec<f64> = vals.iter().map(|c| c.re).collect();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((re[0] - 1.0).abs() < 1e-10);
        assert!((re[1] - 2.0).abs() < 1e-10);
        assert!((re[2] - 3.0).abs() < 1e-10);
    }
}
