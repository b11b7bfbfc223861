//! `A x = b` via LU factorization (`*getrf`/`*getrs`)
//!
//! Used by the reference dense shift-and-invert operators, which factorize `A - sigma*I`
//! once per shift and reuse the factorization across every `perform_op` call.

use crate::{error::*, layout::MatrixLayout};
use cauchy::*;

/// Wraps `*getrf`/`*getrs`. Unlike [`crate::eig::Eig_`]/[`crate::eigh::Eigh_`], which only ever
/// see the small projected Hessenberg matrix, this is used on the full `n x n` dense operator
/// by the reference shift-solve operators of `arnoldi::reference_ops`.
pub trait Solve_: Scalar {
    /// Factorize `a` (`n x n`, column-major) in place as `P*L*U`; returns the pivot indices.
    fn lu(l: MatrixLayout, a: &mut [Self]) -> Result<Vec<i32>>;

    /// Solve `A x = b` given the `lu`-factorized `a` and its pivots; overwrites `b` with `x`.
    fn solve(l: MatrixLayout, a: &[Self], ipiv: &[i32], b: &mut [Self]) -> Result<()>;
}

macro_rules! impl_solve {
    ($scalar:ty, $getrf:path, $getrs:path) => {
        impl Solve_ for $scalar {
            fn lu(l: MatrixLayout, a: &mut [Self]) -> Result<Vec<i32>> {
                let (n, _) = l.size();
                let mut ipiv = vec![0; n as usize];
                let mut info = 0;
                unsafe {
                    $getrf(&n, &n, a.as_mut_ptr(), &n, ipiv.as_mut_ptr(), &mut info);
                }
                info.as_lapack_result()?;
                Ok(ipiv)
            }

            fn solve(l: MatrixLayout, a: &[Self], ipiv: &[i32], b: &mut [Self]) -> Result<()> {
                let (n, _) = l.size();
                let nrhs = 1;
                let trans: *const i8 = b"N\0".as_ptr() as *const i8;
                let mut info = 0;
                unsafe {
                    $getrs(
                        trans,
                        &n,
                        &nrhs,
                        a.as_ptr(),
                        &n,
                        ipiv.as_ptr(),
                        b.as_mut_ptr(),
                        &n,
                        &mut info,
                    );
                }
                info.as_lapack_result()?;
                Ok(())
            }
        }
    };
}

impl_solve!(f64, lapack_sys::dgetrf_, lapack_sys::dgetrs_);
impl_solve!(f32, lapack_sys::sgetrf_, lapack_sys::sgetrs_);
impl_solve!(c64, lapack_sys::zgetrf_, lapack_sys::zgetrs_);
impl_solve!(c32, lapack_sys::cgetrf_, lapack_sys::cgetrs_);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_diagonal_system() {
        let mut a = vec![2.0_f64, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 5.0];
        let l = MatrixLayout::square_col_major(3);
        let ipiv = f64::lu(l, &mut a).unwrap();
        let mut b = vec![2.0, 8.0, 10.0];
        f64::solve(l, &a, &ipiv, &mut b).unwrap();
        assert!((b[0] - 1.0).abs() < 1e-10);
        assert!((b[1] - 2.0).abs() < 1e-10);
        assert!((b[2] - 2.0).abs() < 1e-10);
    }
}
