//! Eigendecomposition of a small dense symmetric (or tridiagonal) matrix via `*syev`/`*heev`

use crate::{error::*, flags::UPLO, layout::MatrixLayout};
use cauchy::*;
use num_traits::{ToPrimitive, Zero};

/// Wraps `*syev`/`*heev`. Like [`crate::eig::Eig_`], the input need not be dense: the symmetric
/// Krylov engine calls this on an already-tridiagonal `m x m` matrix.
pub trait Eigh_: Scalar {
    /// Eigenvalues (ascending) and, if requested, eigenvectors overwriting `a` in place.
    fn eigh(calc_eigenvec: bool, layout: MatrixLayout, uplo: UPLO, a: &mut [Self]) -> Result<Vec<Self::Real>>;
}

macro_rules! impl_eigh_real {
    ($scalar:ty, $ev:path) => {
        impl Eigh_ for $scalar {
            fn eigh(calc_eigenvec: bool, layout: MatrixLayout, uplo: UPLO, a: &mut [Self]) -> Result<Vec<Self::Real>> {
                let (n, _) = layout.size();
                let jobz: *const i8 = if calc_eigenvec { b"V\0".as_ptr() as *const i8 } else { b"N\0".as_ptr() as *const i8 };
                let mut w = vec![Self::zero(); n as usize];

                let mut info = 0;
                let mut work_size = [Self::zero()];
                unsafe {
                    $ev(jobz, uplo.as_ptr(), &n, a.as_mut_ptr(), &n, w.as_mut_ptr(), work_size.as_mut_ptr(), &(-1), &mut info);
                }
                info.as_lapack_result()?;

                let lwork = ToPrimitive::to_usize(&work_size[0]).unwrap();
                let mut work = vec![Self::zero(); lwork];
                let lwork = lwork as i32;
                unsafe {
                    $ev(jobz, uplo.as_ptr(), &n, a.as_mut_ptr(), &n, w.as_mut_ptr(), work.as_mut_ptr(), &lwork, &mut info);
                }
                info.as_lapack_result()?;

                Ok(w)
            }
        }
    };
}

impl_eigh_real!(f64, lapack_sys::dsyev_);
impl_eigh_real!(f32, lapack_sys::ssyev_);

macro_rules! impl_eigh_complex {
    ($scalar:ty, $ev:path) => {
        impl Eigh_ for $scalar {
            fn eigh(calc_eigenvec: bool, layout: MatrixLayout, uplo: UPLO, a: &mut [Self]) -> Result<Vec<Self::Real>> {
                let (n, _) = layout.size();
                let jobz: *const i8 = if calc_eigenvec { b"V\0".as_ptr() as *const i8 } else { b"N\0".as_ptr() as *const i8 };
                let mut w = vec![Self::Real::zero(); n as usize];
                let mut rwork = vec![Self::Real::zero(); (3 * n - 2).max(1) as usize];

                let mut info = 0;
                let mut work_size = [Self::zero()];
                unsafe {
                    $ev(
                        jobz,
                        uplo.as_ptr(),
                        &n,
                        a.as_mut_ptr(),
                        &n,
                        w.as_mut_ptr(),
                        work_size.as_mut_ptr(),
                        &(-1),
                        rwork.as_mut_ptr(),
                        &mut info,
                    );
                }
                info.as_lapack_result()?;

                let lwork = ToPrimitive::to_usize(&work_size[0].re()).unwrap();
                let mut work = vec![Self::zero(); lwork];
                let lwork = lwork as i32;
                unsafe {
                    $ev(
                        jobz,
                        uplo.as_ptr(),
                        &n,
                        a.as_mut_ptr(),
                        &n,
                        w.as_mut_ptr(),
                        work.as_mut_ptr(),
                        &lwork,
                        rwork.as_mut_ptr(),
                        &mut info,
                    );
                }
                info.as_lapack_result()?;

                Ok(w)
            }
        }
    };
}

impl_eigh_complex!(c64, lapack_sys::zheev_);
impl_eigh_complex!(c32, lapack_sys::cheev_);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_real_eigh() {
        let mut a = vec![3.0_f64, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0];
        let l = MatrixLayout::square_col_major(3);
        let w = f64::eigh(false, l, UPLO::Upper, &mut a).unwrap();
        assert!((w[0] - 1.0).abs() < 1e-10);
        assert!((w[1] - 2.0).abs() < 1e-10);
        assert!((w[2] - 3.0).abs() < 1e-10);
    }
}
