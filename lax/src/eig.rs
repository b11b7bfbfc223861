//! Eigenvalue decomposition of a small dense (possibly upper-Hessenberg) matrix via `*geev`

use crate::{error::*, flags::JobEv, layout::MatrixLayout};
use cauchy::*;
use num_traits::Zero;

/// Wraps `*geev`. The input need not be a full dense matrix: `geev` is also a correct
/// (if not maximally efficient) way to decompose an already upper-Hessenberg matrix,
/// which is how the general Krylov engine uses it for the small `m x m` projected matrix.
pub trait Eig_: Scalar {
    /// Right eigenvalues and eigenvectors of `a`, which is consumed (overwritten) by the call.
    fn eig(
        calc_v: bool,
        l: MatrixLayout,
        a: &mut [Self],
    ) -> Result<(Vec<Self::Complex>, Vec<Self::Complex>)>;
}

macro_rules! impl_eig_complex {
    ($scalar:ty, $ev:path) => {
        impl Eig_ for $scalar {
            fn eig(
                calc_v: bool,
                l: MatrixLayout,
                a: &mut [Self],
            ) -> Result<(Vec<Self::Complex>, Vec<Self::Complex>)> {
                let (n, _) = l.size();
                let (jobvl, jobvr) = if calc_v {
                    match l {
                        MatrixLayout::C { .. } => (JobEv::Calc, JobEv::Not),
                        MatrixLayout::F { .. } => (JobEv::Not, JobEv::Calc),
                    }
                } else {
                    (JobEv::Not, JobEv::Not)
                };

                let mut eigs = vec![Self::zero(); n as usize];
                let mut rwork = vec![Self::Real::zero(); 2 * n as usize];
                let mut vl: Option<Vec<Self>> = jobvl.then(|| vec![Self::zero(); (n * n) as usize]);
                let mut vr: Option<Vec<Self>> = jobvr.then(|| vec![Self::zero(); (n * n) as usize]);

                let mut info = 0;
                let mut work_size = [Self::zero()];
                unsafe {
                    $ev(
                        jobvl.as_ptr(),
                        jobvr.as_ptr(),
                        &n,
                        a.as_mut_ptr(),
                        &n,
                        eigs.as_mut_ptr(),
                        vl.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        vr.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        work_size.as_mut_ptr(),
                        &(-1),
                        rwork.as_mut_ptr(),
                        &mut info,
                    )
                };
                info.as_lapack_result()?;

                let lwork = num_traits::ToPrimitive::to_usize(&work_size[0].re()).unwrap();
                let mut work = vec![Self::zero(); lwork];
                let lwork = lwork as i32;
                unsafe {
                    $ev(
                        jobvl.as_ptr(),
                        jobvr.as_ptr(),
                        &n,
                        a.as_mut_ptr(),
                        &n,
                        eigs.as_mut_ptr(),
                        vl.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        vr.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        work.as_mut_ptr(),
                        &lwork,
                        rwork.as_mut_ptr(),
                        &mut info,
                    )
                };
                info.as_lapack_result()?;

                // Left eigenvectors are conjugated to recover right eigenvectors of the
                // row-major input, as ndarray-linalg's `eig.rs` documents for `C`-layout `a`.
                if jobvl.is_calc() {
                    for c in vl.as_mut().unwrap().iter_mut() {
                        *c = Self::complex(c.re(), -c.im());
                    }
                }

                Ok((eigs, vr.or(vl).unwrap_or_default()))
            }
        }
    };
}

impl_eig_complex!(c64, lapack_sys::zgeev_);
impl_eig_complex!(c32, lapack_sys::cgeev_);

macro_rules! impl_eig_real {
    ($scalar:ty, $ev:path) => {
        impl Eig_ for $scalar {
            fn eig(
                calc_v: bool,
                l: MatrixLayout,
                a: &mut [Self],
            ) -> Result<(Vec<Self::Complex>, Vec<Self::Complex>)> {
                let (n, _) = l.size();
                let (jobvl, jobvr) = if calc_v {
                    match l {
                        MatrixLayout::C { .. } => (JobEv::Calc, JobEv::Not),
                        MatrixLayout::F { .. } => (JobEv::Not, JobEv::Calc),
                    }
                } else {
                    (JobEv::Not, JobEv::Not)
                };

                let mut eig_re = vec![Self::zero(); n as usize];
                let mut eig_im = vec![Self::zero(); n as usize];
                let mut vl: Option<Vec<Self>> = jobvl.then(|| vec![Self::zero(); (n * n) as usize]);
                let mut vr: Option<Vec<Self>> = jobvr.then(|| vec![Self::zero(); (n * n) as usize]);

                let mut info = 0;
                let mut work_size: [Self; 1] = [Self::zero()];
                unsafe {
                    $ev(
                        jobvl.as_ptr(),
                        jobvr.as_ptr(),
                        &n,
                        a.as_mut_ptr(),
                        &n,
                        eig_re.as_mut_ptr(),
                        eig_im.as_mut_ptr(),
                        vl.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        vr.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        work_size.as_mut_ptr(),
                        &(-1),
                        &mut info,
                    )
                };
                info.as_lapack_result()?;

                let lwork = num_traits::ToPrimitive::to_usize(&work_size[0]).unwrap();
                let mut work = vec![Self::zero(); lwork];
                let lwork = lwork as i32;
                unsafe {
                    $ev(
                        jobvl.as_ptr(),
                        jobvr.as_ptr(),
                        &n,
                        a.as_mut_ptr(),
                        &n,
                        eig_re.as_mut_ptr(),
                        eig_im.as_mut_ptr(),
                        vl.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        vr.as_deref_mut().unwrap_or(&mut []).as_mut_ptr(),
                        &n,
                        work.as_mut_ptr(),
                        &lwork,
                        &mut info,
                    )
                };
                info.as_lapack_result()?;

                let eigs: Vec<Self::Complex> = eig_re
                    .iter()
                    .zip(eig_im.iter())
                    .map(|(&re, &im)| Self::complex(re, im))
                    .collect();

                if !calc_v {
                    return Ok((eigs, Vec::new()));
                }

                // Reconstruct complex eigenvectors from LAPACK's packed real/imaginary
                // column-pair convention (see *geev documentation for VR).
                let n = n as usize;
                let v = vr.or(vl.clone()).unwrap();
                let mut eigvecs = vec![Self::complex(Self::zero(), Self::zero()); n * n];
                let mut col = 0;
                while col < n {
                    if eig_im[col].is_zero() {
                        for row in 0..n {
                            eigvecs[row + col * n] = Self::complex(v[row + col * n], Self::zero());
                        }
                        col += 1;
                    } else {
                        assert!(col + 1 < n);
                        for row in 0..n {
                            let re = v[row + col * n];
                            let mut im = v[row + (col + 1) * n];
                            if jobvl.is_calc() {
                                im = -im;
                            }
                            eigvecs[row + col * n] = Self::complex(re, im);
                            eigvecs[row + (col + 1) * n] = Self::complex(re, -im);
                        }
                        col += 2;
                    }
                }

                Ok((eigs, eigvecs))
            }
        }
    };
}

impl_eig_real!(f64, lapack_sys::dgeev_);
impl_eig_real!(f32, lapack_sys::sgeev_);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_real_eig() {
        // diag(1, 2, 3) stored column-major
        let mut a = vec![1.0_f64, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0];
        let l = MatrixLayout::square_col_major(3);
        let (eigs, _v) = f64::eig(false, l, &mut a).unwrap();
        let mut re: Vec<f64> = eigs.iter().map(|c| c.re).collect();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((re[0] - 1.0).abs() < 1e-10);
        assert!((re[1] - 2.0).abs() < 1e-10);
        assert!((re[2] - 3.0).abs() < 1e-10);
    }
}
