//! Shift-and-invert wrappers (§4.7): run the chosen engine against `(A - sigma I)^-1` and
//! back-transform the recovered Ritz values `theta` to eigenvalues of `A` via `lambda = sigma +
//! 1/theta`. Eigenvectors are unchanged — shift-and-invert preserves them exactly.

use cauchy::Scalar;
use ndarray::{Array2, ArrayView1, ArrayViewMut1};
use num_complex::Complex;
use num_traits::Float;

use lax::{Eig_, Eigh_};

use crate::error::Result;
use crate::gen_eigs::GeneralEigs;
use crate::operator::{ComplexShiftSolve, Product, RealShiftSolve};
use crate::selection::SelectionRule;
use crate::sym_eigs::SymmetricEigs;
use crate::util::RandomReal;

/// Adapts a [`RealShiftSolve`] operator to [`Product`]: from the Krylov engine's point of view,
/// "the matrix" it projects is `(A - sigma I)^-1`.
pub struct RealShiftInvertOp<'a, Op> {
    inner: &'a Op,
}

impl<'a, R, Op: RealShiftSolve<R>> Product<R> for RealShiftInvertOp<'a, Op> {
    fn rows(&self) -> usize {
        self.inner.rows()
    }
    fn cols(&self) -> usize {
        self.inner.cols()
    }
    fn perform_op(&self, x: ArrayView1<R>, y: ArrayViewMut1<R>) {
        self.inner.perform_op(x, y)
    }
}

/// Adapts a [`ComplexShiftSolve`] operator to [`Product`].
pub struct ComplexShiftInvertOp<'a, Op> {
    inner: &'a Op,
}

impl<'a, R, Op: ComplexShiftSolve<R>> Product<R> for ComplexShiftInvertOp<'a, Op> {
    fn rows(&self) -> usize {
        self.inner.rows()
    }
    fn cols(&self) -> usize {
        self.inner.cols()
    }
    fn perform_op(&self, x: ArrayView1<R>, y: ArrayViewMut1<R>) {
        self.inner.perform_op(x, y)
    }
}

/// Symmetric engine, real shift-and-invert mode.
pub struct SymmetricShiftInvert<'a, R, Op> {
    inner: SymmetricEigs<R, RealShiftInvertOp<'a, Op>>,
    sigma: R,
}

impl<'a, R, Op> SymmetricShiftInvert<'a, R, Op>
where
    R: RandomReal + Eigh_<Real = R>,
    Op: RealShiftSolve<R>,
{
    /// `op` is factorized for `sigma` before the Krylov engine is built.
    pub fn new(op: &'a mut Op, sigma: R, k: usize, m: usize, rule: SelectionRule) -> Result<Self> {
        op.set_shift(sigma);
        let shared: &'a Op = &*op;
        let inner = SymmetricEigs::new(RealShiftInvertOp { inner: shared }, k, m, rule)?;
        Ok(SymmetricShiftInvert { inner, sigma })
    }

    pub fn init(&mut self, init_vec: ArrayView1<R>) -> Result<()> {
        self.inner.init(init_vec)
    }

    pub fn init_random(&mut self) -> Result<()> {
        self.inner.init_random()
    }

    pub fn compute(&mut self, maxit: usize, tol: R) -> Result<usize> {
        self.inner.compute(maxit, tol)
    }

    pub fn num_iterations(&self) -> usize {
        self.inner.num_iterations()
    }

    pub fn num_operations(&self) -> usize {
        self.inner.num_operations()
    }

    /// Back-transformed eigenvalues of `A`: `lambda = sigma + 1/theta`.
    pub fn eigenvalues(&self) -> Vec<R> {
        self.inner.eigenvalues().into_iter().map(|theta| self.sigma + R::one() / theta).collect()
    }

    pub fn eigenvectors(&self) -> Array2<R> {
        self.inner.eigenvectors()
    }
}

/// General engine, real shift-and-invert mode (Ritz values may still come back complex).
pub struct GeneralRealShiftInvert<'a, R: Scalar, Op> {
    inner: GeneralEigs<R, RealShiftInvertOp<'a, Op>>,
    sigma: R,
}

impl<'a, R, Op> GeneralRealShiftInvert<'a, R, Op>
where
    R: RandomReal + Eig_,
    Op: RealShiftSolve<R>,
{
    pub fn new(op: &'a mut Op, sigma: R, k: usize, m: usize, rule: SelectionRule) -> Result<Self> {
        op.set_shift(sigma);
        let shared: &'a Op = &*op;
        let inner = GeneralEigs::new(RealShiftInvertOp { inner: shared }, k, m, rule)?;
        Ok(GeneralRealShiftInvert { inner, sigma })
    }

    pub fn init(&mut self, init_vec: ArrayView1<R>) -> Result<()> {
        self.inner.init(init_vec)
    }

    pub fn init_random(&mut self) -> Result<()> {
        self.inner.init_random()
    }

    pub fn compute(&mut self, maxit: usize, tol: R) -> Result<usize> {
        self.inner.compute(maxit, tol)
    }

    pub fn num_iterations(&self) -> usize {
        self.inner.num_iterations()
    }

    pub fn num_operations(&self) -> usize {
        self.inner.num_operations()
    }

    pub fn eigenvalues(&self) -> Vec<R::Complex> {
        let sigma = R::complex(self.sigma, R::zero());
        self.inner.eigenvalues().into_iter().map(|theta| sigma + R::complex(R::one(), R::zero()) / theta).collect()
    }

    pub fn eigenvectors(&self) -> Array2<R::Complex> {
        self.inner.eigenvectors()
    }
}

/// General engine, complex shift-and-invert mode. Follows ARPACK's `dnaupd` mode-3 convention
/// for the back-transformation of a complex shift against a real operator: `lambda = sigma +
/// 1/theta`, carried out in complex arithmetic throughout.
pub struct GeneralComplexShiftInvert<'a, R: Scalar, Op> {
    inner: GeneralEigs<R, ComplexShiftInvertOp<'a, Op>>,
    sigma: Complex<R>,
}

impl<'a, R, Op> GeneralComplexShiftInvert<'a, R, Op>
where
    R: RandomReal + Eig_,
    Op: ComplexShiftSolve<R>,
{
    pub fn new(op: &'a mut Op, sigma_re: R, sigma_im: R, k: usize, m: usize, rule: SelectionRule) -> Result<Self> {
        op.set_shift(sigma_re, sigma_im);
        let shared: &'a Op = &*op;
        let inner = GeneralEigs::new(ComplexShiftInvertOp { inner: shared }, k, m, rule)?;
        Ok(GeneralComplexShiftInvert {
            inner,
            sigma: R::complex(sigma_re, sigma_im),
        })
    }

    pub fn init(&mut self, init_vec: ArrayView1<R>) -> Result<()> {
        self.inner.init(init_vec)
    }

    pub fn init_random(&mut self) -> Result<()> {
        self.inner.init_random()
    }

    pub fn compute(&mut self, maxit: usize, tol: R) -> Result<usize> {
        self.inner.compute(maxit, tol)
    }

    pub fn num_iterations(&self) -> usize {
        self.inner.num_iterations()
    }

    pub fn num_operations(&self) -> usize {
        self.inner.num_operations()
    }

    pub fn eigenvalues(&self) -> Vec<R::Complex> {
        self.inner.eigenvalues().into_iter().map(|theta| self.sigma + R::complex(R::one(), R::zero()) / theta).collect()
    }

    pub fn eigenvectors(&self) -> Array2<R::Complex> {
        self.inner.eigenvectors()
    }
}
