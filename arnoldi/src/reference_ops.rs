//! Dense, `ndarray`-backed implementations of the §6 matrix-operation capabilities.
//!
//! These are "concrete matrix-operator implementations" — out of scope for the engine's own
//! specification, but a runnable crate needs at least one real implementation to exercise the
//! engines against, so they live here as a clearly separate, optional module.

use cauchy::Scalar;
use ndarray::{Array2, ArrayView1, ArrayViewMut1};
use num_traits::{Float, Zero};

use lax::{MatrixLayout, Solve_};

use crate::operator::{ComplexShiftSolve, Product, RealShiftSolve};

/// `y = A x` for a dense, owned `Array2<R>`.
#[derive(Debug, Clone)]
pub struct DenseMatProd<R> {
    a: Array2<R>,
}

impl<R: Float> DenseMatProd<R> {
    pub fn new(a: Array2<R>) -> Self {
        debug_assert_eq!(a.nrows(), a.ncols(), "DenseMatProd requires a square matrix");
        DenseMatProd { a }
    }
}

impl<R: Float> Product<R> for DenseMatProd<R> {
    fn rows(&self) -> usize {
        self.a.nrows()
    }

    fn cols(&self) -> usize {
        self.a.ncols()
    }

    fn perform_op(&self, x: ArrayView1<R>, mut y: ArrayViewMut1<R>) {
        let n = self.a.nrows();
        for i in 0..n {
            let mut acc = R::zero();
            for j in 0..n {
                acc = acc + self.a[(i, j)] * x[j];
            }
            y[i] = acc;
        }
    }
}

/// `y = (A - sigma*I)^-1 x` for a real shift `sigma`, via a cached LU factorization rebuilt
/// whenever the shift changes.
pub struct DenseRealShiftSolve<R: Scalar> {
    a: Array2<R>,
    sigma: R,
    factored: Vec<R>,
    ipiv: Vec<i32>,
}

impl<R: Solve_ + Float> DenseRealShiftSolve<R> {
    pub fn new(a: Array2<R>, sigma: R) -> lax::Result<Self> {
        debug_assert_eq!(a.nrows(), a.ncols(), "DenseRealShiftSolve requires a square matrix");
        let n = a.nrows();
        let mut op = DenseRealShiftSolve {
            a,
            sigma,
            factored: vec![R::zero(); n * n],
            ipiv: Vec::new(),
        };
        op.refactor()?;
        Ok(op)
    }

    fn refactor(&mut self) -> lax::Result<()> {
        let n = self.a.nrows();
        for col in 0..n {
            for row in 0..n {
                let shifted = if row == col {
                    self.a[(row, col)] - self.sigma
                } else {
                    self.a[(row, col)]
                };
                self.factored[row + col * n] = shifted;
            }
        }
        let layout = MatrixLayout::square_col_major(n);
        self.ipiv = R::lu(layout, &mut self.factored)?;
        Ok(())
    }
}

impl<R: Solve_ + Float> RealShiftSolve<R> for DenseRealShiftSolve<R> {
    fn rows(&self) -> usize {
        self.a.nrows()
    }

    fn cols(&self) -> usize {
        self.a.ncols()
    }

    fn set_shift(&mut self, sigma: R) {
        self.sigma = sigma;
        self.refactor().expect("shift-invert factorization of a well-posed operator should not fail");
    }

    fn perform_op(&self, x: ArrayView1<R>, mut y: ArrayViewMut1<R>) {
        let n = self.a.nrows();
        let layout = MatrixLayout::square_col_major(n);
        let mut b: Vec<R> = x.iter().copied().collect();
        R::solve(layout, &self.factored, &self.ipiv, &mut b).expect("solve with a cached LU factorization should not fail");
        for i in 0..n {
            y[i] = b[i];
        }
    }
}

/// `y = Re((A - (sigma_re + i sigma_im)*I)^-1 x)` for a complex shift, built from a real `A`.
pub struct DenseComplexShiftSolve<R: Scalar> {
    a: Array2<R>,
    sigma_re: R,
    sigma_im: R,
    factored: Vec<R::Complex>,
    ipiv: Vec<i32>,
}

impl<R> DenseComplexShiftSolve<R>
where
    R: Float + Scalar,
    R::Complex: Solve_,
{
    pub fn new(a: Array2<R>, sigma_re: R, sigma_im: R) -> lax::Result<Self> {
        debug_assert_eq!(a.nrows(), a.ncols(), "DenseComplexShiftSolve requires a square matrix");
        let n = a.nrows();
        let mut op = DenseComplexShiftSolve {
            a,
            sigma_re,
            sigma_im,
            factored: vec![R::Complex::zero(); n * n],
            ipiv: Vec::new(),
        };
        op.refactor()?;
        Ok(op)
    }

    fn refactor(&mut self) -> lax::Result<()> {
        let n = self.a.nrows();
        let shift = R::complex(self.sigma_re, self.sigma_im);
        for col in 0..n {
            for row in 0..n {
                let entry = R::complex(self.a[(row, col)], R::zero());
                self.factored[row + col * n] = if row == col { entry - shift } else { entry };
            }
        }
        let layout = MatrixLayout::square_col_major(n);
        self.ipiv = R::Complex::lu(layout, &mut self.factored)?;
        Ok(())
    }
}

impl<R> ComplexShiftSolve<R> for DenseComplexShiftSolve<R>
where
    R: Float + Scalar,
    R::Complex: Solve_,
{
    fn rows(&self) -> usize {
        self.a.nrows()
    }

    fn cols(&self) -> usize {
        self.a.ncols()
    }

    fn set_shift(&mut self, sigma_re: R, sigma_im: R) {
        self.sigma_re = sigma_re;
        self.sigma_im = sigma_im;
        self.refactor().expect("shift-invert factorization of a well-posed operator should not fail");
    }

    fn perform_op(&self, x: ArrayView1<R>, mut y: ArrayViewMut1<R>) {
        let n = self.a.nrows();
        let layout = MatrixLayout::square_col_major(n);
        let mut b: Vec<R::Complex> = x.iter().map(|&xi| R::complex(xi, R::zero())).collect();
        R::Complex::solve(layout, &self.factored, &self.ipiv, &mut b).expect("solve with a cached LU factorization should not fail");
        for i in 0..n {
            y[i] = b[i].re();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dense_mat_prod_identity() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        let op = DenseMatProd::new(a);
        let x = array![3.0, -2.0];
        let mut y = array![0.0, 0.0];
        op.perform_op(x.view(), y.view_mut());
        assert_eq!(y, array![3.0, -2.0]);
    }

    #[test]
    fn dense_real_shift_solve_matches_direct_solve() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let mut op = DenseRealShiftSolve::new(a, 0.5).unwrap();
        let x = array![1.0, 0.0];
        let mut y = array![0.0, 0.0];
        RealShiftSolve::perform_op(&op, x.view(), y.view_mut());
        // (A - 0.5 I) y = x  =>  verify by reapplying (A - 0.5 I)
        let shifted_00 = 2.0 - 0.5;
        let shifted_11 = 3.0 - 0.5;
        let check0 = shifted_00 * y[0] + 1.0 * y[1];
        let check1 = 1.0 * y[0] + shifted_11 * y[1];
        assert!((check0 - 1.0).abs() < 1e-8);
        assert!((check1 - 0.0).abs() < 1e-8);

        op.set_shift(0.25);
        RealShiftSolve::perform_op(&op, x.view(), y.view_mut());
        let shifted_00 = 2.0 - 0.25;
        let shifted_11 = 3.0 - 0.25;
        let check0 = shifted_00 * y[0] + 1.0 * y[1];
        let check1 = 1.0 * y[0] + shifted_11 * y[1];
        assert!((check0 - 1.0).abs() < 1e-8);
        assert!((check1 - 0.0).abs() < 1e-8);
    }
}
