//! External interfaces: the matrix-operation capabilities the restart engines consume.
//!
//! Three disjoint capabilities, chosen by the engine through its generic parameter
//! (compile-time, monomorphized polymorphism — no `dyn` trait objects anywhere in this crate).

use ndarray::{ArrayView1, ArrayViewMut1};

/// `y = A * x` for an implicit `n x n` linear operator `A`.
///
/// Used by the symmetric and general engines in "regular" (non shift-invert) mode.
pub trait Product<R> {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn perform_op(&self, x: ArrayView1<R>, y: ArrayViewMut1<R>);
}

/// `y = (A - sigma*I)^-1 * x` for a real shift `sigma`.
///
/// Used by the shift-and-invert variants when the shift is real.
pub trait RealShiftSolve<R> {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn set_shift(&mut self, sigma: R);
    fn perform_op(&self, x: ArrayView1<R>, y: ArrayViewMut1<R>);
}

/// `y = Re((A - (sigma_re + i*sigma_im)*I)^-1 * x)` for a complex shift.
///
/// Used by the complex shift-and-invert variant of the general engine.
pub trait ComplexShiftSolve<R> {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn set_shift(&mut self, sigma_re: R, sigma_im: R);
    fn perform_op(&self, x: ArrayView1<R>, y: ArrayViewMut1<R>);
}

/// Lets the engines hold `Op = &'a Concrete` and thus "borrow the external operator for its
/// lifetime" while still storing `Op` by value internally.
impl<R, T: Product<R> + ?Sized> Product<R> for &T {
    fn rows(&self) -> usize {
        (**self).rows()
    }

    fn cols(&self) -> usize {
        (**self).cols()
    }

    fn perform_op(&self, x: ArrayView1<R>, y: ArrayViewMut1<R>) {
        (**self).perform_op(x, y)
    }
}
