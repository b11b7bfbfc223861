//! QR factorization of an upper-Hessenberg matrix via a single Givens rotation per subdiagonal entry

use ndarray::{Array2, ArrayViewMut1, ArrayViewMut2, Axis};
use num_traits::Float;

/// One Givens rotation `G_i = [[c, s], [-s, c]]` acting on rows/columns `i, i+1`.
#[derive(Debug, Clone, Copy)]
struct Rotation<R> {
    c: R,
    s: R,
}

/// QR factorization `H = Q R` of an `n x n` upper-Hessenberg matrix, with `Q` represented
/// implicitly as a product of `n - 1` Givens rotations.
///
/// `R = Qᵀ H` is stored in place of the working matrix after [`compute`](Self::compute).
#[derive(Debug, Clone)]
pub struct UpperHessenbergQR<R> {
    n: usize,
    rot: Vec<Rotation<R>>,
    r: Array2<R>,
}

impl<R: Float> UpperHessenbergQR<R> {
    /// Factorize the `n x n` upper-Hessenberg matrix `h`.
    pub fn compute(h: &Array2<R>) -> Self {
        let n = h.nrows();
        debug_assert_eq!(h.ncols(), n);
        let mut r = h.clone();
        let mut rot = Vec::with_capacity(n.saturating_sub(1));
        for i in 0..n.saturating_sub(1) {
            let a = r[(i, i)];
            let b = r[(i + 1, i)];
            let radius = a.hypot(b);
            let (c, s) = if radius.is_zero() {
                (R::one(), R::zero())
            } else {
                (a / radius, -b / radius)
            };
            rot.push(Rotation { c, s });
            // Gᵀ = [[c, -s], [s, c]] applied to rows i, i+1 over the untouched columns.
            for col in i..n {
                let ri = r[(i, col)];
                let ri1 = r[(i + 1, col)];
                r[(i, col)] = c * ri - s * ri1;
                r[(i + 1, col)] = s * ri + c * ri1;
            }
        }
        UpperHessenbergQR { n, rot, r }
    }

    /// The upper-triangular factor `R`.
    pub fn matrix_r(&self) -> Array2<R> {
        self.r.clone()
    }

    /// The next-iterate Hessenberg matrix `R Q = Qᵀ H Q`.
    pub fn matrix_rq(&self) -> Array2<R> {
        let mut rq = self.r.clone();
        self.apply_yq(rq.view_mut());
        rq
    }

    /// `Y := Q Y`, applied to all rows of `y` (which must have `n` rows).
    pub fn apply_qy(&self, mut y: ArrayViewMut2<R>) {
        for i in (0..self.n.saturating_sub(1)).rev() {
            let Rotation { c, s } = self.rot[i];
            apply_row_pair(&mut y, i, c, s, false);
        }
    }

    /// `Y := Qᵀ Y`, applied to all rows of `y` (which must have `n` rows).
    pub fn apply_qty(&self, mut y: ArrayViewMut2<R>) {
        for i in 0..self.n.saturating_sub(1) {
            let Rotation { c, s } = self.rot[i];
            apply_row_pair(&mut y, i, c, s, true);
        }
    }

    /// `Y := Y Q`, applied to all columns of `y` (which must have `n` columns).
    pub fn apply_yq(&self, mut y: ArrayViewMut2<R>) {
        for i in 0..self.n.saturating_sub(1) {
            let Rotation { c, s } = self.rot[i];
            apply_col_pair(&mut y, i, c, s, false);
        }
    }

    /// `Y := Y Qᵀ`, applied to all columns of `y` (which must have `n` columns).
    pub fn apply_yqt(&self, mut y: ArrayViewMut2<R>) {
        for i in (0..self.n.saturating_sub(1)).rev() {
            let Rotation { c, s } = self.rot[i];
            apply_col_pair(&mut y, i, c, s, true);
        }
    }

    /// `y := Q y` for a single vector.
    pub fn apply_qy_vec(&self, mut y: ArrayViewMut1<R>) {
        for i in (0..self.n.saturating_sub(1)).rev() {
            let Rotation { c, s } = self.rot[i];
            apply_vec_pair(&mut y, i, c, s, false);
        }
    }

    /// `y := Qᵀ y` for a single vector.
    pub fn apply_qty_vec(&self, mut y: ArrayViewMut1<R>) {
        for i in 0..self.n.saturating_sub(1) {
            let Rotation { c, s } = self.rot[i];
            apply_vec_pair(&mut y, i, c, s, true);
        }
    }
}

/// Apply rotation `i` to the row pair `(i, i+1)` of `y`.
/// `transpose = false`: `Gᵢ = [[c, s], [-s, c]]`. `transpose = true`: `Gᵢᵀ = [[c, -s], [s, c]]`.
fn apply_row_pair<R: Float>(y: &mut ArrayViewMut2<R>, i: usize, c: R, s: R, transpose: bool) {
    let (mut top, mut bottom) = y.view_mut().split_at(Axis(0), i + 1);
    let row_i = top.index_axis_mut(Axis(0), i);
    let row_i1 = bottom.index_axis_mut(Axis(0), 0);
    let s = if transpose { -s } else { s };
    for (a, b) in row_i.into_iter().zip(row_i1.into_iter()) {
        let ai = *a;
        let bi = *b;
        *a = c * ai + s * bi;
        *b = -s * ai + c * bi;
    }
}

fn apply_col_pair<R: Float>(y: &mut ArrayViewMut2<R>, i: usize, c: R, s: R, transpose: bool) {
    let (mut left, mut right) = y.view_mut().split_at(Axis(1), i + 1);
    let col_i = left.index_axis_mut(Axis(1), i);
    let col_i1 = right.index_axis_mut(Axis(1), 0);
    let s = if transpose { -s } else { s };
    for (a, b) in col_i.into_iter().zip(col_i1.into_iter()) {
        let ai = *a;
        let bi = *b;
        *a = c * ai - s * bi;
        *b = s * ai + c * bi;
    }
}

fn apply_vec_pair<R: Float>(y: &mut ArrayViewMut1<R>, i: usize, c: R, s: R, transpose: bool) {
    let s = if transpose { -s } else { s };
    let ai = y[i];
    let bi = y[i + 1];
    y[i] = c * ai + s * bi;
    y[i + 1] = -s * ai + c * bi;
}

/// Tridiagonal specialization used by the symmetric (Lanczos) engine.
///
/// Accepts the tridiagonal matrix as `(diag, subdiag)` so the Lanczos engine never needs to
/// materialize a dense `m x m` array for `H`. Internally this delegates to
/// [`UpperHessenbergQR`]: the externally observable behavior (§4.2 contract) is identical to
/// running the general Givens QR on the dense Hessenberg matrix built from the same entries,
/// which is the property the spec requires; see `DESIGN.md` for why the O(n) banded update is
/// not separately hand-rolled here.
#[derive(Debug, Clone)]
pub struct TridiagonalQR<R> {
    inner: UpperHessenbergQR<R>,
}

impl<R: Float> TridiagonalQR<R> {
    pub fn compute(diag: &[R], subdiag: &[R]) -> Self {
        let n = diag.len();
        debug_assert_eq!(subdiag.len(), n.saturating_sub(1));
        let mut h = Array2::<R>::zeros((n, n));
        for i in 0..n {
            h[(i, i)] = diag[i];
        }
        for i in 0..n.saturating_sub(1) {
            h[(i + 1, i)] = subdiag[i];
            h[(i, i + 1)] = subdiag[i];
        }
        TridiagonalQR {
            inner: UpperHessenbergQR::compute(&h),
        }
    }

    pub fn matrix_r(&self) -> Array2<R> {
        self.inner.matrix_r()
    }

    pub fn matrix_rq(&self) -> Array2<R> {
        self.inner.matrix_rq()
    }

    pub fn apply_qy(&self, y: ArrayViewMut2<R>) {
        self.inner.apply_qy(y)
    }

    pub fn apply_qty(&self, y: ArrayViewMut2<R>) {
        self.inner.apply_qty(y)
    }

    pub fn apply_yq(&self, y: ArrayViewMut2<R>) {
        self.inner.apply_yq(y)
    }

    pub fn apply_yqt(&self, y: ArrayViewMut2<R>) {
        self.inner.apply_yqt(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn is_upper_triangular(m: &Array2<f64>, tol: f64) -> bool {
        for i in 0..m.nrows() {
            for j in 0..i {
                if m[(i, j)].abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn qr_round_trip() {
        let h = array![
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [0.0, 9.0, 10.0, 11.0],
            [0.0, 0.0, 12.0, 13.0],
        ];
        let qr = UpperHessenbergQR::compute(&h);
        let r = qr.matrix_r();
        assert!(is_upper_triangular(&r, 1e-10));

        // H = Q R  <=>  Q^T H = R; reconstruct Q H-applied: apply_qy(R) should give H back.
        let mut reconstructed = r.clone();
        qr.apply_qy(reconstructed.view_mut());
        for ((i, j), &expect) in h.indexed_iter() {
            assert!((reconstructed[(i, j)] - expect).abs() < 1e-8, "{} {}", i, j);
        }
    }

    #[test]
    fn q_is_orthogonal() {
        let h = array![
            [2.0, -1.0, 0.0],
            [3.0, 4.0, 5.0],
            [0.0, 6.0, 1.0],
        ];
        let qr = UpperHessenbergQR::compute(&h);
        let mut q = Array2::<f64>::eye(3);
        qr.apply_qy(q.view_mut());
        let qt_q = q.t().dot(&q);
        for i in 0..3 {
            for j in 0..3 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((qt_q[(i, j)] - expect).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn rq_matches_qt_h_q() {
        let h = array![[4.0, 1.0, 0.0], [1.0, 3.0, 2.0], [0.0, 2.0, 5.0]];
        let qr = UpperHessenbergQR::compute(&h);
        let rq = qr.matrix_rq();

        let mut q = Array2::<f64>::eye(3);
        qr.apply_qy(q.view_mut());
        let qt_h_q = q.t().dot(&h).dot(&q);

        for i in 0..3 {
            for j in 0..3 {
                assert!((rq[(i, j)] - qt_h_q[(i, j)]).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn tridiagonal_matches_dense() {
        let diag = [2.0, 3.0, 5.0, 7.0];
        let sub = [1.0, 1.5, -2.0];
        let tri = TridiagonalQR::compute(&diag, &sub);
        let mut h = Array2::<f64>::zeros((4, 4));
        for i in 0..4 {
            h[(i, i)] = diag[i];
        }
        for i in 0..3 {
            h[(i + 1, i)] = sub[i];
            h[(i, i + 1)] = sub[i];
        }
        let dense = UpperHessenbergQR::compute(&h);
        let r_tri = tri.matrix_r();
        let r_dense = dense.matrix_r();
        for i in 0..4 {
            for j in 0..4 {
                assert!((r_tri[(i, j)] - r_dense[(i, j)]).abs() < 1e-12);
            }
        }
    }
}
