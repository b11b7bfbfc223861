//! Implicit double-shift QR step on an upper-Hessenberg matrix via Householder bulge-chasing
//!
//! Used by the general engine's restart when a selected shift is a complex-conjugate pair:
//! the pair is absorbed into one real step instead of two complex single-shift steps.

use ndarray::{Array2, ArrayViewMut1, ArrayViewMut2};
use num_traits::{Float, NumCast};

/// A single Householder reflector `P = I - beta * v * vᵀ` acting on rows/columns
/// `pos..pos+v.len()`. `v[0]` is always `1` (the standard normalization); `beta == 0`
/// marks a no-op reflector (the column was already zero below the first entry).
#[derive(Debug, Clone)]
struct Reflector<R> {
    pos: usize,
    v: Vec<R>,
    beta: R,
}

/// Double-shift QR step `Qᵀ H Q` for a real upper-Hessenberg `H`, where `Q` is the product
/// of 3x3 (2x2 at the last step) Householder reflectors chasing the bulge created by the
/// implicit shift pair `(s, t)`.
#[derive(Debug, Clone)]
pub struct DoubleShiftQR<R> {
    n: usize,
    h: Array2<R>,
    reflectors: Vec<Reflector<R>>,
}

impl<R: Float> DoubleShiftQR<R> {
    /// Factorize with shift pair `(s, t)` such that `x^2 - s*x + t = 0` has the complex-conjugate
    /// root pair being targeted. Subdiagonal entries below `min(eps^(2/3), n*eps)` are treated as
    /// exact zeros and split `h` into independent blocks; the bulge-chase runs within each block
    /// of size >= 2 only (1-element blocks carry no subdiagonal work).
    pub fn compute(h_in: &Array2<R>, s: R, t: R) -> Self {
        let n = h_in.nrows();
        debug_assert_eq!(h_in.ncols(), n);
        let mut h = h_in.clone();

        let eps = R::epsilon();
        let two_thirds: R = NumCast::from(2.0 / 3.0).unwrap();
        let n_eps = NumCast::from(n).unwrap_or(R::one()) * eps;
        let thresh = eps.powf(two_thirds).min(n_eps);

        for i in 0..n.saturating_sub(1) {
            if h[(i + 1, i)].abs() < thresh {
                h[(i + 1, i)] = R::zero();
            }
        }

        let mut reflectors = Vec::new();
        let mut lo = 0;
        for i in 0..n {
            let at_boundary = i + 1 == n || h[(i + 1, i)].is_zero();
            if at_boundary {
                let hi = i + 1;
                if hi - lo >= 2 {
                    bulge_chase(&mut h, lo, hi, s, t, &mut reflectors);
                }
                lo = hi;
            }
        }

        DoubleShiftQR { n, h, reflectors }
    }

    /// `Qᵀ H Q`, the next-iterate Hessenberg matrix.
    pub fn matrix_qthq(&self) -> Array2<R> {
        self.h.clone()
    }

    /// `Y := Q Y`, applied to all rows of `y` (which must have `n` rows).
    pub fn apply_qy(&self, mut y: ArrayViewMut2<R>) {
        for refl in self.reflectors.iter().rev() {
            apply_left(&mut y, refl);
        }
    }

    /// `Y := Qᵀ Y`, applied to all rows of `y` (which must have `n` rows).
    pub fn apply_qty(&self, mut y: ArrayViewMut2<R>) {
        for refl in self.reflectors.iter() {
            apply_left(&mut y, refl);
        }
    }

    /// `Y := Y Q`, applied to all columns of `y` (which must have `n` columns).
    pub fn apply_yq(&self, mut y: ArrayViewMut2<R>) {
        for refl in self.reflectors.iter() {
            apply_right(&mut y, refl);
        }
    }

    /// `Y := Y Qᵀ`, applied to all columns of `y` (which must have `n` columns).
    pub fn apply_yqt(&self, mut y: ArrayViewMut2<R>) {
        for refl in self.reflectors.iter().rev() {
            apply_right(&mut y, refl);
        }
    }

    /// `y := Qᵀ y` for a single vector of length `n`.
    pub fn apply_qty_vec(&self, mut y: ArrayViewMut1<R>) {
        for refl in self.reflectors.iter() {
            apply_left_vec(&mut y, refl);
        }
    }

    /// `y := Q y` for a single vector of length `n`.
    pub fn apply_qy_vec(&self, mut y: ArrayViewMut1<R>) {
        for refl in self.reflectors.iter().rev() {
            apply_left_vec(&mut y, refl);
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }
}

/// Chase the bulge created by shift `(s, t)` through the block `h[lo..hi, lo..hi]`, pushing one
/// reflector per step onto `reflectors`. Row/column application ranges span the full matrix: a
/// block here need not be fully decoupled from blocks to its right (Hessenberg structure may
/// still carry nonzero entries above the block), so the similarity transform must still update
/// those entries even though the bulge itself stays confined to `[lo, hi)`.
fn bulge_chase<R: Float>(h: &mut Array2<R>, lo: usize, hi: usize, s: R, t: R, reflectors: &mut Vec<Reflector<R>>) {
    let n = h.nrows();
    let h00 = h[(lo, lo)];
    let h01 = if hi - lo > 1 { h[(lo, lo + 1)] } else { R::zero() };
    let h10 = h[(lo + 1, lo)];
    let h11 = h[(lo + 1, lo + 1)];

    let mut x = h00 * h00 + h01 * h10 - s * h00 + t;
    let mut y = h10 * (h00 + h11 - s);
    let mut z = if hi - lo > 2 { h[(lo + 2, lo + 1)] * h10 } else { R::zero() };

    let mut k = lo;
    loop {
        let len = if k + 2 < hi { 3 } else { 2 };
        let col = [x, y, z];
        let (v, beta) = make_householder(&col[..len]);

        apply_householder_left(h, k, &v, beta, 0..n);
        apply_householder_right(h, k, &v, beta, 0..n);
        reflectors.push(Reflector { pos: k, v, beta });

        if k + len >= hi {
            break;
        }
        x = h[(k + 1, k)];
        y = h[(k + 2, k)];
        z = if k + 3 < hi { h[(k + 3, k)] } else { R::zero() };
        k += 1;
    }
}

/// Numerically stable construction of a Householder vector `v` (with `v[0] = 1`) and scalar
/// `beta` such that `(I - beta v vᵀ) x = ||x|| e1`. Golub & Van Loan, Algorithm 5.1.1.
fn make_householder<R: Float>(x: &[R]) -> (Vec<R>, R) {
    let n = x.len();
    let mut v = vec![R::zero(); n];
    for i in 1..n {
        v[i] = x[i];
    }
    let sigma: R = x[1..].iter().fold(R::zero(), |acc, &xi| acc + xi * xi);
    if sigma.is_zero() {
        v[0] = R::one();
        return (v, R::zero());
    }
    let mu = (x[0] * x[0] + sigma).sqrt();
    let v0 = if x[0] <= R::zero() {
        x[0] - mu
    } else {
        -sigma / (x[0] + mu)
    };
    let two = R::one() + R::one();
    let beta = two * v0 * v0 / (sigma + v0 * v0);
    for vi in v[1..].iter_mut() {
        *vi = *vi / v0;
    }
    v[0] = R::one();
    (v, beta)
}

/// `h[refl.pos..pos+len, cols] := P * h[pos..pos+len, cols]`
fn apply_householder_left<R: Float>(h: &mut Array2<R>, pos: usize, v: &[R], beta: R, cols: std::ops::Range<usize>) {
    if beta.is_zero() {
        return;
    }
    let len = v.len();
    for j in cols {
        let mut dot = R::zero();
        for (l, &vl) in v.iter().enumerate() {
            dot = dot + vl * h[(pos + l, j)];
        }
        let factor = beta * dot;
        for l in 0..len {
            h[(pos + l, j)] = h[(pos + l, j)] - factor * v[l];
        }
    }
}

/// `h[rows, pos..pos+len] := h[rows, pos..pos+len] * P`
fn apply_householder_right<R: Float>(h: &mut Array2<R>, pos: usize, v: &[R], beta: R, rows: std::ops::Range<usize>) {
    if beta.is_zero() {
        return;
    }
    let len = v.len();
    for i in rows {
        let mut dot = R::zero();
        for (l, &vl) in v.iter().enumerate() {
            dot = dot + vl * h[(i, pos + l)];
        }
        let factor = beta * dot;
        for l in 0..len {
            h[(i, pos + l)] = h[(i, pos + l)] - factor * v[l];
        }
    }
}

fn apply_left<R: Float>(y: &mut ArrayViewMut2<R>, refl: &Reflector<R>) {
    if refl.beta.is_zero() {
        return;
    }
    let len = refl.v.len();
    let ncols = y.ncols();
    for j in 0..ncols {
        let mut dot = R::zero();
        for l in 0..len {
            dot = dot + refl.v[l] * y[(refl.pos + l, j)];
        }
        let factor = refl.beta * dot;
        for l in 0..len {
            y[(refl.pos + l, j)] = y[(refl.pos + l, j)] - factor * refl.v[l];
        }
    }
}

fn apply_right<R: Float>(y: &mut ArrayViewMut2<R>, refl: &Reflector<R>) {
    if refl.beta.is_zero() {
        return;
    }
    let len = refl.v.len();
    let nrows = y.nrows();
    for i in 0..nrows {
        let mut dot = R::zero();
        for l in 0..len {
            dot = dot + refl.v[l] * y[(i, refl.pos + l)];
        }
        let factor = refl.beta * dot;
        for l in 0..len {
            y[(i, refl.pos + l)] = y[(i, refl.pos + l)] - factor * refl.v[l];
        }
    }
}

fn apply_left_vec<R: Float>(y: &mut ArrayViewMut1<R>, refl: &Reflector<R>) {
    if refl.beta.is_zero() {
        return;
    }
    let len = refl.v.len();
    let mut dot = R::zero();
    for l in 0..len {
        dot = dot + refl.v[l] * y[refl.pos + l];
    }
    let factor = refl.beta * dot;
    for l in 0..len {
        y[refl.pos + l] = y[refl.pos + l] - factor * refl.v[l];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn is_upper_hessenberg(m: &Array2<f64>, tol: f64) -> bool {
        for i in 0..m.nrows() {
            for j in 0..i.saturating_sub(1) {
                if m[(i, j)].abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn preserves_hessenberg_shape() {
        let h = array![
            [1.0, 2.0, 3.0, 4.0, 5.0],
            [6.0, 7.0, 8.0, 9.0, 1.0],
            [0.0, 2.0, 3.0, 4.0, 5.0],
            [0.0, 0.0, 6.0, 7.0, 8.0],
            [0.0, 0.0, 0.0, 9.0, 1.0],
        ];
        let qr = DoubleShiftQR::compute(&h, 0.5, 1.0);
        let hq = qr.matrix_qthq();
        assert!(is_upper_hessenberg(&hq, 1e-8));
    }

    #[test]
    fn similarity_transform_preserves_trace() {
        let h = array![
            [4.0, 1.0, 0.0, 0.0],
            [3.0, 5.0, 2.0, 0.0],
            [0.0, 6.0, 1.0, 3.0],
            [0.0, 0.0, 7.0, 2.0],
        ];
        let trace_before: f64 = (0..4).map(|i| h[(i, i)]).sum();
        let qr = DoubleShiftQR::compute(&h, 1.5, 2.0);
        let hq = qr.matrix_qthq();
        let trace_after: f64 = (0..4).map(|i| hq[(i, i)]).sum();
        assert!((trace_before - trace_after).abs() < 1e-8);
    }

    #[test]
    fn q_applied_to_identity_is_orthogonal() {
        let h = array![
            [2.0, -1.0, 0.5, 0.0],
            [1.0, 3.0, 4.0, 0.5],
            [0.0, 2.0, 1.0, 6.0],
            [0.0, 0.0, 5.0, 2.0],
        ];
        let qr = DoubleShiftQR::compute(&h, 0.7, 3.0);
        let mut q = Array2::<f64>::eye(4);
        qr.apply_qy(q.view_mut());
        let qt_q = q.t().dot(&q);
        for i in 0..4 {
            for j in 0..4 {
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((qt_q[(i, j)] - expect).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn qthq_matches_explicit_q_product() {
        let h = array![
            [4.0, 1.0, 0.0],
            [3.0, 5.0, 2.0],
            [0.0, 6.0, 1.0],
        ];
        let qr = DoubleShiftQR::compute(&h, 1.0, 2.0);
        let mut q = Array2::<f64>::eye(3);
        qr.apply_qy(q.view_mut());
        let qt_h_q = q.t().dot(&h).dot(&q);
        let hq = qr.matrix_qthq();
        for i in 0..3 {
            for j in 0..3 {
                assert!((hq[(i, j)] - qt_h_q[(i, j)]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn respects_exact_subdiagonal_zero_block_boundary() {
        let mut h = Array2::<f64>::zeros((6, 6));
        for i in 0..6 {
            h[(i, i)] = (i + 1) as f64;
        }
        for i in 0..5 {
            h[(i + 1, i)] = 1.0;
            h[(i, i + 1)] = 0.3;
        }
        h[(3, 2)] = 0.0; // exact block boundary between rows/cols 0..3 and 3..6
        let qr = DoubleShiftQR::compute(&h, 0.5, 1.0);
        let hq = qr.matrix_qthq();
        assert!((hq[(3, 2)]).abs() < 1e-10, "block boundary should be preserved");
    }
}
