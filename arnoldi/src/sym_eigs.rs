//! Symmetric (Lanczos) implicitly restarted eigensolver.
//!
//! Maintains a Krylov factorization `A V = V H + f eₘᵀ` with `H` kept as a dense `m x m` array
//! (symmetric, tridiagonal in exact arithmetic); restarts by an implicit QR step with shifts
//! taken from the unwanted end of the Ritz spectrum.

use std::collections::HashSet;

use ndarray::{s, Array1, Array2, ArrayView1};
use num_traits::Float;

use lax::Eigh_;

use crate::dense_eigen;
use crate::error::{Error, Result};
use crate::operator::Product;
use crate::qr::UpperHessenbergQR;
use crate::selection::{select_both_ends, SelectionRule};
use crate::util::{
    l2_norm, mat_t_vec, mat_vec, orthogonalize_against, random_unit_vector, random_unit_vector_with_rng, vec_dot, RandomReal,
};

/// Extra DGKS re-orthogonalization rounds allowed beyond the unconditional first pass.
const MAX_REORTH_ROUNDS: usize = 3;

pub struct SymmetricEigs<R, Op> {
    op: Op,
    n: usize,
    k: usize,
    m: usize,
    rule: SelectionRule,
    v: Array2<R>,
    h: Array2<R>,
    f: Array1<R>,
    j: usize,
    ritz_val: Vec<R>,
    ritz_vec: Array2<R>,
    ritz_conv: Vec<bool>,
    num_iterations: usize,
    num_operations: usize,
}

impl<R, Op> SymmetricEigs<R, Op>
where
    R: RandomReal + Eigh_<Real = R>,
    Op: Product<R>,
{
    /// `k` wanted eigenpairs, subspace dimension `m` (`k < m <= n`), selected by `rule`
    /// (only `LargestMagn`, `SmallestMagn`, `LargestAlge`, `SmallestAlge`, `BothEnds` are valid).
    pub fn new(op: Op, k: usize, m: usize, rule: SelectionRule) -> Result<Self> {
        rule.validate_for_symmetric()?;
        let n = op.rows();
        if op.rows() != op.cols() {
            return Err(Error::NonSquareOperator { rows: op.rows(), cols: op.cols() });
        }
        if !(k >= 1 && k < n) {
            return Err(Error::InvalidParameter { what: "k", value: k as i64, constraint: "1 <= k < n" });
        }
        if !(k + 1 <= m && m <= n) {
            return Err(Error::InvalidParameter { what: "m", value: m as i64, constraint: "k+1 <= m <= n" });
        }
        Ok(SymmetricEigs {
            op,
            n,
            k,
            m,
            rule,
            v: Array2::zeros((n, m)),
            h: Array2::zeros((m, m)),
            f: Array1::zeros(n),
            j: 0,
            ritz_val: Vec::new(),
            ritz_vec: Array2::zeros((m, k)),
            ritz_conv: vec![false; k],
            num_iterations: 0,
            num_operations: 0,
        })
    }

    /// Seed the factorization from a caller-supplied vector (normalized internally).
    pub fn init(&mut self, init_vec: ArrayView1<R>) -> Result<()> {
        if init_vec.len() != self.n {
            return Err(Error::InitVectorLengthMismatch { got: init_vec.len(), expected: self.n });
        }
        self.start(init_vec.to_owned())
    }

    /// Seed the factorization from a random unit vector drawn from the thread-local RNG.
    pub fn init_random(&mut self) -> Result<()> {
        self.start(random_unit_vector(self.n))
    }

    /// Seed the factorization from a random unit vector drawn from a caller-supplied RNG.
    pub fn init_with_rng<Rg: rand::Rng>(&mut self, rng: &mut Rg) -> Result<()> {
        self.start(random_unit_vector_with_rng(self.n, rng))
    }

    fn start(&mut self, v0: Array1<R>) -> Result<()> {
        let norm = l2_norm(v0.view());
        let v0 = v0.mapv(|x| x / norm);
        self.v.column_mut(0).assign(&v0);
        let mut w = Array1::zeros(self.n);
        self.op.perform_op(v0.view(), w.view_mut());
        self.num_operations += 1;
        let h00 = vec_dot(v0.view(), w.view());
        self.h[(0, 0)] = h00;
        self.f = &w - &v0.mapv(|x| x * h00);
        self.j = 1;
        Ok(())
    }

    /// Extend the factorization from column `from` (exclusive of its residual) up to `to`.
    fn factorize_from(&mut self, from: usize, to: usize) {
        let eps = R::epsilon();
        for i in from..to {
            let h_norm = crate::util::frobenius_norm(self.h.view()).max(R::one());
            let beta = l2_norm(self.f.view());
            if beta < eps * h_norm {
                let mut candidate = random_unit_vector::<R>(self.n);
                orthogonalize_against(&mut candidate, self.v.slice(s![.., 0..i]));
                let cnorm = l2_norm(candidate.view());
                candidate.mapv_inplace(|x| x / cnorm);
                self.v.column_mut(i).assign(&candidate);
                if i > 0 {
                    self.h[(i, i - 1)] = R::zero();
                    self.h[(i - 1, i)] = R::zero();
                }
            } else {
                let vi = self.f.mapv(|x| x / beta);
                self.v.column_mut(i).assign(&vi);
                if i > 0 {
                    self.h[(i, i - 1)] = beta;
                    self.h[(i - 1, i)] = beta;
                }
            }

            let vi = self.v.column(i).to_owned();
            let mut w = Array1::zeros(self.n);
            self.op.perform_op(vi.view(), w.view_mut());
            self.num_operations += 1;

            let v_active = self.v.slice(s![.., 0..=i]);
            let mut h_col = mat_t_vec(v_active, w.view());
            let mut f = &w - &mat_vec(v_active, h_col.view());

            let mut prev_norm = l2_norm(f.view());
            for _ in 0..MAX_REORTH_ROUNDS {
                let corr = mat_t_vec(v_active, f.view());
                f = &f - &mat_vec(v_active, corr.view());
                h_col = &h_col + &corr;
                let two_sqrt: R = R::from(std::f64::consts::SQRT_2).unwrap();
                let new_norm = l2_norm(f.view());
                let big_drop = new_norm < prev_norm / two_sqrt;
                prev_norm = new_norm;
                if !big_drop {
                    break;
                }
            }

            for row in 0..=i {
                self.h[(row, i)] = h_col[row];
                self.h[(i, row)] = h_col[row];
            }
            self.f = f;
        }
        self.j = to;
    }

    fn retrieve_ritzpair(&mut self) -> Result<()> {
        let (vals, vecs) = dense_eigen::symmetric_eigen(&self.h)?;
        let order = self.rule.sort_indices_real(&vals);
        let wanted: Vec<usize> = if self.rule == SelectionRule::BothEnds {
            select_both_ends(&order, self.k)
        } else {
            order[..self.k].to_vec()
        };
        self.ritz_val = wanted.iter().map(|&i| vals[i]).collect();
        for (col, &src) in wanted.iter().enumerate() {
            self.ritz_vec.column_mut(col).assign(&vecs.column(src));
        }
        Ok(())
    }

    fn converged(&mut self, tol: R) -> bool {
        let two_thirds = R::epsilon().powf(R::from(2.0 / 3.0).unwrap());
        let fnorm = l2_norm(self.f.view());
        let mut all_converged = true;
        for i in 0..self.k {
            let bound = tol * self.ritz_val[i].abs().max(two_thirds);
            let residual = self.ritz_vec[(self.m - 1, i)].abs() * fnorm;
            let ok = residual < bound;
            self.ritz_conv[i] = ok;
            all_converged = all_converged && ok;
        }
        all_converged
    }

    fn restart(&mut self) -> Result<()> {
        let k_prime = self.k;
        let (vals, _vecs) = dense_eigen::symmetric_eigen(&self.h)?;
        let order = self.rule.sort_indices_real(&vals);
        let wanted: Vec<usize> = if self.rule == SelectionRule::BothEnds {
            select_both_ends(&order, k_prime)
        } else {
            order[..k_prime].to_vec()
        };
        let wanted_set: HashSet<usize> = wanted.into_iter().collect();
        let shifts: Vec<R> = order.iter().filter(|i| !wanted_set.contains(i)).map(|&i| vals[i]).collect();

        let mut em = Array1::<R>::zeros(self.m);
        em[self.m - 1] = R::one();

        for &mu in &shifts {
            let mut shifted = self.h.clone();
            for d in 0..self.m {
                shifted[(d, d)] = shifted[(d, d)] - mu;
            }
            let qr = UpperHessenbergQR::compute(&shifted);
            qr.apply_yq(self.v.view_mut());
            self.h = qr.matrix_rq();
            for d in 0..self.m {
                self.h[(d, d)] = self.h[(d, d)] + mu;
            }
            qr.apply_qty_vec(em.view_mut());
        }

        let vk = self.v.column(k_prime).to_owned();
        let coeff = self.h[(k_prime, k_prime - 1)];
        self.f = &self.f * em[k_prime - 1] + &vk.mapv(|x| x * coeff);
        self.j = k_prime;
        Ok(())
    }

    /// Run up to `maxit` restart cycles or until all `k` wanted Ritz pairs satisfy the
    /// convergence bound `residual < tol * max(|ritz_val|, eps^(2/3))`. Returns the number of
    /// converged pairs. Call [`init`](Self::init) or [`init_random`](Self::init_random) first.
    pub fn compute(&mut self, maxit: usize, tol: R) -> Result<usize> {
        self.factorize_from(self.j, self.m);
        self.retrieve_ritzpair()?;
        let mut iters = 0;
        loop {
            if self.converged(tol) || iters >= maxit {
                break;
            }
            self.restart()?;
            self.factorize_from(self.j, self.m);
            self.retrieve_ritzpair()?;
            iters += 1;
            self.num_iterations = iters;
        }
        self.sort_final_by_descending_magnitude();
        Ok(self.ritz_conv.iter().filter(|&&c| c).count())
    }

    fn sort_final_by_descending_magnitude(&mut self) {
        let mut idx: Vec<usize> = (0..self.k).collect();
        idx.sort_by(|&a, &b| {
            self.ritz_val[b]
                .abs()
                .partial_cmp(&self.ritz_val[a].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let vals: Vec<R> = idx.iter().map(|&i| self.ritz_val[i]).collect();
        let conv: Vec<bool> = idx.iter().map(|&i| self.ritz_conv[i]).collect();
        let mut vecs = Array2::zeros((self.m, self.k));
        for (col, &src) in idx.iter().enumerate() {
            vecs.column_mut(col).assign(&self.ritz_vec.column(src));
        }
        self.ritz_val = vals;
        self.ritz_conv = conv;
        self.ritz_vec = vecs;
    }

    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    pub fn num_operations(&self) -> usize {
        self.num_operations
    }

    /// Converged eigenvalues, descending by magnitude.
    pub fn eigenvalues(&self) -> Vec<R> {
        (0..self.k).filter(|&i| self.ritz_conv[i]).map(|i| self.ritz_val[i]).collect()
    }

    /// Converged eigenvectors (columns of the original `n`-dimensional space), same order as
    /// [`eigenvalues`](Self::eigenvalues).
    pub fn eigenvectors(&self) -> Array2<R> {
        let idx: Vec<usize> = (0..self.k).filter(|&i| self.ritz_conv[i]).collect();
        let mut out = Array2::zeros((self.n, idx.len()));
        for (col, &i) in idx.iter().enumerate() {
            let vec = mat_vec(self.v.view(), self.ritz_vec.column(i));
            out.column_mut(col).assign(&vec);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, ArrayViewMut1};

    struct Diag(Array1<f64>);

    impl Product<f64> for Diag {
        fn rows(&self) -> usize {
            self.0.len()
        }
        fn cols(&self) -> usize {
            self.0.len()
        }
        fn perform_op(&self, x: ArrayView1<f64>, mut y: ArrayViewMut1<f64>) {
            for i in 0..self.0.len() {
                y[i] = self.0[i] * x[i];
            }
        }
    }

    #[test]
    fn recovers_largest_eigenvalues_of_diagonal_matrix() {
        let op = Diag(array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut eigs = SymmetricEigs::new(op, 2, 5, SelectionRule::LargestAlge).unwrap();
        eigs.init_random().unwrap();
        let nconv = eigs.compute(100, 1e-10).unwrap();
        assert_eq!(nconv, 2);
        let vals = eigs.eigenvalues();
        assert!((vals[0] - 6.0).abs() < 1e-8);
        assert!((vals[1] - 5.0).abs() < 1e-8);
    }

    #[test]
    fn recovers_both_ends_of_diagonal_matrix() {
        let op = Diag(array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let mut eigs = SymmetricEigs::new(op, 4, 6, SelectionRule::BothEnds).unwrap();
        eigs.init_random().unwrap();
        let nconv = eigs.compute(200, 1e-10).unwrap();
        assert_eq!(nconv, 4);
        let mut vals = eigs.eigenvalues();
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((vals[0] - 1.0).abs() < 1e-6);
        assert!((vals[1] - 2.0).abs() < 1e-6);
        assert!((vals[2] - 6.0).abs() < 1e-6);
        assert!((vals[3] - 7.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_out_of_range_k() {
        let op = Diag(array![1.0, 2.0, 3.0]);
        assert!(SymmetricEigs::new(op, 3, 3, SelectionRule::LargestMagn).is_err());
    }
}
