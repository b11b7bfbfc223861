//! End-to-end scenarios exercising the public engines against small, exactly-known spectra.

use approx::{abs_diff_eq, relative_eq};
use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::StandardNormal;

use arnoldi::dense_eigen;
use arnoldi::qr::DoubleShiftQR;
use arnoldi::reference_ops::{DenseMatProd, DenseRealShiftSolve};
use arnoldi::{GeneralEigs, SelectionRule, SymmetricEigs, SymmetricShiftInvert};

fn diag(vals: &[f64]) -> Array2<f64> {
    let n = vals.len();
    let mut a = Array2::zeros((n, n));
    for i in 0..n {
        a[(i, i)] = vals[i];
    }
    a
}

fn uniform_init(n: usize) -> Array1<f64> {
    Array1::from_elem(n, 1.0 / (n as f64).sqrt())
}

/// S1: `diag(1..10)`, `LargestMagn`, `k=3` -> `{10, 9, 8}`.
#[test]
fn s1_symmetric_largest_three_of_diag_one_to_ten() {
    let vals: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let a = diag(&vals);
    let op = DenseMatProd::new(a);
    let mut eigs = SymmetricEigs::new(&op, 3, 6, SelectionRule::LargestMagn).unwrap();
    eigs.init(uniform_init(10).view()).unwrap();
    let nconv = eigs.compute(200, 1e-10).unwrap();
    assert_eq!(nconv, 3);
    let got = eigs.eigenvalues();
    assert!(abs_diff_eq!(got[0], 10.0, epsilon = 1e-8));
    assert!(abs_diff_eq!(got[1], 9.0, epsilon = 1e-8));
    assert!(abs_diff_eq!(got[2], 8.0, epsilon = 1e-8));

    // Eigenvectors are the coordinate basis vectors (up to sign).
    let vecs = eigs.eigenvectors();
    for (col, &expect_idx) in [9usize, 8, 7].iter().enumerate() {
        let v = vecs.column(col);
        assert!(abs_diff_eq!(v[expect_idx].abs(), 1.0, epsilon = 1e-6));
    }
}

/// S2: `diag(1..10)`, `BothEnds`, `k=4` -> `{10, 9, 1, 2}`.
#[test]
fn s2_symmetric_both_ends_of_diag_one_to_ten() {
    let vals: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let a = diag(&vals);
    let op = DenseMatProd::new(a);
    let mut eigs = SymmetricEigs::new(&op, 4, 8, SelectionRule::BothEnds).unwrap();
    eigs.init(uniform_init(10).view()).unwrap();
    let nconv = eigs.compute(200, 1e-10).unwrap();
    assert_eq!(nconv, 4);
    let got = eigs.eigenvalues();
    // sort_final_by_descending_magnitude reorders by |value|, so 10,9 come before 2,1.
    let mut sorted = got.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert!(abs_diff_eq!(sorted[0], 10.0, epsilon = 1e-8));
    assert!(abs_diff_eq!(sorted[1], 9.0, epsilon = 1e-8));
    assert!(abs_diff_eq!(sorted[2], 2.0, epsilon = 1e-8));
    assert!(abs_diff_eq!(sorted[3], 1.0, epsilon = 1e-8));
}

/// S3: `A = AᵀA` for a fixed 100x100 i.i.d. standard-normal matrix (seeded); `k=10`, `m=30`.
#[test]
fn s3_symmetric_largest_ten_of_random_gram_matrix() {
    let n = 100;
    let mut rng = StdRng::seed_from_u64(42);
    let g = Array2::<f64>::random_using((n, n), StandardNormal, &mut rng);
    let a = g.t().dot(&g);
    let op = DenseMatProd::new(a);
    let mut eigs = SymmetricEigs::new(&op, 10, 30, SelectionRule::LargestMagn).unwrap();
    eigs.init(uniform_init(n).view()).unwrap();
    let nconv = eigs.compute(500, 1e-8).unwrap();
    assert_eq!(nconv, 10);
}

/// S4: general engine on the (non-symmetric) seeded 100x100 matrix `g` itself; agrees with a
/// direct dense eigendecomposition of the same small projected comparison set to `1e-8`.
#[test]
fn s4_general_largest_six_of_random_matrix_matches_dense() {
    let n = 100;
    let mut rng = StdRng::seed_from_u64(42);
    let g = Array2::<f64>::random_using((n, n), StandardNormal, &mut rng);
    let op = DenseMatProd::new(g.clone());
    let mut eigs = GeneralEigs::new(&op, 6, 20, SelectionRule::LargestMagn).unwrap();
    eigs.init(uniform_init(n).view()).unwrap();
    let nconv = eigs.compute(500, 1e-8).unwrap();
    assert_eq!(nconv, 6);

    let (dense_vals, _) = dense_eigen::general_eigen(&g).unwrap();
    let mut dense_by_magnitude: Vec<f64> = dense_vals.iter().map(|c| c.norm()).collect();
    dense_by_magnitude.sort_by(|a, b| b.partial_cmp(a).unwrap());

    let mut got: Vec<f64> = eigs.eigenvalues().iter().map(|c| c.norm()).collect();
    got.sort_by(|a, b| b.partial_cmp(a).unwrap());
    for i in 0..6 {
        assert!(
            relative_eq!(got[i], dense_by_magnitude[i], epsilon = 1e-6),
            "index {i}: {} vs {}",
            got[i],
            dense_by_magnitude[i]
        );
    }

    // Any complex eigenvalues in the returned set appear as conjugate pairs.
    let complex_vals = eigs.eigenvalues();
    for &v in &complex_vals {
        if v.im.abs() > 1e-9 {
            let has_conjugate = complex_vals.iter().any(|&other| abs_diff_eq!(other, v.conj(), epsilon = 1e-6));
            assert!(has_conjugate, "complex eigenvalue {v} has no conjugate partner in the returned set");
        }
    }
}

/// S5: shift-invert symmetric on `diag(1..10)` with `sigma=2.5`, `k=2` -> `{2, 3}`.
#[test]
fn s5_symmetric_shift_invert_nearest_to_sigma() {
    let vals: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let a = diag(&vals);
    let mut op = DenseRealShiftSolve::new(a, 2.5).unwrap();
    let mut eigs = SymmetricShiftInvert::new(&mut op, 2.5, 2, 6, SelectionRule::LargestMagn).unwrap();
    eigs.init(uniform_init(10).view()).unwrap();
    let nconv = eigs.compute(200, 1e-9).unwrap();
    assert_eq!(nconv, 2);
    let mut got = eigs.eigenvalues();
    got.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!(abs_diff_eq!(got[0], 2.0, epsilon = 1e-6));
    assert!(abs_diff_eq!(got[1], 3.0, epsilon = 1e-6));
}

/// S6: an upper-Hessenberg `H` with exact subdiagonal zeros at positions 3 and 7; double-shift
/// QR with `(s,t)=(0.5,1.0)` must preserve both zeros (block structure respected).
#[test]
fn s6_double_shift_qr_preserves_two_block_boundaries() {
    let n = 9;
    let mut h = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        h[(i, i)] = (i + 1) as f64;
    }
    for i in 0..n - 1 {
        h[(i + 1, i)] = 1.0;
        h[(i, i + 1)] = 0.3;
    }
    h[(3, 2)] = 0.0;
    h[(7, 6)] = 0.0;

    let qr = DoubleShiftQR::compute(&h, 0.5, 1.0);
    let hq = qr.matrix_qthq();
    assert!(abs_diff_eq!(hq[(3, 2)], 0.0, epsilon = 1e-10), "block boundary at 3 should be preserved");
    assert!(abs_diff_eq!(hq[(7, 6)], 0.0, epsilon = 1e-10), "block boundary at 7 should be preserved");
}
