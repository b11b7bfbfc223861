//! Error type for the Krylov restart engines

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{what}: {value} (expected {constraint})")]
    InvalidParameter {
        what: &'static str,
        value: i64,
        constraint: &'static str,
    },

    #[error("selection rule {rule:?} is not valid for the {engine} engine")]
    InvalidSelectionRule {
        rule: crate::selection::SelectionRule,
        engine: &'static str,
    },

    #[error("operator is not square: rows() = {rows}, cols() = {cols}")]
    NonSquareOperator { rows: usize, cols: usize },

    #[error("initial vector has length {got}, expected {expected}")]
    InitVectorLengthMismatch { got: usize, expected: usize },

    #[error("dense eigendecomposition of the projected matrix failed: {0}")]
    DenseEigenFailed(#[from] lax::Error),
}
