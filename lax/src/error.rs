//! Error type returned by the scalar LAPACK bindings

use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Error from a LAPACK `info < 0` return, meaning one of the arguments had an illegal value.
    #[error("LAPACK: invalid value at argument {return_code}")]
    LapackInvalidValue { return_code: i32 },

    /// Error from a LAPACK `info > 0` return, meaning the algorithm failed to converge.
    #[error("LAPACK computational failure: return_code = {return_code}")]
    LapackComputationalFailure { return_code: i32 },

    /// The requested matrix shape is invalid for the routine being called.
    #[error("Invalid shape: {0}")]
    InvalidShape(&'static str),
}

/// Convert a raw LAPACK `info` output into a `Result`
pub trait AsLapackResult {
    fn as_lapack_result(self) -> Result<()>;
}

impl AsLapackResult for i32 {
    fn as_lapack_result(self) -> Result<()> {
        if self == 0 {
            Ok(())
        } else if self < 0 {
            Err(Error::LapackInvalidValue { return_code: self })
        } else {
            Err(Error::LapackComputationalFailure { return_code: self })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_ok() {
        assert!(0i32.as_lapack_result().is_ok());
    }

    #[test]
    fn negative_is_invalid_value() {
        assert_eq!(
            (-3i32).as_lapack_result(),
            Err(Error::LapackInvalidValue { return_code: -3 })
        );
    }

    #[test]
    fn positive_is_computational_failure() {
        assert_eq!(
            2i32.as_lapack_result(),
            Err(Error::LapackComputationalFailure { return_code: 2 })
        );
    }
}
