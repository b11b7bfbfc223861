//! Shifted-QR primitives used to perform implicit restarts on an upper-Hessenberg matrix.

pub mod double_shift;
pub mod hessenberg;

pub use double_shift::DoubleShiftQR;
pub use hessenberg::{TridiagonalQR, UpperHessenbergQR};
