//! Selection rules: the total order used to decide which Ritz values are "wanted"

use num_complex::Complex;
use num_traits::Float;

use crate::error::{Error, Result};

/// Which Ritz values the engine should keep across restarts.
///
/// `LargestAlge`, `SmallestAlge`, and `BothEnds` are valid only for the symmetric engine
/// (where Ritz values are real and an algebraic order is meaningful); `LargestReal`,
/// `SmallestReal`, `LargestImag`, `SmallestImag` are valid only for the general engine.
/// `LargestMagn` and `SmallestMagn` are valid for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionRule {
    LargestMagn,
    LargestReal,
    LargestImag,
    LargestAlge,
    SmallestMagn,
    SmallestReal,
    SmallestImag,
    SmallestAlge,
    BothEnds,
}

impl SelectionRule {
    pub fn validate_for_symmetric(self) -> Result<()> {
        use SelectionRule::*;
        match self {
            LargestMagn | SmallestMagn | LargestAlge | SmallestAlge | BothEnds => Ok(()),
            _ => Err(Error::InvalidSelectionRule {
                rule: self,
                engine: "symmetric",
            }),
        }
    }

    pub fn validate_for_general(self) -> Result<()> {
        use SelectionRule::*;
        match self {
            LargestMagn | SmallestMagn | LargestReal | SmallestReal | LargestImag | SmallestImag => Ok(()),
            _ => Err(Error::InvalidSelectionRule {
                rule: self,
                engine: "general",
            }),
        }
    }

    /// Key such that a larger key means "more wanted"; used to sort real Ritz values.
    /// Not defined (and not called) for the rules valid only on the general engine.
    fn real_key<R: Float>(self, v: R) -> R {
        use SelectionRule::*;
        match self {
            LargestMagn => v.abs(),
            SmallestMagn => -v.abs(),
            LargestAlge | BothEnds => v,
            SmallestAlge => -v,
            LargestReal | SmallestReal | LargestImag | SmallestImag => {
                unreachable!("selection rule validated against engine before use")
            }
        }
    }

    /// Key such that a larger key means "more wanted"; used to sort complex Ritz values.
    /// Not defined (and not called) for the rules valid only on the symmetric engine.
    fn complex_key<R: Float>(self, v: Complex<R>) -> R {
        use SelectionRule::*;
        match self {
            LargestMagn => v.norm(),
            SmallestMagn => -v.norm(),
            LargestReal => v.re,
            SmallestReal => -v.re,
            LargestImag => v.im.abs(),
            SmallestImag => -v.im.abs(),
            LargestAlge | SmallestAlge | BothEnds => {
                unreachable!("selection rule validated against engine before use")
            }
        }
    }

    /// Indices `0..values.len()` sorted "most wanted first".
    ///
    /// For `BothEnds` this returns the plain `LargestAlge` (descending) order; callers must
    /// pass the result through [`select_both_ends`] to get the actual wanted set.
    pub fn sort_indices_real<R: Float>(self, values: &[R]) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..values.len()).collect();
        idx.sort_by(|&a, &b| {
            self.real_key(values[b])
                .partial_cmp(&self.real_key(values[a]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        idx
    }

    /// Indices `0..values.len()` sorted "most wanted first" for complex Ritz values.
    pub fn sort_indices_complex<R: Float>(self, values: &[Complex<R>]) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..values.len()).collect();
        idx.sort_by(|&a, &b| {
            self.complex_key(values[b])
                .partial_cmp(&self.complex_key(values[a]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        idx
    }
}

/// Carve the `BothEnds` wanted set out of a full `LargestAlge`-descending index order:
/// `ceil(k/2)` indices from the top, `floor(k/2)` from the bottom (smallest-first among
/// those), concatenated top-block-then-bottom-block.
pub fn select_both_ends(descending: &[usize], k: usize) -> Vec<usize> {
    let top_count = (k + 1) / 2;
    let bottom_count = k / 2;
    let m = descending.len();
    let mut wanted = Vec::with_capacity(k);
    wanted.extend_from_slice(&descending[..top_count]);
    wanted.extend(descending[m - bottom_count..].iter().rev().copied());
    wanted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_magn_real() {
        let vals = [3.0, -5.0, 1.0, 4.0];
        let idx = SelectionRule::LargestMagn.sort_indices_real(&vals);
        assert_eq!(idx, vec![1, 3, 0, 2]);
    }

    #[test]
    fn both_ends_carve() {
        // values already in LargestAlge-descending order: 10,9,...,1
        let descending: Vec<usize> = (0..10).collect(); // index i represents value (10 - i)
        let wanted = select_both_ends(&descending, 4);
        // top 2 indices (value 10, 9) then bottom 2 reversed (value 1, 2)
        assert_eq!(wanted, vec![0, 1, 9, 8]);
    }

    #[test]
    fn both_ends_odd_k_extra_goes_to_top() {
        let descending: Vec<usize> = (0..10).collect();
        let wanted = select_both_ends(&descending, 5);
        assert_eq!(wanted, vec![0, 1, 2, 9, 8]);
    }

    #[test]
    fn invalid_rule_for_symmetric_engine() {
        assert!(SelectionRule::LargestReal.validate_for_symmetric().is_err());
        assert!(SelectionRule::LargestMagn.validate_for_symmetric().is_ok());
    }

    #[test]
    fn invalid_rule_for_general_engine() {
        assert!(SelectionRule::BothEnds.validate_for_general().is_err());
        assert!(SelectionRule::LargestReal.validate_for_general().is_ok());
    }
}
