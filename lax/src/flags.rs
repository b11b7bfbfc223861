//! Small enums mirroring LAPACK's character flag arguments

/// `JOBVL`/`JOBVR` flag for `*geev`: whether to compute the corresponding eigenvectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEv {
    Calc,
    Not,
}

impl JobEv {
    pub fn as_ptr(&self) -> *const i8 {
        match self {
            JobEv::Calc => b"V\0".as_ptr() as *const i8,
            JobEv::Not => b"N\0".as_ptr() as *const i8,
        }
    }

    pub fn is_calc(&self) -> bool {
        matches!(self, JobEv::Calc)
    }

    /// Evaluate `f` only when this flag requests the computation, mirroring `Option::then`.
    pub fn then<T>(self, f: impl FnOnce() -> T) -> Option<T> {
        if self.is_calc() {
            Some(f())
        } else {
            None
        }
    }
}

impl From<bool> for JobEv {
    fn from(calc: bool) -> Self {
        if calc {
            JobEv::Calc
        } else {
            JobEv::Not
        }
    }
}

/// `UPLO` flag for symmetric/Hermitian routines: which triangle is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UPLO {
    Upper,
    Lower,
}

impl UPLO {
    pub fn as_ptr(&self) -> *const i8 {
        match self {
            UPLO::Upper => b"U\0".as_ptr() as *const i8,
            UPLO::Lower => b"L\0".as_ptr() as *const i8,
        }
    }
}
