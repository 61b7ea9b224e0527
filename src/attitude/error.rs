use crate::linalg::MatrixError;
use crate::SingularQuaternion;

/// The expected outcomes of an attitude estimation call.
///
/// These are the cases a caller must check after every call. Numerically fatal
/// conditions are reported through [`EstimationError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The estimate converged after the given number of iterations.
    Converged {
        /// The iteration at which the convergence test passed, starting at `1`.
        iterations: usize,
    },
    /// The iteration budget was exhausted before the estimate converged.
    NotConverged,
    /// Fewer than two sensors carried measurements.
    InsufficientData,
}

impl Convergence {
    /// The sentinel code of [`Convergence::InsufficientData`].
    pub const INSUFFICIENT_DATA: i32 = -1;

    /// The sentinel code of [`Convergence::NotConverged`].
    pub const NOT_CONVERGED: i32 = -2;

    /// Returns the iteration count on convergence, or a negative sentinel otherwise.
    pub fn code(&self) -> i32 {
        match self {
            Convergence::Converged { iterations } => {
                i32::try_from(*iterations).unwrap_or(i32::MAX)
            }
            Convergence::NotConverged => Self::NOT_CONVERGED,
            Convergence::InsufficientData => Self::INSUFFICIENT_DATA,
        }
    }

    /// Indicates whether the estimate converged.
    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    /// Returns the iteration count on convergence.
    #[inline]
    pub fn iterations(&self) -> Option<usize> {
        match self {
            Convergence::Converged { iterations } => Some(*iterations),
            _ => None,
        }
    }
}

/// A numerically fatal condition that terminated an estimation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EstimationError {
    /// The accumulated information matrix could not be factorized.
    #[error("singular information matrix: {0}")]
    Matrix(#[from] MatrixError),
    /// The initial attitude could not be extracted from the TRIAD rotation matrix.
    #[error(transparent)]
    SingularQuaternion(#[from] SingularQuaternion),
}
