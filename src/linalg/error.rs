/// Failures of the matrix decompositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// A row was (numerically) zero or a pivot vanished during elimination.
    #[error("matrix is singular")]
    Singular,
    /// A diagonal term of the Cholesky factor was not strictly positive.
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
    /// A column norm vanished during orthogonalization.
    #[error("matrix columns are linearly dependent")]
    RankDeficient,
}
