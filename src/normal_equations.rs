use crate::linalg::{Cholesky, Matrix, MatrixError, Vector};
use crate::Scalar;

/// Running normal equations `Σ Jᵀ·W·J · Δp = Σ Jᵀ·W·r` of a weighted least-squares problem
/// with `P` solve-for parameters.
///
/// Measurement sets are accumulated one block at a time. Since the errors of
/// different sets are assumed independent, the weighting of the stacked
/// problem is block diagonal and the stacked Jacobian never needs to be formed.
/// Sets may differ in their number of rows `M`.
#[derive(Debug, Clone)]
pub struct NormalEquations<const P: usize, T> {
    /// The information matrix `Σ Jᵀ·W·J`.
    information: Matrix<P, P, T>,
    /// The information vector `Σ Jᵀ·W·r`.
    information_vector: Vector<P, T>,
    /// The factor of the information matrix, if solved since the last change.
    factor: Option<Cholesky<P, T>>,
}

impl<const P: usize, T> NormalEquations<P, T>
where
    T: Scalar,
{
    /// Initializes empty normal equations.
    pub fn new() -> Self {
        Self {
            information: Matrix::zeros(),
            information_vector: Vector::zeros(),
            factor: None,
        }
    }

    /// Zeros the running sums.
    pub fn reset(&mut self) {
        self.information = Matrix::zeros();
        self.information_vector = Vector::zeros();
        self.factor = None;
    }

    /// Adds an unweighted measurement set.
    ///
    /// ## Arguments
    /// * `jacobian` - The partial derivatives of the `M` predicted values with respect to the parameters.
    /// * `residual` - The observed minus the predicted values.
    pub fn accumulate<const M: usize>(
        &mut self,
        jacobian: &Matrix<M, P, T>,
        residual: &Vector<M, T>,
    ) {
        let jacobian_t = jacobian.transpose();
        self.add(&(jacobian_t * *jacobian), &(jacobian_t * *residual));
    }

    /// Adds a measurement set with weighting matrix `weight`, typically the
    /// inverse of the measurement covariance.
    ///
    /// ## Arguments
    /// * `jacobian` - The partial derivatives of the `M` predicted values with respect to the parameters.
    /// * `weight` - The symmetric weighting matrix of the set.
    /// * `residual` - The observed minus the predicted values.
    pub fn accumulate_weighted<const M: usize>(
        &mut self,
        jacobian: &Matrix<M, P, T>,
        weight: &Matrix<M, M, T>,
        residual: &Vector<M, T>,
    ) {
        let weighted_t = jacobian.transpose() * *weight;
        self.add(&(weighted_t * *jacobian), &(weighted_t * *residual));
    }

    fn add(&mut self, information: &Matrix<P, P, T>, information_vector: &Vector<P, T>) {
        self.information = self.information + *information;
        self.information_vector += *information_vector;
        self.factor = None;
    }

    /// Returns the information matrix `Σ Jᵀ·W·J`.
    #[inline]
    pub fn information_matrix(&self) -> &Matrix<P, P, T> {
        &self.information
    }

    /// Returns the information vector `Σ Jᵀ·W·r`.
    #[inline]
    pub fn information_vector(&self) -> &Vector<P, T> {
        &self.information_vector
    }

    /// Solves the normal equations for the parameter update.
    ///
    /// ## Errors
    /// Returns [`MatrixError::NotPositiveDefinite`] if nothing has been accumulated
    /// yet or the accumulated sets do not determine all parameters.
    pub fn solve(&mut self) -> Result<Vector<P, T>, MatrixError> {
        let factor = match self.factor {
            Some(factor) => factor,
            None => {
                let factor = self.information.cholesky()?;
                self.factor = Some(factor);
                factor
            }
        };
        Ok(factor.solve(&self.information_vector))
    }

    /// Returns the parameter covariance, i.e. the inverse information matrix.
    ///
    /// Only available after a successful [`solve`](Self::solve) with no accumulation since.
    pub fn covariance(&self) -> Option<Matrix<P, P, T>> {
        self.factor.as_ref().map(Cholesky::invert)
    }
}

impl<const P: usize, T> Default for NormalEquations<P, T>
where
    T: Scalar,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
