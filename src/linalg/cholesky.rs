use crate::linalg::{Matrix, MatrixError, Vector};
use crate::Scalar;

/// The lower triangular Cholesky factor `L` of a symmetric positive definite
/// matrix `A = L·Lᵀ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cholesky<const N: usize, T> {
    lower: Matrix<N, N, T>,
}

impl<const N: usize, T> Cholesky<N, T>
where
    T: Scalar,
{
    /// Factorizes `matrix` in place and returns a copy of the factor.
    pub(crate) fn decompose_in_place(matrix: &mut Matrix<N, N, T>) -> Result<Self, MatrixError> {
        for j in 0..N {
            let mut diagonal = matrix.get(j, j);
            for k in 0..j {
                diagonal = diagonal - matrix.get(j, k) * matrix.get(j, k);
            }

            if diagonal <= T::SINGULAR {
                return Err(MatrixError::NotPositiveDefinite);
            }

            let diagonal = diagonal.sqrt();
            matrix.put(j, j, diagonal);

            for i in (j + 1)..N {
                let mut sum = matrix.get(i, j);
                for k in 0..j {
                    sum = sum - matrix.get(i, k) * matrix.get(j, k);
                }
                matrix.put(i, j, sum / diagonal);
            }
        }

        for i in 0..N {
            for j in (i + 1)..N {
                matrix.put(i, j, T::zero());
            }
        }

        Ok(Self { lower: *matrix })
    }

    /// Returns the lower triangular factor `L`.
    #[inline]
    pub fn lower(&self) -> &Matrix<N, N, T> {
        &self.lower
    }

    /// Solves `A · x = y` by forward substitution with `L` and back substitution with `Lᵀ`.
    pub fn solve(&self, y: &Vector<N, T>) -> Vector<N, T> {
        let l = &self.lower;
        let mut x = *y;

        for i in 0..N {
            let mut sum = x[i];
            for k in 0..i {
                sum = sum - l.get(i, k) * x[k];
            }
            x[i] = sum / l.get(i, i);
        }

        for i in (0..N).rev() {
            let mut sum = x[i];
            for k in (i + 1)..N {
                sum = sum - l.get(k, i) * x[k];
            }
            x[i] = sum / l.get(i, i);
        }

        x
    }

    /// Calculates the inverse of the decomposed matrix.
    pub fn invert(&self) -> Matrix<N, N, T> {
        let mut inverse = Matrix::zeros();
        for col in 0..N {
            inverse.set_column(col, &self.solve(&Vector::unit(col)));
        }
        inverse
    }

    /// Calculates the determinant of the decomposed matrix.
    pub fn determinant(&self) -> T {
        (0..N).fold(T::one(), |product, i| {
            let diagonal = self.lower.get(i, i);
            product * diagonal * diagonal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spd_3x3() -> Matrix<3, 3, f64> {
        Matrix::from_rows([[4.0, 12.0, -16.0], [12.0, 37.0, -43.0], [-16.0, -43.0, 98.0]])
    }

    #[test]
    fn test_known_factor() {
        let cholesky = spd_3x3().cholesky().unwrap();
        let expected = Matrix::from_rows([[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]]);
        assert!(cholesky.lower().max_abs_diff(&expected) < 1e-12);
        assert_relative_eq!(cholesky.determinant(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_and_invert() {
        let a = spd_3x3();
        let cholesky = a.cholesky().unwrap();

        let x = Vector::from_array([1.0, 2.0, -0.5]);
        let solved = cholesky.solve(&(a * x));
        for i in 0..3 {
            assert_relative_eq!(solved[i], x[i], epsilon = 1e-9);
        }

        let inverse = cholesky.invert();
        assert!((a * inverse).max_abs_diff(&Matrix::identity()) < 1e-9);
        assert!(inverse.is_symmetric(1e-9));
    }

    #[test]
    fn test_in_place_factor() {
        let mut a = spd_3x3();
        let cholesky = a.factorize_cholesky().unwrap();
        assert_eq!(&a, cholesky.lower());
        assert_eq!(a.get(0, 2), 0.0);
    }

    #[test]
    fn test_not_positive_definite() {
        let indefinite = Matrix::from_rows([[1.0_f64, 2.0], [2.0, 1.0]]);
        assert_eq!(indefinite.cholesky(), Err(MatrixError::NotPositiveDefinite));

        let zero = Matrix::<4, 4, f64>::zeros();
        assert_eq!(zero.cholesky(), Err(MatrixError::NotPositiveDefinite));
    }
}
