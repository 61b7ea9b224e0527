use crate::linalg::{Matrix, MatrixError, Vector};
use crate::Scalar;

/// A thin QR factorization `A = Q·R` of an `R×C` matrix with `R ≥ C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qr<const R: usize, const C: usize, T> {
    q: Matrix<R, C, T>,
    r: Matrix<C, C, T>,
}

impl<const R: usize, const C: usize, T> Qr<R, C, T>
where
    T: Scalar,
{
    /// Factorizes `matrix` by modified Gram-Schmidt orthogonalization.
    pub(crate) fn decompose(matrix: &Matrix<R, C, T>) -> Result<Self, MatrixError> {
        assert!(R >= C, "QR factorization requires at least as many rows as columns");

        let mut q = *matrix;
        let mut r = Matrix::<C, C, T>::zeros();

        for k in 0..C {
            let norm = q.column(k).norm();
            if norm < T::SINGULAR {
                return Err(MatrixError::RankDeficient);
            }

            r.put(k, k, norm);
            let basis = q.column(k).scale(norm.recip());
            q.set_column(k, &basis);

            for j in (k + 1)..C {
                let column = q.column(j);
                let projection = basis.dot(&column);
                r.put(k, j, projection);
                q.set_column(j, &(column - basis * projection));
            }
        }

        Ok(Self { q, r })
    }

    /// Returns the factor with orthonormal columns.
    #[inline]
    pub fn q(&self) -> &Matrix<R, C, T> {
        &self.q
    }

    /// Returns the upper triangular factor.
    #[inline]
    pub fn r(&self) -> &Matrix<C, C, T> {
        &self.r
    }

    /// Solves the least-squares problem `min ‖A·x - y‖` via `R·x = Qᵀ·y`.
    pub fn solve(&self, y: &Vector<R, T>) -> Vector<C, T> {
        let mut x = self.q.transpose() * *y;
        for i in (0..C).rev() {
            let mut sum = x[i];
            for k in (i + 1)..C {
                sum = sum - self.r.get(i, k) * x[k];
            }
            x[i] = sum / self.r.get(i, i);
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tall() -> Matrix<4, 3, f64> {
        Matrix::from_rows([
            [1.0, -1.0, 4.0],
            [1.0, 4.0, -2.0],
            [1.0, 4.0, 2.0],
            [1.0, -1.0, 0.0],
        ])
    }

    #[test]
    fn test_factors() {
        let a = tall();
        let qr = a.qr().unwrap();

        let qtq = qr.q().transpose() * *qr.q();
        assert!(qtq.max_abs_diff(&Matrix::identity()) < 1e-12);

        for i in 0..3 {
            for j in 0..i {
                assert_eq!(qr.r().get(i, j), 0.0);
            }
            assert!(qr.r().get(i, i) > 0.0);
        }

        assert!((*qr.q() * *qr.r()).max_abs_diff(&a) < 1e-12);
    }

    #[test]
    fn test_least_squares() {
        let a = tall();
        let x = Vector::from_array([0.5, -1.0, 2.0]);
        let solved = a.qr().unwrap().solve(&(a * x));
        for i in 0..3 {
            assert_relative_eq!(solved[i], x[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rank_deficient() {
        let a = Matrix::from_rows([[2.0_f64, 6.0], [0.0, 0.0], [0.0, 0.0]]);
        assert_eq!(a.qr(), Err(MatrixError::RankDeficient));

        let a = Matrix::from_rows([[1.0_f64, 0.0], [2.0, 0.0], [3.0, 0.0]]);
        assert_eq!(a.qr(), Err(MatrixError::RankDeficient));
    }

    #[test]
    #[should_panic]
    fn test_wide_matrix_panics() {
        let a = Matrix::<2, 3, f64>::zeros();
        let _ = a.qr();
    }
}
