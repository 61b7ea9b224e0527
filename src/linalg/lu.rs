use crate::linalg::{Matrix, MatrixError, Vector};
use crate::Scalar;

/// A Crout LU decomposition with implicit partial pivoting.
///
/// Rows are never physically swapped; the pivot sequence is recorded in
/// [`Lu::row_order`] instead. Logical row `i` of the factors lives in
/// storage row `row_order()[i]`. The lower factor has an implied unit
/// diagonal, the upper factor includes the diagonal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lu<const N: usize, T> {
    factors: Matrix<N, N, T>,
    order: [usize; N],
    even_permutation: bool,
}

impl<const N: usize, T> Lu<N, T>
where
    T: Scalar,
{
    /// Factorizes `matrix` in place and returns a copy of the factors.
    pub(crate) fn decompose_in_place(matrix: &mut Matrix<N, N, T>) -> Result<Self, MatrixError> {
        let mut order: [usize; N] = core::array::from_fn(|index| index);
        let mut even_permutation = true;

        // Implicit row scaling, so that pivot selection is not biased by row magnitudes.
        let mut scale = [T::zero(); N];
        for (row, row_scale) in scale.iter_mut().enumerate() {
            let largest = (0..N)
                .map(|col| matrix.get(row, col).abs())
                .fold(T::zero(), T::max);
            if largest < T::SINGULAR {
                return Err(MatrixError::Singular);
            }
            *row_scale = largest.recip();
        }

        for col in 0..N {
            // Upper factor above the diagonal.
            for i in 0..col {
                let row = order[i];
                let mut sum = matrix.get(row, col);
                for k in 0..i {
                    sum = sum - matrix.get(row, k) * matrix.get(order[k], col);
                }
                matrix.put(row, col, sum);
            }

            // Diagonal and lower factor, searching for the largest scaled pivot.
            let mut largest = T::zero();
            let mut pivot = col;
            for i in col..N {
                let row = order[i];
                let mut sum = matrix.get(row, col);
                for k in 0..col {
                    sum = sum - matrix.get(row, k) * matrix.get(order[k], col);
                }
                matrix.put(row, col, sum);

                let merit = scale[row] * sum.abs();
                if merit > largest {
                    largest = merit;
                    pivot = i;
                }
            }

            if pivot != col {
                order.swap(pivot, col);
                even_permutation = !even_permutation;
            }

            let diagonal = matrix.get(order[col], col);
            if diagonal.abs() < T::SINGULAR {
                return Err(MatrixError::Singular);
            }

            for &row in &order[col + 1..] {
                matrix.put(row, col, matrix.get(row, col) / diagonal);
            }
        }

        Ok(Self {
            factors: *matrix,
            order,
            even_permutation,
        })
    }

    /// Returns the packed factors in storage row order.
    #[inline]
    pub fn factors(&self) -> &Matrix<N, N, T> {
        &self.factors
    }

    /// Returns the storage row of each logical row of the factors.
    #[inline]
    pub fn row_order(&self) -> &[usize; N] {
        &self.order
    }

    /// Solves `A · x = y` by forward and back substitution.
    pub fn solve(&self, y: &Vector<N, T>) -> Vector<N, T> {
        let lu = &self.factors;
        let mut x = Vector::<N, T>::zeros();

        for i in 0..N {
            let row = self.order[i];
            let mut sum = y[row];
            for k in 0..i {
                sum = sum - lu.get(row, k) * x[k];
            }
            x[i] = sum;
        }

        for i in (0..N).rev() {
            let row = self.order[i];
            let mut sum = x[i];
            for k in (i + 1)..N {
                sum = sum - lu.get(row, k) * x[k];
            }
            x[i] = sum / lu.get(row, i);
        }

        x
    }

    /// Calculates the inverse of the decomposed matrix by solving for each unit basis vector.
    pub fn invert(&self) -> Matrix<N, N, T> {
        let mut inverse = Matrix::zeros();
        for col in 0..N {
            inverse.set_column(col, &self.solve(&Vector::unit(col)));
        }
        inverse
    }

    /// Calculates the determinant of the decomposed matrix.
    pub fn determinant(&self) -> T {
        let product = (0..N).fold(T::one(), |product, i| {
            product * self.factors.get(self.order[i], i)
        });
        if self.even_permutation {
            product
        } else {
            -product
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_4x4() -> Matrix<4, 4, f64> {
        Matrix::from_rows([
            [0.0, 2.0, 1.0, -1.0],
            [3.0, -1.0, 0.5, 2.0],
            [1.0e-3, 4.0, -2.0, 1.0],
            [2.0, 0.0, 3.0, 1.0],
        ])
    }

    #[test]
    fn test_solve_requires_pivoting() {
        // The leading zero forces a pivot away from the first row.
        let a = sample_4x4();
        let x = Vector::from_array([1.0, -1.0, 2.0, 0.5]);
        let y = a * x;

        let lu = a.lu().unwrap();
        assert_ne!(lu.row_order()[0], 0);

        let solved = lu.solve(&y);
        for i in 0..4 {
            assert_relative_eq!(solved[i], x[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invert() {
        let a = sample_4x4();
        let inverse = a.lu().unwrap().invert();
        assert!((a * inverse).max_abs_diff(&Matrix::identity()) < 1e-12);
    }

    #[test]
    fn test_determinant_matches_cofactors() {
        let a = Matrix::from_rows([[0.0_f64, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 9.0]]);
        let lu = a.lu().unwrap();
        assert_relative_eq!(lu.determinant(), a.determinant(), epsilon = 1e-12);
        assert_relative_eq!(lu.determinant(), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_row_is_singular() {
        let a = Matrix::from_rows([[1.0_f64, 2.0, 3.0], [0.0, 0.0, 0.0], [4.0, 5.0, 6.0]]);
        assert_eq!(a.lu(), Err(MatrixError::Singular));
    }

    #[test]
    fn test_dependent_rows_are_singular() {
        let a = Matrix::from_rows([[1.0_f64, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert_eq!(a.lu(), Err(MatrixError::Singular));
    }
}
