use crate::linalg::{Cholesky, Lu, MatrixError, Qr, Vector};
use crate::Scalar;
use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

/// A dense `R×C` matrix stored row-major on the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize, T> {
    data: [[T; C]; R],
}

impl<const R: usize, const C: usize, T> Matrix<R, C, T> {
    /// Initializes a new [`Matrix`] from its rows.
    #[inline(always)]
    pub const fn from_rows(rows: [[T; C]; R]) -> Self {
        Self { data: rows }
    }

    /// Returns the number of rows.
    #[inline(always)]
    pub const fn rows(&self) -> usize {
        R
    }

    /// Returns the number of columns.
    #[inline(always)]
    pub const fn cols(&self) -> usize {
        C
    }

    /// Returns the rows.
    #[inline(always)]
    pub const fn as_rows(&self) -> &[[T; C]; R] {
        &self.data
    }
}

impl<const R: usize, const C: usize, T> Matrix<R, C, T>
where
    T: Scalar,
{
    /// Returns a matrix of zeros.
    #[inline]
    pub fn zeros() -> Self {
        Self {
            data: [[T::zero(); C]; R],
        }
    }

    /// Gets the element at the specified row and column.
    ///
    /// ## Panics
    /// Panics if the indexes are out of range.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row][col]
    }

    /// Sets the element at the specified row and column.
    ///
    /// ## Panics
    /// Panics if the indexes are out of range.
    #[inline(always)]
    pub fn put(&mut self, row: usize, col: usize, value: T) {
        self.data[row][col] = value;
    }

    /// Extracts a row.
    pub fn row(&self, row: usize) -> Vector<C, T> {
        Vector::from_array(self.data[row])
    }

    /// Extracts a column.
    pub fn column(&self, col: usize) -> Vector<R, T> {
        Vector::from_array(core::array::from_fn(|row| self.data[row][col]))
    }

    /// Overwrites a row.
    pub fn set_row(&mut self, row: usize, values: &Vector<C, T>) {
        self.data[row] = *values.as_array();
    }

    /// Overwrites a column.
    pub fn set_column(&mut self, col: usize, values: &Vector<R, T>) {
        for (row, value) in values.iter().enumerate() {
            self.data[row][col] = *value;
        }
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Matrix<C, R, T> {
        Matrix::from_rows(core::array::from_fn(|row| {
            core::array::from_fn(|col| self.data[col][row])
        }))
    }

    /// Multiplies every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        Self {
            data: self.data.map(|row| row.map(|value| value * factor)),
        }
    }

    /// Returns the largest absolute difference between corresponding elements.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        let mut largest = T::zero();
        for (lhs, rhs) in self.data.iter().zip(other.data.iter()) {
            for (&a, &b) in lhs.iter().zip(rhs.iter()) {
                largest = largest.max((a - b).abs());
            }
        }
        largest
    }

    /// Indicates whether all elements are finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|value| value.is_finite())
    }

    /// Computes the thin QR factorization by modified Gram-Schmidt orthogonalization.
    ///
    /// Requires at least as many rows as columns. The result holds an `R×C`
    /// matrix with orthonormal columns and a `C×C` upper triangular matrix.
    ///
    /// ## Errors
    /// Returns [`MatrixError::RankDeficient`] if the columns are linearly dependent.
    ///
    /// ## Panics
    /// Panics if the matrix has fewer rows than columns.
    pub fn qr(&self) -> Result<Qr<R, C, T>, MatrixError> {
        Qr::decompose(self)
    }
}

impl<const N: usize, T> Matrix<N, N, T>
where
    T: Scalar,
{
    /// Returns the identity matrix.
    pub fn identity() -> Self {
        let mut matrix = Self::zeros();
        for index in 0..N {
            matrix.data[index][index] = T::one();
        }
        matrix
    }

    /// Builds a diagonal matrix.
    pub fn from_diagonal(diagonal: [T; N]) -> Self {
        let mut matrix = Self::zeros();
        for (index, value) in diagonal.into_iter().enumerate() {
            matrix.data[index][index] = value;
        }
        matrix
    }

    /// Returns the diagonal elements.
    pub fn diagonal(&self) -> Vector<N, T> {
        Vector::from_array(core::array::from_fn(|index| self.data[index][index]))
    }

    /// Returns the sum of the diagonal elements.
    pub fn trace(&self) -> T {
        (0..N).fold(T::zero(), |sum, index| sum + self.data[index][index])
    }

    /// Indicates whether the matrix equals its transpose within `tolerance`.
    pub fn is_symmetric(&self, tolerance: T) -> bool {
        self.max_abs_diff(&self.transpose()) <= tolerance
    }

    /// Calculates the determinant.
    ///
    /// Matrices up to 3×3 use the cofactor expansion. Larger matrices are
    /// eliminated on a copy; the matrix itself is left untouched.
    pub fn determinant(&self) -> T {
        match N {
            0 => T::one(),
            1 => self.get(0, 0),
            2 => self.get(0, 0) * self.get(1, 1) - self.get(0, 1) * self.get(1, 0),
            3 => {
                self.get(0, 0) * (self.get(1, 1) * self.get(2, 2) - self.get(1, 2) * self.get(2, 1))
                    - self.get(0, 1)
                        * (self.get(1, 0) * self.get(2, 2) - self.get(1, 2) * self.get(2, 0))
                    + self.get(0, 2)
                        * (self.get(1, 0) * self.get(2, 1) - self.get(1, 1) * self.get(2, 0))
            }
            _ => self.lu().map_or(T::zero(), |lu| lu.determinant()),
        }
    }

    /// Calculates the inverse.
    ///
    /// 1×1 and 2×2 matrices are inverted in closed form, everything else by
    /// solving the LU decomposition for each unit basis vector.
    ///
    /// ## Errors
    /// Returns [`MatrixError::Singular`] if the matrix cannot be inverted.
    pub fn invert(&self) -> Result<Self, MatrixError> {
        match N {
            1 => {
                let value = self.get(0, 0);
                if value.is_negligible() {
                    return Err(MatrixError::Singular);
                }

                let mut inverse = *self;
                inverse.put(0, 0, value.recip());
                Ok(inverse)
            }
            2 => {
                let det = self.determinant();
                if det.is_negligible() {
                    return Err(MatrixError::Singular);
                }

                let det_inv = det.recip();
                let mut inverse = *self;
                inverse.put(0, 0, self.get(1, 1) * det_inv);
                inverse.put(0, 1, -self.get(0, 1) * det_inv);
                inverse.put(1, 0, -self.get(1, 0) * det_inv);
                inverse.put(1, 1, self.get(0, 0) * det_inv);
                Ok(inverse)
            }
            _ => Ok(self.lu()?.invert()),
        }
    }

    /// Solves `self · x = y` for `x` using an LU decomposition of a copy.
    ///
    /// ## Errors
    /// Returns [`MatrixError::Singular`] if the matrix is singular.
    pub fn solve(&self, y: &Vector<N, T>) -> Result<Vector<N, T>, MatrixError> {
        Ok(self.lu()?.solve(y))
    }

    /// Decomposes a copy of the matrix into its Crout LU factors.
    ///
    /// ## Errors
    /// Returns [`MatrixError::Singular`] if a row is (numerically) zero or a pivot vanishes.
    pub fn lu(&self) -> Result<Lu<N, T>, MatrixError> {
        let mut copy = *self;
        copy.factorize_lu()
    }

    /// Decomposes the matrix into its Crout LU factors in place.
    ///
    /// On success the matrix holds the packed factors (unit lower triangle
    /// implied, upper triangle including the diagonal), rows in pivot order as
    /// given by [`Lu::row_order`]. Its original values are lost. On failure the
    /// contents are unspecified.
    ///
    /// ## Errors
    /// Returns [`MatrixError::Singular`] if a row is (numerically) zero or a pivot vanishes.
    pub fn factorize_lu(&mut self) -> Result<Lu<N, T>, MatrixError> {
        Lu::decompose_in_place(self)
    }

    /// Decomposes a copy of the symmetric positive definite matrix into its
    /// lower triangular Cholesky factor.
    ///
    /// Only the lower triangle is read.
    ///
    /// ## Errors
    /// Returns [`MatrixError::NotPositiveDefinite`] if the matrix is not positive definite.
    pub fn cholesky(&self) -> Result<Cholesky<N, T>, MatrixError> {
        let mut copy = *self;
        copy.factorize_cholesky()
    }

    /// Decomposes the symmetric positive definite matrix into its lower
    /// triangular Cholesky factor in place.
    ///
    /// On success the matrix holds the factor `L` with a zeroed upper triangle.
    /// Its original values are lost. On failure the contents are unspecified.
    ///
    /// ## Errors
    /// Returns [`MatrixError::NotPositiveDefinite`] if the matrix is not positive definite.
    pub fn factorize_cholesky(&mut self) -> Result<Cholesky<N, T>, MatrixError> {
        Cholesky::decompose_in_place(self)
    }
}

impl<const R: usize, const C: usize, T> Default for Matrix<R, C, T>
where
    T: Scalar,
{
    #[inline]
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const R: usize, const C: usize, T> Index<(usize, usize)> for Matrix<R, C, T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row][col]
    }
}

impl<const R: usize, const C: usize, T> IndexMut<(usize, usize)> for Matrix<R, C, T> {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row][col]
    }
}

impl<const R: usize, const C: usize, T> Add for Matrix<R, C, T>
where
    T: Scalar,
{
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (lhs, rhs) in self.data.iter_mut().zip(rhs.data) {
            for (a, b) in lhs.iter_mut().zip(rhs) {
                *a = *a + b;
            }
        }
        self
    }
}

impl<const R: usize, const C: usize, T> Sub for Matrix<R, C, T>
where
    T: Scalar,
{
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self::Output {
        for (lhs, rhs) in self.data.iter_mut().zip(rhs.data) {
            for (a, b) in lhs.iter_mut().zip(rhs) {
                *a = *a - b;
            }
        }
        self
    }
}

impl<const R: usize, const C: usize, T> Neg for Matrix<R, C, T>
where
    T: Scalar,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.scale(-T::one())
    }
}

impl<const R: usize, const C: usize, T> Mul<T> for Matrix<R, C, T>
where
    T: Scalar,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

impl<const R: usize, const C: usize, const K: usize, T> Mul<Matrix<C, K, T>> for Matrix<R, C, T>
where
    T: Scalar,
{
    type Output = Matrix<R, K, T>;

    fn mul(self, rhs: Matrix<C, K, T>) -> Self::Output {
        let mut product = Matrix::<R, K, T>::zeros();
        for row in 0..R {
            for col in 0..K {
                let mut sum = T::zero();
                for inner in 0..C {
                    sum = sum + self.data[row][inner] * rhs.data[inner][col];
                }
                product.data[row][col] = sum;
            }
        }
        product
    }
}

impl<const R: usize, const C: usize, T> Mul<Vector<C, T>> for Matrix<R, C, T>
where
    T: Scalar,
{
    type Output = Vector<R, T>;

    fn mul(self, rhs: Vector<C, T>) -> Self::Output {
        Vector::from_array(core::array::from_fn(|row| self.row(row).dot(&rhs)))
    }
}
