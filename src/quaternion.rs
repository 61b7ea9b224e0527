use crate::impl_component_views;
use crate::linalg::Matrix;
use crate::{EulerAngles, Scalar, Vector3};
use core::fmt::{Debug, Formatter};
use core::ops::Mul;
use uniform_array_derive::UniformArray;

/// No branch of the rotation matrix extraction produced a usable denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rotation matrix does not correspond to a quaternion")]
pub struct SingularQuaternion;

/// A rotation quaternion in scalar-first `(w, x, y, z)` order using the Hamilton convention.
///
/// The attitude of a body is represented by the quaternion that rotates the
/// axes of the reference frame onto the axes of the body frame. Consequently,
/// [`Quaternion::frame_rotate`] expresses a reference-frame vector in body
/// coordinates, while [`Quaternion::vector_rotate`] rotates a vector within
/// a frame.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Quaternion<T> {
    /// The scalar part.
    pub w: T,
    /// The `i` component of the vector part.
    pub x: T,
    /// The `j` component of the vector part.
    pub y: T,
    /// The `k` component of the vector part.
    pub z: T,
}

impl<T> Quaternion<T> {
    /// Initializes a new [`Quaternion`] instance from its scalar and vector components.
    #[inline(always)]
    pub const fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }
}

impl<T> Quaternion<T>
where
    T: Scalar,
{
    /// Returns the identity rotation.
    #[inline]
    pub fn identity() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    /// Builds a quaternion from a rotation `angle` (in radians) about `axis`.
    ///
    /// The axis does not need to be normalized. A zero axis yields the identity.
    pub fn from_axis_angle(axis: &Vector3<T>, angle: T) -> Self {
        let norm = axis.norm();
        if norm.is_negligible() {
            return Self::identity();
        }

        let half_angle = angle * T::half();
        let (sin, cos) = half_angle.sin_cos();
        let factor = sin / norm;
        Self::new(cos, axis.x * factor, axis.y * factor, axis.z * factor)
    }

    /// Returns the vector part.
    #[inline]
    pub fn vector_part(&self) -> Vector3<T> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Calculates the squared norm.
    #[inline]
    pub fn norm_sq(&self) -> T {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculates the norm.
    #[inline]
    pub fn norm(&self) -> T {
        self.norm_sq().sqrt()
    }

    /// Calculates the four-dimensional inner product.
    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the conjugate `(w, -x, -y, -z)`.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Returns the multiplicative inverse, i.e. the conjugate divided by the squared norm.
    ///
    /// For unit quaternions this equals the [conjugate](Self::conjugate).
    pub fn inverse(&self) -> Self {
        let norm_sq_inv = self.norm_sq().recip();
        let conjugate = self.conjugate();
        Self::new(
            conjugate.w * norm_sq_inv,
            conjugate.x * norm_sq_inv,
            conjugate.y * norm_sq_inv,
            conjugate.z * norm_sq_inv,
        )
    }

    /// Scales the quaternion to unit norm.
    pub fn normalize(&mut self) {
        let norm_inv = self.norm().recip();
        self.w = self.w * norm_inv;
        self.x = self.x * norm_inv;
        self.y = self.y * norm_inv;
        self.z = self.z * norm_inv;
    }

    /// Returns a unit norm copy of the quaternion.
    pub fn normalized(&self) -> Self {
        let mut copy = *self;
        copy.normalize();
        copy
    }

    /// Renormalizes only if the squared norm deviates from one by more than `tolerance`.
    ///
    /// Returns whether the quaternion was renormalized.
    pub fn normalize_if_drifted(&mut self, tolerance: T) -> bool {
        if (self.norm_sq() - T::one()).abs() > tolerance {
            self.normalize();
            true
        } else {
            false
        }
    }

    /// Flips the sign of all components if the scalar part is negative.
    ///
    /// `q` and `-q` describe the same rotation; the standardized form picks the
    /// representative with a non-negative scalar part.
    pub fn standardize(&mut self) {
        if self.w < T::zero() {
            self.w = -self.w;
            self.x = -self.x;
            self.y = -self.y;
            self.z = -self.z;
        }
    }

    /// Returns a standardized copy of the quaternion.
    pub fn standardized(&self) -> Self {
        let mut copy = *self;
        copy.standardize();
        copy
    }

    /// Returns the rotation axis and angle (in radians, within `[0, 2π]`).
    ///
    /// The axis of a (near) identity rotation is reported as the `x` axis.
    pub fn axis_angle(&self) -> (Vector3<T>, T) {
        let vector = self.vector_part();
        let sin_half = vector.norm();
        let angle = T::two() * sin_half.atan2(self.w);
        if sin_half.is_negligible() {
            (Vector3::new(T::one(), T::zero(), T::zero()), angle)
        } else {
            (vector * sin_half.recip(), angle)
        }
    }

    /// Returns the smallest rotation angle, in radians, that takes this attitude onto `other`.
    pub fn angle_to(&self, other: &Self) -> T {
        let difference = self.conjugate() * *other;
        T::two() * difference.vector_part().norm().atan2(difference.w.abs())
    }

    /// Builds the point rotation matrix `R(q)`, such that `R·v` equals
    /// [`vector_rotate`](Self::vector_rotate) of `v`.
    pub fn to_rotation_matrix(&self) -> Matrix<3, 3, T> {
        let Self { w, x, y, z } = *self;
        let one = T::one();
        let two = T::two();
        Matrix::from_rows([
            [
                one - two * (y * y + z * z),
                two * (x * y - w * z),
                two * (x * z + w * y),
            ],
            [
                two * (x * y + w * z),
                one - two * (x * x + z * z),
                two * (y * z - w * x),
            ],
            [
                two * (x * z - w * y),
                two * (y * z + w * x),
                one - two * (x * x + y * y),
            ],
        ])
    }

    /// Extracts the quaternion of a point rotation matrix using the default
    /// branch threshold κ = 0.25.
    ///
    /// ## Errors
    /// Returns [`SingularQuaternion`] if no branch clears the threshold, which
    /// does not happen for a proper rotation matrix.
    pub fn from_rotation_matrix(matrix: &Matrix<3, 3, T>) -> Result<Self, SingularQuaternion> {
        Self::from_rotation_matrix_with_threshold(matrix, T::half() * T::half())
    }

    /// Extracts the quaternion of a point rotation matrix, branching on the
    /// largest of the four squared components.
    ///
    /// The squared component used as denominator must be at least `kappa`. As the
    /// squared components of a unit quaternion sum to one, the largest is never
    /// below `0.25` for a proper rotation matrix.
    ///
    /// ## Errors
    /// Returns [`SingularQuaternion`] if the largest squared component is below `kappa`.
    pub fn from_rotation_matrix_with_threshold(
        matrix: &Matrix<3, 3, T>,
        kappa: T,
    ) -> Result<Self, SingularQuaternion> {
        let m = |row: usize, col: usize| matrix.get(row, col);
        let one = T::one();
        let quarter = T::half() * T::half();
        let trace = matrix.trace();

        let squares = [
            (one + trace) * quarter,
            (one + m(0, 0) - m(1, 1) - m(2, 2)) * quarter,
            (one - m(0, 0) + m(1, 1) - m(2, 2)) * quarter,
            (one - m(0, 0) - m(1, 1) + m(2, 2)) * quarter,
        ];

        let (branch, largest) = squares
            .iter()
            .copied()
            .enumerate()
            .fold((0, squares[0]), |best, (index, value)| {
                if value > best.1 {
                    (index, value)
                } else {
                    best
                }
            });

        if !(largest >= kappa) {
            return Err(SingularQuaternion);
        }

        let component = largest.sqrt();
        let denominator = (component * T::two() * T::two()).recip();
        let quaternion = match branch {
            0 => Self::new(
                component,
                (m(2, 1) - m(1, 2)) * denominator,
                (m(0, 2) - m(2, 0)) * denominator,
                (m(1, 0) - m(0, 1)) * denominator,
            ),
            1 => Self::new(
                (m(2, 1) - m(1, 2)) * denominator,
                component,
                (m(0, 1) + m(1, 0)) * denominator,
                (m(0, 2) + m(2, 0)) * denominator,
            ),
            2 => Self::new(
                (m(0, 2) - m(2, 0)) * denominator,
                (m(0, 1) + m(1, 0)) * denominator,
                component,
                (m(1, 2) + m(2, 1)) * denominator,
            ),
            _ => Self::new(
                (m(1, 0) - m(0, 1)) * denominator,
                (m(0, 2) + m(2, 0)) * denominator,
                (m(1, 2) + m(2, 1)) * denominator,
                component,
            ),
        };

        Ok(quaternion)
    }

    /// Rotates a vector by this quaternion, i.e. `q·v·q*`.
    pub fn vector_rotate(&self, vector: &Vector3<T>) -> Vector3<T> {
        let r = self.to_rotation_matrix();
        Vector3::new(
            r.get(0, 0) * vector.x + r.get(0, 1) * vector.y + r.get(0, 2) * vector.z,
            r.get(1, 0) * vector.x + r.get(1, 1) * vector.y + r.get(1, 2) * vector.z,
            r.get(2, 0) * vector.x + r.get(2, 1) * vector.y + r.get(2, 2) * vector.z,
        )
    }

    /// Expresses a vector given in the reference frame in the rotated frame, i.e. `q*·v·q`.
    ///
    /// This is the transpose (inverse) of [`vector_rotate`](Self::vector_rotate).
    pub fn frame_rotate(&self, vector: &Vector3<T>) -> Vector3<T> {
        let r = self.to_rotation_matrix();
        Vector3::new(
            r.get(0, 0) * vector.x + r.get(1, 0) * vector.y + r.get(2, 0) * vector.z,
            r.get(0, 1) * vector.x + r.get(1, 1) * vector.y + r.get(2, 1) * vector.z,
            r.get(0, 2) * vector.x + r.get(1, 2) * vector.y + r.get(2, 2) * vector.z,
        )
    }

    /// Obtains the Tait-Bryan roll, pitch and yaw angles of the rotation.
    pub fn euler_angles(&self) -> EulerAngles<T> {
        let Self { w, x, y, z } = self.normalized();
        let one = T::one();
        let two = T::two();

        let roll = (two * (w * x + y * z)).atan2(one - two * (x * x + y * y));
        let sin_pitch = (two * (w * y - z * x)).max(-one).min(one);
        let pitch = sin_pitch.asin();
        let yaw = (two * (w * z + x * y)).atan2(one - two * (y * y + z * z));

        EulerAngles::new(roll, pitch, yaw)
    }
}

impl<T> Default for Quaternion<T>
where
    T: Scalar,
{
    /// Returns the identity rotation.
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Clone for Quaternion<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            w: self.w.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl<T> Debug for Quaternion<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Quaternion")
            .field(&self.w)
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}

impl<T> PartialEq for Quaternion<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w && self.x == other.x && self.y == other.y && self.z == other.z
    }
}

/// Implements the Hamilton product; `(p * q)` rotates by `q` first, then by `p`.
impl<T> Mul<Quaternion<T>> for Quaternion<T>
where
    T: Scalar,
{
    type Output = Quaternion<T>;

    fn mul(self, rhs: Quaternion<T>) -> Self::Output {
        let p = self;
        let q = rhs;
        Self {
            w: p.w * q.w - p.x * q.x - p.y * q.y - p.z * q.z,
            x: p.w * q.x + p.x * q.w + p.y * q.z - p.z * q.y,
            y: p.w * q.y - p.x * q.z + p.y * q.w + p.z * q.x,
            z: p.w * q.z + p.x * q.y - p.y * q.x + p.z * q.w,
        }
    }
}

impl_component_views!(Quaternion, T, 4, [w, x, y, z]);
