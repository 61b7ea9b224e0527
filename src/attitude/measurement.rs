use crate::linalg::{Matrix, Vector};
use crate::{Quaternion, Scalar, Vector2, Vector3};

/// The solve-for parameters of a Gauss-Newton attitude update.
///
/// Jacobians are taken of the quadratic form
/// `f(q, r) = (w² - e·e)·r + 2·e·(e·r) - 2·w·(e × r)`, which equals the
/// frame rotation of `r` for a unit quaternion `q = (w, e)`.
pub trait Parametrization<const P: usize, T> {
    /// Returns the default convergence tolerance on the update norm.
    fn default_tolerance() -> T;

    /// Returns the partial derivatives of the body-frame direction `f(q, r)` with
    /// respect to the `P` parameters.
    fn body_jacobian(attitude: &Quaternion<T>, reference: &Vector3<T>) -> Matrix<3, P, T>;

    /// Removes the components of an update that leave the attitude unchanged.
    ///
    /// The estimator judges convergence and limits steps on the norm of the
    /// projected update, not of the raw least-squares solution.
    fn project_update(attitude: &Quaternion<T>, delta: &mut Vector<P, T>);

    /// Applies a parameter update to the attitude, keeping it a standardized unit quaternion.
    fn apply_update(attitude: &mut Quaternion<T>, delta: &Vector<P, T>);
}

/// Solves for the three vector components of the quaternion. The scalar part
/// follows from the unit norm constraint and stays non-negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorPart;

/// Solves for all four quaternion components and renormalizes after each update.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullQuaternion;

impl<T> Parametrization<3, T> for VectorPart
where
    T: Scalar,
{
    #[inline]
    fn default_tolerance() -> T {
        T::QUATERNION_VECTOR
    }

    fn body_jacobian(attitude: &Quaternion<T>, reference: &Vector3<T>) -> Matrix<3, 3, T> {
        let (d_scalar, d_vector) = quadratic_form_partials(attitude, reference);
        if attitude.w.is_negligible() {
            return d_vector;
        }

        // Chain rule through w = sqrt(1 - e·e), i.e. ∂w/∂e = -eᵀ/w.
        let coupling = outer(&d_scalar, &attitude.vector_part()).scale(attitude.w.recip());
        d_vector - coupling
    }

    #[inline]
    fn project_update(_attitude: &Quaternion<T>, _delta: &mut Vector<3, T>) {}

    fn apply_update(attitude: &mut Quaternion<T>, delta: &Vector<3, T>) {
        let x = attitude.x + delta[0];
        let y = attitude.y + delta[1];
        let z = attitude.z + delta[2];

        // Updates leaving the unit ball are clamped onto its boundary.
        let w_sq = T::one() - (x * x + y * y + z * z);
        let mut updated = Quaternion::new(w_sq.max(T::zero()).sqrt(), x, y, z);
        updated.normalize();
        *attitude = updated;
    }
}

impl<T> Parametrization<4, T> for FullQuaternion
where
    T: Scalar,
{
    #[inline]
    fn default_tolerance() -> T {
        T::QUATERNION
    }

    fn body_jacobian(attitude: &Quaternion<T>, reference: &Vector3<T>) -> Matrix<3, 4, T> {
        let (d_scalar, d_vector) = quadratic_form_partials(attitude, reference);

        let mut jacobian = Matrix::<3, 4, T>::zeros();
        jacobian.set_column(0, &Vector::from(d_scalar));
        for col in 0..3 {
            jacobian.set_column(col + 1, &d_vector.column(col));
        }
        jacobian
    }

    /// Drops the component along the attitude itself, which only scales the
    /// quaternion and is undone by the renormalization.
    fn project_update(attitude: &Quaternion<T>, delta: &mut Vector<4, T>) {
        let q = Vector::from(attitude.to_array());
        let radial = q.dot(delta) / q.norm_sq();
        *delta -= q.scale(radial);
    }

    fn apply_update(attitude: &mut Quaternion<T>, delta: &Vector<4, T>) {
        let mut updated = Quaternion::new(
            attitude.w + delta[0],
            attitude.x + delta[1],
            attitude.y + delta[2],
            attitude.z + delta[3],
        );
        updated.normalize();
        updated.standardize();
        *attitude = updated;
    }
}

/// Predicts the `x` and `y` components of the observed direction of `reference`.
///
/// ## Arguments
/// * `attitude` - The body attitude relative to the master frame.
/// * `orientation` - The sensor orientation relative to the body frame.
/// * `reference` - The unit reference direction in the master frame.
pub fn predict_observation<T>(
    attitude: &Quaternion<T>,
    orientation: &Quaternion<T>,
    reference: &Vector3<T>,
) -> Vector2<T>
where
    T: Scalar,
{
    let body = quadratic_form(attitude, reference);
    let sensor = orientation.frame_rotate(&body);
    Vector2::new(sensor.x, sensor.y)
}

/// Builds the `2×P` Jacobian of [`predict_observation`] with respect to the parameters `M`.
pub fn observation_jacobian<const P: usize, T, M>(
    attitude: &Quaternion<T>,
    orientation: &Quaternion<T>,
    reference: &Vector3<T>,
) -> Matrix<2, P, T>
where
    T: Scalar,
    M: Parametrization<P, T>,
{
    let body_to_sensor = orientation.to_rotation_matrix().transpose();
    let projection = Matrix::<2, 3, T>::from_rows([
        body_to_sensor.row(0).into_array(),
        body_to_sensor.row(1).into_array(),
    ]);
    projection * M::body_jacobian(attitude, reference)
}

fn quadratic_form<T>(attitude: &Quaternion<T>, reference: &Vector3<T>) -> Vector3<T>
where
    T: Scalar,
{
    let w = attitude.w;
    let e = attitude.vector_part();
    let two = T::two();
    *reference * (w * w - e.norm_sq()) + e * (two * e.dot(reference))
        - e.cross(reference) * (two * w)
}

/// Returns `∂f/∂w` and `∂f/∂e` of the quadratic form.
fn quadratic_form_partials<T>(
    attitude: &Quaternion<T>,
    reference: &Vector3<T>,
) -> (Vector3<T>, Matrix<3, 3, T>)
where
    T: Scalar,
{
    let w = attitude.w;
    let e = attitude.vector_part();
    let r = *reference;
    let two = T::two();

    let d_scalar = (r * w - e.cross(r)) * two;
    let d_vector = outer(&r, &e).scale(-two)
        + Matrix::<3, 3, T>::identity().scale(two * e.dot(r))
        + outer(&e, &r).scale(two)
        + r.cross_matrix().scale(two * w);

    (d_scalar, d_vector)
}

fn outer<T>(a: &Vector3<T>, b: &Vector3<T>) -> Matrix<3, 3, T>
where
    T: Scalar,
{
    Matrix::from_rows([
        [a.x * b.x, a.x * b.y, a.x * b.z],
        [a.y * b.x, a.y * b.y, a.y * b.z],
        [a.z * b.x, a.z * b.y, a.z * b.z],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const STEP: f64 = 1e-6;

    fn attitude() -> Quaternion<f64> {
        Quaternion::new(0.8, 0.1, -0.4, 0.3).normalized()
    }

    fn orientation() -> Quaternion<f64> {
        Quaternion::from_axis_angle(&Vector3::new(1.0, 0.0, 0.0), 0.7)
    }

    fn reference() -> Vector3<f64> {
        Vector3::new(0.3, -0.5, 0.8).normalized()
    }

    #[test]
    fn test_prediction_matches_frame_rotation() {
        let q = attitude();
        let s = orientation();
        let r = reference();
        let expected = s.frame_rotate(&q.frame_rotate(&r));
        let predicted = predict_observation(&q, &s, &r);
        assert_abs_diff_eq!(predicted.x, expected.x, epsilon = 1e-15);
        assert_abs_diff_eq!(predicted.y, expected.y, epsilon = 1e-15);
    }

    #[test]
    fn test_full_quaternion_jacobian() {
        let q = attitude();
        let s = orientation();
        let r = reference();
        let jacobian = observation_jacobian::<4, f64, FullQuaternion>(&q, &s, &r);

        for col in 0..4 {
            let mut plus = q.to_array();
            let mut minus = q.to_array();
            plus[col] += STEP;
            minus[col] -= STEP;
            let upper = predict_observation(&Quaternion::from(plus), &s, &r);
            let lower = predict_observation(&Quaternion::from(minus), &s, &r);

            assert_abs_diff_eq!(
                jacobian.get(0, col),
                (upper.x - lower.x) / (2.0 * STEP),
                epsilon = 1e-7
            );
            assert_abs_diff_eq!(
                jacobian.get(1, col),
                (upper.y - lower.y) / (2.0 * STEP),
                epsilon = 1e-7
            );
        }
    }

    #[test]
    fn test_vector_part_jacobian() {
        let q = attitude();
        let s = orientation();
        let r = reference();
        let jacobian = observation_jacobian::<3, f64, VectorPart>(&q, &s, &r);

        let constrained = |e: [f64; 3]| {
            let w = (1.0 - e[0] * e[0] - e[1] * e[1] - e[2] * e[2]).sqrt();
            predict_observation(&Quaternion::new(w, e[0], e[1], e[2]), &s, &r)
        };

        for col in 0..3 {
            let mut plus = [q.x, q.y, q.z];
            let mut minus = plus;
            plus[col] += STEP;
            minus[col] -= STEP;
            let upper = constrained(plus);
            let lower = constrained(minus);

            assert_abs_diff_eq!(
                jacobian.get(0, col),
                (upper.x - lower.x) / (2.0 * STEP),
                epsilon = 1e-7
            );
            assert_abs_diff_eq!(
                jacobian.get(1, col),
                (upper.y - lower.y) / (2.0 * STEP),
                epsilon = 1e-7
            );
        }
    }

    #[test]
    fn test_vector_part_update_is_clamped() {
        let mut q = Quaternion::<f64>::identity();
        <VectorPart as Parametrization<3, f64>>::apply_update(
            &mut q,
            &Vector::from_array([2.0, 0.0, 0.0]),
        );
        assert_eq!(q, Quaternion::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_vector_part_update() {
        let mut q = Quaternion::<f64>::identity();
        <VectorPart as Parametrization<3, f64>>::apply_update(
            &mut q,
            &Vector::from_array([0.0, 0.6, 0.0]),
        );
        assert_abs_diff_eq!(q.w, 0.8, epsilon = 1e-15);
        assert_abs_diff_eq!(q.y, 0.6, epsilon = 1e-15);
    }

    #[test]
    fn test_full_quaternion_projection() {
        let q = attitude();
        let mut delta = Vector::from_array([0.3, -0.1, 0.2, 0.05]);
        <FullQuaternion as Parametrization<4, f64>>::project_update(&q, &mut delta);
        assert_abs_diff_eq!(
            Vector::from(q.to_array()).dot(&delta),
            0.0,
            epsilon = 1e-15
        );

        let mut radial = Vector::from(q.to_array()).scale(0.2);
        <FullQuaternion as Parametrization<4, f64>>::project_update(&q, &mut radial);
        assert_abs_diff_eq!(radial.norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_full_quaternion_update_is_standardized() {
        let mut q = Quaternion::<f64>::identity();
        <FullQuaternion as Parametrization<4, f64>>::apply_update(
            &mut q,
            &Vector::from_array([-3.0, 0.0, 0.0, 1.0]),
        );
        assert!(q.w >= 0.0);
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(q.w, 2.0 / 5.0_f64.sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(q.z, -1.0 / 5.0_f64.sqrt(), epsilon = 1e-15);
    }
}
