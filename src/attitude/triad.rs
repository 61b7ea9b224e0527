use crate::linalg::Matrix;
use crate::{Quaternion, Scalar, SingularQuaternion, Vector3, VectorSensor};

/// Determines the attitude in closed form from the first measurement of the two
/// most accurate sensors.
///
/// Sensors are ranked by the squared magnitude of their error sigma; among equals
/// the earlier sensor wins. Sensors without measurements are ignored. The
/// observed directions are rotated into the body frame by the sensor orientation,
/// and the reference directions need not be normalized.
///
/// Returns `Ok(None)` if fewer than two sensors carry measurements. The returned
/// attitude is standardized.
///
/// ## Errors
/// Returns [`SingularQuaternion`] if the first reference directions or the first
/// observed directions of the two sensors are parallel, or if the rotation matrix
/// built from the two triads has no quaternion representation.
pub fn triad<T, S>(sensors: &[S]) -> Result<Option<Quaternion<T>>, SingularQuaternion>
where
    T: Scalar,
    S: VectorSensor<T>,
{
    let Some((first, second)) = select_pair(sensors) else {
        return Ok(None);
    };
    log::trace!("TRIAD using sensors {first} and {second}");

    let first = &sensors[first];
    let second = &sensors[second];

    let reference = orthonormal_triad(&first.reference_vector(0), &second.reference_vector(0))
        .inspect_err(|_| log::warn!("TRIAD reference directions are parallel"))?;
    let observed = orthonormal_triad(&body_direction(first), &body_direction(second))
        .inspect_err(|_| log::warn!("TRIAD observed directions are parallel"))?;

    // A maps reference directions onto body directions: A = Σ oₖ·rₖᵀ.
    // The attitude quaternion describes the point rotation Aᵀ.
    let mut rotation = Matrix::<3, 3, T>::zeros();
    for (o, r) in observed.iter().zip(reference.iter()) {
        for row in 0..3 {
            for col in 0..3 {
                rotation[(row, col)] = rotation[(row, col)] + r[row] * o[col];
            }
        }
    }

    let attitude = Quaternion::from_rotation_matrix(&rotation)?;
    Ok(Some(attitude.standardized()))
}

/// Returns the number of sensors carrying at least one measurement.
pub(crate) fn active_sensors<T, S>(sensors: &[S]) -> usize
where
    S: VectorSensor<T>,
{
    sensors.iter().filter(|sensor| sensor.has_measurements()).count()
}

/// Picks the indexes of the two sensors with the smallest error magnitude.
fn select_pair<T, S>(sensors: &[S]) -> Option<(usize, usize)>
where
    T: Scalar,
    S: VectorSensor<T>,
{
    let mut best: Option<(usize, T)> = None;
    let mut runner_up: Option<(usize, T)> = None;

    for (index, sensor) in sensors.iter().enumerate() {
        if !sensor.has_measurements() {
            continue;
        }

        let quality = sensor.error_sigma().magnitude_sq();
        match best {
            Some((_, best_quality)) if !(quality < best_quality) => {
                if runner_up.map_or(true, |(_, runner_up_quality)| quality < runner_up_quality) {
                    runner_up = Some((index, quality));
                }
            }
            _ => {
                runner_up = best;
                best = Some((index, quality));
            }
        }
    }

    match (best, runner_up) {
        (Some((first, _)), Some((second, _))) => Some((first, second)),
        _ => None,
    }
}

fn body_direction<T, S>(sensor: &S) -> Vector3<T>
where
    T: Scalar,
    S: VectorSensor<T>,
{
    let in_sensor = sensor.observed_vector(0).to_unit_vector();
    sensor.orientation().vector_rotate(&in_sensor)
}

/// Builds an orthonormal basis from two directions.
///
/// Fails if the sine of the angle between the directions does not exceed the
/// square root of the machine epsilon.
fn orthonormal_triad<T>(
    first: &Vector3<T>,
    second: &Vector3<T>,
) -> Result<[Vector3<T>; 3], SingularQuaternion>
where
    T: Scalar,
{
    let normal = first.cross(second);
    if !(normal.norm() > T::epsilon().sqrt() * first.norm() * second.norm()) {
        return Err(SingularQuaternion);
    }

    let t1 = first.normalized();
    let t2 = normal.normalized();
    let t3 = t1.cross(t2).normalized();
    Ok([t1, t2, t3])
}
