use crate::{ErrorSigma, Quaternion, SensorObservations, Vector2, Vector3};

const SENSORS: usize = 3;
const MEASUREMENTS: usize = 2;

/// Three sensors with two measurements each, consistent with a known attitude.
pub(crate) struct Scenario {
    pub references: [[Vector3<f64>; MEASUREMENTS]; SENSORS],
    pub observations: [[Vector2<f64>; MEASUREMENTS]; SENSORS],
    pub orientations: [Quaternion<f64>; SENSORS],
    pub sigmas: [ErrorSigma<f64>; SENSORS],
}

impl Scenario {
    pub fn default_truth() -> Quaternion<f64> {
        Quaternion::from_axis_angle(&Vector3::new(0.2, -0.6, 0.9), 1.1)
    }

    pub fn new(truth: Quaternion<f64>) -> Self {
        let orientations = [
            Quaternion::identity(),
            Quaternion::from_axis_angle(&Vector3::new(1.0, 0.0, 0.0), 1.5),
            Quaternion::from_axis_angle(&Vector3::new(0.0, 1.0, 0.3), -1.2),
        ];
        let observations = [
            [Vector2::new(0.1, 0.2), Vector2::new(-0.3, 0.05)],
            [Vector2::new(0.2, -0.1), Vector2::new(0.0, 0.3)],
            [Vector2::new(-0.15, -0.25), Vector2::new(0.35, 0.1)],
        ];

        let mut references = [[Vector3::default(); MEASUREMENTS]; SENSORS];
        for sensor in 0..SENSORS {
            let sensor_to_master = truth * orientations[sensor];
            for measurement in 0..MEASUREMENTS {
                let direction = observations[sensor][measurement].to_unit_vector();
                references[sensor][measurement] = sensor_to_master.vector_rotate(&direction);
            }
        }

        Self {
            references,
            observations,
            orientations,
            sigmas: [
                ErrorSigma::new(1e-3, 1e-3),
                ErrorSigma::new(2e-3, 2e-3),
                ErrorSigma::new(5e-3, 5e-3),
            ],
        }
    }

    pub fn sensors(&self) -> [SensorObservations<'_, f64>; SENSORS] {
        core::array::from_fn(|sensor| {
            SensorObservations::new(
                &self.references[sensor],
                &self.observations[sensor],
                self.orientations[sensor],
                self.sigmas[sensor],
            )
        })
    }

    pub fn set_sigmas(&mut self, sigma: ErrorSigma<f64>) {
        self.sigmas = [sigma; SENSORS];
    }

    pub fn scale_references(&mut self, factor: f64) {
        for references in self.references.iter_mut() {
            for reference in references.iter_mut() {
                *reference = *reference * factor;
            }
        }
    }

    /// Turns `target` into a copy of `source` whose reference vectors are scaled by `factor`.
    pub fn duplicate_sensor(&mut self, source: usize, target: usize, factor: f64) {
        self.orientations[target] = self.orientations[source];
        self.observations[target] = self.observations[source];
        self.references[target] = self.references[source].map(|reference| reference * factor);
    }

    /// Rotates the reference directions of one sensor away from the truth.
    pub fn corrupt_sensor(&mut self, sensor: usize) {
        let error = Quaternion::from_axis_angle(&Vector3::new(0.0, 0.0, 1.0), 0.5);
        for reference in self.references[sensor].iter_mut() {
            *reference = error.vector_rotate(reference);
        }
    }

    /// Offsets every observed component by a small, deterministic amount.
    pub fn perturb_observations(&mut self, amount: f64) {
        let pattern = [1.0, -0.5, 0.25, -1.0, 0.75, -0.25];
        let mut offsets = pattern.iter().cycle();
        for observations in self.observations.iter_mut() {
            for observation in observations.iter_mut() {
                observation.x += amount * offsets.next().copied().unwrap_or_default();
                observation.y -= amount * offsets.next().copied().unwrap_or_default();
            }
        }
    }
}
