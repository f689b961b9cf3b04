//! Synthetic eye calibration observations.
//!
//! Kinematic poses are drawn at random, independently for each eye, so the
//! two eyes never share an orientation. The fundamental pose is the exact
//! relative pose implied by the ground-truth extrinsics.

use crate::{iso3_from_xyz_rpy, CalibrationObservation, EyePose, Iso3, Real, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Range of the random kinematic translations, meters.
const KIN_TRANSLATION_RANGE: Real = 0.1;
/// Range of the random kinematic angles, radians.
const KIN_ANGLE_RANGE: Real = 0.5;

fn random_iso(rng: &mut StdRng, t_range: Real, r_range: Real) -> Iso3 {
    let mut draw = |range: Real| {
        if range > 0.0 {
            rng.random_range(-range..=range)
        } else {
            0.0
        }
    };
    let xyz = Vec3::new(draw(t_range), draw(t_range), draw(t_range));
    let rpy = Vec3::new(draw(r_range), draw(r_range), draw(r_range));
    iso3_from_xyz_rpy(&xyz, &rpy)
}

/// Relative left-in-right pose predicted for the given kinematics and extrinsics.
pub fn predicted_fundamental(
    eye_kin_left: &Iso3,
    eye_kin_right: &Iso3,
    extrinsics_left: &Iso3,
    extrinsics_right: &Iso3,
) -> Iso3 {
    let hl = eye_kin_left * extrinsics_left;
    let hr = eye_kin_right * extrinsics_right;
    hr.inverse() * hl
}

/// Generate `n` noise-free observations consistent with `truth`.
pub fn observations_from_pose(truth: &EyePose, n: usize, seed: u64) -> Vec<CalibrationObservation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let ext = truth.extrinsics();

    (0..n)
        .map(|_| {
            let kin_left = random_iso(&mut rng, KIN_TRANSLATION_RANGE, KIN_ANGLE_RANGE);
            let kin_right = random_iso(&mut rng, KIN_TRANSLATION_RANGE, KIN_ANGLE_RANGE);
            let fundamental = predicted_fundamental(&kin_left, &kin_right, &ext.left, &ext.right);
            CalibrationObservation::new(kin_left, kin_right, fundamental)
        })
        .collect()
}

/// Perturb every fundamental pose by a uniform random rigid offset.
///
/// `noise_t` bounds each translation component (meters), `noise_r` each
/// roll/pitch/yaw component (radians).
pub fn add_noise(
    observations: &[CalibrationObservation],
    noise_t: Real,
    noise_r: Real,
    seed: u64,
) -> Vec<CalibrationObservation> {
    let mut rng = StdRng::seed_from_u64(seed);
    observations
        .iter()
        .map(|obs| {
            let delta = random_iso(&mut rng, noise_t.abs(), noise_r.abs());
            CalibrationObservation {
                fundamental: obs.fundamental * delta,
                ..*obs
            }
        })
        .collect()
}
