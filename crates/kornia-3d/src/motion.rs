use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::linalg::{mat3_from_row_major, mat3_to_row_major};

/// Number of values of a packed object motion: rotation, translation, pivot.
pub const OBJECT_MOTION_LEN: usize = 15;

/// Number of values of a packed camera motion: rotation, translation.
pub const CAMERA_MOTION_LEN: usize = 12;

/// Error types for motion parameter vectors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MotionError {
    /// The packed vector does not have the expected number of values.
    #[error("Motion vector must have {expected} values, got {actual}")]
    InvalidLength {
        /// Required number of values.
        expected: usize,
        /// Number of values provided.
        actual: usize,
    },
}

fn split_rotation_translation(values: &[f64]) -> (DMat3, DVec3) {
    let mut rot = [0.0; 9];
    rot.copy_from_slice(&values[0..9]);
    (
        mat3_from_row_major(&rot),
        DVec3::from_slice(&values[9..12]),
    )
}

/// Rigid motion of an object about a pivot point.
///
/// A point `p` moves to `R * (p - c) + c + t`. The rotation is expected to be
/// orthonormal with determinant +1, which is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectMotion {
    /// Rotation matrix.
    pub rotation: DMat3,
    /// Translation vector.
    pub translation: DVec3,
    /// Pivot point of the rotation.
    pub pivot: DVec3,
}

impl ObjectMotion {
    /// The motion that leaves every point in place.
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
        pivot: DVec3::ZERO,
    };

    /// Creates a new object motion.
    pub fn new(rotation: DMat3, translation: DVec3, pivot: DVec3) -> Self {
        Self {
            rotation,
            translation,
            pivot,
        }
    }

    /// Unpack a motion from its 15 values: row-major rotation (9), translation (3)
    /// and pivot (3).
    ///
    /// Example:
    ///
    /// ```
    /// use kornia_3d::motion::ObjectMotion;
    ///
    /// let values = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0, 0.0, 0.0, 5.0];
    /// let motion = ObjectMotion::from_slice(&values).unwrap();
    /// assert_eq!(motion.translation.to_array(), [1.0, 2.0, 3.0]);
    /// assert_eq!(motion.to_array(), values);
    /// ```
    pub fn from_slice(values: &[f64]) -> Result<Self, MotionError> {
        if values.len() != OBJECT_MOTION_LEN {
            return Err(MotionError::InvalidLength {
                expected: OBJECT_MOTION_LEN,
                actual: values.len(),
            });
        }

        let (rotation, translation) = split_rotation_translation(values);
        Ok(Self {
            rotation,
            translation,
            pivot: DVec3::from_slice(&values[12..15]),
        })
    }

    /// Pack the motion into its 15 values.
    pub fn to_array(&self) -> [f64; OBJECT_MOTION_LEN] {
        let mut out = [0.0; OBJECT_MOTION_LEN];
        out[0..9].copy_from_slice(&mat3_to_row_major(&self.rotation));
        out[9..12].copy_from_slice(&self.translation.to_array());
        out[12..15].copy_from_slice(&self.pivot.to_array());
        out
    }

    /// Apply the motion to a single point.
    #[inline]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * (point - self.pivot) + self.pivot + self.translation
    }
}

impl Default for ObjectMotion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<&[f64]> for ObjectMotion {
    type Error = MotionError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

/// Rigid motion of the camera about the coordinate origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraMotion {
    /// Rotation matrix.
    pub rotation: DMat3,
    /// Translation vector.
    pub translation: DVec3,
}

impl CameraMotion {
    /// The camera does not move.
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Creates a new camera motion.
    pub fn new(rotation: DMat3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Unpack a motion from its 12 values: row-major rotation (9) and translation (3).
    pub fn from_slice(values: &[f64]) -> Result<Self, MotionError> {
        if values.len() != CAMERA_MOTION_LEN {
            return Err(MotionError::InvalidLength {
                expected: CAMERA_MOTION_LEN,
                actual: values.len(),
            });
        }

        let (rotation, translation) = split_rotation_translation(values);
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// Pack the motion into its 12 values.
    pub fn to_array(&self) -> [f64; CAMERA_MOTION_LEN] {
        let mut out = [0.0; CAMERA_MOTION_LEN];
        out[0..9].copy_from_slice(&mat3_to_row_major(&self.rotation));
        out[9..12].copy_from_slice(&self.translation.to_array());
        out
    }

    /// Apply the motion to a single point.
    #[inline]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }
}

impl Default for CameraMotion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<&[f64]> for CameraMotion {
    type Error = MotionError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::euler_to_rotation;
    use approx::assert_relative_eq;

    #[test]
    fn test_object_motion_unpack() -> Result<(), MotionError> {
        let rot = euler_to_rotation(0.1, 0.2, 0.3);
        let mut values = [0.0; 15];
        values[0..9].copy_from_slice(&mat3_to_row_major(&rot));
        values[9..12].copy_from_slice(&[1.0, 2.0, 3.0]);
        values[12..15].copy_from_slice(&[4.0, 5.0, 6.0]);

        let motion = ObjectMotion::from_slice(&values)?;
        // row 0 of the packed rotation is the first output coordinate
        assert_relative_eq!(motion.rotation.row(0).x, values[0]);
        assert_relative_eq!(motion.rotation.row(0).y, values[1]);
        assert_relative_eq!(motion.rotation.row(1).x, values[3]);
        assert_eq!(motion.translation, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(motion.pivot, DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(motion.to_array(), values);
        Ok(())
    }

    #[test]
    fn test_motion_invalid_length() {
        assert_eq!(
            ObjectMotion::from_slice(&[0.0; 12]),
            Err(MotionError::InvalidLength {
                expected: 15,
                actual: 12
            })
        );
        assert_eq!(
            CameraMotion::try_from(&[0.0; 15][..]),
            Err(MotionError::InvalidLength {
                expected: 12,
                actual: 15
            })
        );
    }

    #[test]
    fn test_object_motion_about_pivot() {
        // quarter turn about Z through the pivot (1, 0, 0)
        let motion = ObjectMotion::new(
            euler_to_rotation(0.0, 0.0, std::f64::consts::FRAC_PI_2),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 0.0),
        );
        let p = motion.transform_point(DVec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);

        // the pivot itself only translates
        assert_eq!(
            motion.transform_point(motion.pivot),
            motion.pivot + motion.translation
        );
    }

    #[test]
    fn test_camera_motion_roundtrip() -> Result<(), MotionError> {
        let motion = CameraMotion::new(euler_to_rotation(0.3, 0.0, -0.2), DVec3::X);
        let unpacked = CameraMotion::from_slice(&motion.to_array())?;
        assert!(unpacked.rotation.abs_diff_eq(motion.rotation, 1e-15));
        assert_eq!(unpacked.translation, motion.translation);
        assert_eq!(
            CameraMotion::IDENTITY.transform_point(DVec3::ONE),
            DVec3::ONE
        );
        Ok(())
    }
}
