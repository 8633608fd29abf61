use glam::{DMat3, DVec3};

/// Compute the rotation matrix from Euler angles.
///
/// The elemental rotations about the X, Y and Z axes are composed as
/// `Rz * Rx * Ry`.
///
/// # Arguments
///
/// * `x` - The rotation angle about the X axis in radians.
/// * `y` - The rotation angle about the Y axis in radians.
/// * `z` - The rotation angle about the Z axis in radians.
///
/// Example:
///
/// ```
/// use kornia_3d::transforms::euler_to_rotation;
///
/// let rotation = euler_to_rotation(0.0, 0.0, 0.0);
/// assert_eq!(rotation, glam::DMat3::IDENTITY);
/// ```
pub fn euler_to_rotation(x: f64, y: f64, z: f64) -> DMat3 {
    let (sx, cx) = x.sin_cos();
    let (sy, cy) = y.sin_cos();
    let (sz, cz) = z.sin_cos();

    // glam matrices are built from columns
    let rot_x = DMat3::from_cols(
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, cx, sx),
        DVec3::new(0.0, -sx, cx),
    );
    let rot_y = DMat3::from_cols(
        DVec3::new(cy, 0.0, -sy),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(sy, 0.0, cy),
    );
    let rot_z = DMat3::from_cols(
        DVec3::new(cz, sz, 0.0),
        DVec3::new(-sz, cz, 0.0),
        DVec3::new(0.0, 0.0, 1.0),
    );

    rot_z * rot_x * rot_y
}

/// Angle of a rotation matrix in radians, in `[0, pi]`.
///
/// The cosine `(trace(R) - 1) / 2` is clipped to `[-1, 1]` before `acos`.
pub fn rotation_angle(rotation: &DMat3) -> f64 {
    let trace = rotation.x_axis.x + rotation.y_axis.y + rotation.z_axis.z;
    ((trace - 1.0) / 2.0).clamp(-1.0, 1.0).acos()
}

/// Compute the rotation matrix from an axis and angle.
///
/// The axis does not need to be normalized.
///
/// Example:
///
/// ```
/// use kornia_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = glam::DVec3::X;
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!(rotation.abs_diff_eq(kornia_3d::transforms::euler_to_rotation(angle, 0.0, 0.0), 1e-12));
/// ```
pub fn axis_angle_to_rotation_matrix(axis: &DVec3, angle: f64) -> Result<DMat3, &'static str> {
    let axis = match axis.length() < 1e-10 {
        true => return Err("cannot compute rotation matrix from a zero vector"),
        false => axis.normalize(),
    };

    Ok(DMat3::from_axis_angle(axis, angle))
}
