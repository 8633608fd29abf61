use glam::{DMat3, DVec3};
use rayon::prelude::*;

/// Build a matrix from nine values in row-major order.
///
/// Example:
///
/// ```
/// use kornia_3d::linalg::mat3_from_row_major;
///
/// let m = mat3_from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
/// assert_eq!(m.row(0).to_array(), [1.0, 2.0, 3.0]);
/// ```
#[inline]
pub fn mat3_from_row_major(values: &[f64; 9]) -> DMat3 {
    // glam stores columns, so the row-major buffer reads as the transpose
    DMat3::from_cols_array(values).transpose()
}

/// Flatten a matrix into nine values in row-major order.
#[inline]
pub fn mat3_to_row_major(mat: &DMat3) -> [f64; 9] {
    mat.transpose().to_cols_array()
}

/// Transform a set of points using a rotation and translation.
///
/// Each destination point is `dst_r_src * src + dst_t_src`.
///
/// PRECONDITION: dst_points is a pre-allocated vector of the same size as source.
///
/// Example:
///
/// ```
/// use glam::{DMat3, DVec3};
/// use kornia_3d::linalg::transform_points;
///
/// let src_points = vec![DVec3::new(2.0, 2.0, 2.0), DVec3::new(3.0, 4.0, 5.0)];
/// let mut dst_points = vec![DVec3::ZERO; src_points.len()];
/// transform_points(&src_points, &DMat3::IDENTITY, &DVec3::X, &mut dst_points);
/// assert_eq!(dst_points[0], DVec3::new(3.0, 2.0, 2.0));
/// ```
pub fn transform_points(
    src_points: &[DVec3],
    dst_r_src: &DMat3,
    dst_t_src: &DVec3,
    dst_points: &mut [DVec3],
) {
    assert_eq!(src_points.len(), dst_points.len());

    dst_points
        .par_iter_mut()
        .zip(src_points.par_iter())
        .for_each(|(dst, src)| {
            *dst = *dst_r_src * *src + *dst_t_src;
        });
}

/// Transform a set of points in place using a rotation and translation.
pub fn transform_points_inplace(points: &mut [DVec3], dst_r_src: &DMat3, dst_t_src: &DVec3) {
    points.par_iter_mut().for_each(|p| {
        *p = *dst_r_src * *p + *dst_t_src;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_row_major_roundtrip() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let m = mat3_from_row_major(&values);
        assert_eq!(m.col(0).to_array(), [1.0, 4.0, 7.0]);
        assert_eq!(m * DVec3::X, DVec3::new(1.0, 4.0, 7.0));
        assert_eq!(mat3_to_row_major(&m), values);
    }

    #[test]
    fn test_transform_points_identity() {
        let src_points = vec![DVec3::new(2.0, 2.0, 2.0), DVec3::new(3.0, 4.0, 5.0)];
        let mut dst_points = vec![DVec3::ZERO; src_points.len()];
        transform_points(&src_points, &DMat3::IDENTITY, &DVec3::ZERO, &mut dst_points);

        assert_eq!(dst_points, src_points);
    }

    #[test]
    fn test_transform_points_roundtrip() {
        let src_points = vec![DVec3::new(2.0, 2.0, 2.0), DVec3::new(3.0, 4.0, 5.0)];
        let rotation = mat3_from_row_major(&[1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0]);
        let translation = DVec3::new(1.0, 2.0, 3.0);

        let mut dst_points = vec![DVec3::ZERO; src_points.len()];
        transform_points(&src_points, &rotation, &translation, &mut dst_points);
        assert_eq!(dst_points[0], DVec3::new(3.0, 0.0, 5.0));

        // R' = R^T, t' = -R^T * t
        let rotation_inv = rotation.transpose();
        let translation_inv = -(rotation_inv * translation);
        transform_points_inplace(&mut dst_points, &rotation_inv, &translation_inv);

        for (a, b) in dst_points.iter().zip(src_points.iter()) {
            assert_relative_eq!(a.x, b.x);
            assert_relative_eq!(a.y, b.y);
            assert_relative_eq!(a.z, b.z);
        }
    }
}
