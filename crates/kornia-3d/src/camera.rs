use glam::{DVec2, DVec3};
use kornia_image::{Image, ImageSize};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Intrinsic parameters of a rectified pinhole camera.
///
/// A single focal length is shared by both axes. There is no skew and no lens
/// distortion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    /// The focal length in pixels.
    pub focal: f64,
    /// The x coordinate of the principal point in pixels.
    pub cx: f64,
    /// The y coordinate of the principal point in pixels.
    pub cy: f64,
}

impl PinholeIntrinsics {
    /// Creates a new set of intrinsics from the focal length and principal point.
    pub fn new(focal: f64, cx: f64, cy: f64) -> Self {
        Self { focal, cx, cy }
    }
}

impl From<[f64; 3]> for PinholeIntrinsics {
    /// Build from the packed `[f, x0, y0]` layout.
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Back-project a pixel with known depth to camera coordinates.
///
/// The depth is the distance along the camera Z axis. A zero focal length
/// yields non-finite coordinates.
///
/// Example:
///
/// ```
/// use kornia_3d::camera::{pixel_to_3d, PinholeIntrinsics};
///
/// let k = PinholeIntrinsics::new(2.0, 1.0, 1.0);
/// let p = pixel_to_3d(3.0, 1.0, 4.0, &k);
/// assert_eq!(p.to_array(), [4.0, 0.0, 4.0]);
/// ```
#[inline]
pub fn pixel_to_3d(x: f64, y: f64, depth: f64, intrinsics: &PinholeIntrinsics) -> DVec3 {
    let factor = depth / intrinsics.focal;
    DVec3::new(
        (x - intrinsics.cx) * factor,
        (y - intrinsics.cy) * factor,
        depth,
    )
}

/// Project a point in camera coordinates to the image plane.
///
/// Points on the camera plane (Z = 0) yield non-finite pixel coordinates.
#[inline]
pub fn point_3d_to_pixel(point: &DVec3, intrinsics: &PinholeIntrinsics) -> DVec2 {
    DVec2::new(
        intrinsics.focal * point.x / point.z + intrinsics.cx,
        intrinsics.focal * point.y / point.z + intrinsics.cy,
    )
}

/// Integer pixel coordinates of an image, row-major.
///
/// The grid spans `[0, W - 1] x [0, H - 1]` with exactly `W` samples per row
/// and `H` rows.
pub fn pixel_grid(size: ImageSize) -> Vec<DVec2> {
    (0..size.height)
        .flat_map(|y| (0..size.width).map(move |x| DVec2::new(x as f64, y as f64)))
        .collect()
}

/// Back-project every pixel of a depth map, forming a row-major point field.
///
/// Example:
///
/// ```
/// use kornia_3d::camera::{pixels_to_3d, PinholeIntrinsics};
/// use kornia_image::{Image, ImageSize};
///
/// let depth = Image::<f32, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 1.0).unwrap();
/// let points = pixels_to_3d(&depth, &PinholeIntrinsics::new(1.0, 0.0, 0.0));
/// assert_eq!(points[3].to_array(), [1.0, 1.0, 1.0]);
/// ```
pub fn pixels_to_3d(depth: &Image<f32, 1>, intrinsics: &PinholeIntrinsics) -> Vec<DVec3> {
    let cols = depth.cols();
    let mut points = vec![DVec3::ZERO; depth.numel()];
    if cols == 0 {
        return points;
    }

    points
        .par_chunks_exact_mut(cols)
        .zip(depth.as_slice().par_chunks_exact(cols))
        .enumerate()
        .for_each(|(y, (points_row, depth_row))| {
            points_row
                .iter_mut()
                .zip(depth_row.iter())
                .enumerate()
                .for_each(|(x, (point, &d))| {
                    *point = pixel_to_3d(x as f64, y as f64, d as f64, intrinsics);
                });
        });

    points
}

/// Project a set of camera-space points to pixel coordinates.
pub fn points_3d_to_pixels(points: &[DVec3], intrinsics: &PinholeIntrinsics) -> Vec<DVec2> {
    points
        .par_iter()
        .map(|p| point_3d_to_pixel(p, intrinsics))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intrinsics_from_array() {
        let k = PinholeIntrinsics::from([500.0, 320.0, 240.0]);
        assert_eq!(k, PinholeIntrinsics::new(500.0, 320.0, 240.0));
    }

    #[test]
    fn test_project_principal_point() {
        let k = PinholeIntrinsics::new(500.0, 320.0, 240.0);
        let px = point_3d_to_pixel(&DVec3::new(0.0, 0.0, 5.0), &k);
        assert_relative_eq!(px.x, 320.0);
        assert_relative_eq!(px.y, 240.0);

        let px = point_3d_to_pixel(&DVec3::new(1.0, 2.0, 10.0), &k);
        assert_relative_eq!(px.x, 500.0 * 1.0 / 10.0 + 320.0);
        assert_relative_eq!(px.y, 500.0 * 2.0 / 10.0 + 240.0);
    }

    #[test]
    fn test_projection_roundtrip() {
        let k = PinholeIntrinsics::new(721.5, 609.6, 172.9);
        for &(x, y, d) in &[
            (0.0, 0.0, 1.0),
            (1241.0, 375.0, 80.0),
            (609.6, 172.9, 3.5),
            (12.25, 300.5, 0.01),
        ] {
            let p = pixel_to_3d(x, y, d, &k);
            assert_relative_eq!(p.z, d);
            let px = point_3d_to_pixel(&p, &k);
            assert_relative_eq!(px.x, x, epsilon = 1e-9);
            assert_relative_eq!(px.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_degenerate_geometry_is_not_finite() {
        let px = point_3d_to_pixel(
            &DVec3::new(1.0, 1.0, 0.0),
            &PinholeIntrinsics::new(1.0, 0.0, 0.0),
        );
        assert!(!px.x.is_finite());

        let p = pixel_to_3d(1.0, 1.0, 2.0, &PinholeIntrinsics::new(0.0, 0.0, 0.0));
        assert!(!p.x.is_finite());
    }

    #[test]
    fn test_pixel_grid() {
        let grid = pixel_grid(ImageSize {
            width: 3,
            height: 2,
        });
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], DVec2::new(0.0, 0.0));
        assert_eq!(grid[2], DVec2::new(2.0, 0.0));
        assert_eq!(grid[3], DVec2::new(0.0, 1.0));
        assert_eq!(grid[5], DVec2::new(2.0, 1.0));
    }

    #[test]
    fn test_pixels_to_3d_grid() -> Result<(), Box<dyn std::error::Error>> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let depth = Image::<f32, 1>::new(size, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
        let k = PinholeIntrinsics::new(2.0, 1.0, 0.5);
        let points = pixels_to_3d(&depth, &k);
        let pixels = points_3d_to_pixels(&points, &k);

        assert_eq!(points.len(), 6);
        // pixel (2, 1) with depth 6
        assert_relative_eq!(points[5].x, (2.0 - 1.0) * 6.0 / 2.0);
        assert_relative_eq!(points[5].y, (1.0 - 0.5) * 6.0 / 2.0);
        assert_relative_eq!(points[5].z, 6.0);

        for (px, grid) in pixels.iter().zip(pixel_grid(size)) {
            assert_relative_eq!(px.x, grid.x, epsilon = 1e-12);
            assert_relative_eq!(px.y, grid.y, epsilon = 1e-12);
        }
        Ok(())
    }
}
