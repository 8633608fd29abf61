use glam::DVec3;
use kornia_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

use crate::camera::{pixels_to_3d, point_3d_to_pixel, PinholeIntrinsics};
use crate::linalg::transform_points_inplace;
use crate::motion::{CameraMotion, MotionError, ObjectMotion};

/// Error types for the flow synthesis.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FlowError {
    /// Invalid input data - mismatched array lengths with descriptive labels.
    #[error("Mismatched array lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    MismatchedArrayLengths {
        /// Label for the left-hand slice.
        left_name: &'static str,
        /// Length of the left-hand slice.
        left_len: usize,
        /// Label for the right-hand slice.
        right_name: &'static str,
        /// Length of the right-hand slice.
        right_len: usize,
    },

    /// A mask does not cover the same pixels as the depth map.
    #[error("Mask {index} has size {actual}, expected {expected}")]
    MaskSizeMismatch {
        /// Index of the offending mask.
        index: usize,
        /// Size of the depth map.
        expected: ImageSize,
        /// Size of the mask.
        actual: ImageSize,
    },

    /// A packed motion vector could not be unpacked.
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// The output image could not be assembled.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Compute the optical flow induced by object and camera motion.
///
/// Every pixel is back-projected with its depth. Each object motion is then
/// blended into the point field in index order, weighted by its mask:
/// `P <- P + mask * (M(P) - P)`. Overlapping masks compose, a later object moves
/// the points already moved by an earlier one. The camera motion is applied to
/// the whole field and the points are projected back to the image.
///
/// Points with a mask weight of exactly zero are left untouched, so a motion
/// with non-finite values only affects the pixels inside its mask.
///
/// # Arguments
///
/// * `depth` - The depth map with shape (H, W), depth along the camera Z axis.
/// * `motions` - The N object motions.
/// * `masks` - The N object masks with shape (H, W), used as blending weights.
/// * `camera_motion` - The camera motion.
/// * `intrinsics` - The pinhole camera intrinsics.
///
/// # Returns
///
/// The flow with shape (H, W, 2), displacement in x and y.
///
/// # Errors
///
/// Fails if the number of masks and motions differ or a mask size differs from
/// the depth size.
///
/// Example:
///
/// ```
/// use kornia_3d::camera::PinholeIntrinsics;
/// use kornia_3d::flow::dense_flow_from_motion;
/// use kornia_3d::motion::CameraMotion;
/// use kornia_image::{Image, ImageSize};
///
/// let depth = Image::<f32, 1>::from_size_val(ImageSize { width: 4, height: 3 }, 10.0).unwrap();
/// let camera = CameraMotion::new(glam::DMat3::IDENTITY, glam::DVec3::X);
/// let intrinsics = PinholeIntrinsics::new(1.0, 0.0, 0.0);
///
/// let flow = dense_flow_from_motion(&depth, &[], &[], &camera, &intrinsics).unwrap();
/// assert_eq!(flow.get_pixel(2, 1, 0).unwrap(), 0.1);
/// ```
pub fn dense_flow_from_motion(
    depth: &Image<f32, 1>,
    motions: &[ObjectMotion],
    masks: &[Image<f32, 1>],
    camera_motion: &CameraMotion,
    intrinsics: &PinholeIntrinsics,
) -> Result<Image<f32, 2>, FlowError> {
    if motions.len() != masks.len() {
        return Err(FlowError::MismatchedArrayLengths {
            left_name: "motions",
            left_len: motions.len(),
            right_name: "masks",
            right_len: masks.len(),
        });
    }

    let size = depth.size();
    for (index, mask) in masks.iter().enumerate() {
        if mask.size() != size {
            return Err(FlowError::MaskSizeMismatch {
                index,
                expected: size,
                actual: mask.size(),
            });
        }
    }

    log::debug!(
        "dense flow: {} with {} objects",
        size,
        motions.len()
    );

    let mut points = pixels_to_3d(depth, intrinsics);

    // sequential over objects, each blend reads the already moved field
    for (motion, mask) in motions.iter().zip(masks.iter()) {
        blend_motion(&mut points, motion, mask.as_slice());
    }

    transform_points_inplace(
        &mut points,
        &camera_motion.rotation,
        &camera_motion.translation,
    );

    let mut flow = vec![0f32; size.num_pixels() * 2];
    if size.width > 0 {
        flow.par_chunks_exact_mut(size.width * 2)
            .zip(points.par_chunks_exact(size.width))
            .enumerate()
            .for_each(|(y, (flow_row, points_row))| {
                flow_row
                    .chunks_exact_mut(2)
                    .zip(points_row.iter())
                    .enumerate()
                    .for_each(|(x, (uv, p))| {
                        let px = point_3d_to_pixel(p, intrinsics);
                        uv[0] = (px.x - x as f64) as f32;
                        uv[1] = (px.y - y as f64) as f32;
                    });
            });
    }

    Ok(Image::new(size, flow)?)
}

/// Same as [`dense_flow_from_motion`] with packed motion vectors.
///
/// # Arguments
///
/// * `motions` - The N object motions, 15 values each.
/// * `camera_motion` - The camera motion, 12 values.
/// * `intrinsics` - The packed `[f, x0, y0]` intrinsics.
pub fn dense_flow_from_motion_params<M: AsRef<[f64]>>(
    depth: &Image<f32, 1>,
    motions: &[M],
    masks: &[Image<f32, 1>],
    camera_motion: &[f64],
    intrinsics: [f64; 3],
) -> Result<Image<f32, 2>, FlowError> {
    let motions = motions
        .iter()
        .map(|m| ObjectMotion::from_slice(m.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let camera_motion = CameraMotion::from_slice(camera_motion)?;

    dense_flow_from_motion(
        depth,
        &motions,
        masks,
        &camera_motion,
        &PinholeIntrinsics::from(intrinsics),
    )
}

/// Blend one rigid motion into the point field with per-point weights.
///
/// Weights outside `[0, 1]` extrapolate, they are not clamped.
fn blend_motion(points: &mut [DVec3], motion: &ObjectMotion, weights: &[f32]) {
    points
        .par_iter_mut()
        .zip(weights.par_iter())
        .for_each(|(p, &w)| {
            if w == 0.0 {
                return;
            }
            let moved = motion.transform_point(*p);
            *p += w as f64 * (moved - *p);
        });
}
