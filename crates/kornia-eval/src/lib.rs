#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Bounding box containers and IoU.
pub mod boxes;

/// Error types for the evaluation module.
pub mod error;

/// Greedy assignment of detections to ground truth.
pub mod matching;

/// Rotation, translation and pivot error metrics.
pub mod metrics;

use kornia_3d::motion::ObjectMotion;
use serde::{Deserialize, Serialize};

pub use crate::boxes::{iou, BoundingBox, BoxCollection, BoxError, BoxList, IouMatrix};
pub use crate::error::EvalError;
pub use crate::matching::match_detections;
pub use crate::metrics::{motion_errors, pair_errors, MotionErrors, PairErrors};

/// Parameters of the motion evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    /// Minimum IoU for a detection to be matched with a ground truth box.
    pub matching_iou_threshold: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            matching_iou_threshold: 0.5,
        }
    }
}

/// Evaluate detected object motions against the ground truth.
///
/// Detections are matched with [`match_detections`] using [`iou`] and the mean
/// errors of the matched motions are computed with [`motion_errors`].
///
/// # Arguments
///
/// * `gt_boxes` - The ground truth boxes.
/// * `gt_motions` - The ground truth motions, one per ground truth box.
/// * `detected_boxes` - The detected boxes.
/// * `detected_motions` - The predicted motions, one per detected box.
/// * `params` - The evaluation parameters.
///
/// # Errors
///
/// Fails if boxes and motions have different lengths or no detection is matched.
///
/// Example:
///
/// ```
/// use glam::{DMat3, DVec3};
/// use kornia_3d::motion::ObjectMotion;
/// use kornia_eval::{evaluate, BoxList, EvalParams};
///
/// let gt_boxes = BoxList::new(&[[0.0, 0.0, 10.0, 10.0]]).unwrap();
/// let detected_boxes = BoxList::new(&[[0.0, 0.0, 10.0, 9.0]]).unwrap();
/// let gt = ObjectMotion::new(DMat3::IDENTITY, DVec3::new(0.0, 0.0, 2.0), DVec3::ZERO);
/// let pred = ObjectMotion::new(DMat3::IDENTITY, DVec3::new(0.0, 0.0, 1.5), DVec3::ZERO);
///
/// let errors = evaluate(&gt_boxes, &[gt], &detected_boxes, &[pred], &EvalParams::default()).unwrap();
/// assert_eq!(errors.m_trans, 0.5);
/// ```
pub fn evaluate<G, D>(
    gt_boxes: &G,
    gt_motions: &[ObjectMotion],
    detected_boxes: &D,
    detected_motions: &[ObjectMotion],
    params: &EvalParams,
) -> Result<MotionErrors, EvalError>
where
    G: BoxCollection + ?Sized,
    D: BoxCollection + ?Sized,
{
    evaluate_with_iou(
        gt_boxes,
        gt_motions,
        detected_boxes,
        detected_motions,
        params,
        |d: &D, g: &G| Ok(iou(d, g)),
    )
}

/// Same as [`evaluate`] with a custom IoU function.
///
/// `iou_fn(detected, gt)` must return a matrix with shape
/// (num detections, num ground truth). Its errors are returned unchanged.
pub fn evaluate_with_iou<G, D, F>(
    gt_boxes: &G,
    gt_motions: &[ObjectMotion],
    detected_boxes: &D,
    detected_motions: &[ObjectMotion],
    params: &EvalParams,
    iou_fn: F,
) -> Result<MotionErrors, EvalError>
where
    G: BoxCollection + ?Sized,
    D: BoxCollection + ?Sized,
    F: Fn(&D, &G) -> Result<IouMatrix, EvalError>,
{
    if gt_boxes.num_boxes() != gt_motions.len() {
        return Err(EvalError::MismatchedArrayLengths {
            left_name: "gt boxes",
            left_len: gt_boxes.num_boxes(),
            right_name: "gt motions",
            right_len: gt_motions.len(),
        });
    }
    if detected_boxes.num_boxes() != detected_motions.len() {
        return Err(EvalError::MismatchedArrayLengths {
            left_name: "detected boxes",
            left_len: detected_boxes.num_boxes(),
            right_name: "detected motions",
            right_len: detected_motions.len(),
        });
    }

    let matches = match_detections(
        detected_boxes,
        gt_boxes,
        iou_fn,
        params.matching_iou_threshold,
    )?;

    let (pred, target): (Vec<_>, Vec<_>) = matches
        .iter()
        .map(|&(i, j)| (detected_motions[i], gt_motions[j]))
        .unzip();

    motion_errors(&pred, &target)
}
