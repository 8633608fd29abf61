use kornia_3d::motion::ObjectMotion;
use kornia_3d::transforms::rotation_angle;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Errors of one predicted motion against its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairErrors {
    /// Angle of the relative rotation `R^T * Rg` in radians.
    pub rot: f64,
    /// Norm of the translation residual in the predicted frame, `|R^T * (tg - t)|`.
    pub trans: f64,
    /// Distance between the pivots.
    pub pivot: f64,
    /// Rotation error relative to the target rotation angle.
    pub rel_rot: f64,
    /// Translation error relative to the target translation norm.
    pub rel_trans: f64,
}

/// Compute the errors of a predicted motion against its target.
///
/// The relative errors divide by the target rotation angle and translation norm
/// and are not finite for a target at rest.
pub fn pair_errors(pred: &ObjectMotion, target: &ObjectMotion) -> PairErrors {
    let rot_t = pred.rotation.transpose();
    let d_rot = rot_t * target.rotation;
    let d_trans = rot_t * (target.translation - pred.translation);
    let d_pivot = target.pivot - pred.pivot;

    let rot = rotation_angle(&d_rot);
    let trans = d_trans.length();

    PairErrors {
        rot,
        trans,
        pivot: d_pivot.length(),
        rel_rot: rot / rotation_angle(&target.rotation),
        rel_trans: trans / target.translation.length(),
    }
}

/// Mean motion errors over a set of matched predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionErrors {
    /// Mean rotation error in radians.
    #[serde(rename = "mRot")]
    pub m_rot: f64,
    /// Mean translation error.
    #[serde(rename = "mTrans")]
    pub m_trans: f64,
    /// Mean pivot error.
    #[serde(rename = "mPivot")]
    pub m_pivot: f64,
    /// Mean relative rotation error.
    #[serde(rename = "mRelRot")]
    pub m_rel_rot: f64,
    /// Mean relative translation error.
    #[serde(rename = "mRelTrans")]
    pub m_rel_trans: f64,
}

/// Compute the mean motion errors of matched predicted and target motions.
///
/// # Arguments
///
/// * `pred` - The predicted motions.
/// * `target` - The target motions, `target[i]` is matched with `pred[i]`.
///
/// # Errors
///
/// Fails if the slices have different lengths or are empty.
///
/// Example:
///
/// ```
/// use glam::{DMat3, DVec3};
/// use kornia_3d::motion::ObjectMotion;
/// use kornia_eval::metrics::motion_errors;
///
/// let target = ObjectMotion::new(DMat3::IDENTITY, DVec3::new(2.0, 0.0, 0.0), DVec3::ZERO);
/// let pred = ObjectMotion::new(DMat3::IDENTITY, DVec3::new(1.0, 0.0, 0.0), DVec3::Z);
///
/// let errors = motion_errors(&[pred], &[target]).unwrap();
/// assert_eq!(errors.m_trans, 1.0);
/// assert_eq!(errors.m_pivot, 1.0);
/// assert_eq!(errors.m_rel_trans, 0.5);
/// ```
pub fn motion_errors(
    pred: &[ObjectMotion],
    target: &[ObjectMotion],
) -> Result<MotionErrors, EvalError> {
    if pred.len() != target.len() {
        return Err(EvalError::MismatchedArrayLengths {
            left_name: "pred",
            left_len: pred.len(),
            right_name: "target",
            right_len: target.len(),
        });
    }

    if pred.is_empty() {
        return Err(EvalError::EmptyMatchSet);
    }

    let mut sum = [0.0f64; 5];
    for (i, (p, t)) in pred.iter().zip(target.iter()).enumerate() {
        let e = pair_errors(p, t);
        if !e.rel_rot.is_finite() || !e.rel_trans.is_finite() {
            log::warn!(
                "pair {i}: non-finite relative error (rel_rot {}, rel_trans {}), target close to rest",
                e.rel_rot,
                e.rel_trans
            );
        }
        sum[0] += e.rot;
        sum[1] += e.trans;
        sum[2] += e.pivot;
        sum[3] += e.rel_rot;
        sum[4] += e.rel_trans;
    }

    let n = pred.len() as f64;
    Ok(MotionErrors {
        m_rot: sum[0] / n,
        m_trans: sum[1] / n,
        m_pivot: sum[2] / n,
        m_rel_rot: sum[3] / n,
        m_rel_trans: sum[4] / n,
    })
}
