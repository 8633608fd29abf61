use crate::boxes::{BoxCollection, IouMatrix};
use crate::error::EvalError;

/// Index of the first maximum of a row, `None` for an empty row.
///
/// NaN entries never compare greater, so they are skipped unless first.
fn argmax(row: &[f64]) -> Option<(usize, f64)> {
    let (&first, rest) = row.split_first()?;
    let mut best = (0, first);
    for (j, &v) in rest.iter().enumerate() {
        if v > best.1 {
            best = (j + 1, v);
        }
    }
    Some(best)
}

/// Assign every detection to the ground truth box it overlaps the most.
///
/// For each detection `i`, in index order, the ground truth `j` with the largest
/// IoU is selected, the lowest index winning ties. The pair `(i, j)` is kept if
/// the IoU reaches `threshold`, otherwise the detection is left unmatched.
/// Several detections may be assigned to the same ground truth box.
///
/// # Arguments
///
/// * `detected` - The detected boxes.
/// * `gt` - The ground truth boxes.
/// * `iou_fn` - Computes the IoU matrix with shape (num detections, num ground truth).
///   Its errors are returned unchanged.
/// * `threshold` - Minimum IoU of a match.
///
/// # Returns
///
/// Vector of `(detection, ground truth)` index pairs, ordered by detection.
///
/// # Errors
///
/// Fails if `iou_fn` fails or the IoU matrix shape does not match the box collections.
///
/// Example:
///
/// ```
/// use kornia_eval::boxes::{iou, BoxList};
/// use kornia_eval::matching::match_detections;
///
/// let gt = BoxList::new(&[[0.0, 0.0, 10.0, 10.0], [20.0, 20.0, 30.0, 30.0]]).unwrap();
/// let detected = BoxList::new(&[[21.0, 20.0, 30.0, 30.0], [50.0, 50.0, 60.0, 60.0]]).unwrap();
///
/// let matches =
///     match_detections(&detected, &gt, |d: &BoxList, g: &BoxList| Ok(iou(d, g)), 0.5).unwrap();
/// assert_eq!(matches, vec![(0, 1)]);
/// ```
pub fn match_detections<D, G, F>(
    detected: &D,
    gt: &G,
    iou_fn: F,
    threshold: f64,
) -> Result<Vec<(usize, usize)>, EvalError>
where
    D: BoxCollection + ?Sized,
    G: BoxCollection + ?Sized,
    F: Fn(&D, &G) -> Result<IouMatrix, EvalError>,
{
    let iou = iou_fn(detected, gt)?;

    if iou.rows() != detected.num_boxes() {
        return Err(EvalError::MismatchedArrayLengths {
            left_name: "iou rows",
            left_len: iou.rows(),
            right_name: "detected boxes",
            right_len: detected.num_boxes(),
        });
    }
    if iou.cols() != gt.num_boxes() {
        return Err(EvalError::MismatchedArrayLengths {
            left_name: "iou cols",
            left_len: iou.cols(),
            right_name: "gt boxes",
            right_len: gt.num_boxes(),
        });
    }

    let mut matches = Vec::with_capacity(iou.rows());
    for i in 0..iou.rows() {
        match argmax(iou.row(i)) {
            Some((j, overlap)) if overlap >= threshold => matches.push((i, j)),
            Some((j, overlap)) => {
                log::debug!("detection {i} dropped: best overlap {overlap:.3} with gt {j}");
            }
            None => log::debug!("detection {i} dropped: no ground truth boxes"),
        }
    }

    log::debug!(
        "matched {} of {} detections at iou >= {}",
        matches.len(),
        iou.rows(),
        threshold
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{iou, BoxList};

    fn single_gt_iou(
        values: Vec<f64>,
    ) -> impl Fn(&BoxList, &BoxList) -> Result<IouMatrix, EvalError> {
        move |_: &BoxList, _: &BoxList| IouMatrix::new(values.len(), 1, values.clone())
    }

    fn builtin_iou(d: &BoxList, g: &BoxList) -> Result<IouMatrix, EvalError> {
        Ok(iou(d, g))
    }

    fn unit_boxes(n: usize) -> BoxList {
        BoxList::new(&vec![[0.0, 0.0, 1.0, 1.0]; n]).unwrap()
    }

    #[test]
    fn test_argmax_first_max() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[0.2, f64::NAN, 0.4]), Some((2, 0.4)));
        assert_eq!(argmax(&[0.2, 0.7, 0.7, 0.1]), Some((1, 0.7)));
        assert_eq!(argmax(&[0.0, 0.0]), Some((0, 0.0)));
    }

    #[test]
    fn test_match_threshold() -> Result<(), EvalError> {
        let matches = match_detections(
            &unit_boxes(3),
            &unit_boxes(1),
            single_gt_iou(vec![0.9, 0.3, 0.6]),
            0.5,
        )?;
        assert_eq!(matches, vec![(0, 0), (2, 0)]);
        Ok(())
    }

    #[test]
    fn test_match_threshold_inclusive() -> Result<(), EvalError> {
        let matches = match_detections(
            &unit_boxes(2),
            &unit_boxes(1),
            single_gt_iou(vec![0.5, 0.4999]),
            0.5,
        )?;
        assert_eq!(matches, vec![(0, 0)]);
        Ok(())
    }

    #[test]
    fn test_duplicate_assignments_are_kept() -> Result<(), Box<dyn std::error::Error>> {
        let gt = BoxList::new(&[[0.0, 0.0, 10.0, 10.0], [0.0, 20.0, 10.0, 30.0]])?;
        let detected = BoxList::new(&[
            [0.0, 0.0, 10.0, 9.0],
            [0.0, 1.0, 10.0, 10.0],
            [0.0, 19.0, 10.0, 30.0],
        ])?;
        let matches = match_detections(&detected, &gt, builtin_iou, 0.5)?;
        assert_eq!(matches, vec![(0, 0), (1, 0), (2, 1)]);
        Ok(())
    }

    #[test]
    fn test_no_ground_truth() -> Result<(), EvalError> {
        let matches = match_detections(&unit_boxes(2), &BoxList::default(), builtin_iou, 0.5)?;
        assert!(matches.is_empty());
        Ok(())
    }

    #[test]
    fn test_iou_fn_error_is_returned() {
        let res = match_detections(
            &unit_boxes(2),
            &unit_boxes(2),
            |_: &BoxList, _: &BoxList| IouMatrix::new(2, 2, vec![0.9, 0.3, 0.6]),
            0.5,
        );
        assert_eq!(
            res,
            Err(EvalError::MismatchedArrayLengths {
                left_name: "iou values",
                left_len: 3,
                right_name: "rows * cols",
                right_len: 4,
            })
        );
    }

    #[test]
    fn test_iou_shape_mismatch() {
        let res = match_detections(
            &unit_boxes(2),
            &unit_boxes(1),
            single_gt_iou(vec![0.9, 0.3, 0.6]),
            0.5,
        );
        assert_eq!(
            res,
            Err(EvalError::MismatchedArrayLengths {
                left_name: "iou rows",
                left_len: 3,
                right_name: "detected boxes",
                right_len: 2,
            })
        );
    }
}
