use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Error types for bounding box containers.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BoxError {
    /// The box has non-finite coordinates or its min corner exceeds its max corner.
    #[error("Invalid box at index {index}: {coords:?}")]
    InvalidBox {
        /// Index of the box in the input.
        index: usize,
        /// Coordinates as `[ymin, xmin, ymax, xmax]`.
        coords: [f64; 4],
    },
}

/// An axis-aligned bounding box in pixel coordinates.
///
/// Coordinates follow the detection convention `[ymin, xmin, ymax, xmax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top edge.
    pub ymin: f64,
    /// Left edge.
    pub xmin: f64,
    /// Bottom edge.
    pub ymax: f64,
    /// Right edge.
    pub xmax: f64,
}

impl BoundingBox {
    /// Creates a box from its `[ymin, xmin, ymax, xmax]` coordinates.
    pub fn from_array(coords: [f64; 4]) -> Self {
        Self {
            ymin: coords[0],
            xmin: coords[1],
            ymax: coords[2],
            xmax: coords[3],
        }
    }

    /// Coordinates as `[ymin, xmin, ymax, xmax]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.ymin, self.xmin, self.ymax, self.xmax]
    }

    /// Extent along the y axis.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Extent along the x axis.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Area of the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.height() * self.width()
    }

    /// Area of the overlap with another box, zero when disjoint.
    pub fn intersection(&self, other: &BoundingBox) -> f64 {
        let h = (self.ymax.min(other.ymax) - self.ymin.max(other.ymin)).max(0.0);
        let w = (self.xmax.min(other.xmax) - self.xmin.max(other.xmin)).max(0.0);
        h * w
    }

    /// Intersection over union with another box.
    ///
    /// Two boxes with zero union have an IoU of zero.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let intersection = self.intersection(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    fn is_valid(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
            && self.ymin <= self.ymax
            && self.xmin <= self.xmax
    }
}

/// An ordered collection of boxes, indexable by position.
pub trait BoxCollection {
    /// Number of boxes in the collection.
    fn num_boxes(&self) -> usize;

    /// The box at `index`.
    ///
    /// PRECONDITION: `index < self.num_boxes()`.
    fn get(&self, index: usize) -> BoundingBox;
}

impl BoxCollection for [BoundingBox] {
    fn num_boxes(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> BoundingBox {
        self[index]
    }
}

/// A validated list of bounding boxes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxList {
    boxes: Vec<BoundingBox>,
}

impl BoxList {
    /// Build a list from `[ymin, xmin, ymax, xmax]` rows.
    ///
    /// # Errors
    ///
    /// Fails on the first box with non-finite coordinates or an inverted corner.
    ///
    /// Example:
    ///
    /// ```
    /// use kornia_eval::boxes::{BoxCollection, BoxList};
    ///
    /// let boxes = BoxList::new(&[[0.0, 0.0, 10.0, 10.0], [5.0, 5.0, 15.0, 20.0]]).unwrap();
    /// assert_eq!(boxes.num_boxes(), 2);
    /// assert!(BoxList::new(&[[10.0, 0.0, 0.0, 10.0]]).is_err());
    /// ```
    pub fn new(coords: &[[f64; 4]]) -> Result<Self, BoxError> {
        let boxes = coords
            .iter()
            .enumerate()
            .map(|(index, c)| {
                let b = BoundingBox::from_array(*c);
                match b.is_valid() {
                    true => Ok(b),
                    false => Err(BoxError::InvalidBox { index, coords: *c }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { boxes })
    }

    /// Get as reference the boxes in the list.
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    /// Number of boxes in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl BoxCollection for BoxList {
    fn num_boxes(&self) -> usize {
        self.boxes.len()
    }

    fn get(&self, index: usize) -> BoundingBox {
        self.boxes[index]
    }
}

/// Dense matrix of pairwise IoU values, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct IouMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl IouMatrix {
    /// Creates a matrix from row-major values.
    ///
    /// # Errors
    ///
    /// Fails if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, EvalError> {
        if data.len() != rows * cols {
            return Err(EvalError::MismatchedArrayLengths {
                left_name: "iou values",
                left_len: data.len(),
                right_name: "rows * cols",
                right_len: rows * cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of boxes in the first set.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of boxes in the second set.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The IoU between box `i` of the first set and box `j` of the second.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// All IoU values of box `i` of the first set.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
}

/// Compute the pairwise IoU between two box collections.
///
/// Example:
///
/// ```
/// use kornia_eval::boxes::{iou, BoxList};
///
/// let a = BoxList::new(&[[0.0, 0.0, 2.0, 2.0]]).unwrap();
/// let b = BoxList::new(&[[0.0, 0.0, 2.0, 2.0], [1.0, 0.0, 3.0, 2.0]]).unwrap();
/// let m = iou(&a, &b);
/// assert_eq!(m.row(0), &[1.0, 2.0 / 6.0]);
/// ```
pub fn iou<A, B>(boxes_a: &A, boxes_b: &B) -> IouMatrix
where
    A: BoxCollection + ?Sized,
    B: BoxCollection + ?Sized,
{
    let (n, m) = (boxes_a.num_boxes(), boxes_b.num_boxes());
    let mut data = Vec::with_capacity(n * m);
    for i in 0..n {
        let a = boxes_a.get(i);
        for j in 0..m {
            data.push(a.iou(&boxes_b.get(j)));
        }
    }
    IouMatrix {
        rows: n,
        cols: m,
        data,
    }
}
