//! Loading of raw keypoint annotations and normalization to `(samples, joints, coords)`.
//!
//! Distributors store the same keypoints with different axis orders, e.g. Leeds
//! Sports Pose ships `coords x joints x samples` while its extended release
//! ships `joints x coords x samples`. Every dataset declares the sequence of
//! [`AxisOp`]s bringing its raw blob to the canonical layout.
use crate::DatasetError;
use matfile::{MatFile, NumericData};
use ndarray::{Array3, ArrayD, IxDyn, ShapeBuilder};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One reordering step applied to a raw annotation array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOp {
    /// Moves the last axis to the front, `(a, b, c) -> (c, a, b)`.
    MoveLastToFront,
    /// Exchanges two axes.
    Swap(usize, usize),
}

impl AxisOp {
    fn apply(self, array: ArrayD<f64>) -> Result<ArrayD<f64>, DatasetError> {
        let ndim = array.ndim();
        match self {
            AxisOp::MoveLastToFront => {
                if ndim == 0 {
                    return Err(DatasetError::FormatError(
                        "cannot move an axis of a scalar".to_string(),
                    ));
                }
                let mut order = Vec::with_capacity(ndim);
                order.push(ndim - 1);
                order.extend(0..ndim - 1);
                Ok(array.permuted_axes(IxDyn(&order)))
            }
            AxisOp::Swap(a, b) => {
                if a >= ndim || b >= ndim {
                    return Err(DatasetError::FormatError(format!(
                        "cannot swap axes {a} and {b} of a {ndim}-d array"
                    )));
                }
                let mut array = array;
                array.swap_axes(a, b);
                Ok(array)
            }
        }
    }
}

/// Reads the numeric variable `name` from a MATLAB level 5 file.
///
/// MAT files are column-major, the returned array has the stored dimensions
/// with the same element at the same multi-index.
pub fn load_raw(path: &Path, name: &str) -> Result<ArrayD<f64>, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mat = MatFile::parse(reader).map_err(|err| {
        DatasetError::FormatError(format!("{}: {err:?}", path.display()))
    })?;
    let array = mat.find_by_name(name).ok_or_else(|| {
        DatasetError::FormatError(format!("{}: no variable named {name}", path.display()))
    })?;

    let data: Vec<f64> = match array.data() {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => real.iter().map(|&v| v as f64).collect(),
        _ => {
            return Err(DatasetError::FormatError(format!(
                "{}: {name} is not a floating point array",
                path.display()
            )))
        }
    };
    let shape = IxDyn(array.size()).f();
    Ok(ArrayD::from_shape_vec(shape, data)?)
}

/// Applies `ops` to `raw` and checks the result against the dataset's joint count.
///
/// The output is in standard (row-major) layout so that per-sample rows are
/// contiguous.
pub fn normalize(
    raw: ArrayD<f64>,
    ops: &[AxisOp],
    num_joints: usize,
) -> Result<Array3<f64>, DatasetError> {
    if raw.ndim() != 3 {
        return Err(DatasetError::FormatError(format!(
            "expected a 3-d annotation array, got shape {:?}",
            raw.shape()
        )));
    }
    let mut array = raw;
    for op in ops {
        array = op.apply(array)?;
    }
    let array = array.into_dimensionality::<ndarray::Ix3>()?;

    let (_, joints, coords) = array.dim();
    if joints != num_joints {
        return Err(DatasetError::FormatError(format!(
            "expected {num_joints} joints, got {joints} (shape {:?})",
            array.shape()
        )));
    }
    if !(2..=3).contains(&coords) {
        return Err(DatasetError::FormatError(format!(
            "expected 2 or 3 coordinates per joint, got {coords}"
        )));
    }
    Ok(array.as_standard_layout().into_owned())
}
