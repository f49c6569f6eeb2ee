//! Train/val/test partitioning by literal, dataset declared index ranges.
use crate::DatasetError;
use log::debug;
use ndarray::{s, Array3};
use std::fmt;
use std::path::PathBuf;

/// A named partition of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Split {
    /// Training samples
    #[default]
    Train,
    /// Validation samples
    Val,
    /// Test samples
    Test,
}

impl Split {
    /// Lowercase name, as used in dataset documentation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half open index range `[start, end)`. `end: None` runs to the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRange {
    /// First index of the split
    pub start: usize,
    /// One past the last index, or `None` for "until the end"
    pub end: Option<usize>,
}

impl SplitRange {
    /// Resolves the range against a dataset of `len` samples, clamping like
    /// slice indexing so that short datasets produce short (or empty) splits.
    pub fn resolve(&self, len: usize) -> std::ops::Range<usize> {
        let end = self.end.unwrap_or(len).min(len);
        let start = self.start.min(end);
        start..end
    }
}

/// How a dataset partitions its samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Only the listed splits exist, each covering a fixed index range.
    Ranges(&'static [(Split, SplitRange)]),
    /// No split is defined: every request returns the whole dataset.
    Unsplit,
}

impl SplitRule {
    /// Checks that `split` can be served, without touching any data.
    pub fn check(&self, dataset: &'static str, split: Split) -> Result<(), DatasetError> {
        match self {
            SplitRule::Ranges(table) => {
                if table.iter().any(|(s, _)| *s == split) {
                    Ok(())
                } else {
                    Err(DatasetError::UnsupportedSplit { dataset, split })
                }
            }
            SplitRule::Unsplit => Ok(()),
        }
    }

    /// The range a split covers in a dataset of `len` samples, `None` when the
    /// rule does not narrow.
    pub fn range(
        &self,
        dataset: &'static str,
        split: Split,
        len: usize,
    ) -> Result<Option<std::ops::Range<usize>>, DatasetError> {
        match self {
            SplitRule::Ranges(table) => table
                .iter()
                .find(|(s, _)| *s == split)
                .map(|(_, range)| Some(range.resolve(len)))
                .ok_or(DatasetError::UnsupportedSplit { dataset, split }),
            SplitRule::Unsplit => Ok(None),
        }
    }

    /// Narrows keypoints and image paths to `split`.
    ///
    /// Returns the narrowed pair together with the split that was effectively
    /// applied, which is `None` for [`SplitRule::Unsplit`].
    pub fn select(
        &self,
        dataset: &'static str,
        split: Split,
        keypoints: Array3<f64>,
        mut image_paths: Vec<PathBuf>,
    ) -> Result<(Array3<f64>, Vec<PathBuf>, Option<Split>), DatasetError> {
        let len = keypoints.shape()[0];
        if len != image_paths.len() {
            return Err(DatasetError::FormatError(format!(
                "{dataset}: {len} annotations for {} images",
                image_paths.len()
            )));
        }
        match self.range(dataset, split, len)? {
            Some(range) => {
                debug!("{dataset}: {split} split covers {range:?} of {len} samples");
                let keypoints = keypoints.slice(s![range.clone(), .., ..]).to_owned();
                image_paths.truncate(range.end);
                image_paths.drain(..range.start);
                Ok((keypoints, image_paths, Some(split)))
            }
            None => Ok((keypoints, image_paths, None)),
        }
    }
}
