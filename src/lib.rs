#![deny(missing_docs)]
//! On-demand download and indexed access to human pose keypoint datasets.
//!
//! Datasets are fetched once as a remote archive, extracted into
//! `data_dir/FOLDER_NAME` and then served as `(image, targets)` pairs where the
//! targets hold the keypoints normalized to a `(joints, coords)` array.
//!
//! ```no_run
//! use keypoint_datasets::{Dataset, DatasetOptions, LeedsSport, Split};
//!
//! let options = DatasetOptions::new("/data").split(Split::Test);
//! let dataset = LeedsSport::load(options).unwrap();
//! let (image, targets) = dataset.get(0).unwrap();
//! println!("{:?} {:?}", image.dimensions(), targets.keypoints[0].shape());
//! ```
use std::path::PathBuf;
use thiserror::Error;

pub mod annotations;
pub mod fetch;
pub mod install;
mod keypoints;
mod leeds_sport;
pub mod split;
#[cfg(test)]
mod test_utils;

pub use fetch::{Fetch, HttpFetcher, HttpFetcherBuilder};
pub use install::ensure_installed;
pub use keypoints::{DatasetOptions, KeypointDataset, Targets, Transform};
pub use leeds_sport::{DatasetInfo, Joint, LeedsSport, LeedsSportExtended};
pub use split::{Split, SplitRule};

/// The default trait to implement to get the simplest API
pub trait Dataset {
    /// The type of objects contained in the dataset
    type Item;

    /// The length of the dataset
    fn len(&self) -> usize;

    /// Whether the dataset holds no samples
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get item at specific index. Fails with [`DatasetError::IndexOutOfRange`]
    /// if and only if `index >= dataset.len()`.
    fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;
}

/// Generic structure to iterate over [`Dataset`].
pub struct DatasetIterator<'a, D> {
    dataset: &'a D,
    index: usize,
}

/// Iterate of the dataset in order
pub fn iter<D: Dataset>(dataset: &D) -> DatasetIterator<'_, D> {
    DatasetIterator { dataset, index: 0 }
}

impl<'a, D: Dataset> Iterator for DatasetIterator<'a, D> {
    type Item = Result<D::Item, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.dataset.len() {
            return None;
        }
        let object = self.dataset.get(self.index);
        self.index += 1;
        Some(object)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// Error type for datasets
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Error in the request
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} answered with status {status}")]
    HttpStatus {
        /// The requested url
        url: String,
        /// The returned status
        status: reqwest::StatusCode,
    },

    /// The downloaded archive could not be extracted
    #[error("zip error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// The dataset does not define the requested split
    #[error("{dataset} does not have a {split} split")]
    UnsupportedSplit {
        /// Name of the dataset
        dataset: &'static str,
        /// The requested split
        split: Split,
    },

    /// Annotation or file layout doesn't have the expected structure
    #[error("format error: {0}")]
    FormatError(String),

    /// Lookup outside `[0, len)`
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The dataset length
        len: usize,
    },

    /// IO error
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// The image could not be decoded
    #[error("image error: {}: {source}", path.display())]
    ImageError {
        /// Path of the image
        path: PathBuf,
        /// Decoding error
        source: image::ImageError,
    },

    /// Invalid glob pattern
    #[error("glob pattern error: {0}")]
    PatternError(#[from] glob::PatternError),

    /// A path matched by glob could not be read
    #[error("glob error: {0}")]
    GlobError(#[from] glob::GlobError),

    /// The annotation array could not take the requested shape
    #[error("shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}
