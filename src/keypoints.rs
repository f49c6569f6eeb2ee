//! Indexed `(image, keypoints)` access to an installed dataset.
use crate::annotations::{load_raw, normalize};
use crate::install::ensure_installed;
use crate::{Dataset, DatasetError, DatasetInfo, Fetch, HttpFetcher, Split};
use image::RgbImage;
use log::info;
use ndarray::{Array2, Array3, Axis};
use std::fmt;
use std::path::{Path, PathBuf};

/// Per-sample targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Targets {
    /// One `(joints, coords)` array per person. Single person datasets always
    /// hold exactly one.
    pub keypoints: Vec<Array2<f64>>,
}

/// Hook applied to every sample at lookup time.
pub type Transform = Box<dyn Fn(RgbImage, Targets) -> (RgbImage, Targets) + Send + Sync>;

/// How to build a [`KeypointDataset`].
pub struct DatasetOptions {
    data_dir: PathBuf,
    split: Split,
    transform: Option<Transform>,
}

impl DatasetOptions {
    /// Datasets are installed below `data_dir`; split defaults to
    /// [`Split::Train`], no transform.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            split: Split::default(),
            transform: None,
        }
    }

    /// Which split to load.
    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// Function applied to `(image, targets)` on every lookup.
    pub fn transform<T>(mut self, transform: T) -> Self
    where
        T: Fn(RgbImage, Targets) -> (RgbImage, Targets) + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Directory holding the dataset folders.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl fmt::Debug for DatasetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetOptions")
            .field("data_dir", &self.data_dir)
            .field("split", &self.split)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Images of a keypoint dataset paired with their normalized annotations.
///
/// Row `i` of [`keypoints`](Self::keypoints) belongs to
/// [`image_paths`](Self::image_paths)`[i]`. Images are decoded on every
/// [`get`](Dataset::get), nothing is cached.
pub struct KeypointDataset {
    info: &'static DatasetInfo,
    root: PathBuf,
    split: Option<Split>,
    keypoints: Array3<f64>,
    image_paths: Vec<PathBuf>,
    transform: Option<Transform>,
}

impl KeypointDataset {
    /// Loads the dataset described by `info`, downloading it over HTTP if it
    /// isn't installed yet.
    pub fn load(
        info: &'static DatasetInfo,
        options: DatasetOptions,
    ) -> Result<Self, DatasetError> {
        // Skip building a client when nothing needs to be downloaded
        if options.data_dir.join(info.folder_name).exists() {
            return Self::load_installed(info, options);
        }
        let fetcher = HttpFetcher::new()?;
        Self::load_with(&fetcher, info, options)
    }

    /// Same as [`load`](Self::load), downloading through `fetcher`.
    pub fn load_with<F: Fetch + ?Sized>(
        fetcher: &F,
        info: &'static DatasetInfo,
        options: DatasetOptions,
    ) -> Result<Self, DatasetError> {
        // Reject unknown splits before paying for a download
        info.split_rule.check(info.name, options.split)?;
        ensure_installed(fetcher, &options.data_dir, info.folder_name, info.source_url)?;
        Self::load_installed(info, options)
    }

    fn load_installed(
        info: &'static DatasetInfo,
        options: DatasetOptions,
    ) -> Result<Self, DatasetError> {
        let DatasetOptions {
            data_dir,
            split,
            transform,
        } = options;
        info.split_rule.check(info.name, split)?;
        let root = data_dir.join(info.folder_name);

        let raw = load_raw(&root.join(info.annotation_file), info.annotation_variable)?;
        let keypoints = normalize(raw, info.axis_ops, info.num_joints)?;
        let image_paths = image_paths(&root.join(info.image_dir), info.image_extension)?;
        let (keypoints, image_paths, split) = info
            .split_rule
            .select(info.name, split, keypoints, image_paths)?;

        info!(
            "Loaded {} samples of {} from {}",
            image_paths.len(),
            info.name,
            root.display()
        );
        Ok(Self {
            info,
            root,
            split,
            keypoints,
            image_paths,
            transform,
        })
    }

    /// The dataset description this was loaded from.
    pub fn info(&self) -> &'static DatasetInfo {
        self.info
    }

    /// Installation directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The split applied, `None` when the dataset defines no split.
    pub fn split(&self) -> Option<Split> {
        self.split
    }

    /// `(samples, joints, coords)` array.
    pub fn keypoints(&self) -> &Array3<f64> {
        &self.keypoints
    }

    /// Image files, in sample order.
    pub fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }
}

impl Dataset for KeypointDataset {
    type Item = (RgbImage, Targets);

    fn len(&self) -> usize {
        self.keypoints.len_of(Axis(0))
    }

    fn get(&self, index: usize) -> Result<Self::Item, DatasetError> {
        let path = self
            .image_paths
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        let image = image::open(path)
            .map_err(|source| DatasetError::ImageError {
                path: path.clone(),
                source,
            })?
            .to_rgb8();
        let targets = Targets {
            keypoints: vec![self.keypoints.index_axis(Axis(0), index).to_owned()],
        };
        Ok(match &self.transform {
            Some(transform) => transform(image, targets),
            None => (image, targets),
        })
    }
}

impl fmt::Debug for KeypointDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypointDataset")
            .field("name", &self.info.name)
            .field("root", &self.root)
            .field("split", &self.split)
            .field("len", &self.len())
            .finish()
    }
}

/// Files in `dir` with the given extension, ordered by the number ending their
/// stem. Suffixes aren't consistently zero padded, so `im2` must come before
/// `im10`.
pub(crate) fn image_paths(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, DatasetError> {
    let dir_str = dir.to_str().ok_or_else(|| {
        DatasetError::FormatError(format!("{} is not valid unicode", dir.display()))
    })?;
    let pattern = format!("{}/*.{extension}", glob::Pattern::escape(dir_str));
    let mut numbered = Vec::new();
    for path in glob::glob(&pattern)? {
        let path = path?;
        let number = numeric_suffix(&path)?;
        numbered.push((number, path));
    }
    numbered.sort();
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

fn numeric_suffix(path: &Path) -> Result<u64, DatasetError> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let suffix = &stem[stem.trim_end_matches(|c: char| c.is_ascii_digit()).len()..];
    if suffix.is_empty() {
        return Err(DatasetError::FormatError(format!(
            "{} has no numeric suffix to order by",
            path.display()
        )));
    }
    suffix.parse().map_err(|err| {
        DatasetError::FormatError(format!(
            "{}: numeric suffix {suffix} is unusable: {err}",
            path.display()
        ))
    })
}
