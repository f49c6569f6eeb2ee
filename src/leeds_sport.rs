//! Leeds Sports Pose dataset descriptions and joint names.
use crate::annotations::AxisOp;
use crate::split::{SplitRange, SplitRule};
use crate::{DatasetError, DatasetOptions, Fetch, KeypointDataset, Split};

/// Everything the generic pipeline needs to know about one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetInfo {
    /// Human readable name, used in logs and errors
    pub name: &'static str,
    /// Folder created under the data directory
    pub folder_name: &'static str,
    /// Zip archive holding the dataset
    pub source_url: &'static str,
    /// MAT file with the annotations, relative to the folder
    pub annotation_file: &'static str,
    /// Variable of the MAT file holding the keypoints
    pub annotation_variable: &'static str,
    /// Directory holding the images, relative to the folder
    pub image_dir: &'static str,
    /// Extension of the image files
    pub image_extension: &'static str,
    /// Number of annotated joints per person
    pub num_joints: usize,
    /// Steps bringing the raw annotations to `(samples, joints, coords)`
    pub axis_ops: &'static [AxisOp],
    /// How samples are split
    pub split_rule: SplitRule,
}

/// Leeds Sports Pose, 2000 images of 14 annotated joints.
///
/// The first 1000 images are the training set, the remaining ones the test
/// set. There is no validation split.
#[derive(Debug)]
pub struct LeedsSport;

impl LeedsSport {
    /// Dataset description
    pub const INFO: DatasetInfo = DatasetInfo {
        name: "Leeds Sports Pose",
        folder_name: "lsp_dataset_original",
        source_url: "https://sam.johnson.io/research/lsp_dataset_original.zip",
        annotation_file: "joints.mat",
        annotation_variable: "joints",
        image_dir: "images",
        image_extension: "jpg",
        num_joints: 14,
        // stored as 3 x 14 x 2000
        axis_ops: &[AxisOp::MoveLastToFront, AxisOp::Swap(1, 2)],
        split_rule: SplitRule::Ranges(&[
            (
                Split::Train,
                SplitRange {
                    start: 0,
                    end: Some(1000),
                },
            ),
            (
                Split::Test,
                SplitRange {
                    start: 1000,
                    end: None,
                },
            ),
        ]),
    };

    /// Loads the dataset, downloading it first if needed.
    pub fn load(options: DatasetOptions) -> Result<KeypointDataset, DatasetError> {
        KeypointDataset::load(&Self::INFO, options)
    }

    /// Loads the dataset, downloading through `fetcher` if needed.
    pub fn load_with<F: Fetch + ?Sized>(
        fetcher: &F,
        options: DatasetOptions,
    ) -> Result<KeypointDataset, DatasetError> {
        KeypointDataset::load_with(fetcher, &Self::INFO, options)
    }
}

/// Leeds Sports Pose Extended, 10000 training images of 14 joints.
///
/// No split is applied: every requested split yields all samples.
#[derive(Debug)]
pub struct LeedsSportExtended;

impl LeedsSportExtended {
    /// Dataset description
    pub const INFO: DatasetInfo = DatasetInfo {
        name: "Leeds Sports Pose Extended",
        folder_name: "lsp_dataset_extended",
        source_url: "https://sam.johnson.io/research/lspet_dataset.zip",
        annotation_file: "joints.mat",
        annotation_variable: "joints",
        image_dir: "images",
        image_extension: "jpg",
        num_joints: 14,
        // stored as 14 x 3 x 10000
        axis_ops: &[
            AxisOp::MoveLastToFront,
            AxisOp::Swap(1, 2),
            AxisOp::Swap(1, 2),
        ],
        split_rule: SplitRule::Unsplit,
    };

    /// Loads the dataset, downloading it first if needed.
    pub fn load(options: DatasetOptions) -> Result<KeypointDataset, DatasetError> {
        KeypointDataset::load(&Self::INFO, options)
    }

    /// Loads the dataset, downloading through `fetcher` if needed.
    pub fn load_with<F: Fetch + ?Sized>(
        fetcher: &F,
        options: DatasetOptions,
    ) -> Result<KeypointDataset, DatasetError> {
        KeypointDataset::load_with(fetcher, &Self::INFO, options)
    }
}

/// The 14 joints of both Leeds Sports Pose releases, in annotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    /// Right ankle
    RightAnkle,
    /// Right knee
    RightKnee,
    /// Right hip
    RightHip,
    /// Left hip
    LeftHip,
    /// Left knee
    LeftKnee,
    /// Left ankle
    LeftAnkle,
    /// Right wrist
    RightWrist,
    /// Right elbow
    RightElbow,
    /// Right shoulder
    RightShoulder,
    /// Left shoulder
    LeftShoulder,
    /// Left elbow
    LeftElbow,
    /// Left wrist
    LeftWrist,
    /// Neck
    Neck,
    /// Top of the head
    HeadTop,
}

impl Joint {
    /// All joints, ordered like the second axis of the keypoints.
    pub const ALL: [Joint; 14] = [
        Joint::RightAnkle,
        Joint::RightKnee,
        Joint::RightHip,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
        Joint::RightWrist,
        Joint::RightElbow,
        Joint::RightShoulder,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::Neck,
        Joint::HeadTop,
    ];

    /// Row of this joint in a `(joints, coords)` array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The joint stored at `index`.
    pub fn from_index(index: usize) -> Option<Joint> {
        Self::ALL.get(index).copied()
    }

    /// snake_case name
    pub fn name(self) -> &'static str {
        match self {
            Joint::RightAnkle => "right_ankle",
            Joint::RightKnee => "right_knee",
            Joint::RightHip => "right_hip",
            Joint::LeftHip => "left_hip",
            Joint::LeftKnee => "left_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightWrist => "right_wrist",
            Joint::RightElbow => "right_elbow",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::Neck => "neck",
            Joint::HeadTop => "head_top",
        }
    }
}
