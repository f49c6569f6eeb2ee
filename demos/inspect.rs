use keypoint_datasets::{
    Dataset, DatasetOptions, Joint, KeypointDataset, LeedsSport, LeedsSportExtended, Split,
};
use std::path::PathBuf;

fn describe(dataset: &KeypointDataset) {
    println!("");
    println!("--{}--", dataset.info().name);
    println!("Root: {}", dataset.root().display());
    println!("Split: {:?}", dataset.split());
    println!("Count: {}", dataset.len());
    let (image, targets) = dataset.get(0).unwrap();
    let keypoints = &targets.keypoints[0];
    println!("Image: {:?}", image.dimensions());
    println!("Keypoints: {:?}", keypoints.shape());
    for joint in Joint::ALL {
        let row = keypoints.row(joint.index());
        println!("    {:<15} {row}", joint.name());
    }
}

fn main() {
    pretty_env_logger::init();
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .expect("Give a directory to store the datasets in");

    let dataset = LeedsSport::load(DatasetOptions::new(&data_dir).split(Split::Test)).unwrap();
    describe(&dataset);

    let dataset = LeedsSportExtended::load(DatasetOptions::new(&data_dir)).unwrap();
    describe(&dataset);
}
