//! Fixtures shared by the unit tests.
use crate::{DatasetError, Fetch};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use std::cell::Cell;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::FileOptions;

/// Fetcher that hands out canned bytes and counts how often it was called.
pub struct CountingFetcher {
    pub body: Vec<u8>,
    pub calls: Cell<usize>,
}

impl CountingFetcher {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body,
            calls: Cell::new(0),
        }
    }
}

impl Fetch for CountingFetcher {
    fn fetch(&self, _url: &str, dest: &mut dyn Write) -> Result<u64, DatasetError> {
        self.calls.set(self.calls.get() + 1);
        dest.write_all(&self.body)?;
        Ok(self.body.len() as u64)
    }
}

/// Fetcher that always fails like a dropped connection.
pub struct FailingFetcher;

impl Fetch for FailingFetcher {
    fn fetch(&self, _url: &str, _dest: &mut dyn Write) -> Result<u64, DatasetError> {
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset").into())
    }
}

/// Level 5 MAT file holding one uncompressed double array.
/// `column_major` is laid out the way MATLAB stores it (first axis fastest).
pub fn mat_file(name: &str, dims: &[usize], column_major: &[f64]) -> Vec<u8> {
    assert_eq!(dims.iter().product::<usize>(), column_major.len());

    fn element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) {
        out.extend_from_slice(&data_type.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        while out.len() % 8 != 0 {
            out.push(0);
        }
    }

    // miUINT32 flags: mxDOUBLE_CLASS, no complex/global/logical bits
    let mut body = Vec::new();
    let flags: Vec<u8> = [6u32, 0].iter().flat_map(|v| v.to_le_bytes()).collect();
    element(&mut body, 6, &flags);
    let dims_bytes: Vec<u8> = dims
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();
    element(&mut body, 5, &dims_bytes);
    element(&mut body, 1, name.as_bytes());
    let data: Vec<u8> = column_major.iter().flat_map(|v| v.to_le_bytes()).collect();
    element(&mut body, 9, &data);

    let mut out = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created by: keypoint-datasets tests"
        .to_vec();
    out.resize(116, b' ');
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&0x0100u16.to_le_bytes());
    out.extend_from_slice(b"IM");
    // miMATRIX
    out.extend_from_slice(&14u32.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Ground truth coordinate of a synthetic sample.
pub fn truth(sample: usize, joint: usize, coord: usize) -> f64 {
    (sample * 100 + joint * 10 + coord) as f64
}

/// Raw `joints.mat` content for `n` samples of `joints` joints with 3 coords.
/// `joints_first` selects the `joints x 3 x n` layout of the extended set
/// instead of the `3 x joints x n` layout of the original one.
pub fn joints_mat(n: usize, joints: usize, joints_first: bool) -> Vec<u8> {
    let mut data = Vec::with_capacity(n * joints * 3);
    if joints_first {
        for sample in 0..n {
            for coord in 0..3 {
                for joint in 0..joints {
                    data.push(truth(sample, joint, coord));
                }
            }
        }
        mat_file("joints", &[joints, 3, n], &data)
    } else {
        for sample in 0..n {
            for joint in 0..joints {
                for coord in 0..3 {
                    data.push(truth(sample, joint, coord));
                }
            }
        }
        mat_file("joints", &[3, joints, n], &data)
    }
}

/// JPEG whose width encodes `sample` so that lookups can be matched to rows.
pub fn jpeg(sample: usize) -> Vec<u8> {
    let image = RgbImage::from_fn(sample as u32 + 1, 4, |x, _| {
        image::Rgb([(x * 40 % 256) as u8, 128, 255])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageOutputFormat::Jpeg(95))
        .unwrap();
    out.into_inner()
}

/// Files of a synthetic dataset: `joints.mat` plus `images/im{k}.jpg` with
/// unpadded 1-based numbers, so lexicographic order differs from numeric order.
pub fn dataset_files(n: usize, joints: usize, joints_first: bool) -> Vec<(String, Vec<u8>)> {
    let mut files = vec![("joints.mat".to_string(), joints_mat(n, joints, joints_first))];
    for sample in 0..n {
        files.push((format!("images/im{}.jpg", sample + 1), jpeg(sample)));
    }
    files
}

pub fn zip_archive(files: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in files {
        writer.start_file(name.as_str(), FileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_files(root: &Path, files: &[(String, Vec<u8>)]) {
    for (name, data) in files {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }
}
