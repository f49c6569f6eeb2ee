//! Download-once installation of dataset archives.
use crate::{DatasetError, Fetch};
use log::{debug, info};
use std::fs;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Makes sure `root_dir/folder_name` exists, downloading and extracting the zip
/// archive at `url` when it does not.
///
/// An existing directory is trusted as is: nothing is fetched or verified.
/// The archive goes through a temporary file and is unpacked into a staging
/// directory next to the destination, which is renamed into place only once
/// extraction succeeded. Both temporaries are removed on every exit path, so a
/// failed run leaves neither a stray download nor a half-extracted dataset.
pub fn ensure_installed<F: Fetch + ?Sized>(
    fetcher: &F,
    root_dir: &Path,
    folder_name: &str,
    url: &str,
) -> Result<PathBuf, DatasetError> {
    let root = root_dir.join(folder_name);
    if root.exists() {
        debug!("{} already present, skipping download", root.display());
        return Ok(root);
    }

    fs::create_dir_all(root_dir)?;
    let mut archive = tempfile::NamedTempFile::new_in(root_dir)?;
    let size = fetcher.fetch(url, archive.as_file_mut())?;
    info!("Downloaded {size} bytes from {url}, extracting");

    archive.as_file_mut().seek(SeekFrom::Start(0))?;
    let staging = tempfile::Builder::new()
        .prefix(&format!(".{folder_name}-"))
        .tempdir_in(root_dir)?;
    let mut zip = ZipArchive::new(archive.as_file_mut())?;
    zip.extract(staging.path())?;

    fs::rename(staging.path(), &root)?;
    info!("Installed {}", root.display());
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{zip_archive, CountingFetcher, FailingFetcher};

    fn files() -> Vec<(String, Vec<u8>)> {
        vec![
            ("joints.mat".to_string(), b"not really a mat file".to_vec()),
            ("images/im1.jpg".to_string(), b"jpeg".to_vec()),
        ]
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn installs_then_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::new(zip_archive(&files()));

        let root =
            ensure_installed(&fetcher, tmp.path(), "toy", "http://example/toy.zip").unwrap();
        assert_eq!(root, tmp.path().join("toy"));
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(fs::read(root.join("images/im1.jpg")).unwrap(), b"jpeg");
        // only the dataset is left behind, no temporaries
        assert_eq!(entries(tmp.path()), vec!["toy"]);

        let again =
            ensure_installed(&fetcher, tmp.path(), "toy", "http://example/toy.zip").unwrap();
        assert_eq!(again, root);
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(entries(&root), vec!["images", "joints.mat"]);
    }

    #[test]
    fn creates_missing_root_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("nested").join("data");
        let fetcher = CountingFetcher::new(zip_archive(&files()));
        let root =
            ensure_installed(&fetcher, &data_dir, "toy", "http://example/toy.zip").unwrap();
        assert!(root.join("joints.mat").is_file());
    }

    #[test]
    fn corrupt_archive_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher::new(b"this is not a zip archive".to_vec());
        let err =
            ensure_installed(&fetcher, tmp.path(), "toy", "http://example/toy.zip").unwrap_err();
        assert!(matches!(err, DatasetError::ZipError(_)));
        assert!(entries(tmp.path()).is_empty());
    }

    #[test]
    fn transport_failure_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ensure_installed(&FailingFetcher, tmp.path(), "toy", "http://example/toy.zip")
            .unwrap_err();
        assert!(matches!(err, DatasetError::IoError(_)));
        assert!(entries(tmp.path()).is_empty());
    }
}
