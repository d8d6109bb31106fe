//! Shared filesystem helpers built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Resolve an ambient directory for the given path and return the directory with the file name.
///
/// # Errors
///
/// Fails when `path` has no file name or its parent directory cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create `path` and any missing ancestors, handling absolute paths safely for cap-std.
///
/// # Errors
///
/// Propagates failures to open the base directory or create the suffix.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    if path.as_str().is_empty() || path == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Ensure the parent directory for `path` exists.
///
/// # Errors
///
/// Propagates failures from [`ensure_dir`].
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    path.parent().map_or(Ok(()), ensure_dir)
}

/// Return whether a regular file exists at `path`.
///
/// A missing file or missing parent directory reports `false` rather than an error.
///
/// # Errors
///
/// Fails on IO errors other than [`io::ErrorKind::NotFound`].
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Remove the file at `path`, treating an already missing file as success.
///
/// # Errors
///
/// Fails on IO errors other than [`io::ErrorKind::NotFound`].
pub fn remove_file_if_exists(path: &Utf8Path) -> io::Result<()> {
    let (dir, name) = open_dir_and_file(path)?;
    match dir.remove_file(name.as_str()) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Split an absolute or relative path into an ambient base directory and a relative suffix.
///
/// # Errors
///
/// Fails when the base directory cannot be opened or the path is not UTF-8.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        // Unix-style absolute path.
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        // Relative path: resolve from the current directory.
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;

    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn tmp() -> TempDir {
        TempDir::new().expect("failed to create temporary directory")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir should be UTF-8")
    }

    #[rstest]
    fn ensure_dir_creates_nested_directories(tmp: TempDir) {
        let target = utf8(&tmp).join("earth_data").join("pbf");
        ensure_dir(&target).expect("directories should be created");
        assert!(target.is_dir());
        ensure_dir(&target).expect("existing directories are accepted");
    }

    #[rstest]
    fn file_is_file_reports_presence(tmp: TempDir) {
        let root = utf8(&tmp);
        let file = root.join("region.osm.pbf");
        assert!(!file_is_file(&file).expect("probe should succeed"));
        fs::write(&file, b"pbf").expect("write fixture");
        assert!(file_is_file(&file).expect("probe should succeed"));
        assert!(!file_is_file(&root).expect("directories probe as non-files"));
    }

    #[rstest]
    fn file_is_file_tolerates_missing_parent(tmp: TempDir) {
        let file = utf8(&tmp).join("missing").join("region.osm.pbf");
        assert!(!file_is_file(&file).expect("probe should succeed"));
    }

    #[rstest]
    fn remove_file_if_exists_is_idempotent(tmp: TempDir) {
        let file = utf8(&tmp).join("partial.osm.pbf");
        fs::write(&file, b"partial").expect("write fixture");
        remove_file_if_exists(&file).expect("removal should succeed");
        assert!(!file.exists());
        remove_file_if_exists(&file).expect("second removal should succeed");
    }
}
