//! Raw file copying for assets.
//!
//! [`copy_file`] skips work when the destination already matches the source
//! by name, size and modification time, and stamps the source mtime onto
//! every file it writes. Rebuilding an unchanged tree therefore copies
//! nothing and leaves output files byte- and time-identical.

use crate::naming;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy `src` to `dst`. Returns `false` when `dst` was already up to date.
pub fn copy_file(src: &Path, dst: &Path) -> io::Result<bool> {
    let src_meta = fs::metadata(src)?;
    if !src_meta.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a regular file: {}", src.display()),
        ));
    }

    match fs::metadata(dst) {
        Ok(dst_meta) => {
            if !dst_meta.is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("destination is not a regular file: {}", dst.display()),
                ));
            }
            if src.file_name() == dst.file_name()
                && src_meta.len() == dst_meta.len()
                && src_meta.modified()? == dst_meta.modified()?
            {
                return Ok(false);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    File::options()
        .write(true)
        .open(dst)?
        .set_modified(src_meta.modified()?)?;
    Ok(true)
}

/// Recursively copy `src` into `dst`, skipping ignored paths.
///
/// Returns the number of files visited, copied or not.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<usize> {
    let mut files: Vec<(PathBuf, PathBuf)> = Vec::new();
    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !naming::is_ignored(e.path().strip_prefix(src).unwrap_or(e.path())));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        files.push((entry.path().to_path_buf(), dst.join(rel)));
    }

    files
        .par_iter()
        .try_for_each(|(from, to)| copy_file(from, to).map(|_| ()))?;
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn copies_and_preserves_mtime() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "src/a.bin", "hello");
        let src = tmp.path().join("src/a.bin");
        let dst = tmp.path().join("out/deep/a.bin");

        assert!(copy_file(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "hello");
        assert_eq!(
            fs::metadata(&src).unwrap().modified().unwrap(),
            fs::metadata(&dst).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn second_copy_is_noop() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.txt", "x");
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("out/a.txt");

        assert!(copy_file(&src, &dst).unwrap());
        assert!(!copy_file(&src, &dst).unwrap());
    }

    #[test]
    fn stale_destination_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.txt", "new contents");
        write_file(tmp.path(), "out/a.txt", "old");
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("out/a.txt");

        assert!(copy_file(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new contents");
    }

    #[test]
    fn same_size_different_mtime_is_copied() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.txt", "aaa");
        write_file(tmp.path(), "out/a.txt", "bbb");
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("out/a.txt");
        let earlier = SystemTime::now() - Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(&dst)
            .unwrap()
            .set_modified(earlier)
            .unwrap();

        assert!(copy_file(&src, &dst).unwrap());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "aaa");
    }

    #[test]
    fn directory_source_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = copy_file(tmp.path(), &tmp.path().join("x")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn directory_destination_is_error() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.txt", "x");
        fs::create_dir_all(tmp.path().join("out/a.txt")).unwrap();
        let result = copy_file(&tmp.path().join("a.txt"), &tmp.path().join("out/a.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn copy_dir_mirrors_tree_and_skips_ignored() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "assets/css/site.css", "body{}");
        write_file(tmp.path(), "assets/js/app.js", "1");
        write_file(tmp.path(), "assets/old.ignore/x.css", "x");
        write_file(tmp.path(), "assets/notes.ignore.txt", "n");

        let count = copy_dir(&tmp.path().join("assets"), &tmp.path().join("out/assets")).unwrap();
        assert_eq!(count, 2);
        assert!(tmp.path().join("out/assets/css/site.css").is_file());
        assert!(tmp.path().join("out/assets/js/app.js").is_file());
        assert!(!tmp.path().join("out/assets/old.ignore").exists());
        assert!(!tmp.path().join("out/assets/notes.ignore.txt").exists());
    }

    #[test]
    fn copy_dir_missing_source_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(copy_dir(&tmp.path().join("nope"), &tmp.path().join("out")).is_err());
    }
}
