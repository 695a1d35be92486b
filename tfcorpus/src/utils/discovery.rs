// tfcorpus/src/utils/discovery.rs
//! Finds input files in the scraper's `<provider>/<service>/<module>/<file>.tf`
//! tree.

use anyhow::{bail, Result};
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use tfcorpus_core::FileLocation;

/// Depth of `.tf` files below the input root.
const FILE_DEPTH: usize = 4;

const TF_EXTENSION: &str = "tf";

/// A discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub location: FileLocation,
    pub path: PathBuf,
}

fn is_hidden_provider(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Lists every `.tf` file exactly three directories below `root`, in sorted
/// provider/service/module/file order. Provider directories starting with `.`
/// are skipped, as are files at any other depth.
pub fn discover_tf_files(root: &Path) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        bail!("Input directory does not exist or is not a directory: {}", root.display());
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(FILE_DEPTH)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden_provider(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.depth() != FILE_DEPTH || !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_none_or(|ext| ext != TF_EXTENSION) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let [provider, service, module, file_name] = parts.as_slice() else {
            continue;
        };

        files.push(SourceFile {
            location: FileLocation::new(provider, service, module, file_name),
            path: entry.into_path(),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn finds_only_tf_files_at_module_depth() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(root, "aws/s3/mod-b/main.tf");
        touch(root, "aws/s3/mod-a/variables.tf");
        touch(root, "aws/s3/mod-a/README.md");
        touch(root, "aws/s3/stray.tf");
        touch(root, "aws/s3/mod-a/nested/deep.tf");
        touch(root, ".cache/s3/mod/main.tf");
        touch(root, "google/gke/mod/examples__main.tf");

        let found: Vec<String> = discover_tf_files(root)
            .unwrap()
            .into_iter()
            .map(|f| {
                let l = f.location;
                format!("{}/{}/{}/{}", l.provider, l.service, l.module, l.file_name)
            })
            .collect();

        assert_eq!(
            found,
            [
                "aws/s3/mod-a/variables.tf",
                "aws/s3/mod-b/main.tf",
                "google/gke/mod/examples__main.tf"
            ]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(discover_tf_files(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempdir().unwrap();
        assert!(discover_tf_files(dir.path()).unwrap().is_empty());
    }
}
