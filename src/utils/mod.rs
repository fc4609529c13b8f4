// frameprep/src/utils/mod.rs
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const SUPPORTED_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "tif", "tiff", "heic", "avif"];

/// Joins subfolder names in a flattened output file name.
pub const FLATTEN_DELIMITER: &str = " - ";

pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Every eligible file below `dir`, in a stable (name-sorted) walk order.
/// Symlinked files are listed; symlinked directories are not entered.
pub fn collect_image_paths(dir: &Path) -> Vec<PathBuf> {
    walk_images(dir, None)
}

/// Like [`collect_image_paths`], but never descends into `excluded`. Used to
/// keep an output directory nested inside the input tree out of the scan.
pub fn collect_image_paths_excluding(dir: &Path, excluded: &Path) -> Vec<PathBuf> {
    match std::fs::canonicalize(excluded) {
        Ok(excluded) => walk_images(dir, Some(&excluded)),
        Err(_) => walk_images(dir, None),
    }
}

fn walk_images(dir: &Path, excluded: Option<&Path>) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, excluded))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        // follows the link, unlike `entry.file_type()`
        .filter(|entry| entry.path().is_file())
        .filter(|entry| is_supported_format(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn is_excluded_dir(entry: &DirEntry, excluded: Option<&Path>) -> bool {
    let Some(excluded) = excluded else {
        return false;
    };
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let skip = std::fs::canonicalize(entry.path()).map_or(false, |path| path == excluded);
    if skip {
        log::debug!("Not scanning output directory {}", entry.path().display());
    }
    skip
}

pub fn count_image_files(dir: &Path) -> usize {
    if !dir.is_dir() {
        return 0;
    }
    collect_image_paths(dir).len()
}

/// Relative paths of all subdirectories below `dir`, sorted.
pub fn list_subdirs(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut subdirs: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .collect();
    subdirs.sort();
    subdirs
}

/// Filename prefix for a file's subfolder when flattening, `None` at the root.
pub fn flatten_prefix(relative_dir: &Path) -> Option<String> {
    let parts: Vec<String> = relative_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(FLATTEN_DELIMITER))
    }
}

/// Where `source` (somewhere below `input_dir`) is written. Outputs are
/// always `<stem>.jpg`.
pub fn output_path_for(source: &Path, input_dir: &Path, output_dir: &Path, flatten: bool) -> PathBuf {
    let relative_dir = source
        .parent()
        .and_then(|parent| parent.strip_prefix(input_dir).ok())
        .unwrap_or_else(|| Path::new(""));

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    if flatten {
        let name = match flatten_prefix(relative_dir) {
            Some(prefix) => format!("{}{}{}.jpg", prefix, FLATTEN_DELIMITER, stem),
            None => format!("{}.jpg", stem),
        };
        output_dir.join(name)
    } else {
        output_dir.join(relative_dir).join(format!("{}.jpg", stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognises_supported_extensions() {
        assert!(is_supported_format(Path::new("a/b.JPG")));
        assert!(is_supported_format(Path::new("b.tif")));
        assert!(is_supported_format(Path::new("b.heic")));
        assert!(!is_supported_format(Path::new("b.gif")));
        assert!(!is_supported_format(Path::new("README")));
    }

    #[test]
    fn flatten_turns_subfolders_into_prefix() {
        let out = output_path_for(
            Path::new("input/vacation/beach.jpg"),
            Path::new("input"),
            Path::new("output"),
            true,
        );
        assert_eq!(out, PathBuf::from("output/vacation - beach.jpg"));

        let out = output_path_for(
            Path::new("input/2023/summer/beach.png"),
            Path::new("input"),
            Path::new("output"),
            true,
        );
        assert_eq!(out, PathBuf::from("output/2023 - summer - beach.jpg"));

        let out = output_path_for(Path::new("input/top.webp"), Path::new("input"), Path::new("output"), true);
        assert_eq!(out, PathBuf::from("output/top.jpg"));
    }

    #[test]
    fn mirror_keeps_subfolders() {
        let out = output_path_for(
            Path::new("input/2023/summer/beach.png"),
            Path::new("input"),
            Path::new("output"),
            false,
        );
        assert_eq!(out, PathBuf::from("output/2023/summer/beach.jpg"));
    }

    #[test]
    fn counts_and_lists_directory_contents() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("b/inner")).unwrap();
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::write(root.join("one.jpg"), b"x").unwrap();
        std::fs::write(root.join("a/two.PNG"), b"x").unwrap();
        std::fs::write(root.join("b/inner/three.webp"), b"x").unwrap();
        std::fs::write(root.join("b/notes.txt"), b"x").unwrap();

        assert_eq!(count_image_files(root), 3);
        assert_eq!(count_image_files(&root.join("missing")), 0);
        assert_eq!(
            list_subdirs(root),
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("b/inner")]
        );

        let names: Vec<PathBuf> = collect_image_paths(root)
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a/two.PNG"),
                PathBuf::from("b/inner/three.webp"),
                PathBuf::from("one.jpg")
            ]
        );
    }

    #[test]
    fn nested_output_dir_is_left_out_of_the_scan() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("framed/trip")).unwrap();
        std::fs::create_dir_all(root.join("trip")).unwrap();
        std::fs::write(root.join("a.jpg"), b"x").unwrap();
        std::fs::write(root.join("trip/b.jpg"), b"x").unwrap();
        std::fs::write(root.join("framed/a.jpg"), b"x").unwrap();
        std::fs::write(root.join("framed/trip/b.jpg"), b"x").unwrap();

        assert_eq!(collect_image_paths(root).len(), 4);

        let names: Vec<PathBuf> = collect_image_paths_excluding(root, &root.join("framed"))
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("a.jpg"), PathBuf::from("trip/b.jpg")]);

        // an output dir that does not exist yet excludes nothing
        assert_eq!(collect_image_paths_excluding(root, &root.join("missing")).len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn follows_file_symlinks_but_not_directory_symlinks() {
        use std::os::unix::fs::symlink;

        let library = TempDir::new().unwrap();
        std::fs::create_dir_all(library.path().join("album")).unwrap();
        std::fs::write(library.path().join("real.jpg"), b"x").unwrap();
        std::fs::write(library.path().join("album/deep.jpg"), b"x").unwrap();

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(root.join("plain.jpg"), b"x").unwrap();
        symlink(library.path().join("real.jpg"), root.join("linked.jpg")).unwrap();
        symlink(library.path().join("album"), root.join("album")).unwrap();
        symlink(root.join("gone.jpg"), root.join("dangling.jpg")).unwrap();

        let names: Vec<PathBuf> = collect_image_paths(root)
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("linked.jpg"), PathBuf::from("plain.jpg")]);
    }
}
