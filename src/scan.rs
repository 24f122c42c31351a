use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Expand the input paths into media files whose extension is allowed.
///
/// Files are kept as given, directories are walked recursively in file name
/// order. Missing inputs are logged and skipped.
pub fn discover<P: AsRef<Path>>(inputs: &[P], allow_list: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => found.push(entry.into_path()),
                    Ok(_) => {}
                    Err(e) => warn!(path = %input.display(), "Skipping unreadable entry: {}", e),
                }
            }
        } else if input.exists() {
            found.push(input.to_path_buf());
        } else {
            warn!(path = %input.display(), "Input does not exist, skipping");
        }
    }

    let selected = filter_extensions(found, allow_list);
    debug!(count = selected.len(), "Discovered media files");
    selected
}

/// Keep the paths whose lowercased extension is in `allow_list`, in order.
pub fn filter_extensions<I>(paths: I, allow_list: &[String]) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter(|path| {
            extension_of(path)
                .map(|ext| allow_list.iter().any(|allowed| *allowed == ext))
                .unwrap_or(false)
        })
        .collect()
}

pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn allow() -> Vec<String> {
        ["srt", "mkv", "mp4", "avi"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_extensions_keeps_order_and_ignores_case() {
        let paths = vec![
            PathBuf::from("b/Movie.MKV"),
            PathBuf::from("notes.txt"),
            PathBuf::from("a/show.s01e01.srt"),
            PathBuf::from("README"),
            PathBuf::from("clip.Avi"),
            PathBuf::from("archive.mkv.part"),
        ];

        let kept = filter_extensions(paths, &allow());
        assert_eq!(
            kept,
            vec![
                PathBuf::from("b/Movie.MKV"),
                PathBuf::from("a/show.s01e01.srt"),
                PathBuf::from("clip.Avi"),
            ]
        );
    }

    #[test]
    fn test_discover_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Season 1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.mkv"), b"").unwrap();
        fs::write(nested.join("a.mp4"), b"").unwrap();
        fs::write(nested.join("cover.jpg"), b"").unwrap();
        let single = dir.path().join("single.srt");
        fs::write(&single, b"").unwrap();
        let missing = dir.path().join("missing.mkv");

        let found = discover(&[nested.clone(), single.clone(), missing], &allow());
        assert_eq!(found, vec![nested.join("a.mp4"), nested.join("b.mkv"), single]);
    }

    #[test]
    fn test_explicit_file_with_other_extension_is_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("poster.png");
        fs::write(&file, b"").unwrap();
        assert!(discover(&[file], &allow()).is_empty());
    }
}
