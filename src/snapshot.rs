use ignore::WalkBuilder;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Directory names whose whole subtree is invisible to snapshots.
/// Matched against single path components at every depth, not only the root.
const VCS_DIR_NAMES: &[&str] = &[".git", ".hg", ".svn", ".jj"];

fn is_vcs_dir(entry: &ignore::DirEntry) -> bool {
    entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false)
        && entry
            .file_name()
            .to_str()
            .map(|name| VCS_DIR_NAMES.contains(&name))
            .unwrap_or(false)
}

/// Enumerate every regular file under `root`, excluding VCS metadata trees.
///
/// `root` must be an existing directory; a missing or non-directory root is
/// a caller error and surfaces as `io::Error` rather than an empty set.
///
/// Hidden files are included and `.gitignore` rules are NOT applied here —
/// the point of a snapshot is to see every file a code-executing model just
/// wrote, wherever it wrote it.
///
/// Symlinks whose target is a regular file are reported under the link path
/// (targets are never resolved); symlinked directories are not descended.
pub fn snapshot(root: &Path) -> io::Result<HashSet<PathBuf>> {
    let meta = std::fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a directory: {}", root.display()),
        ));
    }

    let mut files = HashSet::new();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(|e| !is_vcs_dir(e))
        .build();

    for item in walker {
        let Ok(entry) = item else { continue };
        let Some(ft) = entry.file_type() else { continue };
        if ft.is_file() {
            files.insert(entry.into_path());
        } else if ft.is_symlink() {
            let path = entry.into_path();
            if path.metadata().map(|m| m.is_file()).unwrap_or(false) {
                files.insert(path);
            }
        }
    }

    Ok(files)
}

/// Paths present in `after` but not in `before`, sorted lexicographically so
/// output is stable across runs. Deletions are never reported.
pub fn new_files(before: &HashSet<PathBuf>, after: &HashSet<PathBuf>) -> Vec<PathBuf> {
    let mut created: Vec<PathBuf> = after.difference(before).cloned().collect();
    created.sort();
    created
}
