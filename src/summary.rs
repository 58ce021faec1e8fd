use std::path::PathBuf;

/// Cap on individually listed paths; everything past it is rolled up into a
/// single "and N more files" line.
const MAX_LISTED_FILES: usize = 10;

/// Append a file-creation report to `raw_output`.
///
/// With no new files the raw text comes back untouched, byte for byte.
/// Size lookups are best-effort: a file deleted between the diff and this
/// call is listed with an explicit unknown-size marker instead of aborting
/// the summary.
pub fn summarize(new_files: &[PathBuf], raw_output: &str) -> String {
    if new_files.is_empty() {
        return raw_output.to_string();
    }

    let mut out = String::with_capacity(raw_output.len() + 256);
    out.push_str(raw_output);
    out.push_str("\n\n✅ GLM execution completed\n");
    out.push_str(&format!("📁 {} files created:\n", new_files.len()));

    for path in new_files.iter().take(MAX_LISTED_FILES) {
        match std::fs::metadata(path) {
            Ok(meta) => {
                out.push_str(&format!("  • {} ({} bytes)\n", path.display(), meta.len()))
            }
            Err(_) => out.push_str(&format!("  • {} (size unknown)\n", path.display())),
        }
    }

    if new_files.len() > MAX_LISTED_FILES {
        out.push_str(&format!(
            "  ... and {} more files\n",
            new_files.len() - MAX_LISTED_FILES
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_new_files_returns_raw_output_unchanged() {
        assert_eq!(summarize(&[], "Original output"), "Original output");
        assert_eq!(summarize(&[], ""), "");
    }

    #[test]
    fn single_file_report() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("out.txt");
        std::fs::write(&file, b"test content").unwrap();

        let result = summarize(&[file.clone()], "Output");
        assert!(result.starts_with("Output"));
        assert!(result.contains("GLM execution completed"));
        assert!(result.contains("1 files created"));
        assert!(result.contains(file.display().to_string().as_str()));
        assert!(result.contains("(12 bytes)"));
    }

    #[test]
    fn vanished_file_gets_unknown_size_marker() {
        let ghost = PathBuf::from("/nonexistent/ghost.txt");
        let result = summarize(&[ghost], "Output");
        assert!(result.contains("1 files created"));
        assert!(result.contains("(size unknown)"));
    }

    #[test]
    fn truncates_past_ten_files() {
        let files: Vec<PathBuf> = (0..15).map(|i| PathBuf::from(format!("file{i}.txt"))).collect();
        let result = summarize(&files, "");

        assert!(result.contains("15 files created"));
        assert!(result.contains("and 5 more files"));
        let listed = result.lines().filter(|l| l.starts_with("  • ")).count();
        assert_eq!(listed, 10);
    }

    #[test]
    fn exactly_ten_files_has_no_overflow_line() {
        let files: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("file{i}.txt"))).collect();
        let result = summarize(&files, "");
        assert!(result.contains("10 files created"));
        assert!(!result.contains("more files"));
    }
}
