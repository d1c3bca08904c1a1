use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks an API package directory and collects its Rust source files.
///
/// Traversal order is sorted by file name so that the same tree always yields the same
/// file sequence, which keeps resource discovery order (and therefore generated output)
/// stable across runs and platforms. The `target` directory, hidden directories and any
/// explicitly excluded paths (typically the generated docs module itself) are skipped.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./src/api"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} Rust files", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    excluded: Vec<PathBuf>,
}

/// Result of a directory scan.
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered `.rs` files, in traversal order
    pub rust_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            excluded: Vec::new(),
        }
    }

    /// Skip `path` during the scan. Paths are compared after canonicalization when possible.
    pub fn exclude(mut self, path: &Path) -> Self {
        self.excluded.push(canonical(path));
        self
    }

    /// Scans the directory tree and collects all `.rs` files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist or is not a directory.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            bail!("API package is not a directory: {}", self.root_path.display());
        }

        let mut rust_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                !file_name.starts_with('.') && file_name != "target"
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("rs") {
                        continue;
                    }
                    if self.excluded.contains(&canonical(path)) {
                        debug!("Skipping excluded file: {}", path.display());
                        continue;
                    }
                    rust_files.push(path.to_path_buf());
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            rust_files,
            warnings,
        })
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .rust_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_returns_sorted_rust_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("orders.rs"), "fn list() {}").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("users.rs"), "fn get() {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["main.rs", "orders.rs", "users.rs"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.rust_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("controllers/admin")).unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("controllers/users.rs"), "fn get() {}").unwrap();
        fs::write(root.join("controllers/admin/audit.rs"), "fn list() {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.rust_files.len(), 3);
    }

    #[test]
    fn test_scan_skips_target_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target/build.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.rs"), "// config").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["main.rs"]);
    }

    #[test]
    fn test_scan_skips_excluded_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("handlers.rs"), "fn get() {}").unwrap();
        fs::write(root.join("swagger_spec.rs"), "pub const X: &str = \"\";").unwrap();

        let result = FileScanner::new(root.to_path_buf())
            .exclude(&root.join("swagger_spec.rs"))
            .scan()
            .unwrap();

        assert_eq!(file_names(&result), vec!["handlers.rs"]);
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = FileScanner::new(missing).scan().unwrap_err();

        assert!(err.to_string().contains("not a directory"));
    }
}
