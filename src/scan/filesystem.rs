use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SOURCE_EXTENSIONS: [&str; 6] = ["rs", "js", "jsx", "ts", "tsx", "py"];

pub fn list_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}

pub fn list_source_files(root: &Path) -> Vec<PathBuf> {
    list_files(root)
        .into_iter()
        .filter(|path| has_extension(path, &SOURCE_EXTENSIONS))
        .collect()
}

/// `foo.test.js`, `foo.spec.ts`, `foo_test.rs` and friends.
pub fn is_test_file(path: &Path) -> bool {
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or_default();
    stem.ends_with(".test")
        || stem.ends_with(".spec")
        || stem.ends_with("_test")
        || stem.ends_with("_spec")
        || stem.starts_with("test_")
}

pub fn read_to_string_if_exists(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_naming_conventions() {
        assert!(is_test_file(Path::new("src/app.test.js")));
        assert!(is_test_file(Path::new("src/app.spec.tsx")));
        assert!(is_test_file(Path::new("tests/parser_test.rs")));
        assert!(is_test_file(Path::new("tests/test_api.py")));
        assert!(!is_test_file(Path::new("src/testing.rs")));
    }
}
