use super::filesystem::{has_extension, list_files, read_to_string_if_exists};
use std::path::Path;

const JS_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];
const JS_EXPORTS: [&str; 3] = ["export function ", "export const ", "export class "];
const RUST_EXPORTS: [&str; 5] = ["pub fn ", "pub async fn ", "pub struct ", "pub enum ", "pub trait "];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocCoverage {
    pub exported: usize,
    pub documented: usize,
}

impl DocCoverage {
    fn add(&mut self, other: DocCoverage) {
        self.exported += other.exported;
        self.documented += other.documented;
    }
}

pub fn scan_doc_coverage(src_dir: &Path) -> DocCoverage {
    let mut coverage = DocCoverage::default();
    for path in list_files(src_dir) {
        let is_rust = has_extension(&path, &["rs"]);
        if !is_rust && !has_extension(&path, &JS_EXTENSIONS) {
            continue;
        }
        let Some(content) = read_to_string_if_exists(&path) else {
            continue;
        };
        coverage.add(if is_rust {
            rust_coverage(&content)
        } else {
            js_coverage(&content)
        });
    }
    coverage
}

/// Exports count as documented when a `/** ... */` block ends right above.
pub fn js_coverage(content: &str) -> DocCoverage {
    let lines = content.lines().map(str::trim).collect::<Vec<_>>();
    let mut coverage = DocCoverage::default();
    for (index, line) in lines.iter().enumerate() {
        if !JS_EXPORTS.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }
        coverage.exported += 1;
        let previous = lines[..index].iter().rev().find(|line| !line.is_empty());
        if previous.is_some_and(|line| line.ends_with("*/")) {
            coverage.documented += 1;
        }
    }
    coverage
}

/// Public items count as documented when `///` or `*/` precedes their
/// attributes.
pub fn rust_coverage(content: &str) -> DocCoverage {
    let lines = content.lines().map(str::trim).collect::<Vec<_>>();
    let mut coverage = DocCoverage::default();
    for (index, line) in lines.iter().enumerate() {
        if !RUST_EXPORTS.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }
        coverage.exported += 1;
        let previous = lines[..index]
            .iter()
            .rev()
            .find(|line| !line.is_empty() && !line.starts_with("#["));
        if previous.is_some_and(|line| line.starts_with("///") || line.ends_with("*/")) {
            coverage.documented += 1;
        }
    }
    coverage
}
