//! In-source pragma scanning.
//!
//! Files can override their policy assignment with a comment in their
//! first lines:
//!
//! ```text
//! // coverctl:ignore
//! // coverctl:domain=billing
//! ```

use crate::errors::{Error, Result};
use crate::model::Annotation;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

pub const PRAGMA_IGNORE: &str = "coverctl:ignore";
pub const PRAGMA_DOMAIN: &str = "coverctl:domain=";

/// Pragmas past this line are ignored; they belong at the top of a file.
pub const SCAN_LINES: usize = 20;

/// Scan the given repo-relative files under `root`. The result is
/// sparse: only files carrying at least one pragma appear. Files that
/// no longer exist on disk are skipped silently; other I/O failures
/// surface.
pub fn scan_files<'a, I>(root: &Path, files: I) -> Result<BTreeMap<String, Annotation>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = BTreeMap::new();
    for file in files {
        let path = root.join(file);
        let handle = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(Error::io(format!("failed to open {}", path.display()), e)),
        };

        let mut annotation = Annotation::default();
        let reader = std::io::BufReader::new(handle);
        for line in reader.lines().take(SCAN_LINES) {
            let line =
                line.map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
            apply_line(&line, &mut annotation);
        }

        if annotation != Annotation::default() {
            out.insert(file.to_string(), annotation);
        }
    }
    Ok(out)
}

fn apply_line(line: &str, annotation: &mut Annotation) {
    if line.contains(PRAGMA_IGNORE) {
        annotation.ignore = true;
    }
    if let Some(idx) = line.find(PRAGMA_DOMAIN) {
        let rest = &line[idx + PRAGMA_DOMAIN.len()..];
        let name: String = rest.split_whitespace().next().unwrap_or("").to_string();
        if !name.is_empty() {
            annotation.domain = Some(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn finds_ignore_and_domain_pragmas() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "core/a.go", "package core\n// coverctl:ignore\n");
        write(
            dir.path(),
            "core/b.go",
            "// coverctl:domain=billing extra words\npackage core\n",
        );
        write(dir.path(), "core/c.go", "package core\n");

        let anns = scan_files(dir.path(), ["core/a.go", "core/b.go", "core/c.go"]).unwrap();
        assert_eq!(anns.len(), 2);
        assert!(anns["core/a.go"].ignore);
        assert_eq!(anns["core/b.go"].domain.as_deref(), Some("billing"));
    }

    #[test]
    fn pragmas_past_the_scan_window_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = "package core\n".repeat(SCAN_LINES);
        content.push_str("// coverctl:ignore\n");
        write(dir.path(), "late.go", &content);

        let anns = scan_files(dir.path(), ["late.go"]).unwrap();
        assert!(anns.is_empty());
    }

    #[test]
    fn missing_files_are_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let anns = scan_files(dir.path(), ["nope.go"]).unwrap();
        assert!(anns.is_empty());
    }

    #[test]
    fn both_pragmas_can_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "x.go",
            "// coverctl:ignore\n// coverctl:domain=core\n",
        );
        let anns = scan_files(dir.path(), ["x.go"]).unwrap();
        let ann = &anns["x.go"];
        assert!(ann.ignore);
        assert_eq!(ann.domain.as_deref(), Some("core"));
    }

    #[test]
    fn empty_domain_value_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "x.go", "// coverctl:domain=\n");
        let anns = scan_files(dir.path(), ["x.go"]).unwrap();
        assert!(anns.is_empty());
    }
}
