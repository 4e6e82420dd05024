use std::fmt;
use std::path::{Component, Path};

use crate::error::FilesError;

/// A validated file name.
///
/// This is the only way to address a stored file: every storage operation
/// takes a `FileName`, so no filesystem path is ever built from an
/// unvalidated client string. A valid name is non-empty, contains no path
/// separators or NUL bytes, and parses as exactly one normal path component,
/// which guarantees that joining it onto the store root stays inside the
/// root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    pub fn parse(name: &str) -> Result<Self, FilesError> {
        if name.is_empty() {
            return Err(FilesError::invalid_name(name, "name must not be empty"));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(FilesError::invalid_name(name, "no subdirectories allowed"));
        }

        if name.contains('\0') {
            return Err(FilesError::invalid_name(
                name.replace('\0', "\\0"),
                "name must not contain NUL bytes",
            ));
        }

        // Catches `.`, `..`, absolute paths and platform path prefixes.
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(FileName(name.to_string())),
            _ => Err(FilesError::invalid_name(
                name,
                "name must be a single path component",
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(name: &str) -> String {
        match FileName::parse(name) {
            Err(FilesError::InvalidName { reason, .. }) => reason,
            other => panic!("expected InvalidName for {:?}, got {:?}", name, other),
        }
    }

    #[test]
    fn accepts_ordinary_names() {
        for name in ["a.txt", "report.csv", "no-extension", "UPPER.Case", "sp ace", "..well-known"] {
            let parsed = FileName::parse(name).unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(reason(""), "name must not be empty");
    }

    #[test]
    fn rejects_path_separators() {
        assert_eq!(reason("a/b"), "no subdirectories allowed");
        assert_eq!(reason("a\\b"), "no subdirectories allowed");
        assert_eq!(reason("../secret"), "no subdirectories allowed");
        assert_eq!(reason("/etc/passwd"), "no subdirectories allowed");
    }

    #[test]
    fn rejects_traversal_components() {
        assert_eq!(reason(".."), "name must be a single path component");
        assert_eq!(reason("."), "name must be a single path component");
    }

    #[test]
    fn rejects_nul_bytes() {
        assert_eq!(reason("a\0b"), "name must not contain NUL bytes");
    }

    #[test]
    fn joined_name_stays_inside_the_root() {
        let root = Path::new("/srv/depot/files");
        let name = FileName::parse("notes.txt").unwrap();
        let joined = root.join(name.as_str());
        assert!(joined.starts_with(root));
        assert_eq!(joined.parent(), Some(root));
    }
}
