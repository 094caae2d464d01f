// src/watch/filter.rs

//! Decides which filesystem events matter.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path};

use notify::EventKind;
use notify::event::ModifyKind;

use crate::watch::path_utils::relative_to;

/// Default source-file extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &["go"];

/// Default directory segments that are never watched: version-control
/// metadata and vendored dependencies.
pub const DEFAULT_IGNORED_SEGMENTS: &[&str] = &[".git", "vendor"];

#[derive(Debug, Clone)]
pub struct ChangeFilter {
    extensions: HashSet<String>,
    ignored_segments: HashSet<String>,
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().copied(),
            DEFAULT_IGNORED_SEGMENTS.iter().copied(),
        )
    }
}

impl ChangeFilter {
    /// Extensions may be given with or without the leading dot.
    pub fn new<E, I>(extensions: E, ignored_segments: I) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            ignored_segments: ignored_segments
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Only content-affecting events count; access and metadata-only events
    /// (mtime, chmod) are noise.
    pub fn is_change_kind(kind: &EventKind) -> bool {
        match kind {
            EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => true,
            EventKind::Modify(modify) => !matches!(modify, ModifyKind::Metadata(_)),
            EventKind::Access(_) | EventKind::Other => false,
        }
    }

    /// Whether `path` has a source-file extension.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.contains(ext))
    }

    /// Whether any segment of `path` below `root` is ignored.
    ///
    /// Segments above the root are not considered, so a project that itself
    /// lives under a `vendor/` directory can still be watched.
    pub fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        let rel = relative_to(root, path);
        let rel = rel.as_deref().unwrap_or(path);
        rel.components().any(|component| match component {
            Component::Normal(segment) => segment
                .to_str()
                .is_some_and(|s| self.ignored_segments.contains(s)),
            _ => false,
        })
    }
}
