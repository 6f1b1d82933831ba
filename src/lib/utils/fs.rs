use std::path::{Path, PathBuf};

use color_eyre::{eyre::Context, Result};

/// Returns the canonicalized absolute path of the given one, failing
/// if the path doesn't exist on the filesystem
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Could not resolve the absolute path of {path:?}"))
}

/// Whether `candidate` resolves, by path-prefix containment over the
/// canonicalized forms, inside `ancestor`. Paths that cannot be
/// canonicalized are never considered contained.
pub fn is_contained_in(candidate: &Path, ancestor: &Path) -> bool {
    match (candidate.canonicalize(), ancestor.canonicalize()) {
        (Ok(candidate), Ok(ancestor)) => candidate.starts_with(&ancestor),
        _ => false,
    }
}

/// The file stem of a path as an owned [`String`], empty when the path
/// carries no useful final component
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
