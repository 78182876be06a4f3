use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use ignore::WalkBuilder;
use path_slash::PathExt;

use crate::error::{HarnessError, Result};

/// Resolve a configured binary or object to exactly one file.
///
/// Absolute paths are taken as-is. Anything else is a glob searched
/// recursively under `build_root`: a pattern without `/` is matched against
/// file names, one with `/` against the slash-separated path relative to the
/// root. Zero or several matches are both errors; golden cases must pin a
/// unique artifact.
///
/// The returned path is always absolute: tools run in a scratch directory,
/// so a path relative to the caller's working directory would not resolve.
pub fn resolve_artifact(pattern: &str, build_root: &Path) -> Result<PathBuf> {
    let as_path = Path::new(pattern);
    if as_path.is_absolute() {
        return if as_path.is_file() {
            Ok(as_path.to_path_buf())
        } else {
            Err(HarnessError::ArtifactNotFound {
                pattern: pattern.to_string(),
                root: build_root.to_path_buf(),
            })
        };
    }

    let build_root = std::path::absolute(build_root).map_err(|e| HarnessError::io(build_root, e))?;
    let build_root = build_root.as_path();

    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| HarnessError::Config(format!("invalid artifact pattern '{}': {}", pattern, e)))?
        .compile_matcher();
    let match_relative_path = pattern.contains('/');

    let mut candidates = WalkBuilder::new(build_root)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build()
        .filter_map(std::result::Result::ok)
        .filter(|dent| dent.file_type().is_some_and(|t| t.is_file()))
        .map(|dent| dent.into_path())
        .filter(|path| {
            if match_relative_path {
                path.strip_prefix(build_root)
                    .map(|rel| matcher.is_match(&*rel.to_slash_lossy()))
                    .unwrap_or(false)
            } else {
                path.file_name().is_some_and(|name| matcher.is_match(name))
            }
        })
        .collect::<Vec<_>>();
    candidates.sort();

    tracing::debug!(
        "{} candidate(s) for '{}' under {}",
        candidates.len(),
        pattern,
        build_root.display()
    );

    match candidates.len() {
        0 => Err(HarnessError::ArtifactNotFound {
            pattern: pattern.to_string(),
            root: build_root.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(HarnessError::ArtifactAmbiguous {
            pattern: pattern.to_string(),
            candidates,
        }),
    }
}
