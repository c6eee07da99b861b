use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse an output path that resolves to the source archive.
pub fn ensure_output_not_source(output: &Path, source: &Path) -> Result<()> {
    let output_key = comparable_path(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let source_key = comparable_path(source)
        .with_context(|| format!("failed to resolve source path {}", source.display()))?;

    if output_key == source_key {
        bail!(
            "refusing to overwrite source archive: output {} matches input {}",
            output.display(),
            source.display()
        );
    }
    Ok(())
}

/// Absolute form of `path` suitable for equality checks.
///
/// Existing files are canonicalized. A file that does not exist yet is
/// resolved through its directory when that exists, otherwise `.` and `..`
/// are folded lexically.
fn comparable_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("current_dir")?
            .join(path)
    };

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) if parent.is_dir() => {
            let parent = parent
                .canonicalize()
                .with_context(|| format!("canonicalize {}", parent.display()))?;
            Ok(parent.join(name))
        }
        _ => Ok(fold_dots(&absolute)),
    }
}

/// Drop `.` segments and let each `..` remove the segment before it.
///
/// Meant for absolute paths: `..` at the root stays at the root.
fn fold_dots(path: &Path) -> PathBuf {
    let mut folded = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other),
        }
    }
    folded
}
