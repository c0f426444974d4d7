// Writing finished archives to disk

use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use zip_starter_core::Archive;

/// Writes `archive` to `<dir>/<name>.zip` and returns the path written.
///
/// Names containing `/` produce nested directories, mirroring how the
/// archive name was derived from a URL path. Names that are absolute or
/// climb out of `dir` are rejected.
pub fn write_archive(dir: &Path, archive: &Archive) -> Result<PathBuf> {
    let filename = archive.filename();
    let escapes = Path::new(&filename).components().any(|c| {
        matches!(c, Component::RootDir | Component::Prefix(_) | Component::ParentDir)
    });
    if escapes {
        return Err(anyhow!(
            "Archive name '{}' would be written outside '{}'",
            archive.name(),
            dir.display()
        ));
    }

    let path = dir.join(filename);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }

    std::fs::write(&path, archive.bytes())
        .with_context(|| format!("Failed to write '{}'", path.display()))?;

    Ok(path)
}
