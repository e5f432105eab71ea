use anyhow::{Context, Result};
use std::path::Path;

/// Write `content` to `path` through a temporary sibling file and a rename, so
/// readers see either the previous or the complete new content.
///
/// Parent directories are created as needed. If the rename fails (e.g. a
/// cross-device link), falls back to a direct write.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create cache dir failed: {}", dir.display()))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, content)
        .with_context(|| format!("write temp file failed: {}", tmp_path.display()))?;

    match std::fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            std::fs::write(path, content).with_context(|| {
                format!(
                    "direct write failed after rename error ({}): {}",
                    rename_err,
                    path.display()
                )
            })?;
            let _ = std::fs::remove_file(&tmp_path);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parents_and_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snapshot.json");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
