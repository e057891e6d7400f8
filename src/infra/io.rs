//! Small file I/O helpers shared by the import and export flows.
//!
//! All writes create parent directories first; the orchestrators only
//! call these after every extraction pass for a file has succeeded, so a
//! failed transform never leaves a partial artifact behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}

/// Write text, creating parent directories as needed.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;

    std::fs::write(path, text).with_context(|| format!("Failed to write to {}", path.display()))
}

/// Byte-for-byte copy, creating parent directories as needed.
pub fn copy_verbatim(src: &Path, dst: &Path) -> Result<u64> {
    ensure_parent(dst)?;

    std::fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))
}

/// Remove a file if present; an absent file is not an error.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Swap a path's extension, e.g. `home.hbs` -> `home.yml`.
pub fn with_ext(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_creates_missing_parents() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("a/b/c.txt");

        write_text(&path, "hello")?;

        assert_eq!(read_text(&path)?, "hello");
        Ok(())
    }

    #[test]
    fn copy_is_byte_identical() -> Result<()> {
        let tmp = TempDir::new()?;
        let src = tmp.path().join("src.bin");
        let dst = tmp.path().join("out/dst.bin");

        std::fs::write(&src, [0u8, 159, 146, 150])?;
        copy_verbatim(&src, &dst)?;

        assert_eq!(std::fs::read(&src)?, std::fs::read(&dst)?);
        Ok(())
    }

    #[test]
    fn remove_is_quiet_on_absent_files() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("gone.yml");

        remove_if_exists(&path)?;

        write_text(&path, "x")?;
        remove_if_exists(&path)?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn with_ext_swaps_extension() {
        assert_eq!(with_ext(Path::new("src/templates/home.hbs"), "yml"),
            PathBuf::from("src/templates/home.yml"));
    }
}
