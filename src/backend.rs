//! Filesystem-facing backends: theme files, hand image sets, face textures
//! and the autostart entry.

pub mod autostart_backend;
pub mod hand_backend;
pub mod texture_backend;
pub mod theme_backend;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// First free path in `dir` for `stem` + `suffix`, appending `_1`, `_2`, ...
/// on collision
pub(crate) fn unique_path(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{}{}", stem, suffix));
    let mut i = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}_{}{}", stem, i, suffix));
        i += 1;
    }
    candidate
}

pub(crate) fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_unique_path_appends_counter() {
        let dir = std::env::temp_dir().join(format!("test_unique_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(unique_path(&dir, "wood", ".png"), dir.join("wood.png"));
        fs::write(dir.join("wood.png"), "a").unwrap();
        assert_eq!(unique_path(&dir, "wood", ".png"), dir.join("wood_1.png"));
        fs::write(dir.join("wood_1.png"), "b").unwrap();
        assert_eq!(unique_path(&dir, "wood", ".png"), dir.join("wood_2.png"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_copy_dir_recursive() {
        let root = std::env::temp_dir().join(format!("test_copy_{}", Uuid::new_v4()));
        let src = root.join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("nested").join("b.txt"), "b").unwrap();

        let dst = root.join("dst");
        copy_dir_recursive(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("nested").join("b.txt")).unwrap(), "b");

        let _ = fs::remove_dir_all(&root);
    }
}
