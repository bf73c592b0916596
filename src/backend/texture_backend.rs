//! Face textures: image files painted behind the dial.

use super::unique_path;
use crate::config::AppPaths;
use crate::theme::ImageSource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const TEXTURE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Unsupported texture file: {0}")]
    Unsupported(PathBuf),

    #[error("Texture is not a readable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub source: ImageSource,
    pub name: String,
    pub path: PathBuf,
}

pub fn is_texture_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                TEXTURE_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
}

fn textures_in(dir: &Path, source: ImageSource) -> Vec<TextureEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<TextureEntry> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_texture_file(path))
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some(TextureEntry { source, name, path })
        })
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    found
}

/// Builtin textures first, then user imported ones
pub fn list_textures(paths: &AppPaths) -> Vec<TextureEntry> {
    let mut textures = textures_in(&paths.builtin_textures_dir(), ImageSource::Builtin);
    textures.extend(textures_in(&paths.user_textures_dir(), ImageSource::User));
    textures
}

pub fn resolve_texture_path(paths: &AppPaths, source: ImageSource, name: &str) -> Option<PathBuf> {
    let dir = match source {
        ImageSource::None => return None,
        ImageSource::Builtin => paths.builtin_textures_dir(),
        ImageSource::User => paths.user_textures_dir(),
    };
    let path = dir.join(name);
    path.is_file().then_some(path)
}

/// Copy an image into the user textures directory. The file must decode;
/// the stored name gets a `_N` suffix if it is already taken.
pub fn import_texture(src: &Path, user_textures_dir: &Path) -> Result<String, TextureError> {
    if !is_texture_file(src) {
        return Err(TextureError::Unsupported(src.to_path_buf()));
    }
    image::open(src)?;

    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "texture".to_string());
    let suffix = src
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    fs::create_dir_all(user_textures_dir)?;
    let dest = unique_path(user_textures_dir, &stem, &suffix);
    fs::copy(src, &dest)?;
    info!("Imported texture {:?} to {:?}", src, dest);

    Ok(dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}
