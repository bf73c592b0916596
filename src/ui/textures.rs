//! GPU textures for hand images and face textures, loaded lazily and cached.

use crate::backend::hand_backend::{load_hand_image, tint};
use crate::theme::WHITE;
use egui::{ColorImage, Context, Pos2, TextureHandle, TextureOptions, Vec2, pos2, vec2};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A hand image uploaded as a white mask. The painter colors it through the
/// mesh vertex color, so a color change needs no new upload.
#[derive(Clone)]
pub struct HandTexture {
    pub texture: TextureHandle,
    pub size: Vec2,
    /// Rotation center in image pixels
    pub pivot: Pos2,
}

#[derive(Clone)]
pub struct FaceTexture {
    pub texture: TextureHandle,
    pub size: Vec2,
}

/// Hand masks and face textures keyed by path.
/// Failed loads are cached as `None` so they are reported once.
#[derive(Default)]
pub struct TextureCache {
    hands: HashMap<PathBuf, Option<HandTexture>>,
    faces: HashMap<PathBuf, Option<FaceTexture>>,
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}

impl TextureCache {
    pub fn hand(&mut self, ctx: &Context, path: &Path) -> Option<HandTexture> {
        self.hands
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_hand_image(path) {
                Ok(hand) => {
                    let mask = tint(&hand.image, WHITE);
                    let size = vec2(mask.width() as f32, mask.height() as f32);
                    let texture = ctx.load_texture(
                        format!("hand:{}", path.display()),
                        to_color_image(&mask),
                        TextureOptions::LINEAR,
                    );
                    Some(HandTexture {
                        texture,
                        size,
                        pivot: pos2(hand.pivot.0, hand.pivot.1),
                    })
                }
                Err(e) => {
                    warn!("Could not load hand image {:?}: {}", path, e);
                    None
                }
            })
            .clone()
    }

    pub fn face(&mut self, ctx: &Context, path: &Path) -> Option<FaceTexture> {
        self.faces
            .entry(path.to_path_buf())
            .or_insert_with(|| match image::open(path) {
                Ok(decoded) => {
                    let rgba = decoded.into_rgba8();
                    let size = vec2(rgba.width() as f32, rgba.height() as f32);
                    let texture = ctx.load_texture(
                        format!("face:{}", path.display()),
                        to_color_image(&rgba),
                        TextureOptions::LINEAR,
                    );
                    Some(FaceTexture { texture, size })
                }
                Err(e) => {
                    warn!("Could not load face texture {:?}: {}", path, e);
                    None
                }
            })
            .clone()
    }

    /// Forget everything, e.g. after a hand set or texture was replaced on disk
    pub fn clear(&mut self) {
        self.hands.clear();
        self.faces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::MARKER_RGBA;
    use image::Rgba;
    use std::fs;
    use uuid::Uuid;

    fn setup_test_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("test_textures_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup_test_dir(test_dir: &Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    fn write_hand(path: &Path) {
        let mut image = RgbaImage::new(3, 8);
        for y in 0..6 {
            image.put_pixel(1, y, Rgba([0, 0, 0, 255]));
        }
        image.put_pixel(1, 6, Rgba(MARKER_RGBA));
        image.save(path).unwrap();
    }

    #[test]
    fn test_one_texture_per_hand_image() {
        let test_dir = setup_test_dir();
        let hour = test_dir.join("hour.png");
        let minute = test_dir.join("minute.png");
        write_hand(&hour);
        write_hand(&minute);

        let ctx = Context::default();
        let mut cache = TextureCache::default();
        for _ in 0..50 {
            assert!(cache.hand(&ctx, &hour).is_some());
            assert!(cache.hand(&ctx, &minute).is_some());
        }
        assert_eq!(cache.hands.len(), 2);

        let texture = cache.hand(&ctx, &hour).unwrap();
        assert_eq!(texture.size, vec2(3.0, 8.0));
        assert_eq!(texture.pivot, pos2(1.0, 6.0));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_failed_load_is_cached() {
        let test_dir = setup_test_dir();
        let missing = test_dir.join("second.png");

        let ctx = Context::default();
        let mut cache = TextureCache::default();
        assert!(cache.hand(&ctx, &missing).is_none());
        assert!(cache.hand(&ctx, &missing).is_none());
        assert_eq!(cache.hands.len(), 1);

        cache.clear();
        assert!(cache.hands.is_empty());

        cleanup_test_dir(&test_dir);
    }
}
