//! Hand image sets.
//!
//! A hand set is a directory holding `hour.png`, `minute.png` and
//! `second.png`. Source images live in `original/`, prepared images in
//! `processed/`. Every image carries exactly one marker pixel (pure opaque
//! red) that marks the rotation center.

use super::{copy_dir_recursive, unique_path};
use crate::config::AppPaths;
use crate::constant::{DEFAULT_BLACK_TOLERANCE, MARKER_RGBA, ORIGINAL_DIR, PROCESSED_DIR};
use crate::theme::{HandKind, ImageSource, Rgb};
use image::{ColorType, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum HandImageError {
    #[error("Hand set directory not found (checked {})", display_paths(.0))]
    HandSetNotFound(Vec<PathBuf>),

    #[error("Missing hand image(s): {}", display_paths(.0))]
    MissingFiles(Vec<PathBuf>),

    #[error("{} is not a PNG: {detail}", .path.display())]
    NotPng { path: PathBuf, detail: String },

    #[error("No red pixel found in {} (rotation center missing)", .0.display())]
    NoMarker(PathBuf),

    #[error("Multiple red pixels found in {} ({}): {locations:?}", .path.display(), .locations.len())]
    MultipleMarkers {
        path: PathBuf,
        locations: Vec<(u32, u32)>,
    },

    #[error("{0} is not a complete hand set (needs hour.png, minute.png and second.png)")]
    IncompleteHandSet(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Directory layout
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSetDir {
    root: PathBuf,
}

impl HandSetDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn original_dir(&self) -> PathBuf {
        self.root.join(ORIGINAL_DIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_DIR)
    }

    pub fn original(&self, kind: HandKind) -> PathBuf {
        self.original_dir().join(kind.file_name())
    }

    pub fn processed(&self, kind: HandKind) -> PathBuf {
        self.processed_dir().join(kind.file_name())
    }

    /// Images placed directly in the set directory by older layouts
    pub fn legacy(&self, kind: HandKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Processed image, then original, then legacy
    pub fn resolve(&self, kind: HandKind) -> Option<PathBuf> {
        [self.processed(kind), self.original(kind), self.legacy(kind)]
            .into_iter()
            .find(|p| p.is_file())
    }

    /// All three images, or `None` if any is missing
    pub fn resolve_all(&self) -> Option<[PathBuf; 3]> {
        let [hour, minute, second] = HandKind::ALL.map(|kind| self.resolve(kind));
        Some([hour?, minute?, second?])
    }
}

/// Find `name` in the first search root that has it
pub fn locate_hand_set(name: &str, search_roots: &[PathBuf]) -> Result<HandSetDir, HandImageError> {
    let candidates: Vec<PathBuf> = search_roots.iter().map(|root| root.join(name)).collect();
    candidates
        .iter()
        .find(|dir| dir.is_dir())
        .map(|dir| HandSetDir::new(dir.clone()))
        .ok_or(HandImageError::HandSetNotFound(candidates))
}

/// Root directory of a hand set referenced by a theme
pub fn hand_set_dir(paths: &AppPaths, source: ImageSource, name: &str) -> Option<HandSetDir> {
    let base = match source {
        ImageSource::None => return None,
        ImageSource::Builtin => paths.builtin_hands_dir(),
        ImageSource::User => paths.user_hands_dir(),
    };
    Some(HandSetDir::new(base.join(name)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSetEntry {
    pub source: ImageSource,
    pub name: String,
    pub images: [PathBuf; 3],
}

/// Complete hand sets, builtin first, then user sets
pub fn list_hand_sets(paths: &AppPaths) -> Vec<HandSetEntry> {
    let mut sets = Vec::new();
    for (source, base) in [
        (ImageSource::Builtin, paths.builtin_hands_dir()),
        (ImageSource::User, paths.user_hands_dir()),
    ] {
        let Ok(entries) = fs::read_dir(&base) else {
            continue;
        };
        let mut found: Vec<HandSetEntry> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| {
                let dir = HandSetDir::new(entry.path());
                dir.resolve_all().map(|images| HandSetEntry {
                    source,
                    name: dir.name(),
                    images,
                })
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        sets.extend(found);
    }
    sets
}

/// Copy a hand set folder into the user hands directory under a free name.
/// Returns the name the set was stored under.
pub fn import_hand_set(src: &Path, user_hands_dir: &Path) -> Result<String, HandImageError> {
    let source = HandSetDir::new(src.to_path_buf());
    if source.resolve_all().is_none() {
        return Err(HandImageError::IncompleteHandSet(src.display().to_string()));
    }

    fs::create_dir_all(user_hands_dir)?;
    let dest = unique_path(user_hands_dir, &source.name(), "");
    copy_dir_recursive(src, &dest)?;

    let name = HandSetDir::new(dest).name();
    info!("Imported hand set {:?} as '{}'", src, name);
    Ok(name)
}

// ============================================================================
// Marker pixel and processing
// ============================================================================

pub fn is_marker(pixel: &Rgba<u8>) -> bool {
    pixel.0 == MARKER_RGBA
}

/// Every marker pixel in row-major order
pub fn find_marker_pixels(image: &RgbaImage) -> Vec<(u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| is_marker(pixel))
        .map(|(x, y, _)| (x, y))
        .collect()
}

pub fn is_near_black(pixel: &Rgba<u8>, tolerance: u8) -> bool {
    let [r, g, b, _] = pixel.0;
    r <= tolerance && g <= tolerance && b <= tolerance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Channels at or below this value count as black
    pub tolerance: u8,
    /// Keep the source alpha of black pixels instead of making them opaque
    pub preserve_alpha: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_BLACK_TOLERANCE,
            preserve_alpha: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub black: usize,
    pub marker: usize,
    pub transparent: usize,
}

/// Keep the marker, turn near-black ink into pure black, clear the rest.
/// Fully transparent source pixels carry no ink and stay transparent.
pub fn process_pixels(image: &RgbaImage, options: ProcessOptions) -> (RgbaImage, ProcessStats) {
    let mut stats = ProcessStats::default();
    let mut output = RgbaImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let alpha = pixel.0[3];
        let out = if is_marker(pixel) {
            stats.marker += 1;
            *pixel
        } else if alpha > 0 && is_near_black(pixel, options.tolerance) {
            stats.black += 1;
            Rgba([0, 0, 0, if options.preserve_alpha { alpha } else { 255 }])
        } else {
            stats.transparent += 1;
            Rgba([0, 0, 0, 0])
        };
        output.put_pixel(x, y, out);
    }

    (output, stats)
}

/// A PNG decoded to RGBA, with the color type it was stored in
pub struct SourceImage {
    pub image: RgbaImage,
    pub color: ColorType,
}

pub fn load_png(path: &Path) -> Result<SourceImage, HandImageError> {
    if !path.is_file() {
        return Err(HandImageError::MissingFiles(vec![path.to_path_buf()]));
    }

    let has_png_extension = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !has_png_extension {
        return Err(HandImageError::NotPng {
            path: path.to_path_buf(),
            detail: "file extension is not .png".to_string(),
        });
    }

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    match reader.format() {
        Some(ImageFormat::Png) => {}
        other => {
            return Err(HandImageError::NotPng {
                path: path.to_path_buf(),
                detail: match other {
                    Some(format) => format!("content is {:?}", format),
                    None => "unknown content".to_string(),
                },
            });
        }
    }

    let decoded = reader.decode()?;
    let color = decoded.color();
    Ok(SourceImage {
        image: decoded.into_rgba8(),
        color,
    })
}

/// Exactly one marker pixel, or an error naming what was found
pub fn single_marker(image: &RgbaImage, path: &Path) -> Result<(u32, u32), HandImageError> {
    let locations = find_marker_pixels(image);
    match locations.as_slice() {
        [] => Err(HandImageError::NoMarker(path.to_path_buf())),
        [only] => Ok(*only),
        _ => Err(HandImageError::MultipleMarkers {
            path: path.to_path_buf(),
            locations,
        }),
    }
}

/// One hand image validated and processed in memory
pub struct ProcessedHand {
    pub kind: HandKind,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub width: u32,
    pub height: u32,
    pub source_color: ColorType,
    pub marker: (u32, u32),
    pub stats: ProcessStats,
    pub image: RgbaImage,
}

impl ProcessedHand {
    /// Distance from the marker to the top edge; the hand's drawn length
    pub fn marker_to_top(&self) -> u32 {
        self.marker.1
    }
}

pub fn process_hand(
    dir: &HandSetDir,
    kind: HandKind,
    options: ProcessOptions,
) -> Result<ProcessedHand, HandImageError> {
    let source = dir.original(kind);
    let SourceImage { image, color } = load_png(&source)?;
    let marker = single_marker(&image, &source)?;
    let (processed, stats) = process_pixels(&image, options);
    debug!(
        "Processed {:?}: marker at {:?}, {:?}",
        source, marker, stats
    );

    Ok(ProcessedHand {
        kind,
        destination: dir.processed(kind),
        source,
        width: image.width(),
        height: image.height(),
        source_color: color,
        marker,
        stats,
        image: processed,
    })
}

/// Validate and process all three images of a hand set. Nothing is written
/// unless every image passes.
pub fn process_hand_set(
    dir: &HandSetDir,
    options: ProcessOptions,
) -> Result<Vec<ProcessedHand>, HandImageError> {
    let missing: Vec<PathBuf> = HandKind::ALL
        .iter()
        .map(|kind| dir.original(*kind))
        .filter(|path| !path.is_file())
        .collect();
    if !missing.is_empty() {
        return Err(HandImageError::MissingFiles(missing));
    }

    let hands = HandKind::ALL
        .iter()
        .map(|kind| process_hand(dir, *kind, options))
        .collect::<Result<Vec<_>, _>>()?;

    fs::create_dir_all(dir.processed_dir())?;
    // Nothing in processed/ is replaced until all three images are written
    let mut staged = Vec::with_capacity(hands.len());
    for hand in &hands {
        let staging = staging_path(&hand.destination);
        if let Err(e) = hand.image.save_with_format(&staging, ImageFormat::Png) {
            staged.push(staging);
            discard_staged(&staged);
            return Err(e.into());
        }
        staged.push(staging);
    }

    for (hand, staging) in hands.iter().zip(&staged) {
        fs::rename(staging, &hand.destination)?;
        info!("Saved processed image {:?}", hand.destination);
    }

    Ok(hands)
}

fn staging_path(destination: &Path) -> PathBuf {
    destination.with_extension("png.tmp")
}

fn discard_staged(staged: &[PathBuf]) {
    for path in staged {
        if path.is_file()
            && let Err(e) = fs::remove_file(path)
        {
            warn!("Could not remove staged image {:?}: {}", path, e);
        }
    }
}

// ============================================================================
// Runtime loading
// ============================================================================

/// A hand image ready for drawing
pub struct HandImage {
    pub image: RgbaImage,
    /// Rotation center in image pixels
    pub pivot: (f32, f32),
}

/// Load a hand image for display. A missing marker is tolerated: the image
/// center is used instead.
pub fn load_hand_image(path: &Path) -> Result<HandImage, HandImageError> {
    let image = image::open(path)?.into_rgba8();
    let pivot = match find_marker_pixels(&image).first() {
        Some(&(x, y)) => (x as f32, y as f32),
        None => {
            warn!("No red pixel found in {:?}, using image center", path);
            (image.width() as f32 / 2.0, image.height() as f32 / 2.0)
        }
    };
    Ok(HandImage { image, pivot })
}

/// Paint every pixel with `color`, keeping the image's alpha as the mask
pub fn tint(image: &RgbaImage, color: Rgb) -> RgbaImage {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        pixel.0 = [r, g, b, pixel.0[3]];
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::RED;
    use uuid::Uuid;

    fn setup_test_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("test_hands_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup_test_dir(test_dir: &Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    fn hand_image(marker: Option<(u32, u32)>) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(5, 9, Rgba([255, 255, 255, 255]));
        for y in 0..7 {
            image.put_pixel(2, y, Rgba([20, 20, 20, 255]));
        }
        if let Some((x, y)) = marker {
            image.put_pixel(x, y, Rgba(MARKER_RGBA));
        }
        image
    }

    fn write_set(root: &Path, marker: Option<(u32, u32)>) -> HandSetDir {
        let dir = HandSetDir::new(root.to_path_buf());
        fs::create_dir_all(dir.original_dir()).unwrap();
        for kind in HandKind::ALL {
            hand_image(marker).save(dir.original(kind)).unwrap();
        }
        dir
    }

    #[test]
    fn test_find_marker_pixels() {
        let mut image = hand_image(Some((2, 7)));
        assert_eq!(find_marker_pixels(&image), vec![(2, 7)]);

        // Opacity matters
        image.put_pixel(0, 0, Rgba([255, 0, 0, 254]));
        assert_eq!(find_marker_pixels(&image), vec![(2, 7)]);

        image.put_pixel(4, 1, Rgba(MARKER_RGBA));
        assert_eq!(find_marker_pixels(&image), vec![(4, 1), (2, 7)]);
    }

    #[test]
    fn test_process_pixels() {
        let mut image = RgbaImage::new(4, 1);
        image.put_pixel(0, 0, Rgba(MARKER_RGBA));
        image.put_pixel(1, 0, Rgba([100, 90, 5, 128]));
        image.put_pixel(2, 0, Rgba([101, 0, 0, 255]));
        image.put_pixel(3, 0, Rgba([0, 0, 0, 0]));

        let (out, stats) = process_pixels(&image, ProcessOptions::default());
        assert_eq!(out.get_pixel(0, 0).0, MARKER_RGBA);
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(2, 0).0, [0, 0, 0, 0]);
        assert_eq!(out.get_pixel(3, 0).0, [0, 0, 0, 0]);
        assert_eq!(
            stats,
            ProcessStats {
                black: 1,
                marker: 1,
                transparent: 2
            }
        );

        let preserve = ProcessOptions {
            tolerance: 100,
            preserve_alpha: true,
        };
        let (out, _) = process_pixels(&image, preserve);
        assert_eq!(out.get_pixel(1, 0).0, [0, 0, 0, 128]);
    }

    #[test]
    fn test_tolerance_bounds() {
        let pixel = Rgba([40, 40, 40, 255]);
        assert!(is_near_black(&pixel, 40));
        assert!(!is_near_black(&pixel, 39));
        assert!(is_near_black(&Rgba([255, 255, 255, 255]), 255));
        assert!(is_near_black(&Rgba([0, 0, 0, 255]), 0));
    }

    #[test]
    fn test_process_hand_set_writes_processed_images() {
        let test_dir = setup_test_dir();
        let dir = write_set(&test_dir.join("classic"), Some((2, 7)));

        let hands = process_hand_set(&dir, ProcessOptions::default()).unwrap();
        assert_eq!(hands.len(), 3);
        for hand in &hands {
            assert_eq!(hand.marker, (2, 7));
            assert_eq!(hand.marker_to_top(), 7);
            assert_eq!(hand.stats.marker, 1);
            assert!(hand.destination.is_file());

            let written = image::open(&hand.destination).unwrap().into_rgba8();
            assert_eq!(find_marker_pixels(&written), vec![(2, 7)]);
            assert_eq!(written.get_pixel(2, 0).0, [0, 0, 0, 255]);
            assert_eq!(written.get_pixel(0, 0).0, [0, 0, 0, 0]);
        }

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_rejected_set_writes_nothing() {
        let test_dir = setup_test_dir();
        let dir = write_set(&test_dir.join("broken"), Some((2, 7)));
        // Second marker in the minute hand only
        let mut minute = hand_image(Some((2, 7)));
        minute.put_pixel(0, 0, Rgba(MARKER_RGBA));
        minute.save(dir.original(HandKind::Minute)).unwrap();

        match process_hand_set(&dir, ProcessOptions::default()) {
            Err(HandImageError::MultipleMarkers { locations, .. }) => {
                assert_eq!(locations, vec![(0, 0), (2, 7)]);
            }
            other => panic!("expected MultipleMarkers, got {:?}", other.err()),
        }
        assert!(!dir.processed_dir().exists());

        let unmarked = write_set(&test_dir.join("unmarked"), None);
        assert!(matches!(
            process_hand_set(&unmarked, ProcessOptions::default()),
            Err(HandImageError::NoMarker(_))
        ));
        assert!(!unmarked.processed_dir().exists());

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_missing_and_wrong_format() {
        let test_dir = setup_test_dir();
        let dir = HandSetDir::new(test_dir.join("partial"));
        fs::create_dir_all(dir.original_dir()).unwrap();
        hand_image(Some((2, 7))).save(dir.original(HandKind::Hour)).unwrap();

        match process_hand_set(&dir, ProcessOptions::default()) {
            Err(HandImageError::MissingFiles(missing)) => {
                assert_eq!(
                    missing,
                    vec![dir.original(HandKind::Minute), dir.original(HandKind::Second)]
                );
            }
            other => panic!("expected MissingFiles, got {:?}", other.err()),
        }

        // PNG extension, other content
        fs::write(dir.original(HandKind::Minute), b"GIF89a not really").unwrap();
        assert!(matches!(
            load_png(&dir.original(HandKind::Minute)),
            Err(HandImageError::NotPng { .. })
        ));

        let jpeg_named = test_dir.join("hour.jpg");
        fs::write(&jpeg_named, b"whatever").unwrap();
        assert!(matches!(
            load_png(&jpeg_named),
            Err(HandImageError::NotPng { .. })
        ));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_resolve_prefers_processed() {
        let test_dir = setup_test_dir();
        let dir = HandSetDir::new(test_dir.join("set"));
        assert_eq!(dir.resolve(HandKind::Hour), None);

        fs::create_dir_all(dir.root()).unwrap();
        fs::write(dir.legacy(HandKind::Hour), "x").unwrap();
        assert_eq!(dir.resolve(HandKind::Hour), Some(dir.legacy(HandKind::Hour)));

        fs::create_dir_all(dir.original_dir()).unwrap();
        fs::write(dir.original(HandKind::Hour), "x").unwrap();
        assert_eq!(dir.resolve(HandKind::Hour), Some(dir.original(HandKind::Hour)));

        fs::create_dir_all(dir.processed_dir()).unwrap();
        fs::write(dir.processed(HandKind::Hour), "x").unwrap();
        assert_eq!(dir.resolve(HandKind::Hour), Some(dir.processed(HandKind::Hour)));

        assert!(dir.resolve_all().is_none());

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_locate_hand_set() {
        let test_dir = setup_test_dir();
        let builtin = test_dir.join("builtin");
        let user = test_dir.join("user");
        fs::create_dir_all(user.join("fancy")).unwrap();

        let found = locate_hand_set("fancy", &[builtin.clone(), user.clone()]).unwrap();
        assert_eq!(found.root(), user.join("fancy"));

        match locate_hand_set("nope", &[builtin.clone(), user.clone()]) {
            Err(HandImageError::HandSetNotFound(checked)) => {
                assert_eq!(checked, vec![builtin.join("nope"), user.join("nope")]);
            }
            other => panic!("expected HandSetNotFound, got {:?}", other.err()),
        }

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_list_and_import_hand_sets() {
        let test_dir = setup_test_dir();
        let paths = AppPaths::with_roots(&test_dir.join("data"), &test_dir.join("assets"));
        write_set(&paths.builtin_hands_dir().join("classic"), Some((2, 7)));
        fs::create_dir_all(paths.builtin_hands_dir().join("empty")).unwrap();

        let sets = list_hand_sets(&paths);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].source, ImageSource::Builtin);
        assert_eq!(sets[0].name, "classic");

        let outside = write_set(&test_dir.join("classic"), Some((2, 7)));
        let first = import_hand_set(outside.root(), &paths.user_hands_dir()).unwrap();
        let second = import_hand_set(outside.root(), &paths.user_hands_dir()).unwrap();
        assert_eq!(first, "classic");
        assert_eq!(second, "classic_1");

        let sets = list_hand_sets(&paths);
        let user: Vec<&str> = sets
            .iter()
            .filter(|s| s.source == ImageSource::User)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(user, vec!["classic", "classic_1"]);

        assert!(matches!(
            import_hand_set(&paths.builtin_hands_dir().join("empty"), &paths.user_hands_dir()),
            Err(HandImageError::IncompleteHandSet(_))
        ));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_load_hand_image_pivot() {
        let test_dir = setup_test_dir();
        let marked = test_dir.join("marked.png");
        hand_image(Some((1, 6))).save(&marked).unwrap();
        assert_eq!(load_hand_image(&marked).unwrap().pivot, (1.0, 6.0));

        let unmarked = test_dir.join("unmarked.png");
        hand_image(None).save(&unmarked).unwrap();
        assert_eq!(load_hand_image(&unmarked).unwrap().pivot, (2.5, 4.5));

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_tint_keeps_alpha() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 200]));
        image.put_pixel(1, 0, Rgba([9, 9, 9, 0]));

        let tinted = tint(&image, RED);
        assert_eq!(tinted.get_pixel(0, 0).0, [255, 0, 0, 200]);
        assert_eq!(tinted.get_pixel(1, 0).0, [255, 0, 0, 0]);
    }

    #[test]
    fn test_failed_write_leaves_processed_untouched() {
        let test_dir = setup_test_dir();
        let dir = write_set(&test_dir.join("classic"), Some((2, 7)));
        // A directory in the way makes the minute image unwritable
        fs::create_dir_all(staging_path(&dir.processed(HandKind::Minute))).unwrap();

        let result = process_hand_set(&dir, ProcessOptions::default());
        assert!(matches!(result, Err(HandImageError::Image(_) | HandImageError::Io(_))));
        assert!(!dir.processed(HandKind::Hour).exists());
        assert!(!staging_path(&dir.processed(HandKind::Hour)).exists());

        fs::remove_dir_all(staging_path(&dir.processed(HandKind::Minute))).unwrap();
        process_hand_set(&dir, ProcessOptions::default()).unwrap();
        let before = fs::read(dir.processed(HandKind::Hour)).unwrap();

        // A failed rerun keeps the previous set
        let dir = write_set(&test_dir.join("classic"), Some((1, 7)));
        fs::create_dir_all(staging_path(&dir.processed(HandKind::Second))).unwrap();
        assert!(process_hand_set(&dir, ProcessOptions::default()).is_err());
        assert_eq!(fs::read(dir.processed(HandKind::Hour)).unwrap(), before);
        assert!(!staging_path(&dir.processed(HandKind::Minute)).exists());

        cleanup_test_dir(&test_dir);
    }
}
