//! System fonts for the dial numbers and the date text
//!
//! Themes name fonts by family ("Sans", "DejaVu Serif", ...). Families are
//! looked up with font-kit on first use and registered with egui under their
//! own `FontFamily::Name`.

use eframe::egui::{Context, FontData, FontDefinitions, FontFamily};
use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::{Properties, Weight};
use font_kit::source::SystemSource;
use std::collections::HashSet;
use std::sync::Arc;

/// Registered font families.
///
/// egui applies new font definitions at the start of the next frame and
/// panics on an unknown `FontFamily::Name`, so a newly loaded family is only
/// handed out once a frame has begun after its registration. Until then
/// (and for families that failed to load) the default proportional family is
/// used.
pub struct FontBook {
    definitions: FontDefinitions,
    pending: HashSet<String>,
    active: HashSet<String>,
    failed: HashSet<String>,
    system_families: Option<Vec<String>>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self {
            definitions: FontDefinitions::default(),
            pending: HashSet::new(),
            active: HashSet::new(),
            failed: HashSet::new(),
            system_families: None,
        }
    }

    /// Call once at the start of every frame
    pub fn begin_frame(&mut self) {
        self.active.extend(self.pending.drain());
    }

    /// Family to paint `name` with, loading it on first use
    pub fn family(&mut self, ctx: &Context, name: &str, bold: bool) -> FontFamily {
        let key = font_key(name, bold);
        if self.active.contains(&key) {
            return FontFamily::Name(key.into());
        }
        if self.pending.contains(&key) || self.failed.contains(&key) {
            return FontFamily::Proportional;
        }

        match load_font_bytes(name, bold) {
            Some(bytes) => {
                self.register(&key, bytes);
                ctx.set_fonts(self.definitions.clone());
                tracing::info!("Loaded system font '{}'", key);
                self.pending.insert(key);
            }
            None => {
                tracing::warn!("Font '{}' not found, using the default font", key);
                self.failed.insert(key);
            }
        }
        FontFamily::Proportional
    }

    fn register(&mut self, key: &str, bytes: Vec<u8>) {
        self.definitions
            .font_data
            .insert(key.to_owned(), Arc::new(FontData::from_owned(bytes)));

        // The default fonts stay behind as glyph fallbacks
        let mut chain = vec![key.to_owned()];
        if let Some(proportional) = self.definitions.families.get(&FontFamily::Proportional) {
            chain.extend(proportional.iter().cloned());
        }
        self.definitions
            .families
            .insert(FontFamily::Name(key.into()), chain);
    }

    /// Installed font families, sorted; queried once
    pub fn system_families(&mut self) -> &[String] {
        self.system_families.get_or_insert_with(|| {
            let mut families = match SystemSource::new().all_families() {
                Ok(families) => families,
                Err(e) => {
                    tracing::warn!("Could not list system fonts: {:?}", e);
                    Vec::new()
                }
            };
            families.sort();
            families.dedup();
            families
        })
    }
}

fn font_key(name: &str, bold: bool) -> String {
    if bold {
        format!("{} Bold", name)
    } else {
        name.to_owned()
    }
}

/// Generic names used by themes map to font-kit's generic families
fn family_name(name: &str) -> FamilyName {
    match name.to_ascii_lowercase().as_str() {
        "sans" | "sans-serif" => FamilyName::SansSerif,
        "serif" => FamilyName::Serif,
        "monospace" | "mono" => FamilyName::Monospace,
        "cursive" => FamilyName::Cursive,
        "fantasy" => FamilyName::Fantasy,
        _ => FamilyName::Title(name.to_owned()),
    }
}

fn load_font_bytes(name: &str, bold: bool) -> Option<Vec<u8>> {
    let mut properties = Properties::new();
    if bold {
        properties.weight(Weight::BOLD);
    }

    let handle = SystemSource::new()
        .select_best_match(&[family_name(name)], &properties)
        .ok()?;
    match handle {
        Handle::Memory { bytes, .. } => Some(bytes.to_vec()),
        Handle::Path { path, .. } => std::fs::read(&path).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_key() {
        assert_eq!(font_key("Sans", false), "Sans");
        assert_eq!(font_key("Sans", true), "Sans Bold");
    }

    #[test]
    fn test_generic_family_names() {
        assert!(matches!(family_name("Sans"), FamilyName::SansSerif));
        assert!(matches!(family_name("serif"), FamilyName::Serif));
        assert!(matches!(family_name("DejaVu Serif"), FamilyName::Title(t) if t == "DejaVu Serif"));
    }

    #[test]
    fn test_new_family_is_not_handed_out_before_next_frame() {
        let mut book = FontBook::new();
        book.pending.insert("Sans".to_string());
        assert!(!book.active.contains("Sans"));

        book.begin_frame();
        assert!(book.active.contains("Sans"));
        assert!(book.pending.is_empty());
    }
}
