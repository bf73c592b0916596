use super::ThemeRequest;
use crate::backend::theme_backend::ThemeStore;
use crate::config::AppPaths;
use crate::constant::DEFAULT_THEME_NAME;
use crate::theme::Theme;
use crate::ui::face::ClockFace;
use crate::ui::font::FontBook;
use crate::ui::textures::TextureCache;
use chrono::{DateTime, Local};
use egui::{
    Align, Align2, CornerRadius, FontId, Layout, Rect, ScrollArea, Sense, Stroke, StrokeKind, Ui,
    vec2,
};
use std::collections::BTreeMap;
use tracing::warn;

const THUMBNAIL_SIZE: f32 = 120.0;
const LABEL_HEIGHT: f32 = 20.0;

/// Stored values of every listed theme, for the preview grid
pub fn load_previews(store: &ThemeStore, names: &[String]) -> BTreeMap<String, Theme> {
    names
        .iter()
        .map(|name| {
            let theme = if name == DEFAULT_THEME_NAME {
                Theme::default()
            } else {
                store.read(name).unwrap_or_else(|e| {
                    warn!("Could not preview theme '{}': {}", name, e);
                    Theme::default()
                })
            };
            (name.clone(), theme)
        })
        .collect()
}

/// Everything needed to paint a clock thumbnail
pub struct PreviewPainter<'a> {
    pub paths: &'a AppPaths,
    pub fonts: &'a mut FontBook,
    pub textures: &'a mut TextureCache,
    pub now: DateTime<Local>,
}

impl PreviewPainter<'_> {
    fn thumbnail(&mut self, ui: &Ui, rect: Rect, theme: &Theme) {
        let face = ClockFace {
            theme,
            paths: self.paths,
            show_date: true,
            show_seconds: true,
            minute_snap: true,
        };
        face.paint(ui, rect, &self.now, self.fonts, self.textures);
    }
}

/// Clicking selects, double-clicking applies. The active theme is previewed
/// with its live values.
#[allow(clippy::too_many_arguments)]
pub fn show(
    ui: &mut Ui,
    names: &[String],
    previews: &BTreeMap<String, Theme>,
    active_name: &str,
    active: &Theme,
    selected: &mut Option<String>,
    painter: &mut PreviewPainter<'_>,
    requests: &mut Vec<ThemeRequest>,
) {
    ui.label("Double-click a theme to apply it.");
    ui.add_space(4.0);

    let fallback = Theme::default();
    ScrollArea::vertical().max_height(380.0).show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for name in names {
                let theme = if name == active_name {
                    active
                } else {
                    previews.get(name).unwrap_or(&fallback)
                };

                let (rect, response) = ui.allocate_exact_size(
                    vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE + LABEL_HEIGHT),
                    Sense::click(),
                );
                let is_selected = selected.as_deref() == Some(name.as_str());
                let visuals = ui.visuals();
                if is_selected {
                    ui.painter()
                        .rect_filled(rect, CornerRadius::same(6), visuals.selection.bg_fill);
                } else if response.hovered() {
                    ui.painter()
                        .rect_filled(rect, CornerRadius::same(6), visuals.widgets.hovered.bg_fill);
                }
                if name == active_name {
                    ui.painter().rect_stroke(
                        rect,
                        CornerRadius::same(6),
                        Stroke::new(2.0, visuals.selection.stroke.color),
                        StrokeKind::Inside,
                    );
                }

                let face_rect = Rect::from_min_size(rect.min, vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE));
                painter.thumbnail(ui, face_rect, theme);

                let label = if name == active_name {
                    format!("● {}", name)
                } else {
                    name.clone()
                };
                ui.painter().text(
                    rect.center_bottom() - vec2(0.0, LABEL_HEIGHT / 2.0),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(13.0),
                    ui.visuals().text_color(),
                );

                if response.clicked() {
                    *selected = Some(name.clone());
                }
                if response.double_clicked() {
                    requests.push(ThemeRequest::Apply(name.clone()));
                }
            }
        });
    });

    ui.add_space(8.0);
    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        let target = selected.clone();
        if ui
            .add_enabled(target.is_some(), egui::Button::new("Apply"))
            .clicked()
            && let Some(name) = &target
        {
            requests.push(ThemeRequest::Apply(name.clone()));
        }

        if ui.button("Duplicate…").clicked() {
            requests.push(ThemeRequest::Duplicate);
        }

        let deletable = target.as_deref().is_some_and(|name| name != DEFAULT_THEME_NAME);
        if ui
            .add_enabled(deletable, egui::Button::new("Delete"))
            .clicked()
            && let Some(name) = target
        {
            requests.push(ThemeRequest::Delete(name));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use uuid::Uuid;

    fn setup_test_store() -> (ThemeStore, std::path::PathBuf) {
        let test_dir = std::env::temp_dir().join(format!("test_previews_{}", Uuid::new_v4()));
        let store = ThemeStore::new(test_dir.join("themes"));
        fs::create_dir_all(store.themes_dir()).unwrap();
        (store, test_dir)
    }

    fn cleanup_test_dir(test_dir: &Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_load_previews_reads_every_listed_theme() {
        let (store, test_dir) = setup_test_store();
        fs::write(store.theme_path("night"), r#"{"rim_width": 0.05}"#).unwrap();
        fs::write(store.theme_path("broken"), "{ not json").unwrap();
        // A stray default file never shadows the builtin theme
        fs::write(store.theme_path("default"), r#"{"show_numbers": false}"#).unwrap();

        let names = store.list();
        let previews = load_previews(&store, &names);

        assert_eq!(previews.len(), names.len());
        assert_eq!(previews["night"].rim_width, 0.05);
        assert_eq!(previews["broken"], Theme::default());
        assert!(previews["default"].show_numbers);

        cleanup_test_dir(&test_dir);
    }
}
