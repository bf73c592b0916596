use super::{PageRequest, widgets};
use crate::backend::texture_backend::TextureEntry;
use crate::theme::{ImageSource, Theme};
use egui::{ComboBox, Ui};

fn texture_label(source: ImageSource, name: Option<&str>) -> String {
    match (source, name) {
        (ImageSource::User, Some(name)) => format!("{} (imported)", name),
        (_, Some(name)) => name.to_string(),
        (_, None) => "(none)".to_string(),
    }
}

pub fn show(
    ui: &mut Ui,
    theme: &mut Theme,
    textures: &[TextureEntry],
    requests: &mut Vec<PageRequest>,
) -> bool {
    let mut changed = false;

    widgets::section(ui, "Color");
    changed |= widgets::toggle(ui, "Enable", &mut theme.enable_face_color);
    if theme.enable_face_color {
        changed |= widgets::color(ui, "Background:", &mut theme.background_color);
        changed |= widgets::slider(ui, "Opacity:", &mut theme.face_color_opacity, 0.0..=1.0);
    }

    widgets::section(ui, "Texture");
    changed |= widgets::toggle(ui, "Enable", &mut theme.enable_face_texture);
    if theme.enable_face_texture {
        ui.horizontal(|ui| {
            ui.label("Image:");
            ComboBox::from_id_salt("face_texture")
                .selected_text(texture_label(
                    theme.face_texture_source,
                    theme.face_texture_name.as_deref(),
                ))
                .show_ui(ui, |ui| {
                    for entry in textures {
                        let selected = theme.face_texture_source == entry.source
                            && theme.face_texture_name.as_deref() == Some(entry.name.as_str());
                        if ui
                            .selectable_label(selected, texture_label(entry.source, Some(&entry.name)))
                            .clicked()
                            && !selected
                        {
                            theme.face_texture_source = entry.source;
                            theme.face_texture_name = Some(entry.name.clone());
                            changed = true;
                        }
                    }
                });
            if ui.button("Import…").clicked() {
                requests.push(PageRequest::ImportTexture);
            }
        });
        changed |= widgets::slider(ui, "Opacity:", &mut theme.face_texture_opacity, 0.0..=1.0);
    }

    widgets::section(ui, "Rim");
    changed |= widgets::slider(ui, "Width:", &mut theme.rim_width, 0.0..=0.2);
    changed |= widgets::slider(ui, "Opacity:", &mut theme.rim_opacity, 0.0..=1.0);
    changed |= widgets::color(ui, "Color:", &mut theme.rim_color);

    changed
}
