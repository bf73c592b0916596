//! Labeled rows used by the settings pages. Every helper returns whether the
//! value changed.

use crate::theme::Rgb;
use egui::{ComboBox, Slider, Ui};
use std::ops::RangeInclusive;

const GENERIC_FONTS: [&str; 3] = ["Sans", "Serif", "Monospace"];

pub fn section(ui: &mut Ui, title: &str) {
    ui.add_space(6.0);
    ui.strong(title);
}

pub fn slider(ui: &mut Ui, label: &str, value: &mut f32, range: RangeInclusive<f32>) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(Slider::new(value, range).max_decimals(3)).changed()
    })
    .inner
}

pub fn toggle(ui: &mut Ui, label: &str, value: &mut bool) -> bool {
    ui.checkbox(value, label).changed()
}

pub fn color(ui: &mut Ui, label: &str, value: &mut Rgb) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.color_edit_button_rgb(value).changed()
    })
    .inner
}

pub fn choice<T: PartialEq + Copy>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    value: &mut T,
    options: &[(T, &str)],
) -> bool {
    let selected = options
        .iter()
        .find(|(option, _)| option == value)
        .map(|(_, name)| *name)
        .unwrap_or_default();

    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        ComboBox::from_id_salt(id)
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for (option, name) in options {
                    changed |= ui.selectable_value(value, *option, *name).changed();
                }
            });
    });
    changed
}

/// Generic families first, then the installed ones
pub fn font(ui: &mut Ui, id: &str, label: &str, value: &mut String, families: &[String]) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        ComboBox::from_id_salt(id)
            .selected_text(value.as_str())
            .height(320.0)
            .show_ui(ui, |ui| {
                let all = GENERIC_FONTS
                    .iter()
                    .copied()
                    .chain(families.iter().map(String::as_str));
                for family in all {
                    if ui.selectable_label(value.as_str() == family, family).clicked() && value.as_str() != family {
                        *value = family.to_string();
                        changed = true;
                    }
                }
            });
    });
    changed
}
