use super::widgets;
use crate::theme::Theme;
use egui::Ui;

pub fn show(ui: &mut Ui, theme: &mut Theme, font_families: &[String]) -> bool {
    let mut changed = widgets::toggle(ui, "Show numbers", &mut theme.show_numbers);
    if !theme.show_numbers {
        return changed;
    }

    widgets::section(ui, "Layout");
    changed |= widgets::slider(ui, "Position:", &mut theme.number_position, 0.5..=0.95);
    changed |= widgets::slider(ui, "Size:", &mut theme.number_size, 0.05..=0.3);
    changed |= widgets::toggle(ui, "Roman numerals", &mut theme.use_roman_numerals);
    changed |= widgets::toggle(
        ui,
        "Only 12, 3, 6 and 9",
        &mut theme.show_cardinal_numbers_only,
    );

    widgets::section(ui, "Font");
    changed |= widgets::font(ui, "number_font", "Font:", &mut theme.number_font, font_families);
    changed |= widgets::toggle(ui, "Bold", &mut theme.number_bold);
    changed |= widgets::color(ui, "Color:", &mut theme.numbers_color);

    changed
}
