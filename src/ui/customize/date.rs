use super::widgets;
use crate::theme::{DEFAULT_DATE_FORMAT, Theme};
use crate::ui::face::format_date;
use chrono::{DateTime, Local};
use egui::{ComboBox, TextEdit, Ui};

const PRESET_FORMATS: [&str; 8] = [
    DEFAULT_DATE_FORMAT,
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%A, %B %d",
    "%a %d %b",
];

pub fn show(
    ui: &mut Ui,
    theme: &mut Theme,
    font_families: &[String],
    format_buffer: &mut String,
    now: &DateTime<Local>,
) -> bool {
    let mut changed = false;

    widgets::section(ui, "Date Box");
    changed |= widgets::slider(ui, "Width:", &mut theme.date_box_width, 0.4..=2.0);
    changed |= widgets::slider(ui, "Height:", &mut theme.date_box_height, 0.1..=0.5);
    changed |= widgets::slider(ui, "Margin:", &mut theme.date_box_margin, 0.0..=0.5);

    widgets::section(ui, "Format");
    ui.horizontal(|ui| {
        ui.label("Preset:");
        ComboBox::from_id_salt("date_format_preset")
            .selected_text(format_date(now, &theme.date_format))
            .show_ui(ui, |ui| {
                for preset in PRESET_FORMATS {
                    let selected = theme.date_format == preset;
                    if ui
                        .selectable_label(selected, format_date(now, preset))
                        .clicked()
                        && !selected
                    {
                        theme.date_format = preset.to_string();
                        *format_buffer = theme.date_format.clone();
                        changed = true;
                    }
                }
            });
    });

    ui.horizontal(|ui| {
        ui.label("Custom:");
        let response = ui.add(TextEdit::singleline(format_buffer).desired_width(160.0));
        if response.changed() && !format_buffer.is_empty() && *format_buffer != theme.date_format {
            theme.date_format = format_buffer.clone();
            changed = true;
        }
    });
    ui.small("%Y year  %m month  %d day  %B / %b month name  %A / %a weekday");
    ui.label(format!("Preview: {}", format_date(now, &theme.date_format)));

    widgets::section(ui, "Font");
    changed |= widgets::slider(ui, "Font size:", &mut theme.date_font_size, 0.05..=0.2);
    changed |= widgets::font(ui, "date_font", "Font:", &mut theme.date_font, font_families);
    changed |= widgets::toggle(ui, "Bold", &mut theme.date_bold);
    changed |= widgets::color(ui, "Color:", &mut theme.date_text_color);

    changed
}
