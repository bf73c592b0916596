use super::{CustomizeAction, widgets};
use crate::config::Settings;
use crate::constant::{MAX_CLOCK_SIZE, MIN_CLOCK_SIZE};
use egui::{Slider, Ui};

pub fn show(
    ui: &mut Ui,
    settings: &mut Settings,
    autostart: &mut bool,
    actions: &mut Vec<CustomizeAction>,
) {
    widgets::section(ui, "Overall Size");
    ui.horizontal(|ui| {
        ui.label("Clock size (px):");
        let response = ui.add(Slider::new(
            &mut settings.clock_size,
            MIN_CLOCK_SIZE..=MAX_CLOCK_SIZE,
        ));
        if response.changed() {
            actions.push(CustomizeAction::ResizeWindow);
        }
    });

    widgets::section(ui, "System Options");
    if widgets::toggle(ui, "Auto start on logon", autostart) {
        actions.push(CustomizeAction::SetAutostart(*autostart));
    }

    widgets::section(ui, "Display Options");
    if widgets::toggle(ui, "Show date", &mut settings.show_date_box) {
        actions.push(CustomizeAction::ResizeWindow);
    }
    if widgets::toggle(ui, "Show seconds", &mut settings.show_second_hand) {
        actions.push(CustomizeAction::SaveSettings);
    }
    if widgets::toggle(ui, "Snap minute hand", &mut settings.minute_hand_snap) {
        actions.push(CustomizeAction::SaveSettings);
    }
    if widgets::toggle(ui, "Always on top", &mut settings.always_on_top) {
        actions.push(CustomizeAction::SetAlwaysOnTop(settings.always_on_top));
    }
}
