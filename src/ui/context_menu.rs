use egui::Ui;

pub enum ContextMenuAction {
    SetAutostart(bool),
    SetShowDate(bool),
    SetShowSeconds(bool),
    SetAlwaysOnTop(bool),
    Customize,
    Exit,
}

pub struct ContextMenuState {
    pub autostart: bool,
    pub show_date: bool,
    pub show_seconds: bool,
    pub always_on_top: bool,
}

pub struct ContextMenu;

impl ContextMenu {
    pub fn show(ui: &mut Ui, state: ContextMenuState) -> Option<ContextMenuAction> {
        let ContextMenuState {
            mut autostart,
            mut show_date,
            mut show_seconds,
            mut always_on_top,
        } = state;

        let mut action = None;

        if ui.checkbox(&mut autostart, "Auto Start on Logon").clicked() {
            action = Some(ContextMenuAction::SetAutostart(autostart));
        }
        if ui.checkbox(&mut show_date, "Show Date").clicked() {
            action = Some(ContextMenuAction::SetShowDate(show_date));
        }
        if ui.checkbox(&mut show_seconds, "Show Seconds").clicked() {
            action = Some(ContextMenuAction::SetShowSeconds(show_seconds));
        }
        if ui.checkbox(&mut always_on_top, "Always on Top").clicked() {
            action = Some(ContextMenuAction::SetAlwaysOnTop(always_on_top));
        }

        ui.separator();

        if ui.button("Customize…").clicked() {
            action = Some(ContextMenuAction::Customize);
        }
        if ui.button("Exit").clicked() {
            action = Some(ContextMenuAction::Exit);
        }

        if action.is_some() {
            ui.close();
        }
        action
    }
}
