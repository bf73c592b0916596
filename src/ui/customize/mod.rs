//! The "Clock Settings" window: theme management and live editing of the
//! active theme and the behavioral settings.

mod date;
mod face;
mod hands;
mod numbers;
mod options;
mod themes;
mod ticks;
mod widgets;

use crate::backend::autostart_backend;
use crate::backend::hand_backend::{HandSetEntry, list_hand_sets};
use crate::backend::texture_backend::{TEXTURE_EXTENSIONS, TextureEntry, list_textures};
use crate::backend::theme_backend::{ActiveTheme, ThemeStore, validate_name};
use crate::config::{AppPaths, Settings};
use crate::constant::{CUSTOMIZE_WINDOW_TITLE, DEFAULT_THEME_NAME};
use crate::saver::SaverMessage;
use crate::theme::Theme;
use crate::ui::font::FontBook;
use crate::ui::textures::TextureCache;
use chrono::Local;
use egui::{Align, Button, Context, Id, Key, Layout, Modal, ScrollArea, Ui, ViewportCommand};
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use tracing::{error, info};

/// Side effects the clock window carries out after the settings window ran
#[derive(Debug, Clone, PartialEq)]
pub enum CustomizeAction {
    SaveSettings,
    /// Clock size or date visibility changed
    ResizeWindow,
    SetAlwaysOnTop(bool),
    SetAutostart(bool),
}

pub(crate) enum PageRequest {
    ImportTexture,
    ImportHandSet,
}

pub(crate) enum ThemeRequest {
    Apply(String),
    Duplicate,
    Delete(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Themes,
    Face,
    Ticks,
    Numbers,
    Hands,
    Date,
    Options,
}

impl Page {
    const ALL: [Page; 7] = [
        Page::Themes,
        Page::Face,
        Page::Ticks,
        Page::Numbers,
        Page::Hands,
        Page::Date,
        Page::Options,
    ];

    fn label(self) -> &'static str {
        match self {
            Page::Themes => "Themes",
            Page::Face => "Clock Face",
            Page::Ticks => "Ticks",
            Page::Numbers => "Numbers",
            Page::Hands => "Hands",
            Page::Date => "Date Box",
            Page::Options => "Options",
        }
    }
}

enum NamePurpose {
    SaveAs,
    Duplicate,
}

/// What to do once unsaved changes are dealt with
enum AfterPrompt {
    Apply(String),
    Close,
}

enum Dialog {
    Name {
        purpose: NamePurpose,
        name: String,
        error: Option<String>,
    },
    Unsaved(AfterPrompt),
    ConfirmDelete(String),
}

/// State owned by the clock window that the settings window edits
pub struct CustomizeContext<'a> {
    pub theme: &'a mut ActiveTheme,
    pub settings: &'a mut Settings,
    pub store: &'a ThemeStore,
    pub paths: &'a AppPaths,
    pub fonts: &'a mut FontBook,
    pub textures: &'a mut TextureCache,
    pub saver: &'a Sender<SaverMessage>,
}

pub struct CustomizeWindow {
    open: bool,
    viewport_id: egui::ViewportId,
    page: Page,
    theme_names: Vec<String>,
    previews: BTreeMap<String, Theme>,
    selected_theme: Option<String>,
    hand_sets: Vec<HandSetEntry>,
    textures: Vec<TextureEntry>,
    autostart: bool,
    date_format_buffer: String,
    dialog: Option<Dialog>,
    status: Option<String>,
    actions: Vec<CustomizeAction>,
}

impl Default for CustomizeWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomizeWindow {
    pub fn new() -> Self {
        Self {
            open: false,
            viewport_id: egui::ViewportId::from_hash_of("customize_window"),
            page: Page::Themes,
            theme_names: Vec::new(),
            previews: BTreeMap::new(),
            selected_theme: None,
            hand_sets: Vec::new(),
            textures: Vec::new(),
            autostart: false,
            date_format_buffer: String::new(),
            dialog: None,
            status: None,
            actions: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, store: &ThemeStore, paths: &AppPaths, theme: &ActiveTheme) {
        self.refresh_themes(store);
        self.refresh_assets(paths);
        self.autostart = autostart_backend::is_enabled(&paths.autostart_dir);
        self.date_format_buffer = theme.properties().date_format.clone();
        self.selected_theme = Some(theme.name().to_string());
        self.status = None;
        self.open = true;
    }

    pub fn refresh_themes(&mut self, store: &ThemeStore) {
        self.theme_names = store.list();
        self.previews = themes::load_previews(store, &self.theme_names);
    }

    pub fn refresh_assets(&mut self, paths: &AppPaths) {
        self.hand_sets = list_hand_sets(paths);
        self.textures = list_textures(paths);
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Keep the autostart checkbox in sync with changes made elsewhere
    pub fn set_autostart(&mut self, enabled: bool) {
        self.autostart = enabled;
    }

    pub fn show(&mut self, ctx: &Context, mut cx: CustomizeContext<'_>) -> Vec<CustomizeAction> {
        if !self.open {
            return Vec::new();
        }

        let title = format!(
            "{} - {}{}",
            CUSTOMIZE_WINDOW_TITLE,
            cx.theme.name(),
            if cx.theme.is_dirty() { " *" } else { "" }
        );

        ctx.show_viewport_immediate(
            self.viewport_id,
            egui::ViewportBuilder::default()
                .with_title(title)
                .with_inner_size([620.0, 560.0])
                .with_min_inner_size([420.0, 360.0]),
            |ctx, _class| {
                if ctx.input(|i| i.viewport().close_requested()) {
                    ctx.send_viewport_cmd(ViewportCommand::CancelClose);
                    self.request_close(&cx);
                }

                egui::TopBottomPanel::bottom("customize_buttons").show(ctx, |ui| {
                    self.show_buttons(ui, &mut cx);
                });

                egui::SidePanel::left("customize_pages")
                    .resizable(false)
                    .show(ctx, |ui| {
                        for page in Page::ALL {
                            ui.selectable_value(&mut self.page, page, page.label());
                        }
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    ScrollArea::vertical().show(ui, |ui| {
                        self.show_page(ui, &mut cx);
                    });
                });

                self.show_dialog(ctx, &mut cx);
            },
        );

        std::mem::take(&mut self.actions)
    }

    fn show_buttons(&mut self, ui: &mut Ui, cx: &mut CustomizeContext<'_>) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(cx.theme.is_dirty(), Button::new("Save"))
                .clicked()
            {
                self.save(cx);
            }
            if ui.button("Save As…").clicked() {
                let name = if cx.theme.is_default() {
                    String::new()
                } else {
                    cx.theme.name().to_string()
                };
                self.dialog = Some(Dialog::Name {
                    purpose: NamePurpose::SaveAs,
                    name,
                    error: None,
                });
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    self.request_close(cx);
                }
                if let Some(status) = &self.status {
                    ui.label(status);
                }
            });
        });
        ui.add_space(4.0);
    }

    fn show_page(&mut self, ui: &mut Ui, cx: &mut CustomizeContext<'_>) {
        let page = self.page;
        match page {
            Page::Themes => {
                let mut requests = Vec::new();
                let mut painter = themes::PreviewPainter {
                    paths: cx.paths,
                    fonts: &mut *cx.fonts,
                    textures: &mut *cx.textures,
                    now: Local::now(),
                };
                themes::show(
                    ui,
                    &self.theme_names,
                    &self.previews,
                    cx.theme.name(),
                    cx.theme.properties(),
                    &mut self.selected_theme,
                    &mut painter,
                    &mut requests,
                );
                for request in requests {
                    self.handle_theme_request(request, cx);
                }
                return;
            }
            Page::Options => {
                options::show(ui, cx.settings, &mut self.autostart, &mut self.actions);
                return;
            }
            _ => {}
        }

        let mut requests = Vec::new();
        let mut edited = cx.theme.properties().clone();
        let changed = match page {
            Page::Face => face::show(ui, &mut edited, &self.textures, &mut requests),
            Page::Ticks => ticks::show(ui, &mut edited),
            Page::Numbers => numbers::show(ui, &mut edited, cx.fonts.system_families()),
            Page::Hands => hands::show(ui, &mut edited, &self.hand_sets, &mut requests),
            Page::Date => date::show(
                ui,
                &mut edited,
                cx.fonts.system_families(),
                &mut self.date_format_buffer,
                &Local::now(),
            ),
            Page::Themes | Page::Options => false,
        };

        if changed {
            let date_box_resized = {
                let before = cx.theme.properties();
                before.date_box_height != edited.date_box_height
                    || before.date_box_margin != edited.date_box_margin
            };
            cx.theme.update(|theme| *theme = edited);
            if date_box_resized && cx.settings.show_date_box {
                self.actions.push(CustomizeAction::ResizeWindow);
            }
        }

        for request in requests {
            spawn_import(request, cx.saver);
        }
    }

    fn handle_theme_request(&mut self, request: ThemeRequest, cx: &mut CustomizeContext<'_>) {
        match request {
            ThemeRequest::Apply(name) => {
                if cx.theme.is_dirty() {
                    self.dialog = Some(Dialog::Unsaved(AfterPrompt::Apply(name)));
                } else if name != cx.theme.name() {
                    self.apply_theme(&name, cx);
                }
            }
            ThemeRequest::Duplicate => {
                self.dialog = Some(Dialog::Name {
                    purpose: NamePurpose::Duplicate,
                    name: format!("{}_copy", cx.theme.name()),
                    error: None,
                });
            }
            ThemeRequest::Delete(name) => {
                self.dialog = Some(Dialog::ConfirmDelete(name));
            }
        }
    }

    /// Swap in the named theme as loaded from disk
    fn apply_theme(&mut self, name: &str, cx: &mut CustomizeContext<'_>) {
        *cx.theme = cx.store.load(name);
        cx.settings.active_theme_name = name.to_string();
        self.date_format_buffer = cx.theme.properties().date_format.clone();
        self.selected_theme = Some(name.to_string());
        self.actions.push(CustomizeAction::SaveSettings);
        if cx.settings.show_date_box {
            self.actions.push(CustomizeAction::ResizeWindow);
        }
        info!("Applied theme '{}'", name);
    }

    /// Save the active theme. The default theme can't be saved in place, so
    /// this opens the name dialog instead and returns false.
    fn save(&mut self, cx: &mut CustomizeContext<'_>) -> bool {
        if cx.theme.is_default() {
            self.dialog = Some(Dialog::Name {
                purpose: NamePurpose::SaveAs,
                name: String::new(),
                error: None,
            });
            return false;
        }

        send(
            cx.saver,
            SaverMessage::SaveTheme {
                name: cx.theme.name().to_string(),
                theme: cx.theme.properties().clone(),
            },
        );
        cx.theme.mark_saved();
        self.actions.push(CustomizeAction::SaveSettings);
        self.set_status(format!("Saved '{}'", cx.theme.name()));
        true
    }

    /// Store the active values under a new name and switch to it
    fn store_as(&mut self, name: &str, cx: &mut CustomizeContext<'_>) -> Result<(), String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Enter a theme name.".to_string());
        }
        if name == DEFAULT_THEME_NAME {
            return Err(format!("Cannot use '{}' as a theme name.", DEFAULT_THEME_NAME));
        }
        validate_name(name).map_err(|e| e.to_string())?;

        let mut copy = cx.theme.duplicate(name);
        send(
            cx.saver,
            SaverMessage::SaveTheme {
                name: name.to_string(),
                theme: copy.properties().clone(),
            },
        );
        copy.mark_saved();
        self.previews
            .insert(name.to_string(), copy.properties().clone());
        *cx.theme = copy;
        cx.settings.active_theme_name = name.to_string();
        self.actions.push(CustomizeAction::SaveSettings);

        if !self.theme_names.iter().any(|n| n == name) {
            self.theme_names.push(name.to_string());
            self.theme_names.sort();
        }
        self.selected_theme = Some(name.to_string());
        self.set_status(format!("Saved '{}'", name));
        Ok(())
    }

    fn request_close(&mut self, cx: &CustomizeContext<'_>) {
        if cx.theme.is_dirty() {
            self.dialog = Some(Dialog::Unsaved(AfterPrompt::Close));
        } else {
            self.open = false;
        }
    }

    fn finish(&mut self, after: AfterPrompt, cx: &mut CustomizeContext<'_>) {
        match after {
            AfterPrompt::Apply(name) => {
                if name != cx.theme.name() || cx.theme.is_dirty() {
                    self.apply_theme(&name, cx);
                }
            }
            AfterPrompt::Close => self.open = false,
        }
    }

    fn show_dialog(&mut self, ctx: &Context, cx: &mut CustomizeContext<'_>) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };

        let next = match dialog {
            Dialog::Name {
                purpose,
                mut name,
                error,
            } => {
                let title = match purpose {
                    NamePurpose::SaveAs => "Save Theme As",
                    NamePurpose::Duplicate => "Duplicate Theme",
                };
                let mut confirmed = false;
                let mut cancelled = false;
                let modal = Modal::new(Id::new("theme_name_dialog")).show(ctx, |ui| {
                    ui.heading(title);
                    ui.label("Theme name:");
                    let response = ui.text_edit_singleline(&mut name);
                    response.request_focus();
                    if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                        confirmed = true;
                    }
                    if let Some(error) = &error {
                        ui.colored_label(ui.visuals().error_fg_color, error);
                    }
                    ui.horizontal(|ui| {
                        confirmed |= ui.button("Save").clicked();
                        cancelled |= ui.button("Cancel").clicked();
                    });
                });

                if cancelled || (modal.should_close() && !confirmed) {
                    None
                } else if confirmed {
                    match self.store_as(&name, cx) {
                        Ok(()) => None,
                        Err(error) => Some(Dialog::Name {
                            purpose,
                            name,
                            error: Some(error),
                        }),
                    }
                } else {
                    Some(Dialog::Name {
                        purpose,
                        name,
                        error,
                    })
                }
            }
            Dialog::Unsaved(after) => {
                let mut choice = None;
                let modal = Modal::new(Id::new("unsaved_changes_dialog")).show(ctx, |ui| {
                    ui.heading("Save changes?");
                    ui.label(format!(
                        "The theme '{}' has unsaved changes.",
                        cx.theme.name()
                    ));
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            choice = Some(UnsavedChoice::Save);
                        }
                        if ui.button("Discard").clicked() {
                            choice = Some(UnsavedChoice::Discard);
                        }
                        if ui.button("Cancel").clicked() {
                            choice = Some(UnsavedChoice::Cancel);
                        }
                    });
                });
                if choice.is_none() && modal.should_close() {
                    choice = Some(UnsavedChoice::Cancel);
                }

                match choice {
                    Some(UnsavedChoice::Save) => {
                        if self.save(cx) {
                            self.finish(after, cx);
                        }
                        None
                    }
                    Some(UnsavedChoice::Discard) => {
                        // Reload the last saved values
                        let name = cx.theme.name().to_string();
                        *cx.theme = cx.store.load(&name);
                        self.date_format_buffer = cx.theme.properties().date_format.clone();
                        self.finish(after, cx);
                        None
                    }
                    Some(UnsavedChoice::Cancel) => None,
                    None => Some(Dialog::Unsaved(after)),
                }
            }
            Dialog::ConfirmDelete(name) => {
                let mut confirmed = false;
                let mut cancelled = false;
                let modal = Modal::new(Id::new("delete_theme_dialog")).show(ctx, |ui| {
                    ui.heading(format!("Delete theme '{}'?", name));
                    ui.label("This action cannot be undone.");
                    ui.horizontal(|ui| {
                        confirmed |= ui.button("Delete").clicked();
                        cancelled |= ui.button("Cancel").clicked();
                    });
                });

                if confirmed {
                    self.delete_theme(&name, cx);
                    None
                } else if cancelled || modal.should_close() {
                    None
                } else {
                    Some(Dialog::ConfirmDelete(name))
                }
            }
        };

        // A handler may have opened a follow-up dialog
        if self.dialog.is_none() {
            self.dialog = next;
        }
    }

    fn delete_theme(&mut self, name: &str, cx: &mut CustomizeContext<'_>) {
        match cx.store.delete(name) {
            Ok(()) => {
                if cx.theme.name() == name {
                    self.apply_theme(DEFAULT_THEME_NAME, cx);
                }
                self.theme_names.retain(|n| n != name);
                self.previews.remove(name);
                self.selected_theme = Some(cx.theme.name().to_string());
                self.set_status(format!("Deleted '{}'", name));
            }
            Err(e) => {
                error!("Failed to delete theme '{}': {}", name, e);
                self.set_status(format!("Failed to delete '{}': {}", name, e));
            }
        }
    }
}

enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

fn send(saver: &Sender<SaverMessage>, message: SaverMessage) {
    if let Err(e) = saver.send(message) {
        error!("Failed to send message to saver: {}", e);
    }
}

/// Pick a file or folder off the UI thread and hand it to the saver
fn spawn_import(request: PageRequest, saver: &Sender<SaverMessage>) {
    let sender = saver.clone();
    std::thread::spawn(move || {
        let message = match request {
            PageRequest::ImportTexture => rfd::FileDialog::new()
                .set_title("Import Texture")
                .add_filter("Images", &TEXTURE_EXTENSIONS)
                .pick_file()
                .map(SaverMessage::ImportTexture),
            PageRequest::ImportHandSet => rfd::FileDialog::new()
                .set_title("Import Hand Set Folder")
                .pick_folder()
                .map(SaverMessage::ImportHandSet),
        };
        if let Some(message) = message
            && let Err(e) = sender.send(message)
        {
            error!("Failed to send import request: {}", e);
        }
    });
}
