use crate::backend::autostart_backend;
use crate::backend::theme_backend::{ActiveTheme, ThemeStore};
use crate::clock::window_height_for;
use crate::config::{AppPaths, Config, Settings};
use crate::constant::DATE_TOGGLE_EXTRA_HEIGHT;
use crate::saver::{SaverMessage, SaverResponse, spawn_saver};
use crate::style::configure_style;
use crate::theme::{HandKind, ImageSource};
use crate::ui::context_menu::{ContextMenu, ContextMenuAction, ContextMenuState};
use crate::ui::customize::{CustomizeAction, CustomizeContext, CustomizeWindow};
use crate::ui::face::ClockFace;
use crate::ui::font::FontBook;
use crate::ui::textures::TextureCache;
use crate::ui::viewport::window_level;
use chrono::Local;
use egui::{Key, PointerButton, Sense, ViewportCommand, vec2};
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;
use tracing::{error, info, warn};

pub struct ClockApp {
    settings: Settings,
    paths: AppPaths,
    store: ThemeStore,
    theme: ActiveTheme,
    fonts: FontBook,
    textures: TextureCache,
    customize: CustomizeWindow,
    autostart: bool,
    saver_sender: Sender<SaverMessage>,
    saver_receiver: Receiver<SaverResponse>,
}

impl ClockApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, paths: AppPaths) -> Self {
        configure_style(&cc.egui_ctx);

        let store = ThemeStore::new(paths.themes_dir());
        if let Err(e) = store.install_bundled(&paths.bundled_themes_dir()) {
            warn!("Could not install bundled themes: {}", e);
        }
        let theme = store.load(&settings.active_theme_name);
        info!("Active theme '{}'", theme.name());

        let autostart = autostart_backend::is_enabled(&paths.autostart_dir);
        let (saver_sender, saver_receiver) = spawn_saver(paths.clone());

        Self {
            settings,
            paths,
            store,
            theme,
            fonts: FontBook::new(),
            textures: TextureCache::default(),
            customize: CustomizeWindow::new(),
            autostart,
            saver_sender,
            saver_receiver,
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self
            .saver_sender
            .send(SaverMessage::SaveSettings(self.settings.clone()))
        {
            error!("Failed to send save message: {}", e);
        }
    }

    /// Record the window's current position and size. Returns whether
    /// anything changed.
    fn capture_geometry(&mut self, ctx: &egui::Context) -> bool {
        let (outer, inner) = ctx.input(|i| (i.viewport().outer_rect, i.viewport().inner_rect));
        let mut changed = false;

        // Not every platform reports the window position
        if let Some(outer) = outer {
            let position = (outer.min.x.round() as i32, outer.min.y.round() as i32);
            if self.settings.position() != Some(position) {
                self.settings.set_position(position.0, position.1);
                changed = true;
            }
        }
        if let Some(inner) = inner {
            let size = (inner.width().round() as u32, inner.height().round() as u32);
            if size.0 > 0 && size.1 > 0 && size != (self.settings.width, self.settings.height) {
                self.settings.width = size.0;
                self.settings.height = size.1;
                changed = true;
            }
        }
        changed
    }

    /// Save geometry once the window has settled after a drag or resize
    fn track_geometry(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.pointer.any_down()) {
            return;
        }
        if self.capture_geometry(ctx) {
            self.save_settings();
        }
    }

    fn resize_window(&mut self, ctx: &egui::Context, width: u32, height: u32) {
        self.settings.width = width;
        self.settings.height = height;
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(vec2(width as f32, height as f32)));
        self.save_settings();
    }

    /// Fit the window to the configured clock size
    fn resize_to_clock_size(&mut self, ctx: &egui::Context) {
        let theme = self.theme.properties();
        let size = self.settings.clock_size;
        let height = window_height_for(
            size,
            self.settings.show_date_box,
            theme.date_box_height,
            theme.date_box_margin,
        );
        self.resize_window(ctx, size, height);
    }

    fn set_always_on_top(&mut self, ctx: &egui::Context, enabled: bool) {
        self.settings.always_on_top = enabled;
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(window_level(enabled)));
        self.save_settings();
    }

    fn set_autostart(&mut self, enabled: bool) {
        match autostart_backend::set_enabled(&self.paths.autostart_dir, enabled) {
            Ok(()) => self.autostart = enabled,
            Err(e) => {
                error!("Failed to change autostart: {}", e);
                self.customize.set_status(format!("Autostart: {}", e));
            }
        }
        self.customize.set_autostart(self.autostart);
    }

    fn quit(&mut self, ctx: &egui::Context) {
        self.capture_geometry(ctx);
        ctx.send_viewport_cmd(ViewportCommand::Close);
    }

    fn handle_menu_action(&mut self, ctx: &egui::Context, action: ContextMenuAction) {
        match action {
            ContextMenuAction::SetAutostart(enabled) => self.set_autostart(enabled),
            ContextMenuAction::SetShowDate(show) => {
                self.settings.show_date_box = show;
                let width = self.settings.width;
                let height = if show {
                    width + DATE_TOGGLE_EXTRA_HEIGHT
                } else {
                    width
                };
                self.resize_window(ctx, width, height);
            }
            ContextMenuAction::SetShowSeconds(show) => {
                self.settings.show_second_hand = show;
                self.save_settings();
            }
            ContextMenuAction::SetAlwaysOnTop(enabled) => self.set_always_on_top(ctx, enabled),
            ContextMenuAction::Customize => {
                // Reopening would discard the pending dialog and selection
                if !self.customize.is_open() {
                    // Pick up hand sets reprocessed on disk since the last load
                    self.textures.clear();
                    self.customize.open(&self.store, &self.paths, &self.theme);
                }
            }
            ContextMenuAction::Exit => self.quit(ctx),
        }
    }

    fn handle_customize_action(&mut self, ctx: &egui::Context, action: CustomizeAction) {
        match action {
            CustomizeAction::SaveSettings => self.save_settings(),
            CustomizeAction::ResizeWindow => self.resize_to_clock_size(ctx),
            CustomizeAction::SetAlwaysOnTop(enabled) => self.set_always_on_top(ctx, enabled),
            CustomizeAction::SetAutostart(enabled) => self.set_autostart(enabled),
        }
    }

    fn poll_saver(&mut self) {
        while let Ok(response) = self.saver_receiver.try_recv() {
            match response {
                SaverResponse::ThemeSaved(_) => self.customize.refresh_themes(&self.store),
                SaverResponse::TextureImported(name) => {
                    self.theme.update(|theme| {
                        theme.enable_face_texture = true;
                        theme.face_texture_source = ImageSource::User;
                        theme.face_texture_name = Some(name.clone());
                    });
                    self.customize.refresh_assets(&self.paths);
                    self.customize.set_status(format!("Imported texture '{}'", name));
                }
                SaverResponse::HandSetImported(name) => {
                    self.theme.update(|theme| {
                        for kind in HandKind::ALL {
                            let hand = theme.hand_mut(kind);
                            hand.image_source = ImageSource::User;
                            hand.image_name = Some(name.clone());
                        }
                    });
                    self.customize.refresh_assets(&self.paths);
                    self.customize.set_status(format!("Imported hand set '{}'", name));
                }
                SaverResponse::ThemeSaveFailed { name, reason } => {
                    // Keep the edits behind the unsaved-changes prompt
                    self.theme.save_failed(&name);
                    self.customize.set_status(reason);
                }
                SaverResponse::Failed(reason) => self.customize.set_status(reason),
            }
        }
    }

    fn show_clock(&mut self, ctx: &egui::Context) {
        let mut menu_action = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let response = ui.interact(rect, ui.id().with("clock_face"), Sense::click_and_drag());

                let face = ClockFace {
                    theme: self.theme.properties(),
                    paths: &self.paths,
                    show_date: self.settings.show_date_box,
                    show_seconds: self.settings.show_second_hand,
                    minute_snap: self.settings.minute_hand_snap,
                };

                if response.dragged_by(PointerButton::Primary)
                    && response
                        .interact_pointer_pos()
                        .is_some_and(|pos| face.hit_test(rect, pos))
                {
                    ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                }

                face.paint(ui, rect, &Local::now(), &mut self.fonts, &mut self.textures);

                response.context_menu(|ui| {
                    let state = ContextMenuState {
                        autostart: self.autostart,
                        show_date: self.settings.show_date_box,
                        show_seconds: self.settings.show_second_hand,
                        always_on_top: self.settings.always_on_top,
                    };
                    if let Some(action) = ContextMenu::show(ui, state) {
                        menu_action = Some(action);
                    }
                });
            });

        if let Some(action) = menu_action {
            self.handle_menu_action(ctx, action);
        }
    }
}

impl eframe::App for ClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.fonts.begin_frame();
        self.poll_saver();

        if ctx.input(|i| i.key_pressed(Key::Escape) || i.key_pressed(Key::Q)) {
            self.quit(ctx);
        }

        self.show_clock(ctx);

        let actions = self.customize.show(
            ctx,
            CustomizeContext {
                theme: &mut self.theme,
                settings: &mut self.settings,
                store: &self.store,
                paths: &self.paths,
                fonts: &mut self.fonts,
                textures: &mut self.textures,
                saver: &self.saver_sender,
            },
        );
        for action in actions {
            self.handle_customize_action(ctx, action);
        }

        self.track_geometry(ctx);

        // Wake up on the next full second
        let millis = 1000 - Local::now().timestamp_subsec_millis().min(999);
        ctx.request_repaint_after(Duration::from_millis(millis as u64));
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let config = Config {
            settings: self.settings.clone(),
        };
        if let Err(e) = config.save() {
            error!("Failed to save settings on exit: {}", e);
        }

        if !self.theme.is_default()
            && let Err(e) = self.store.save(&mut self.theme)
        {
            error!("Failed to save theme '{}' on exit: {}", self.theme.name(), e);
        }
    }
}
