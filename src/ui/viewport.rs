use crate::config::Settings;
use crate::constant::{DEFAULT_WINDOW_TITLE, MIN_CLOCK_SIZE};
use egui::WindowLevel;

pub fn window_level(always_on_top: bool) -> WindowLevel {
    if always_on_top {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    }
}

/// Undecorated transparent window restored from the saved geometry
pub fn build_viewport(settings: &Settings) -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(DEFAULT_WINDOW_TITLE)
        .with_inner_size([settings.width as f32, settings.height as f32])
        .with_min_inner_size([MIN_CLOCK_SIZE as f32, MIN_CLOCK_SIZE as f32])
        .with_decorations(false)
        .with_transparent(true)
        .with_resizable(true)
        .with_window_level(window_level(settings.always_on_top));

    if let Some((x, y)) = settings.position() {
        viewport = viewport.with_position([x as f32, y as f32]);
    }

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}
