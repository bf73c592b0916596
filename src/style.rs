use egui::{Color32, Context, Stroke, Style, Visuals};

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12);
    style.spacing.slider_width = 220.0;

    ctx.set_style(style);

    let mut visuals = Visuals::light();
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    visuals.panel_fill = Color32::from_gray(250);
    visuals.window_fill = Color32::from_gray(250);
    visuals.extreme_bg_color = Color32::from_gray(245);

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(0.0, Color32::TRANSPARENT);
    visuals.widgets.hovered.bg_fill = Color32::from_gray(235);
    visuals.widgets.active.bg_fill = Color32::from_gray(225);

    visuals.selection.bg_fill = Color32::from_rgb(200, 220, 255);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(100, 100, 100));

    ctx.set_visuals(visuals);
}
