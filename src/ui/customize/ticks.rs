use super::widgets;
use crate::theme::{Rgb, Theme, TickStyle};
use egui::Ui;

/// Aspect ratios are edited on a log2 scale: 0 is square, negative is taller
const SHAPE_RANGE: f32 = 1.5;

fn style_options() -> Vec<(TickStyle, &'static str)> {
    TickStyle::ALL.iter().map(|style| (*style, style.label())).collect()
}

fn shape_slider(ui: &mut Ui, aspect_ratio: &mut f32) -> bool {
    let mut log = if *aspect_ratio > 0.0 {
        aspect_ratio.log2()
    } else {
        0.0
    };
    let changed = widgets::slider(ui, "Shape:", &mut log, -SHAPE_RANGE..=SHAPE_RANGE);
    if changed {
        *aspect_ratio = log.exp2();
    }
    changed
}

struct TickFields<'a> {
    id: &'static str,
    show: &'a mut bool,
    style: &'a mut TickStyle,
    size: &'a mut f32,
    aspect_ratio: &'a mut f32,
    color: &'a mut Rgb,
}

fn tick_group(ui: &mut Ui, fields: TickFields<'_>, size_range: std::ops::RangeInclusive<f32>) -> bool {
    let mut changed = widgets::toggle(ui, "Show", fields.show);
    if !*fields.show {
        return changed;
    }
    changed |= widgets::choice(ui, fields.id, "Style:", fields.style, &style_options());
    changed |= widgets::slider(ui, "Size:", fields.size, size_range);
    if *fields.style == TickStyle::Rectangular {
        changed |= shape_slider(ui, fields.aspect_ratio);
    }
    changed |= widgets::color(ui, "Color:", fields.color);
    changed
}

pub fn show(ui: &mut Ui, theme: &mut Theme) -> bool {
    let mut changed = false;

    widgets::section(ui, "Tick Position");
    let mut position = theme.hour_tick_position;
    if widgets::slider(ui, "Position:", &mut position, 0.85..=0.99) {
        // Hour and minute ticks share one ring
        theme.hour_tick_position = position;
        theme.minute_tick_position = position;
        changed = true;
    }

    widgets::section(ui, "Hour Ticks");
    changed |= tick_group(
        ui,
        TickFields {
            id: "hour_tick_style",
            show: &mut theme.show_hour_ticks,
            style: &mut theme.hour_tick_style,
            size: &mut theme.hour_tick_size,
            aspect_ratio: &mut theme.hour_tick_aspect_ratio,
            color: &mut theme.ticks_color,
        },
        0.005..=0.06,
    );

    widgets::section(ui, "Minute Ticks");
    changed |= tick_group(
        ui,
        TickFields {
            id: "minute_tick_style",
            show: &mut theme.show_minute_ticks,
            style: &mut theme.minute_tick_style,
            size: &mut theme.minute_tick_size,
            aspect_ratio: &mut theme.minute_tick_aspect_ratio,
            color: &mut theme.minute_ticks_color,
        },
        0.01..=0.05,
    );

    changed
}
