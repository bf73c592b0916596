//! Paints the clock with the egui painter.

use crate::backend::hand_backend::hand_set_dir;
use crate::backend::texture_backend::resolve_texture_path;
use crate::clock::{
    ClockTime, DateBoxLayout, FaceLayout, HandImageScale, TickShape, TickSpec, cover_rect,
    dial_numbers, hand_angle, hand_image_quad, hand_segment, hour_tick_angles,
    minute_tick_angles, polar,
};
use crate::config::AppPaths;
use crate::constant::{INK_ALPHA, TICK_ALPHA};
use crate::theme::{DEFAULT_DATE_FORMAT, HandKind, HandStyle, Rgb, Theme};
use crate::ui::font::FontBook;
use crate::ui::textures::{FaceTexture, HandTexture, TextureCache};
use chrono::{DateTime, TimeZone};
use egui::epaint::Vertex;
use egui::{
    Align2, Color32, Context, CornerRadius, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke,
    StrokeKind, Ui, pos2, vec2,
};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt::{Display, Write};
use std::path::PathBuf;

const CIRCLE_SEGMENTS: usize = 96;
const CORNER_SEGMENTS: usize = 8;

pub fn to_color32(rgb: Rgb, alpha: f32) -> Color32 {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Render `format` with strftime syntax; an unusable format falls back to
/// the default one
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_ok() {
        return out;
    }
    out.clear();
    let _ = write!(out, "{}", now.format(DEFAULT_DATE_FORMAT));
    out
}

/// Everything that decides what the clock looks like for one frame
pub struct ClockFace<'a> {
    pub theme: &'a Theme,
    pub paths: &'a AppPaths,
    pub show_date: bool,
    pub show_seconds: bool,
    pub minute_snap: bool,
}

impl ClockFace<'_> {
    pub fn layout(&self, rect: Rect) -> FaceLayout {
        FaceLayout::compute(
            rect.size(),
            self.show_date,
            self.theme.date_box_margin,
            self.theme.date_box_height,
        )
        .translate(rect.min.to_vec2())
    }

    /// Whether `point` lies on the face or the date box
    pub fn hit_test(&self, rect: Rect, point: Pos2) -> bool {
        let face = self.layout(rect);
        face.contains(point)
            || (self.show_date && DateBoxLayout::compute(&face, self.theme).outer.contains(point))
    }

    pub fn paint<Tz: TimeZone>(
        &self,
        ui: &Ui,
        rect: Rect,
        now: &DateTime<Tz>,
        fonts: &mut FontBook,
        textures: &mut TextureCache,
    ) where
        Tz::Offset: Display,
    {
        let ctx = ui.ctx();
        let painter = ui.painter_at(rect);
        let theme = self.theme;
        let face = self.layout(rect);
        let face_radius = face.face_radius(theme.rim_width);
        let face_texture = self.face_texture(ctx, textures);

        if theme.enable_face_color {
            painter.circle_filled(
                face.center,
                face_radius,
                to_color32(theme.background_color, theme.face_color_opacity),
            );
        }
        if let Some(texture) = &face_texture
            && let Some(cover) = cover_rect(texture.size, face.center, face_radius)
        {
            paint_textured_outline(
                &painter,
                texture,
                &circle_outline(face.center, face_radius),
                cover,
                theme.face_texture_opacity,
            );
        }

        let rim = face.rim_thickness(theme.rim_width);
        if rim > 0.0 {
            painter.circle_stroke(
                face.center,
                face.radius - rim / 2.0,
                Stroke::new(rim, to_color32(theme.rim_color, theme.rim_opacity)),
            );
        }

        self.paint_ticks(&painter, face.center, face_radius);
        if theme.show_numbers {
            self.paint_numbers(ctx, &painter, face.center, face_radius, fonts);
        }

        let time = ClockTime::from_time(now);
        for kind in HandKind::ALL {
            if kind == HandKind::Second && !self.show_seconds {
                continue;
            }
            let angle = hand_angle(kind, time, self.minute_snap);
            self.paint_hand(ctx, &painter, kind, face.center, face_radius, angle, textures);
        }

        painter.circle_filled(
            face.center,
            face_radius * theme.center_dot_radius,
            to_color32(theme.hands_color, INK_ALPHA),
        );

        if self.show_date {
            let date_box = DateBoxLayout::compute(&face, theme);
            self.paint_date_box(ctx, &painter, &face, &date_box, face_texture.as_ref(), now, fonts);
        }
    }

    fn face_texture(&self, ctx: &Context, textures: &mut TextureCache) -> Option<FaceTexture> {
        let theme = self.theme;
        if !theme.enable_face_texture {
            return None;
        }
        let name = theme.face_texture_name.as_deref()?;
        let path = resolve_texture_path(self.paths, theme.face_texture_source, name)?;
        textures.face(ctx, &path)
    }

    fn paint_ticks(&self, painter: &Painter, center: Pos2, face_radius: f32) {
        let theme = self.theme;
        if theme.show_hour_ticks {
            let spec = TickSpec::hour(theme);
            let color = to_color32(theme.ticks_color, TICK_ALPHA);
            for angle in hour_tick_angles() {
                paint_tick(painter, spec.shape(center, face_radius, angle), color);
            }
        }
        if theme.show_minute_ticks {
            let spec = TickSpec::minute(theme);
            let color = to_color32(theme.minute_ticks_color, TICK_ALPHA);
            for angle in minute_tick_angles() {
                paint_tick(painter, spec.shape(center, face_radius, angle), color);
            }
        }
    }

    fn paint_numbers(
        &self,
        ctx: &Context,
        painter: &Painter,
        center: Pos2,
        face_radius: f32,
        fonts: &mut FontBook,
    ) {
        let theme = self.theme;
        let family = fonts.family(ctx, &theme.number_font, theme.number_bold);
        let font = FontId::new((face_radius * theme.number_size).max(1.0), family);
        let color = to_color32(theme.numbers_color, INK_ALPHA);

        for (angle, text) in dial_numbers(theme.use_roman_numerals, theme.show_cardinal_numbers_only) {
            let position = polar(center, face_radius * theme.number_position, angle);
            painter.text(position, Align2::CENTER_CENTER, text, font.clone(), color);
        }
    }

    fn hand_image_path(&self, kind: HandKind) -> Option<PathBuf> {
        let style = self.theme.hand(kind);
        if !style.has_image() {
            return None;
        }
        let name = style.image_name.as_deref()?;
        hand_set_dir(self.paths, style.image_source, name)?.resolve(kind)
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_hand(
        &self,
        ctx: &Context,
        painter: &Painter,
        kind: HandKind,
        center: Pos2,
        face_radius: f32,
        angle: f32,
        textures: &mut TextureCache,
    ) {
        let style = self.theme.hand(kind);
        let color = self.theme.hand_color(kind);

        // A hand image that fails to load falls back to the drawn hand
        if let Some(path) = self.hand_image_path(kind)
            && let Some(texture) = textures.hand(ctx, &path)
        {
            let tint = to_color32(color, 1.0);
            paint_hand_image(painter, &texture, center, face_radius, style, angle, tint);
            return;
        }

        let [tail, tip] = hand_segment(center, face_radius, angle, style.length, style.tail);
        let width = face_radius * style.width;
        let color = to_color32(color, INK_ALPHA);
        painter.line_segment([tail, tip], Stroke::new(width, color));
        // round caps
        painter.circle_filled(tail, width / 2.0, color);
        painter.circle_filled(tip, width / 2.0, color);
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_date_box<Tz: TimeZone>(
        &self,
        ctx: &Context,
        painter: &Painter,
        face: &FaceLayout,
        date_box: &DateBoxLayout,
        face_texture: Option<&FaceTexture>,
        now: &DateTime<Tz>,
        fonts: &mut FontBook,
    ) where
        Tz::Offset: Display,
    {
        let theme = self.theme;

        if date_box.rim_thickness > 0.0 {
            painter.rect_stroke(
                date_box.outer,
                corner(date_box.outer_corner),
                Stroke::new(date_box.rim_thickness, to_color32(theme.rim_color, theme.rim_opacity)),
                StrokeKind::Inside,
            );
        }

        if theme.enable_face_color {
            painter.rect_filled(
                date_box.inner,
                corner(date_box.inner_corner),
                to_color32(theme.background_color, theme.face_color_opacity),
            );
        }

        let inner = date_box.inner;
        if let Some(texture) = face_texture
            && let Some(cover) = cover_rect(
                texture.size,
                inner.center(),
                inner.width().max(inner.height()) / 2.0,
            )
        {
            paint_textured_outline(
                painter,
                texture,
                &rounded_rect_outline(inner, date_box.inner_corner),
                cover,
                theme.face_texture_opacity,
            );
        }

        let family = fonts.family(ctx, &theme.date_font, theme.date_bold);
        let font = FontId::new((face.radius * theme.date_font_size).max(1.0), family);
        painter.text(
            inner.center(),
            Align2::CENTER_CENTER,
            format_date(now, &theme.date_format),
            font,
            to_color32(theme.date_text_color, INK_ALPHA),
        );
    }
}

fn corner(radius: f32) -> CornerRadius {
    CornerRadius::same(radius.round().clamp(0.0, u8::MAX as f32) as u8)
}

fn paint_tick(painter: &Painter, shape: TickShape, color: Color32) {
    match shape {
        TickShape::Circle { center, radius } => {
            painter.circle_filled(center, radius, color);
        }
        TickShape::Quad(points) => {
            painter.add(Shape::convex_polygon(points.to_vec(), color, Stroke::NONE));
        }
    }
}

fn paint_hand_image(
    painter: &Painter,
    texture: &HandTexture,
    center: Pos2,
    face_radius: f32,
    style: &HandStyle,
    angle: f32,
    tint: Color32,
) {
    let scale = HandImageScale::compute(texture.pivot.y, face_radius, style.length, style.image_width);
    let quad = hand_image_quad(center, texture.size, texture.pivot, scale, angle);
    let uvs = [pos2(0.0, 0.0), pos2(1.0, 0.0), pos2(1.0, 1.0), pos2(0.0, 1.0)];

    let mut mesh = Mesh::with_texture(texture.texture.id());
    for (pos, uv) in quad.into_iter().zip(uvs) {
        mesh.vertices.push(Vertex {
            pos,
            uv,
            color: tint,
        });
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}

/// Fill a convex outline with a texture mapped onto `cover`
fn paint_textured_outline(
    painter: &Painter,
    texture: &FaceTexture,
    outline: &[Pos2],
    cover: Rect,
    opacity: f32,
) {
    if outline.len() < 3 {
        return;
    }
    let tint = Color32::WHITE.gamma_multiply(opacity.clamp(0.0, 1.0));
    let uv = |p: Pos2| {
        pos2(
            (p.x - cover.min.x) / cover.width(),
            (p.y - cover.min.y) / cover.height(),
        )
    };

    let sum = outline.iter().fold(egui::Vec2::ZERO, |acc, p| acc + p.to_vec2());
    let centroid = Pos2::ZERO + sum / outline.len() as f32;

    let mut mesh = Mesh::with_texture(texture.texture.id());
    mesh.vertices.push(Vertex {
        pos: centroid,
        uv: uv(centroid),
        color: tint,
    });
    for &pos in outline {
        mesh.vertices.push(Vertex {
            pos,
            uv: uv(pos),
            color: tint,
        });
    }
    let n = outline.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    painter.add(Shape::mesh(mesh));
}

fn circle_outline(center: Pos2, radius: f32) -> Vec<Pos2> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 * TAU / CIRCLE_SEGMENTS as f32;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn rounded_rect_outline(rect: Rect, radius: f32) -> Vec<Pos2> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    if r == 0.0 {
        return vec![rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    }

    // Corner centers with the angle their arc starts at, clockwise on screen
    let corners = [
        (pos2(rect.max.x - r, rect.min.y + r), -FRAC_PI_2),
        (pos2(rect.max.x - r, rect.max.y - r), 0.0),
        (pos2(rect.min.x + r, rect.max.y - r), FRAC_PI_2),
        (pos2(rect.min.x + r, rect.min.y + r), std::f32::consts::PI),
    ];
    corners
        .iter()
        .flat_map(|&(center, start)| {
            (0..=CORNER_SEGMENTS).map(move |i| {
                let angle = start + FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
                center + vec2(angle.cos(), angle.sin()) * r
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date_falls_back_on_bad_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        assert_eq!(format_date(&now, "%Y-%m-%d"), "2024-03-05");
        assert_eq!(format_date(&now, DEFAULT_DATE_FORMAT), "Tue, 05 Mar");
        assert_eq!(format_date(&now, "%Q broken"), "Tue, 05 Mar");
        assert_eq!(format_date(&now, "plain"), "plain");
    }

    #[test]
    fn test_to_color32() {
        assert_eq!(to_color32([1.0, 0.0, 0.0], 1.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(
            to_color32([0.0, 0.0, 0.0], 0.5),
            Color32::from_rgba_unmultiplied(0, 0, 0, 128)
        );
    }

    #[test]
    fn test_rounded_rect_outline_stays_inside() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(100.0, 30.0));
        let outline = rounded_rect_outline(rect, 40.0);
        assert_eq!(outline.len(), 4 * (CORNER_SEGMENTS + 1));
        for p in &outline {
            assert!(rect.expand(1e-3).contains(*p), "{:?} outside {:?}", p, rect);
        }

        assert_eq!(rounded_rect_outline(rect, 0.0).len(), 4);
    }

    #[test]
    fn test_circle_outline_radius() {
        let center = pos2(50.0, 50.0);
        for p in circle_outline(center, 10.0) {
            assert!(((p - center).length() - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_hit_test_covers_face_and_date_box() {
        let theme = Theme::default();
        let paths = AppPaths::with_roots(std::path::Path::new("/d"), std::path::Path::new("/a"));
        let mut face = ClockFace {
            theme: &theme,
            paths: &paths,
            show_date: true,
            show_seconds: true,
            minute_snap: true,
        };
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 460.0));
        let layout = face.layout(rect);
        let date_box = DateBoxLayout::compute(&layout, &theme);

        assert!(face.hit_test(rect, layout.center));
        assert!(face.hit_test(rect, date_box.outer.center()));
        assert!(!face.hit_test(rect, pos2(1.0, 1.0)));

        face.show_date = false;
        assert!(!face.hit_test(rect, date_box.outer.center()));
    }
}
