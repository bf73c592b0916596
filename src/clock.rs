//! Clock geometry.
//!
//! Pure functions shared by the painter and the window sizing code. Angles are
//! in radians, measured clockwise from 12 o'clock in screen coordinates
//! (y grows downwards).

use crate::constant::{CLOCK_MARGIN, DATE_BOX_CORNER_RADIUS, DATE_BOX_WINDOW_PADDING};
use crate::theme::{HandKind, Theme, TickStyle};
use chrono::Timelike;
use egui::{Pos2, Rect, Vec2, pos2, vec2};
use std::f32::consts::TAU;

/// Wall-clock reading used for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours: hours % 12,
            minutes,
            seconds,
        }
    }

    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self::new(time.hour(), time.minute(), time.second())
    }
}

/// Angle of a hand for the given time
pub fn hand_angle(kind: HandKind, time: ClockTime, minute_snap: bool) -> f32 {
    let turns = match kind {
        HandKind::Hour => (time.hours as f32 + time.minutes as f32 / 60.0) / 12.0,
        HandKind::Minute if minute_snap => time.minutes as f32 / 60.0,
        HandKind::Minute => (time.minutes as f32 + time.seconds as f32 / 60.0) / 60.0,
        HandKind::Second => time.seconds as f32 / 60.0,
    };
    turns * TAU
}

/// Unit vector pointing from the center towards `angle`
pub fn direction(angle: f32) -> Vec2 {
    vec2(angle.sin(), -angle.cos())
}

/// Point at `distance` from `center` along `angle`
pub fn polar(center: Pos2, distance: f32, angle: f32) -> Pos2 {
    center + direction(angle) * distance
}

/// Where the clock sits inside the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub center: Pos2,
    /// Outer radius, rim included
    pub radius: f32,
}

impl FaceLayout {
    pub fn compute(
        size: Vec2,
        show_date: bool,
        date_box_margin: f32,
        date_box_height: f32,
    ) -> Self {
        let center_x = size.x / 2.0;
        if show_date {
            let max_radius_width = size.x / 2.0 - CLOCK_MARGIN;
            let max_radius_height =
                (size.y - 2.0 * CLOCK_MARGIN) / (2.0 + date_box_margin + date_box_height);
            let radius = max_radius_width.min(max_radius_height).max(1.0);
            Self {
                center: pos2(center_x, CLOCK_MARGIN + radius),
                radius,
            }
        } else {
            let radius = (size.x.min(size.y) / 2.0 - CLOCK_MARGIN).max(1.0);
            Self {
                center: pos2(center_x, size.y / 2.0),
                radius,
            }
        }
    }

    pub fn translate(self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            ..self
        }
    }

    pub fn rim_thickness(&self, rim_width: f32) -> f32 {
        self.radius * rim_width
    }

    /// Radius inside the rim; ticks, numbers and hands are scaled by it
    pub fn face_radius(&self, rim_width: f32) -> f32 {
        (self.radius - self.rim_thickness(rim_width)).max(1.0)
    }

    pub fn contains(&self, point: Pos2) -> bool {
        (point - self.center).length() <= self.radius
    }
}

/// Window height needed to show a clock of `clock_size` pixels
pub fn window_height_for(
    clock_size: u32,
    show_date: bool,
    date_box_height: f32,
    date_box_margin: f32,
) -> u32 {
    if !show_date {
        return clock_size;
    }
    let radius = (clock_size as f32 - 2.0 * CLOCK_MARGIN) / 2.0;
    let extra = (radius * (date_box_height + date_box_margin)) as u32 + DATE_BOX_WINDOW_PADDING as u32;
    clock_size + extra
}

/// One tick mark, already resolved to screen space
#[derive(Debug, Clone, PartialEq)]
pub enum TickShape {
    Circle { center: Pos2, radius: f32 },
    /// Corner points of a rectangle rotated to face the center
    Quad([Pos2; 4]),
}

#[derive(Debug, Clone, Copy)]
pub struct TickSpec {
    pub size: f32,
    pub position: f32,
    pub style: TickStyle,
    pub aspect_ratio: f32,
}

impl TickSpec {
    pub fn hour(theme: &Theme) -> Self {
        Self {
            size: theme.hour_tick_size,
            position: theme.hour_tick_position,
            style: theme.hour_tick_style,
            aspect_ratio: theme.hour_tick_aspect_ratio,
        }
    }

    pub fn minute(theme: &Theme) -> Self {
        Self {
            size: theme.minute_tick_size,
            position: theme.minute_tick_position,
            style: theme.minute_tick_style,
            aspect_ratio: theme.minute_tick_aspect_ratio,
        }
    }

    pub fn shape(&self, center: Pos2, face_radius: f32, angle: f32) -> TickShape {
        let tick_size = face_radius * self.size;
        let tick_center = polar(center, face_radius * self.position - tick_size, angle);
        match self.style {
            TickStyle::Round => TickShape::Circle {
                center: tick_center,
                radius: tick_size,
            },
            TickStyle::Rectangular => {
                let height = tick_size * 2.0;
                let width = height * self.aspect_ratio;
                TickShape::Quad(rotated_rect(tick_center, width, height, angle))
            }
            TickStyle::Square => {
                TickShape::Quad(rotated_rect(tick_center, tick_size * 2.0, tick_size * 2.0, angle))
            }
        }
    }
}

/// Rectangle centered at `center` whose height runs along the radius
fn rotated_rect(center: Pos2, width: f32, height: f32, angle: f32) -> [Pos2; 4] {
    let radial = direction(angle);
    let along = radial * (height / 2.0);
    let across = vec2(-radial.y, radial.x) * (width / 2.0);
    [
        center - along - across,
        center - along + across,
        center + along + across,
        center + along - across,
    ]
}

pub fn hour_tick_angles() -> impl Iterator<Item = f32> {
    (0..12).map(|i| i as f32 * TAU / 12.0)
}

/// Minute tick angles, skipping the hour positions
pub fn minute_tick_angles() -> impl Iterator<Item = f32> {
    (0..60).filter(|i| i % 5 != 0).map(|i| i as f32 * TAU / 60.0)
}

pub fn to_roman(number: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut rest = number;
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while rest >= value {
            out.push_str(numeral);
            rest -= value;
        }
    }
    out
}

/// Labels drawn around the dial as `(angle, text)`
pub fn dial_numbers(roman: bool, cardinal_only: bool) -> Vec<(f32, String)> {
    (0..12)
        .map(|i| if i == 0 { 12 } else { i })
        .filter(|number| !cardinal_only || matches!(number, 12 | 3 | 6 | 9))
        .map(|number| {
            let angle = (number % 12) as f32 * TAU / 12.0;
            let text = if roman {
                to_roman(number)
            } else {
                number.to_string()
            };
            (angle, text)
        })
        .collect()
}

/// Tail and tip of a geometric hand
pub fn hand_segment(center: Pos2, face_radius: f32, angle: f32, length: f32, tail: f32) -> [Pos2; 2] {
    [
        polar(center, -face_radius * tail, angle),
        polar(center, face_radius * length, angle),
    ]
}

/// Scale applied to a hand image so that the distance from its marker pixel
/// to the top edge equals the hand length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandImageScale {
    pub x: f32,
    pub y: f32,
}

impl HandImageScale {
    pub fn compute(pivot_y: f32, face_radius: f32, length: f32, image_width: f32) -> Self {
        let target_length = face_radius * length;
        let y = if pivot_y > 0.0 {
            target_length / pivot_y
        } else {
            1.0
        };
        Self {
            x: y * image_width,
            y,
        }
    }
}

/// Screen positions of the four corners of a hand image (top-left, top-right,
/// bottom-right, bottom-left) rotated about its pivot placed at `center`
pub fn hand_image_quad(
    center: Pos2,
    image_size: Vec2,
    pivot: Pos2,
    scale: HandImageScale,
    angle: f32,
) -> [Pos2; 4] {
    let (sin, cos) = angle.sin_cos();
    let corners = [
        pos2(0.0, 0.0),
        pos2(image_size.x, 0.0),
        pos2(image_size.x, image_size.y),
        pos2(0.0, image_size.y),
    ];
    corners.map(|corner| {
        let local = vec2((corner.x - pivot.x) * scale.x, (corner.y - pivot.y) * scale.y);
        center + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    })
}

/// Date box rectangles below the face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateBoxLayout {
    pub outer: Rect,
    pub inner: Rect,
    pub rim_thickness: f32,
    pub outer_corner: f32,
    pub inner_corner: f32,
}

impl DateBoxLayout {
    pub fn compute(face: &FaceLayout, theme: &Theme) -> Self {
        let radius = face.radius;
        let top = face.center.y + radius + radius * theme.date_box_margin;
        let width = radius * theme.date_box_width;
        let height = radius * theme.date_box_height;
        let outer = Rect::from_min_size(pos2(face.center.x - width / 2.0, top), vec2(width, height));

        let rim_thickness = radius * theme.rim_width;
        let inner = Rect::from_min_size(
            outer.min + vec2(rim_thickness, rim_thickness),
            vec2(
                (width - 2.0 * rim_thickness).max(1.0),
                (height - 2.0 * rim_thickness).max(1.0),
            ),
        );

        let outer_corner = radius * DATE_BOX_CORNER_RADIUS;
        Self {
            outer,
            inner,
            rim_thickness,
            outer_corner,
            inner_corner: (outer_corner - rim_thickness).max(0.0),
        }
    }
}

/// Scale and offset that make an image of `image_size` cover a square of side
/// `2 * radius` centered at `center`, preserving the aspect ratio
pub fn cover_rect(image_size: Vec2, center: Pos2, radius: f32) -> Option<Rect> {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return None;
    }
    let target = (radius * 2.0).max(1.0);
    let scale = (target / image_size.x).max(target / image_size.y);
    Some(Rect::from_center_size(center, image_size * scale))
}
