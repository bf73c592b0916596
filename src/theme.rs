//! Theme properties for the clock's appearance.
//!
//! A theme is a flat record; every field has a default so that partial or
//! older theme files still load.

use serde::{Deserialize, Serialize};

/// RGB color with components in `0.0..=1.0`
pub type Rgb = [f32; 3];

pub const BLACK: Rgb = [0.0, 0.0, 0.0];
pub const WHITE: Rgb = [1.0, 1.0, 1.0];
pub const RED: Rgb = [1.0, 0.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickStyle {
    #[default]
    Square,
    Round,
    Rectangular,
}

impl TickStyle {
    pub const ALL: [TickStyle; 3] = [TickStyle::Square, TickStyle::Round, TickStyle::Rectangular];

    pub fn label(self) -> &'static str {
        match self {
            TickStyle::Square => "Square",
            TickStyle::Round => "Round",
            TickStyle::Rectangular => "Rectangular",
        }
    }
}

/// Where an image asset (hand set or face texture) comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    #[default]
    None,
    Builtin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandKind {
    Hour,
    Minute,
    Second,
}

impl HandKind {
    pub const ALL: [HandKind; 3] = [HandKind::Hour, HandKind::Minute, HandKind::Second];

    /// File stem of the hand image (`hour.png`, ...)
    pub fn file_stem(self) -> &'static str {
        match self {
            HandKind::Hour => "hour",
            HandKind::Minute => "minute",
            HandKind::Second => "second",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.png", self.file_stem())
    }

    pub fn label(self) -> &'static str {
        match self {
            HandKind::Hour => "Hour",
            HandKind::Minute => "Minute",
            HandKind::Second => "Second",
        }
    }
}

/// Shape of one hand. `width` is the stroke width of the geometric hand,
/// `image_width` the horizontal scale factor applied to a hand image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandStyle {
    pub length: f32,
    pub tail: f32,
    pub width: f32,
    pub image_width: f32,
    pub image_source: ImageSource,
    pub image_name: Option<String>,
}

impl HandStyle {
    fn new(length: f32, tail: f32, width: f32) -> Self {
        Self {
            length,
            tail,
            width,
            image_width: 1.0,
            image_source: ImageSource::None,
            image_name: None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_source != ImageSource::None && self.image_name.is_some()
    }

    pub fn clear_image(&mut self) {
        self.image_source = ImageSource::None;
        self.image_name = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    // Visibility toggles
    pub show_numbers: bool,
    pub show_hour_ticks: bool,
    pub show_minute_ticks: bool,

    // Face
    pub background_color: Rgb,
    pub background_opacity: f32,
    pub face_texture_source: ImageSource,
    pub face_texture_name: Option<String>,
    pub enable_face_color: bool,
    pub enable_face_texture: bool,
    pub face_color_opacity: f32,
    pub face_texture_opacity: f32,

    // Rim
    pub rim_width: f32,
    pub rim_opacity: f32,
    pub rim_color: Rgb,

    // Hour ticks
    pub hour_tick_size: f32,
    pub hour_tick_position: f32,
    pub hour_tick_style: TickStyle,
    pub hour_tick_aspect_ratio: f32,

    // Minute ticks
    pub minute_tick_size: f32,
    pub minute_tick_position: f32,
    pub minute_tick_style: TickStyle,
    pub minute_tick_aspect_ratio: f32,

    // Numbers
    pub number_position: f32,
    pub number_size: f32,
    pub number_font: String,
    pub number_bold: bool,
    pub use_roman_numerals: bool,
    pub show_cardinal_numbers_only: bool,

    // Hands, stored flat in the file (`hour_hand_length`, ...)
    #[serde(flatten, with = "hour_hand")]
    pub hour_hand: HandStyle,
    #[serde(flatten, with = "minute_hand")]
    pub minute_hand: HandStyle,
    #[serde(flatten, with = "second_hand")]
    pub second_hand: HandStyle,

    pub center_dot_radius: f32,

    // Date box
    pub date_box_width: f32,
    pub date_box_height: f32,
    pub date_box_margin: f32,
    pub date_format: String,
    /// Relative to the radius
    pub date_font_size: f32,
    pub date_font: String,
    pub date_bold: bool,

    // Colors
    pub hands_color: Rgb,
    pub numbers_color: Rgb,
    pub ticks_color: Rgb,
    pub minute_ticks_color: Rgb,
    pub border_color: Rgb,
    pub second_hand_color: Rgb,
    pub date_text_color: Rgb,
}

pub const DEFAULT_DATE_FORMAT: &str = "%a, %d %b";

impl Default for Theme {
    fn default() -> Self {
        Self {
            show_numbers: true,
            show_hour_ticks: true,
            show_minute_ticks: true,

            background_color: WHITE,
            background_opacity: 0.7,
            face_texture_source: ImageSource::Builtin,
            face_texture_name: None,
            enable_face_color: true,
            enable_face_texture: false,
            face_color_opacity: 0.85,
            face_texture_opacity: 1.0,

            rim_width: 0.01,
            rim_opacity: 1.0,
            rim_color: BLACK,

            hour_tick_size: 0.022,
            hour_tick_position: 0.975,
            hour_tick_style: TickStyle::Square,
            hour_tick_aspect_ratio: 1.0,

            minute_tick_size: 0.018,
            minute_tick_position: 0.975,
            minute_tick_style: TickStyle::Rectangular,
            minute_tick_aspect_ratio: 0.287_174_6,

            number_position: 0.823,
            number_size: 0.155,
            number_font: "Sans".to_string(),
            number_bold: true,
            use_roman_numerals: false,
            show_cardinal_numbers_only: false,

            hour_hand: HandStyle::new(0.509, 0.099, 0.041),
            minute_hand: HandStyle::new(0.74, 0.16, 0.025),
            second_hand: HandStyle::new(0.88, 0.2, 0.01),

            center_dot_radius: 0.04,

            date_box_width: 1.18,
            date_box_height: 0.24,
            date_box_margin: 0.12,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_font_size: 0.1,
            date_font: "Sans".to_string(),
            date_bold: false,

            hands_color: BLACK,
            numbers_color: BLACK,
            ticks_color: BLACK,
            minute_ticks_color: BLACK,
            border_color: BLACK,
            second_hand_color: RED,
            date_text_color: BLACK,
        }
    }
}

impl Theme {
    pub fn hand(&self, kind: HandKind) -> &HandStyle {
        match kind {
            HandKind::Hour => &self.hour_hand,
            HandKind::Minute => &self.minute_hand,
            HandKind::Second => &self.second_hand,
        }
    }

    pub fn hand_mut(&mut self, kind: HandKind) -> &mut HandStyle {
        match kind {
            HandKind::Hour => &mut self.hour_hand,
            HandKind::Minute => &mut self.minute_hand,
            HandKind::Second => &mut self.second_hand,
        }
    }

    /// Color a hand is painted (or tinted) with
    pub fn hand_color(&self, kind: HandKind) -> Rgb {
        match kind {
            HandKind::Second => self.second_hand_color,
            HandKind::Hour | HandKind::Minute => self.hands_color,
        }
    }

    pub fn has_hand_images(&self) -> bool {
        HandKind::ALL.iter().any(|kind| self.hand(*kind).has_image())
    }
}

/// Generates a serde adapter that (de)serializes a `HandStyle` as the flat
/// `<prefix>_hand_*` keys used in theme files. Missing keys fall back to the
/// default theme's values for that hand.
macro_rules! flat_hand {
    ($module:ident, $field:ident, $length:literal, $tail:literal, $width:literal, $image_width:literal, $image_source:literal, $image_name:literal) => {
        mod $module {
            use super::{HandStyle, ImageSource, Theme};
            use serde::{Deserialize, Deserializer, Serialize, Serializer};

            #[derive(Serialize)]
            struct Out<'a> {
                #[serde(rename = $length)]
                length: f32,
                #[serde(rename = $tail)]
                tail: f32,
                #[serde(rename = $width)]
                width: f32,
                #[serde(rename = $image_width)]
                image_width: f32,
                #[serde(rename = $image_source)]
                image_source: ImageSource,
                #[serde(rename = $image_name)]
                image_name: &'a Option<String>,
            }

            #[derive(Deserialize)]
            struct In {
                #[serde(rename = $length)]
                length: Option<f32>,
                #[serde(rename = $tail)]
                tail: Option<f32>,
                #[serde(rename = $width)]
                width: Option<f32>,
                #[serde(rename = $image_width)]
                image_width: Option<f32>,
                #[serde(rename = $image_source)]
                image_source: Option<ImageSource>,
                #[serde(rename = $image_name, default)]
                image_name: Option<String>,
            }

            pub fn serialize<S: Serializer>(hand: &HandStyle, serializer: S) -> Result<S::Ok, S::Error> {
                Out {
                    length: hand.length,
                    tail: hand.tail,
                    width: hand.width,
                    image_width: hand.image_width,
                    image_source: hand.image_source,
                    image_name: &hand.image_name,
                }
                .serialize(serializer)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HandStyle, D::Error> {
                let raw = In::deserialize(deserializer)?;
                let defaults = Theme::default().$field;
                Ok(HandStyle {
                    length: raw.length.unwrap_or(defaults.length),
                    tail: raw.tail.unwrap_or(defaults.tail),
                    width: raw.width.unwrap_or(defaults.width),
                    image_width: raw.image_width.unwrap_or(defaults.image_width),
                    image_source: raw.image_source.unwrap_or(defaults.image_source),
                    image_name: raw.image_name,
                })
            }
        }
    };
}

flat_hand!(
    hour_hand,
    hour_hand,
    "hour_hand_length",
    "hour_hand_tail",
    "hour_hand_width",
    "hour_hand_image_width",
    "hour_hand_image_source",
    "hour_hand_image_name"
);
flat_hand!(
    minute_hand,
    minute_hand,
    "minute_hand_length",
    "minute_hand_tail",
    "minute_hand_width",
    "minute_hand_image_width",
    "minute_hand_image_source",
    "minute_hand_image_name"
);
flat_hand!(
    second_hand,
    second_hand,
    "second_hand_length",
    "second_hand_tail",
    "second_hand_width",
    "second_hand_image_width",
    "second_hand_image_source",
    "second_hand_image_name"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_hand_keys_round_trip() {
        let mut theme = Theme::default();
        theme.minute_hand.length = 0.5;
        theme.second_hand.image_source = ImageSource::User;
        theme.second_hand.image_name = Some("classic".to_string());

        let value = serde_json::to_value(&theme).unwrap();
        assert_eq!(value["minute_hand_length"], serde_json::json!(0.5));
        assert_eq!(value["second_hand_image_source"], serde_json::json!("user"));
        assert_eq!(value["second_hand_image_name"], serde_json::json!("classic"));
        assert_eq!(value["hour_hand_image_name"], serde_json::Value::Null);
        assert_eq!(value["minute_tick_style"], serde_json::json!("rectangular"));

        let back: Theme = serde_json::from_value(value).unwrap();
        assert_eq!(back, theme);
    }

    #[test]
    fn test_legacy_theme_gets_default_image_width() {
        let json = r#"{
            "hour_hand_width": 0.08,
            "minute_hand_length": 0.6,
            "rim_color": [0.2, 0.3, 0.4]
        }"#;
        let theme: Theme = serde_json::from_str(json).unwrap();

        assert_eq!(theme.hour_hand.width, 0.08);
        assert_eq!(theme.hour_hand.image_width, 1.0);
        assert_eq!(theme.hour_hand.length, 0.509);
        assert_eq!(theme.minute_hand.length, 0.6);
        assert_eq!(theme.minute_hand.image_width, 1.0);
        assert_eq!(theme.rim_color, [0.2, 0.3, 0.4]);
        assert_eq!(theme.second_hand_color, RED);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let theme: Theme =
            serde_json::from_str(r#"{"show_numbers": false, "obsolete_setting": 12}"#).unwrap();
        assert!(!theme.show_numbers);
        assert!(theme.show_hour_ticks);
    }

    #[test]
    fn test_hand_color() {
        let theme = Theme::default();
        assert_eq!(theme.hand_color(HandKind::Hour), BLACK);
        assert_eq!(theme.hand_color(HandKind::Minute), BLACK);
        assert_eq!(theme.hand_color(HandKind::Second), RED);
    }

    #[test]
    fn test_hand_image_flags() {
        let mut theme = Theme::default();
        assert!(!theme.has_hand_images());

        theme.hour_hand.image_source = ImageSource::Builtin;
        assert!(!theme.has_hand_images(), "a source without a name is no image");

        theme.hour_hand.image_name = Some("classic".to_string());
        assert!(theme.has_hand_images());

        theme.hour_hand.clear_image();
        assert!(!theme.has_hand_images());
    }
}
