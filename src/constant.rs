// Window size constants
pub const DEFAULT_WINDOW_WIDTH: u32 = 400;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 460;
pub const DEFAULT_WINDOW_TITLE: &str = "Analog Clock";
pub const CUSTOMIZE_WINDOW_TITLE: &str = "Clock Settings";
pub const MIN_CLOCK_SIZE: u32 = 100;
pub const MAX_CLOCK_SIZE: u32 = 1200;

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "DeskClock";
pub const APP_NAME: &str = "desk-clock";

/// Environment variable overriding the builtin asset root
pub const ASSETS_ENV: &str = "DESK_CLOCK_ASSETS";
pub const ASSETS_DIR: &str = "assets";
pub const THEMES_DIR: &str = "themes";
pub const HANDS_DIR: &str = "hands";
pub const TEXTURES_DIR: &str = "textures";
pub const ORIGINAL_DIR: &str = "original";
pub const PROCESSED_DIR: &str = "processed";
pub const AUTOSTART_FILE: &str = "desk-clock.desktop";

/// Name of the builtin theme that never touches the disk
pub const DEFAULT_THEME_NAME: &str = "default";

/// Clock face layout, in pixels
pub const CLOCK_MARGIN: f32 = 20.0;
/// Extra room below the date box when sizing the window
pub const DATE_BOX_WINDOW_PADDING: f32 = 20.0;
/// Height added by the "Show Date" menu toggle
pub const DATE_TOGGLE_EXTRA_HEIGHT: u32 = 60;
/// Fraction of the radius
pub const DATE_BOX_CORNER_RADIUS: f32 = 0.05;

/// Alpha used for painted elements, matching the classic look
pub const TICK_ALPHA: f32 = 0.8;
pub const INK_ALPHA: f32 = 0.9;

/// Marker pixel in hand images
pub const MARKER_RGBA: [u8; 4] = [255, 0, 0, 255];
pub const DEFAULT_BLACK_TOLERANCE: u8 = 100;
