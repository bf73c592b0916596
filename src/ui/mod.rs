pub mod context_menu;
pub mod customize;
pub mod face;
pub mod font;
pub mod textures;
pub mod viewport;
