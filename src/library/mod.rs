pub mod bitmap_font;
pub mod logger;
pub mod overlay;
pub mod state_machine;
