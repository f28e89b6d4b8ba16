use colored::Color;

pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const MAC_ADDR: Color = Color::Yellow;
pub const INTERFACE: Color = Color::BrightMagenta;
pub const DEVICE: Color = Color::BrightBlue;
