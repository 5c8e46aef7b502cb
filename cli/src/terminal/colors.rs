use colored::Color;

pub const PRIMARY: Color = Color::BrightCyan;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const GOOD: Color = Color::BrightGreen;
pub const BAD: Color = Color::BrightRed;
