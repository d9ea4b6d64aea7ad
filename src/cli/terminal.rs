//! Colour styling for tree output

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout should receive coloured output
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Styles for the parts of a rendered tree
pub trait Colorize {
    /// A logical connective or requirement kind (blue, bold)
    fn connective(&self) -> String;
    /// A course or exam (green)
    fn course(&self) -> String;
    /// Something that must not have been taken (red)
    fn prohibited(&self) -> String;
    /// Secondary detail such as grades and counts
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn connective(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().bold().to_string()
        } else {
            self.to_owned()
        }
    }

    fn course(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_owned()
        }
    }

    fn prohibited(&self) -> String {
        if supports_color() {
            self.fg::<css::IndianRed>().to_string()
        } else {
            self.to_owned()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_owned()
        }
    }
}
