//! Color conversion for terminal output.

use ratatui::style::Color;
use skytrail_core::Rgba;

/// Flatten a translucent color onto the backdrop as a terminal color.
///
/// Terminal cells have no alpha channel, so opacity becomes a blend towards
/// the backdrop.
pub fn terminal_color(color: Rgba, backdrop: Rgba) -> Color {
    let flat = color.over(backdrop);
    Color::Rgb(flat.r, flat.g, flat.b)
}

/// Whether a color would be indistinguishable from the backdrop.
pub fn is_invisible(color: Rgba, backdrop: Rgba) -> bool {
    color.over(backdrop) == backdrop.with_alpha(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_color_passes_through() {
        assert_eq!(
            terminal_color(Rgba::rgb(170, 170, 170), Rgba::BLACK),
            Color::Rgb(170, 170, 170)
        );
    }

    #[test]
    fn test_translucent_line_blends_towards_backdrop() {
        let line = Rgba::rgba(180, 180, 180, 0.4);
        assert_eq!(terminal_color(line, Rgba::BLACK), Color::Rgb(72, 72, 72));
        assert_eq!(terminal_color(line, Rgba::WHITE), Color::Rgb(225, 225, 225));
    }

    #[test]
    fn test_faded_smoke_is_invisible() {
        assert!(is_invisible(Rgba::WHITE.with_alpha(0.0), Rgba::BLACK));
        assert!(!is_invisible(Rgba::WHITE.with_alpha(0.1), Rgba::BLACK));
    }
}
