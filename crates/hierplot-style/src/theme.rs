#![forbid(unsafe_code)]

//! Theme slots for everything the categorical palette does not cover.
//!
//! # Example
//! ```
//! use hierplot_style::{Rgb, Theme};
//!
//! let theme = Theme::builder()
//!     .fallback_node(Rgb::new(200, 200, 200))
//!     .build();
//! assert_eq!(theme.fallback_node, Rgb::new(200, 200, 200));
//! ```

use crate::color::Rgb;

/// Colors used by a hierarchy plot outside the type palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Fill for nodes whose type has no palette entry.
    pub fallback_node: Rgb,
    /// Stroke for parent-child links.
    pub link_stroke: Rgb,
    /// Stroke for node outlines (visible only while selected).
    pub node_stroke: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        themes::dark()
    }
}

impl Theme {
    /// Create a new theme builder starting from the dark theme.
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }
}

/// Builder for [`Theme`].
#[derive(Debug, Clone)]
pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    pub fn new() -> Self {
        Self {
            theme: themes::dark(),
        }
    }

    /// Start from an existing theme.
    pub fn from_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn fallback_node(mut self, color: Rgb) -> Self {
        self.theme.fallback_node = color;
        self
    }

    pub fn link_stroke(mut self, color: Rgb) -> Self {
        self.theme.link_stroke = color;
        self
    }

    pub fn node_stroke(mut self, color: Rgb) -> Self {
        self.theme.node_stroke = color;
        self
    }

    pub fn build(self) -> Theme {
        self.theme
    }
}

impl Default for ThemeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in themes.
pub mod themes {
    use super::*;

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Theme {
        Theme {
            fallback_node: Rgb::new(139, 148, 158), // Gray
            link_stroke: Rgb::new(72, 79, 88),      // Subtle
            node_stroke: Rgb::new(255, 166, 87),    // Amber
        }
    }

    /// Light theme.
    #[must_use]
    pub fn light() -> Theme {
        Theme {
            fallback_node: Rgb::new(110, 119, 129),
            link_stroke: Rgb::new(208, 215, 222),
            node_stroke: Rgb::new(207, 34, 46),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dark() {
        assert_eq!(Theme::default(), themes::dark());
    }

    #[test]
    fn builder_overrides_single_slot() {
        let theme = ThemeBuilder::from_theme(themes::light())
            .link_stroke(Rgb::new(1, 2, 3))
            .build();
        assert_eq!(theme.link_stroke, Rgb::new(1, 2, 3));
        assert_eq!(theme.node_stroke, themes::light().node_stroke);
    }

    #[test]
    fn themes_differ() {
        assert_ne!(themes::dark(), themes::light());
    }
}
