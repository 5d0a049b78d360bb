#![forbid(unsafe_code)]

//! Node type name to palette color.
//!
//! Several runtime type names share one category (for instance `View` and
//! `RCTView`). Lookup is total: a name with no category, or a category that
//! the palette cannot satisfy, resolves to the theme's fallback fill.

use std::collections::HashMap;
use std::fmt;

use crate::color::Rgb;
use crate::palette::Palette;
use crate::theme::Theme;

/// Built-in aliases, grouped by category index.
const DEFAULT_ALIASES: &[(&str, usize)] = &[
    ("View", 0),
    ("RCTView", 0),
    ("ScrollView", 1),
    ("RCTScrollView", 1),
    ("RCTScrollContentView", 1),
    ("Text", 2),
    ("RCTText", 2),
    ("Button", 3),
    ("VrButton", 3),
    ("OcVrButton", 3),
    ("OCButton", 3),
    ("GazeView", 4),
    ("Container", 5),
    ("AppContainer", 5),
    ("OCMultiLayerContainer", 5),
    ("StaticContainer", 5),
    ("OCCenterContainer", 5),
    ("Image", 6),
    ("RCTImage", 6),
    ("TODO_NOT_IMPLEMENTED_YET", 7),
];

/// Categories shown in a legend, in display order.
pub const LEGEND_NAMES: [&str; 6] = ["View", "ScrollView", "Text", "Button", "Container", "Image"];

/// A custom alias points past the end of the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTableError {
    pub name: String,
    pub index: usize,
    pub palette_len: usize,
}

impl fmt::Display for ColorTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type '{}' maps to color index {} but the palette has {} colors",
            self.name, self.index, self.palette_len
        )
    }
}

impl std::error::Error for ColorTableError {}

/// One row of legend data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub name: &'static str,
    pub color: Option<Rgb>,
}

/// Alias table from type name to palette index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeColors {
    aliases: HashMap<String, usize>,
}

impl Default for TypeColors {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|&(name, idx)| (name.to_owned(), idx))
                .collect(),
        }
    }
}

impl TypeColors {
    /// Build a custom table, checking every index against `palette`.
    ///
    /// # Errors
    ///
    /// Returns the first alias (in input order) whose index is out of range.
    pub fn with_aliases<I, S>(aliases: I, palette: &Palette) -> Result<Self, ColorTableError>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut table = HashMap::new();
        for (name, index) in aliases {
            let name = name.into();
            if index >= palette.len() {
                return Err(ColorTableError {
                    name,
                    index,
                    palette_len: palette.len(),
                });
            }
            table.insert(name, index);
        }
        Ok(Self { aliases: table })
    }

    /// Palette index for a type name.
    pub fn color_index(&self, name: &str) -> Option<usize> {
        self.aliases.get(name).copied()
    }

    /// Fill color for a type name.
    pub fn fill(&self, name: &str, palette: &Palette, theme: &Theme) -> Rgb {
        self.color_index(name)
            .and_then(|idx| palette.get(idx))
            .unwrap_or(theme.fallback_node)
    }

    /// Legend rows for the named categories that this table knows about.
    pub fn legend(&self, palette: &Palette) -> Vec<LegendEntry> {
        LEGEND_NAMES
            .iter()
            .filter_map(|&name| {
                self.color_index(name).map(|idx| LegendEntry {
                    name,
                    color: palette.get(idx),
                })
            })
            .collect()
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
