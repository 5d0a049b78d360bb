#![forbid(unsafe_code)]

//! Styling for hierarchy plots.
//!
//! - [`Rgb`]: opaque 24-bit color
//! - [`Palette`]: ordered categorical colors
//! - [`Theme`]: the non-categorical slots (fallback fill, strokes)
//! - [`TypeColors`]: node type name to palette index, plus legend data

pub mod color;
pub mod palette;
pub mod theme;
pub mod type_colors;

pub use color::Rgb;
pub use palette::Palette;
pub use theme::{Theme, themes};
pub use type_colors::{ColorTableError, LEGEND_NAMES, LegendEntry, TypeColors};
