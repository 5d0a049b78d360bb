#![forbid(unsafe_code)]

//! Hierplot public facade crate.
//!
//! Re-exports the types a host needs to plot a node store as a tidy tree:
//! the store traits, the plot engine and its view adapter, styling, and the
//! surface trait commands are issued through.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use hierplot_core::geometry::{Point, Sides, Size};
pub use hierplot_core::hover::{HoverCallback, Hoverable};
pub use hierplot_core::{Children, NodeAccessor, NodeRecord, NodeRef, NodeStore};

// --- Layout re-exports -----------------------------------------------------

pub use hierplot_layout::{Hierarchy, LayoutParams, LinkPath, TreeLayout};

// --- Render re-exports -----------------------------------------------------

pub use hierplot_render::{
    ChangeKind, LinkKey, LinkVisual, NodeVisual, RecordingSurface, Reconciliation, RenderSurface,
    SurfaceOp, Transition,
};

// --- Style re-exports ------------------------------------------------------

pub use hierplot_style::{ColorTableError, LegendEntry, Palette, Rgb, Theme, TypeColors};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use hierplot_runtime::{
    ConfigError, DataPointCallback, HierarchyPlot, HierarchyView, IntervalTicker, Notifier,
    NotifyTicker, PlotConfig, RefreshCause, Ticker,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for hierplot hosts.
#[derive(Debug)]
pub enum Error {
    /// One or more invalid configuration values.
    #[cfg(feature = "runtime")]
    Config(Vec<ConfigError>),
    /// A type alias points outside the palette.
    ColorTable(ColorTableError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "runtime")]
            Self::Config(errors) => {
                write!(f, "invalid plot config: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            Self::ColorTable(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ColorTable(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Config(_) => None,
        }
    }
}

#[cfg(feature = "runtime")]
impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

impl From<ColorTableError> for Error {
    fn from(err: ColorTableError) -> Self {
        Self::ColorTable(err)
    }
}

/// Standard result type for hierplot APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load [`PlotConfig`] from the environment, failing on any invalid value.
#[cfg(feature = "runtime")]
pub fn config_from_env() -> Result<PlotConfig> {
    let parse = PlotConfig::from_env_with_diagnostics();
    if parse.errors.is_empty() {
        Ok(parse.config)
    } else {
        Err(Error::Config(parse.errors))
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, NodeAccessor, NodeRecord, NodeRef, NodeStore, Point, RenderSurface, Result, Size,
        Theme,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{HierarchyPlot, HierarchyView, PlotConfig};

    pub use crate::{core, layout, render, style};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use hierplot_core as core;
pub use hierplot_layout as layout;
pub use hierplot_render as render;
#[cfg(feature = "runtime")]
pub use hierplot_runtime as runtime;
pub use hierplot_style as style;
