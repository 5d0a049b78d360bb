#![forbid(unsafe_code)]

//! Runtime for hierarchy plots: configuration, selection, refresh
//! scheduling, and the [`HierarchyPlot`] engine that ties the layout and
//! render crates together.

pub mod config;
pub mod plot;
pub mod scheduler;
pub mod selection;
pub mod view;

pub use config::{ConfigError, PlotConfig, PlotConfigParse};
pub use plot::HierarchyPlot;
pub use scheduler::{IntervalTicker, Notifier, NotifyTicker, RefreshCause, RefreshScheduler, Ticker};
pub use selection::{DataPointCallback, SelectionManager, SelectionState};
pub use view::HierarchyView;
