#![forbid(unsafe_code)]

//! Host adapter: a plot plus the scheduler that decides when it refreshes.

use std::time::Instant;

use hierplot_core::NodeStore;
use hierplot_core::NodeRef;
use hierplot_core::geometry::Size;
use hierplot_render::RenderSurface;

use crate::config::PlotConfig;
use crate::plot::HierarchyPlot;
use crate::scheduler::{IntervalTicker, RefreshCause, RefreshScheduler, Ticker};

/// Drives a [`HierarchyPlot`] from a host frame loop.
///
/// Call [`tick`](Self::tick) every host frame; it advances transitions and
/// refreshes the plot whenever the scheduler says so.
#[derive(Debug)]
pub struct HierarchyView<T: Ticker = IntervalTicker> {
    plot: HierarchyPlot,
    scheduler: RefreshScheduler<T>,
    last_tick: Option<Instant>,
}

impl HierarchyView<IntervalTicker> {
    /// A polling view refreshing every `config.refresh_interval`.
    pub fn new(config: PlotConfig) -> Self {
        let ticker = IntervalTicker::new(config.refresh_interval);
        Self::with_ticker(HierarchyPlot::new(config), ticker)
    }
}

impl<T: Ticker> HierarchyView<T> {
    pub fn with_ticker(plot: HierarchyPlot, ticker: T) -> Self {
        Self {
            plot,
            scheduler: RefreshScheduler::new(ticker),
            last_tick: None,
        }
    }

    /// Start refreshing; the next tick refreshes immediately.
    pub fn mount(&mut self, now: Instant) {
        self.last_tick = Some(now);
        self.scheduler.mount(now);
    }

    /// Stop refreshing.
    pub fn unmount(&mut self) {
        self.scheduler.unmount();
        self.last_tick = None;
    }

    /// The host area changed. Refreshes on the next tick when mounted.
    pub fn resize(&mut self, size: Size) {
        self.plot.resize(size);
        self.scheduler.resize(size);
    }

    /// Plot the first of `roots`, or nothing when empty.
    pub fn set_roots(&mut self, roots: &[NodeRef]) {
        self.plot.set_root(roots.first().cloned());
    }

    /// Advance transitions to `now` and refresh if one is due.
    pub fn tick<S, R>(&mut self, now: Instant, store: &S, surface: &mut R) -> Option<RefreshCause>
    where
        S: NodeStore + ?Sized,
        R: RenderSurface + ?Sized,
    {
        if !self.scheduler.is_mounted() {
            return None;
        }
        if let Some(last) = self.last_tick {
            self.plot.advance(now.saturating_duration_since(last));
        }
        self.last_tick = Some(now);

        let cause = self.scheduler.poll(now)?;
        tracing::trace!(?cause, "refresh scheduled");
        self.plot.refresh(store, surface);
        Some(cause)
    }

    pub fn is_mounted(&self) -> bool {
        self.scheduler.is_mounted()
    }

    pub fn plot(&self) -> &HierarchyPlot {
        &self.plot
    }

    pub fn plot_mut(&mut self) -> &mut HierarchyPlot {
        &mut self.plot
    }

    pub fn scheduler(&self) -> &RefreshScheduler<T> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut RefreshScheduler<T> {
        &mut self.scheduler
    }
}
