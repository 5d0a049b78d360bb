#![forbid(unsafe_code)]

//! Plot configuration.
//!
//! Every tunable has a default matching the stock look of the plot. Values
//! can be overridden through `HIERPLOT_*` environment variables; parse and
//! validation problems are collected rather than failing on the first one.

use std::env;
use std::fmt;
use std::time::Duration;

use hierplot_core::geometry::Sides;
use hierplot_layout::DEFAULT_MARGIN;
use hierplot_layout::tidy::DEFAULT_NODE_SPACING;
use hierplot_render::TransitionPolicy;
use hierplot_render::reconcile::{DEFAULT_NODE_RADIUS, DEFAULT_ROOT_RADIUS};

const ENV_REFRESH_MS: &str = "HIERPLOT_REFRESH_MS";
const ENV_STRUCTURE_MS: &str = "HIERPLOT_STRUCTURE_MS";
const ENV_HIGHLIGHT_MS: &str = "HIERPLOT_HIGHLIGHT_MS";
const ENV_NODE_SPACING: &str = "HIERPLOT_NODE_SPACING";
const ENV_NODE_RADIUS: &str = "HIERPLOT_NODE_RADIUS";
const ENV_ROOT_RADIUS: &str = "HIERPLOT_ROOT_RADIUS";
const ENV_HOVER_RADIUS: &str = "HIERPLOT_HOVER_RADIUS";
const ENV_SELECTED_STROKE: &str = "HIERPLOT_SELECTED_STROKE";

/// Tunables for a [`HierarchyPlot`](crate::HierarchyPlot).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    /// Cadence of polling refreshes.
    pub refresh_interval: Duration,
    /// Duration of position and structural radius transitions.
    pub structure_duration: Duration,
    /// Duration of hover radius transitions.
    pub highlight_duration: Duration,
    /// Raw sibling spacing fed to the layout.
    pub node_spacing: f64,
    pub margin: Sides,
    pub node_radius: f64,
    pub root_radius: f64,
    /// Radius of a hovered non-root node.
    pub hover_radius: f64,
    pub selected_stroke_width: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(500),
            structure_duration: Duration::from_millis(300),
            highlight_duration: Duration::from_millis(200),
            node_spacing: DEFAULT_NODE_SPACING,
            margin: DEFAULT_MARGIN,
            node_radius: DEFAULT_NODE_RADIUS,
            root_radius: DEFAULT_ROOT_RADIUS,
            hover_radius: 8.0,
            selected_stroke_width: 3.0,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct PlotConfigParse {
    pub config: PlotConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl PlotConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> PlotConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> PlotConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary key lookup.
    pub fn from_env_with<F>(mut get: F) -> PlotConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = PlotConfig::default();
        let mut errors = Vec::new();

        let mut millis = |key: &str, field: &'static str, slot: &mut Duration| {
            if let Some(value) = get(key) {
                match parse_u64(&value) {
                    Some(ms) => *slot = Duration::from_millis(ms),
                    None => errors.push(ConfigError::new(field, value, "expected milliseconds")),
                }
            }
        };
        millis(ENV_REFRESH_MS, "refresh_interval", &mut config.refresh_interval);
        millis(ENV_STRUCTURE_MS, "structure_duration", &mut config.structure_duration);
        millis(ENV_HIGHLIGHT_MS, "highlight_duration", &mut config.highlight_duration);

        let mut number = |key: &str, field: &'static str, slot: &mut f64| {
            if let Some(value) = get(key) {
                match parse_f64(&value) {
                    Some(v) => *slot = v,
                    None => errors.push(ConfigError::new(field, value, "expected finite number")),
                }
            }
        };
        number(ENV_NODE_SPACING, "node_spacing", &mut config.node_spacing);
        number(ENV_NODE_RADIUS, "node_radius", &mut config.node_radius);
        number(ENV_ROOT_RADIUS, "root_radius", &mut config.root_radius);
        number(ENV_HOVER_RADIUS, "hover_radius", &mut config.hover_radius);
        number(
            ENV_SELECTED_STROKE,
            "selected_stroke_width",
            &mut config.selected_stroke_width,
        );

        if let Err(mut validation) = config.validate() {
            errors.append(&mut validation);
        }
        for err in &errors {
            tracing::warn!(field = err.field, value = %err.value, message = %err.message, "invalid plot config");
        }

        PlotConfigParse {
            config: config.sanitized(),
            errors,
        }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_duration("refresh_interval", self.refresh_interval, &mut errors);
        validate_duration("structure_duration", self.structure_duration, &mut errors);
        validate_duration("highlight_duration", self.highlight_duration, &mut errors);
        validate_positive("node_spacing", self.node_spacing, &mut errors);
        validate_positive("node_radius", self.node_radius, &mut errors);
        validate_positive("root_radius", self.root_radius, &mut errors);
        validate_positive("hover_radius", self.hover_radius, &mut errors);
        if !(self.selected_stroke_width.is_finite() && self.selected_stroke_width >= 0.0) {
            errors.push(ConfigError::new(
                "selected_stroke_width",
                self.selected_stroke_width.to_string(),
                "must be >= 0",
            ));
        }
        if self.hover_radius < self.node_radius {
            errors.push(ConfigError::new(
                "hover_radius",
                self.hover_radius.to_string(),
                "must be >= node_radius",
            ));
        }
        if self.root_radius <= self.hover_radius {
            errors.push(ConfigError::new(
                "root_radius",
                self.root_radius.to_string(),
                "must be > hover_radius",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Replace each invalid value with its default, then restore the radius
    /// order `node_radius <= hover_radius < root_radius` by raising the
    /// larger radii. The result always passes [`validate`](Self::validate).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (slot, default) in [
            (&mut self.refresh_interval, defaults.refresh_interval),
            (&mut self.structure_duration, defaults.structure_duration),
            (&mut self.highlight_duration, defaults.highlight_duration),
        ] {
            if slot.is_zero() {
                *slot = default;
            }
        }
        for (slot, default) in [
            (&mut self.node_spacing, defaults.node_spacing),
            (&mut self.node_radius, defaults.node_radius),
            (&mut self.root_radius, defaults.root_radius),
            (&mut self.hover_radius, defaults.hover_radius),
        ] {
            if !(slot.is_finite() && *slot > 0.0) {
                *slot = default;
            }
        }
        if !(self.selected_stroke_width.is_finite() && self.selected_stroke_width >= 0.0) {
            self.selected_stroke_width = defaults.selected_stroke_width;
        }
        if self.hover_radius < self.node_radius {
            self.hover_radius = self.node_radius;
        }
        if self.root_radius <= self.hover_radius {
            self.root_radius = self.hover_radius + (defaults.root_radius - defaults.hover_radius);
        }
        self
    }

    /// Transition durations as a policy.
    pub fn transition_policy(&self) -> TransitionPolicy {
        TransitionPolicy {
            structure: self.structure_duration,
            highlight: self.highlight_duration,
        }
    }

    /// Radius added to a node while hovered.
    pub fn hover_boost(&self) -> f64 {
        (self.hover_radius - self.node_radius).max(0.0)
    }

    /// Short human-readable summary for debug overlays.
    #[must_use]
    pub fn summary_short(&self) -> String {
        format!(
            "Hierplot: refresh {}ms · structure {}ms · highlight {}ms · r {}/{}/{}",
            self.refresh_interval.as_millis(),
            self.structure_duration.as_millis(),
            self.highlight_duration.as_millis(),
            self.node_radius,
            self.hover_radius,
            self.root_radius,
        )
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn validate_duration(field: &'static str, value: Duration, errors: &mut Vec<ConfigError>) {
    if value.is_zero() {
        errors.push(ConfigError::new(field, "0ms", "must be >= 1ms"));
    }
}

fn validate_positive(field: &'static str, value: f64, errors: &mut Vec<ConfigError>) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigError::new(field, value.to_string(), "must be > 0"));
    }
}
