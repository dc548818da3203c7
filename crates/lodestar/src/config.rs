//! Configuration types for lodestar.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the CLI; every field is optional and falls back to the
//! defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and extract settings.
//! - [`LayoutConfig`] - Parameters of the spring layout simulation.
//! - [`ExtractConfig`] - Settings for building a node list from Markdown documents.
//!
//! # Example
//!
//! ```
//! # use lodestar::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().iterations(), 100);
//! assert_eq!(config.layout().k(), Some(0.5));
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Extract configuration section.
    #[serde(default)]
    extract: ExtractConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, extract: ExtractConfig) -> Self {
        Self { layout, extract }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns a mutable reference to the layout configuration.
    ///
    /// Used by the CLI to apply command-line overrides on top of a loaded file.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    /// Returns the extract configuration.
    pub fn extract(&self) -> &ExtractConfig {
        &self.extract
    }
}

/// Parameters of the Fruchterman-Reingold spring simulation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Optimal distance between nodes; `None` uses `sqrt(1 / node_count)`.
    k: Option<f64>,

    /// Maximum number of simulation steps.
    iterations: usize,

    /// Mean per-node displacement below which the simulation stops early.
    threshold: f64,

    /// Half-extent of the final layout along its larger axis.
    scale: f64,

    /// Point the final layout is centered on.
    center: [f64; 2],

    /// Seed for the initial placement; `None` draws a fresh seed per run.
    seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            k: Some(0.5),
            iterations: 100,
            threshold: 1e-4,
            scale: 1.0,
            center: [0.0, 0.0],
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Returns the optimal node distance, if fixed.
    pub fn k(&self) -> Option<f64> {
        self.k
    }

    /// Returns the maximum number of iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the early-stop threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the output scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the output center as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (self.center[0], self.center[1])
    }

    /// Returns the configured seed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Set the optimal node distance
    pub fn set_k(&mut self, k: Option<f64>) -> &mut Self {
        self.k = k;
        self
    }

    /// Set the number of iterations
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Set the early-stop threshold
    pub fn set_threshold(&mut self, threshold: f64) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Set the output scale
    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Set the output center
    pub fn set_center(&mut self, x: f64, y: f64) -> &mut Self {
        self.center = [x, y];
        self
    }

    /// Set the seed for the initial placement
    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }
}

/// Settings for [`crate::extract`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// File extension (without the dot) of documents to scan.
    extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Creates a new [`ExtractConfig`] scanning files with `extension`.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Returns the document file extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}
