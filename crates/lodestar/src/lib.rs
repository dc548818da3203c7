//! Lodestar - force-directed positions for JSON node lists.
//!
//! Reads an array of `{id, connections}` records, builds an undirected graph,
//! runs a spring layout over it and writes the same records back with `x`/`y`
//! coordinates appended.

pub mod config;
pub mod extract;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod record;

mod error;

pub use error::LodestarError;

use std::path::Path;

use log::{debug, info};

use config::AppConfig;
use graph::NodeGraph;
use layout::{LayoutEngine, spring};
use record::{NodeRecord, PositionedRecord};

/// Load, lay out and save node lists.
///
/// # Examples
///
/// ```rust
/// use lodestar::Pipeline;
///
/// let pipeline = Pipeline::default();
/// let records = pipeline
///     .parse(r#"[{"id":"A","connections":["B"]},{"id":"B","connections":["A"]}]"#)
///     .expect("Failed to parse");
///
/// let positioned = pipeline.layout(&records).expect("Failed to lay out");
/// assert_eq!(positioned.len(), 2);
/// assert!(positioned.iter().all(|r| r.position().is_finite()));
///
/// let json = pipeline.render_json(&positioned).expect("Failed to render");
/// assert!(json.contains("\"x\""));
/// ```
#[derive(Debug, Default)]
pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON array of node records.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Json`] for malformed input.
    pub fn parse(&self, source: &str) -> Result<Vec<NodeRecord>, LodestarError> {
        record::parse_records(source)
    }

    /// Build the undirected graph for `records`.
    pub fn build_graph(&self, records: &[NodeRecord]) -> NodeGraph {
        NodeGraph::from_records(records)
    }

    /// Compute a position for every record.
    ///
    /// The output has one entry per input record, in input order. Records
    /// that share an id share a position.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Layout`] if the engine fails and
    /// [`LodestarError::Graph`] if a record ends up without a position.
    pub fn layout(&self, records: &[NodeRecord]) -> Result<Vec<PositionedRecord>, LodestarError> {
        let graph = self.build_graph(records);
        let engine = spring::Engine::from_config(self.config.layout());
        let layout = engine.calculate(&graph)?;

        debug!(positions = layout.len(); "Layout calculated");

        records
            .iter()
            .map(|record| {
                graph
                    .index_of(record.id())
                    .and_then(|index| layout.position(index))
                    .map(|position| PositionedRecord::new(record.clone(), position))
                    .ok_or_else(|| {
                        LodestarError::Graph(format!("node `{}` has no position", record.id()))
                    })
            })
            .collect()
    }

    /// Render positioned records as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Json`] if serialization fails.
    pub fn render_json(&self, records: &[PositionedRecord]) -> Result<String, LodestarError> {
        record::to_json(records)
    }

    /// Run the whole pipeline from `input` to `output`.
    ///
    /// Returns the number of records written. `output` is replaced
    /// atomically; nothing is written when any stage fails.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError`] for:
    /// - File I/O errors
    /// - JSON parsing errors
    /// - Layout errors
    pub fn run(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize, LodestarError> {
        let records = record::load_records(input)?;
        let positioned = self.layout(&records)?;
        record::save_records(output, &positioned)?;

        info!(records = positioned.len(); "Positions computed");
        Ok(positioned.len())
    }

    /// Build a node list from the documents under `dir` and write it to `output`.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError`] if the directory cannot be scanned or the
    /// output cannot be written.
    pub fn extract(
        &self,
        dir: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<usize, LodestarError> {
        let records = crate::extract::extract(dir, self.config.extract())?;
        record::save_records(output, &records)?;
        Ok(records.len())
    }
}
