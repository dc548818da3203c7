//! Layout engines.
//!
//! A [`LayoutEngine`] assigns a [`Position`] to every node of a
//! [`NodeGraph`]. The only engine is [`spring::Engine`], a
//! Fruchterman-Reingold force simulation.

pub mod spring;

use petgraph::graph::NodeIndex;

use crate::{error::LodestarError, geometry::Position, graph::NodeGraph};

/// Trait defining the interface for graph layout engines
pub trait LayoutEngine {
    /// Calculate a position for every node in `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Layout`] if the engine cannot produce finite
    /// coordinates for every node.
    fn calculate(&self, graph: &NodeGraph) -> Result<Layout, LodestarError>;
}

/// Positions produced by a [`LayoutEngine`], indexed by node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<Position>,
}

impl Layout {
    /// Creates a layout from positions ordered by node index.
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Returns the position of the node at `index`.
    pub fn position(&self, index: NodeIndex) -> Option<Position> {
        self.positions.get(index.index()).copied()
    }

    /// Returns all positions ordered by node index.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no node is positioned.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
