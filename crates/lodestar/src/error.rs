//! Error types for lodestar operations.
//!
//! This module provides the main error type [`LodestarError`] which wraps
//! the error conditions that can occur while loading, laying out and saving
//! a node list.

use std::io;

use thiserror::Error;

/// The main error type for lodestar operations.
///
/// Every variant is fatal: the pipeline stops at the first error and no
/// output file is written.
#[derive(Debug, Error)]
pub enum LodestarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Extract error: {0}")]
    Extract(String),
}
