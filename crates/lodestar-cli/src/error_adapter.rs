//! Error adapter for converting LodestarError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's report formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use lodestar::LodestarError;

/// Adapter rendering a [`LodestarError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a LodestarError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            LodestarError::Io(_) => "lodestar::io",
            LodestarError::Json(_) => "lodestar::json",
            LodestarError::Config(_) => "lodestar::config",
            LodestarError::Graph(_) => "lodestar::graph",
            LodestarError::Layout(_) => "lodestar::layout",
            LodestarError::Extract(_) => "lodestar::extract",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            LodestarError::Json(err) if err.line() > 0 => Some(Box::new(format!(
                "the input must be a JSON array of {{\"id\", \"connections\"}} objects; check line {}, column {}",
                err.line(),
                err.column()
            )) as Box<dyn fmt::Display>),
            LodestarError::Config(_) => Some(Box::new(
                "see the [layout] and [extract] sections for accepted keys",
            ) as Box<dyn fmt::Display>),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
