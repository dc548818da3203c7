//! CLI logic for the lodestar tool.
//!
//! Loads the configuration, applies command-line overrides and dispatches to
//! the [`lodestar::Pipeline`] stage selected by the subcommand.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, ExtractArgs, LayoutArgs};

use log::info;

use lodestar::{LodestarError, Pipeline};

/// Run the lodestar CLI application
///
/// # Errors
///
/// Returns `LodestarError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - JSON parsing errors
/// - Layout errors
pub fn run(args: &Args) -> Result<(), LodestarError> {
    let mut app_config = config::load_config(args.config.as_ref())?;

    match args.command_or_default() {
        Command::Layout(layout) => {
            info!(
                input_path = layout.input,
                output_path = layout.output;
                "Computing layout"
            );

            if let Some(seed) = layout.seed {
                app_config.layout_mut().set_seed(Some(seed));
            }
            if let Some(iterations) = layout.iterations {
                app_config.layout_mut().set_iterations(iterations);
            }

            let count = Pipeline::new(app_config).run(&layout.input, &layout.output)?;

            info!(output_file = layout.output, records = count; "Layout written successfully");
        }
        Command::Extract(extract) => {
            info!(
                dir = extract.dir,
                output_path = extract.output;
                "Extracting node list"
            );

            let count = Pipeline::new(app_config).extract(&extract.dir, &extract.output)?;

            info!(output_file = extract.output, records = count; "Node list written successfully");
        }
    }

    Ok(())
}
