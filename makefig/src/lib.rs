//! Makefig - Standardized Figures with a Command Line Interface
//!
//! Tools for producing figures sized to standard document dimensions
//! (LaTeX articles, beamer slides) and for driving a set of registered
//! figure-producing functions from command-line tokens.
//!
//! # How to use
//!
//! - Write one function per figure. It takes no arguments and returns a
//!   boxed [`Figure`].
//! - Register each function in a [`FigureRegistry`] under the name the
//!   command line should use.
//! - Hand the registry to [`run`] from your binary's `main`.
//!
//! Command line usage:
//!
//! ```text
//! script [-h|--help] [save|nosave] [figurename [anotherfigure ...]]
//! ```
//!
//! `save`/`nosave` overrides the default save/display behavior; any listed
//! figure names restrict the run to those figures, otherwise all registered
//! figures are made.
//!
//! # Example
//!
//! ```no_run
//! use makefig::{run, standard_figsize, svg_figure, Dim, FigError, Figure, FigureRegistry, RunOptions};
//! use plotters::prelude::*;
//! use std::process::ExitCode;
//!
//! fn growth_curve() -> Result<Box<dyn Figure>, FigError> {
//!     let size = standard_figsize("tex_letter_width", Dim::Auto)?;
//!     let fig = svg_figure(size, |root| {
//!         let mut chart = ChartBuilder::on(root)
//!             .margin(8)
//!             .x_label_area_size(24)
//!             .y_label_area_size(32)
//!             .build_cartesian_2d(0.0..3.0, 0.0..9.0)
//!             .map_err(FigError::backend)?;
//!         chart
//!             .draw_series(LineSeries::new(
//!                 (0..=30).map(|i| i as f64 / 10.0).map(|x| (x, x * x)),
//!                 &BLUE,
//!             ))
//!             .map_err(FigError::backend)?;
//!         Ok(())
//!     })?;
//!     Ok(Box::new(fig))
//! }
//!
//! fn main() -> ExitCode {
//!     let registry = FigureRegistry::new()
//!         .with_figure("growth_curve", growth_curve)
//!         .expect("duplicate figure name");
//!     run(&registry, &RunOptions::default())
//! }
//! ```

mod dispatch;
mod figsize;
mod figure;
mod registry;
mod render;

pub use dispatch::{
    make_figs, parse_tokens, run, run_with, usage, Failure, Request, RunOptions, RunReport,
    SaveMode,
};
pub use figsize::{standard_figsize, Dim, FigSize, SizeError, SizeSpec, DEFAULT_WIDTH_IN, GOLDEN};
pub use figure::{FigError, Figure};
pub use registry::{FigureRegistry, Producer, RegistryError};
pub use render::{svg_figure, SvgFigure, DPI};

/// Re-export of the unit table and resolver
pub use makefig_units as units;
