//! Makefig Gallery
//!
//! A small set of deterministic demo figures behind the makefig command
//! line. Run with no arguments to write every figure to the show
//! directory, or:
//!
//! ```text
//! makefig-gallery save damped_oscillation
//! makefig-gallery --help
//! ```

use makefig::{
    run, svg_figure, Dim, FigError, Figure, FigureRegistry, RegistryError, RunOptions, SizeSpec,
};
use plotters::prelude::*;
use std::process::ExitCode;

/// Damped oscillation at LaTeX article linewidth
fn damped_oscillation() -> Result<Box<dyn Figure>, FigError> {
    let size = SizeSpec::new().width("tex_letter_width").resolve()?;
    let fig = svg_figure(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(8)
            .caption("x(t) = e^{-t/4} cos(2t)", ("sans-serif", 14))
            .x_label_area_size(24)
            .y_label_area_size(36)
            .build_cartesian_2d(0.0..10.0, -1.0..1.0)
            .map_err(FigError::backend)?;
        chart
            .configure_mesh()
            .x_desc("t")
            .y_desc("x(t)")
            .draw()
            .map_err(FigError::backend)?;
        chart
            .draw_series(LineSeries::new(
                (0..=500)
                    .map(|i| i as f64 * 10.0 / 500.0)
                    .map(|t| (t, (-t / 4.0).exp() * (2.0 * t).cos())),
                &BLUE,
            ))
            .map_err(FigError::backend)?;
        Ok(())
    })?;
    Ok(Box::new(fig))
}

/// Two side-by-side panels at beamer 16:9 linewidth
fn beamer_panels() -> Result<Box<dyn Figure>, FigError> {
    let size = SizeSpec::new()
        .width("beamer_ar169_width")
        .grid(1, 2)
        .resolve()?;
    let fig = svg_figure(size, |root| {
        let panels = root.split_evenly((1, 2));
        for (k, panel) in panels.iter().enumerate() {
            let power = (k + 1) as f64;
            let mut chart = ChartBuilder::on(panel)
                .margin(6)
                .x_label_area_size(20)
                .y_label_area_size(28)
                .build_cartesian_2d(0.0..1.0, 0.0..1.0)
                .map_err(FigError::backend)?;
            chart
                .configure_mesh()
                .disable_mesh()
                .draw()
                .map_err(FigError::backend)?;
            chart
                .draw_series(LineSeries::new(
                    (0..=100)
                        .map(|i| i as f64 / 100.0)
                        .map(|x| (x, x.powf(power))),
                    &RED,
                ))
                .map_err(FigError::backend)?;
        }
        Ok(())
    })?;
    Ok(Box::new(fig))
}

/// Scatter of a quadratic lattice, sized by a host-registered unit
fn lattice_scatter() -> Result<Box<dyn Figure>, FigError> {
    let size = makefig::standard_figsize("thesis_width", Dim::Auto)?;
    let fig = svg_figure(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(8)
            .x_label_area_size(24)
            .y_label_area_size(32)
            .build_cartesian_2d(0.0..8.0, 0.0..8.0)
            .map_err(FigError::backend)?;
        chart
            .configure_mesh()
            .draw()
            .map_err(FigError::backend)?;
        let points = (0..8).flat_map(|i| (0..8).map(move |j| (i as f64, j as f64)));
        chart
            .draw_series(points.map(|(x, y)| Circle::new((x, y), 3, GREEN.filled())))
            .map_err(FigError::backend)?;
        Ok(())
    })?;
    Ok(Box::new(fig))
}

fn build_registry() -> Result<FigureRegistry, RegistryError> {
    FigureRegistry::new()
        .with_figure("damped_oscillation", damped_oscillation)?
        .with_figure("beamer_panels", beamer_panels)?
        .with_figure("lattice_scatter", lattice_scatter)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Units must be in place before the first dispatch.
    if let Err(err) = makefig_units::register_unit(
        "thesis_width",
        5.25,
        "\\documentclass[twoside]{report} \\linewidth, a4 paper",
    ) {
        eprintln!("unit setup failed: {err}");
        return ExitCode::FAILURE;
    }

    let registry = match build_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("registry setup failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(figures = registry.len(), "gallery ready");
    run(&registry, &RunOptions::default())
}
