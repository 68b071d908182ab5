//! SVG rendering adapter over the plotters backend

use crate::{FigError, FigSize, Figure};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Dots per inch used to translate figure sizes into backend pixels
pub const DPI: f64 = 96.0;

/// A figure rendered to SVG markup at a standard size
pub struct SvgFigure {
    svg: String,
    size: FigSize,
}

impl SvgFigure {
    pub fn size(&self) -> FigSize {
        self.size
    }

    /// The rendered SVG markup
    pub fn markup(&self) -> &str {
        &self.svg
    }
}

impl Figure for SvgFigure {
    fn render(&self) -> Result<Vec<u8>, FigError> {
        Ok(self.svg.clone().into_bytes())
    }

    fn extension(&self) -> &str {
        "svg"
    }
}

/// Draw a figure of the given size onto an SVG drawing area.
///
/// Creates a plotters `SVGBackend` sized at `size.pixels(DPI)`, fills a
/// white background, hands the root drawing area to `draw`, and captures
/// the finished markup. Backend failures surface as [`FigError::Backend`].
pub fn svg_figure<F>(size: FigSize, draw: F) -> Result<SvgFigure, FigError>
where
    F: for<'a> FnOnce(&DrawingArea<SVGBackend<'a>, Shift>) -> Result<(), FigError>,
{
    let (width, height) = size.pixels(DPI);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(FigError::backend)?;
        draw(&root)?;
        root.present().map_err(FigError::backend)?;
    }
    Ok(SvgFigure { svg, size })
}
