//! Figure-size arithmetic - convenient units and 'good' aspect ratios

use makefig_units::{UnitError, UnitTable, UNITS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Golden ratio, the default width/height aspect
pub const GOLDEN: f64 = 1.618033988749895;

/// Fallback width in inches when neither dimension is specified
pub const DEFAULT_WIDTH_IN: f64 = 6.4;

/// Relative tolerance for strict-mode aspect consistency checks
const ASPECT_TOL: f64 = 1e-6;

/// Errors from figure-size computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizeError {
    /// Not enough information to derive both dimensions
    #[error("size is underspecified: {0}")]
    Underspecified(String),

    /// Strict mode: explicit width/height disagree with the aspect ratio
    #[error("width {width}in and height {height}in conflict with figure aspect {aspect}")]
    Conflicting { width: f64, height: f64, aspect: f64 },

    /// A resolved dimension is non-positive or non-finite
    #[error("figure dimension must be positive and finite, got {0}")]
    InvalidDimension(f64),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// One figure dimension: unspecified, inches, or a size expression
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dim {
    /// Derive from the other dimension and the aspect ratio
    #[default]
    Auto,
    /// Explicit length in inches
    Inches(f64),
    /// A size expression such as `"2 tex_letter_width"`
    Expr(String),
}

impl Dim {
    fn resolve(&self, table: &UnitTable) -> Result<Option<f64>, UnitError> {
        match self {
            Dim::Auto => Ok(None),
            Dim::Inches(v) => Ok(Some(*v)),
            Dim::Expr(expr) => table.resolve(expr).map(Some),
        }
    }
}

impl From<f64> for Dim {
    fn from(inches: f64) -> Self {
        Dim::Inches(inches)
    }
}

impl From<&str> for Dim {
    fn from(expr: &str) -> Self {
        Dim::Expr(expr.to_string())
    }
}

impl From<String> for Dim {
    fn from(expr: String) -> Self {
        Dim::Expr(expr)
    }
}

/// A concrete figure size in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigSize {
    pub width: f64,
    pub height: f64,
}

impl FigSize {
    /// Backend pixel dimensions at the given dots-per-inch
    pub fn pixels(&self, dpi: f64) -> (u32, u32) {
        (
            (self.width * dpi).round() as u32,
            (self.height * dpi).round() as u32,
        )
    }
}

/// Builder for a figure size from dimensions, aspect ratio, and panel grid.
///
/// The figure aspect is `aspect * ncols / nrows`, so that each panel of an
/// `nrows` x `ncols` grid ends up near the requested per-panel aspect
/// (neglecting padding between panels).
#[derive(Debug, Clone)]
pub struct SizeSpec {
    width: Dim,
    height: Dim,
    aspect: Option<f64>,
    nrows: usize,
    ncols: usize,
    strict: bool,
}

impl Default for SizeSpec {
    fn default() -> Self {
        SizeSpec {
            width: Dim::Auto,
            height: Dim::Auto,
            aspect: Some(GOLDEN),
            nrows: 1,
            ncols: 1,
            strict: false,
        }
    }
}

impl SizeSpec {
    pub fn new() -> Self {
        SizeSpec::default()
    }

    pub fn width(mut self, width: impl Into<Dim>) -> Self {
        self.width = width.into();
        self
    }

    pub fn height(mut self, height: impl Into<Dim>) -> Self {
        self.height = height.into();
        self
    }

    /// Per-panel width/height aspect ratio (default: [`GOLDEN`])
    pub fn aspect(mut self, aspect: f64) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Forget the aspect ratio; both dimensions must then be explicit
    pub fn without_aspect(mut self) -> Self {
        self.aspect = None;
        self
    }

    /// Expected panel grid, used to scale the figure aspect
    pub fn grid(mut self, nrows: usize, ncols: usize) -> Self {
        self.nrows = nrows;
        self.ncols = ncols;
        self
    }

    /// Fail with [`SizeError::Conflicting`] when an explicit width/height
    /// pair disagrees with the aspect ratio, instead of letting the pair win
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Resolve against the process-wide unit table
    pub fn resolve(&self) -> Result<FigSize, SizeError> {
        let table = UNITS.read().expect("unit table lock poisoned");
        self.resolve_with(&table)
    }

    /// Resolve against an explicit unit table
    pub fn resolve_with(&self, table: &UnitTable) -> Result<FigSize, SizeError> {
        if self.nrows == 0 || self.ncols == 0 {
            return Err(SizeError::Underspecified(format!(
                "panel grid must be at least 1x1, got {}x{}",
                self.nrows, self.ncols
            )));
        }
        let fig_aspect = |aspect: f64| aspect * self.ncols as f64 / self.nrows as f64;

        let width = self.width.resolve(table)?;
        let height = self.height.resolve(table)?;

        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => {
                if self.strict {
                    if let Some(aspect) = self.aspect {
                        let expected = fig_aspect(aspect);
                        if (w / h - expected).abs() > ASPECT_TOL * expected.abs() {
                            return Err(SizeError::Conflicting {
                                width: w,
                                height: h,
                                aspect: expected,
                            });
                        }
                    }
                }
                (w, h)
            }
            (Some(w), None) => {
                let aspect = self.aspect.ok_or_else(|| {
                    SizeError::Underspecified(
                        "height requires an aspect ratio when only width is given".to_string(),
                    )
                })?;
                (w, w / fig_aspect(aspect))
            }
            (None, Some(h)) => {
                let aspect = self.aspect.ok_or_else(|| {
                    SizeError::Underspecified(
                        "width requires an aspect ratio when only height is given".to_string(),
                    )
                })?;
                (h * fig_aspect(aspect), h)
            }
            (None, None) => {
                let aspect = self.aspect.ok_or_else(|| {
                    SizeError::Underspecified(
                        "neither dimension given and no aspect ratio to apply".to_string(),
                    )
                })?;
                (DEFAULT_WIDTH_IN, DEFAULT_WIDTH_IN / fig_aspect(aspect))
            }
        };

        for dim in [width, height] {
            if !dim.is_finite() || dim <= 0.0 {
                return Err(SizeError::InvalidDimension(dim));
            }
        }
        Ok(FigSize { width, height })
    }
}

/// Calculate a 'good' figure size from convenient units and the golden ratio.
///
/// Shorthand for [`SizeSpec`] with default aspect and a single panel. Pass
/// [`Dim::Auto`] for a dimension that should be derived.
pub fn standard_figsize(
    width: impl Into<Dim>,
    height: impl Into<Dim>,
) -> Result<FigSize, SizeError> {
    SizeSpec::new().width(width).height(height).resolve()
}
