//! The opaque figure capability and the umbrella error type

use crate::{RegistryError, SizeError};
use makefig_units::UnitError;
use std::fmt;
use thiserror::Error;

/// A finished figure, ready to be persisted or displayed.
///
/// The dispatcher treats figures as opaque: it asks for serialized bytes
/// and a file extension, and decides the destination itself. Backends other
/// than the built-in SVG adapter implement this trait to plug in.
pub trait Figure: Send {
    /// Serialize the figure (e.g. SVG markup)
    fn render(&self) -> Result<Vec<u8>, FigError>;

    /// File extension for saved output, without the dot
    fn extension(&self) -> &str;
}

/// Errors surfaced by figure production and dispatch
#[derive(Debug, Error)]
pub enum FigError {
    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Rendering-backend failure, stringified at the seam
    #[error("render backend error: {0}")]
    Backend(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A user-supplied producer failed or panicked
    #[error("figure `{name}` failed: {message}")]
    Producer { name: String, message: String },
}

impl FigError {
    /// Wrap a backend error at the plotting seam.
    ///
    /// plotters errors are generic over the backend error type, so they are
    /// captured by display rather than by source chain.
    pub fn backend(err: impl fmt::Display) -> Self {
        FigError::Backend(err.to_string())
    }
}
