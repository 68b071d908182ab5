//! Makefig Units - Document Length Units
//!
//! Maps named length units to inch measurements and resolves size
//! expressions like `"3.5in"` or `"2 tex_letter_width"` to inches.
//!
//! The built-in set covers common LaTeX document and beamer slide
//! dimensions. To find the width or height of a text area in a LaTeX
//! document, put `\showthe\linewidth` or `\showthe\textheight` in the
//! source and compile with pdflatex; the length is printed in pt.
//!
//! Hosts extend the built-in set with [`register_unit`] before the first
//! dispatch; during dispatch the table is read-only.

mod error;
mod parse;
mod table;

pub use error::UnitError;
pub use parse::split_coefficient;
pub use table::{register_unit, resolve, UnitDef, UnitTable, UNITS};
