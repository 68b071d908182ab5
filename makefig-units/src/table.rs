//! Unit definitions - built-in document lengths and the process-wide table

use crate::UnitError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

/// Process-wide unit table
///
/// Seeded with the built-in units. Hosts add paper sizes or text-area
/// dimensions with [`register_unit`] during startup, before dispatch.
pub static UNITS: LazyLock<RwLock<UnitTable>> = LazyLock::new(|| RwLock::new(UnitTable::new()));

/// A named length unit expressed in inches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    /// Inches per one of this unit
    pub inches: f64,
    /// Where the length comes from (LaTeX class, paper size, ...)
    pub description: String,
}

/// Mapping from unit name to inch-equivalent definition
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    units: HashMap<String, UnitDef>,
}

impl UnitTable {
    /// A table seeded with the built-in units
    pub fn new() -> Self {
        let mut table = UnitTable {
            units: HashMap::new(),
        };
        table.seed_builtin_units();
        table
    }

    /// An empty table with no built-in units
    pub fn empty() -> Self {
        UnitTable::default()
    }

    /// Look up a unit by name
    pub fn get(&self, name: &str) -> Option<&UnitDef> {
        self.units.get(name)
    }

    /// All registered unit names
    pub fn names(&self) -> Vec<&str> {
        self.units.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Add or overwrite a unit
    ///
    /// The inch value must be positive and finite. Names must be non-empty
    /// and free of whitespace, since expressions are split on whitespace.
    pub fn register(
        &mut self,
        name: &str,
        inches: f64,
        description: &str,
    ) -> Result<(), UnitError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(UnitError::InvalidUnitName(name.to_string()));
        }
        if !(inches > 0.0) || !inches.is_finite() {
            return Err(UnitError::InvalidUnitValue {
                name: name.to_string(),
                inches,
            });
        }
        self.units.insert(
            name.to_string(),
            UnitDef {
                inches,
                description: description.to_string(),
            },
        );
        Ok(())
    }

    fn seed(&mut self, name: &str, inches: f64, description: &str) {
        self.units.insert(
            name.to_string(),
            UnitDef {
                inches,
                description: description.to_string(),
            },
        );
    }

    fn seed_builtin_units(&mut self) {
        // Base lengths
        self.seed(
            "pt",
            1.0 / 72.27,
            "LaTeX point. Not quite the same as a printer's point.",
        );
        self.seed("cm", 1.0 / 2.54, "Centimeter");
        self.seed("mm", 1.0 / 25.4, "Millimeter");
        self.seed("in", 1.0, "Inch");

        // Generic published-document text areas
        self.seed(
            "standard_text_width",
            6.5,
            "Reasonable width based on published scientific docs.",
        );
        self.seed(
            "standard_text_height",
            9.5,
            "Reasonable height based on published scientific docs.",
        );

        // Beamer 16:9 slides
        self.seed(
            "beamer_ar169_width",
            5.511811263318113,
            "\\documentclass[aspectratio=169]{beamer} \\linewidth",
        );
        self.seed(
            "beamer_ar169_height",
            3.3893697246436973,
            "\\documentclass[aspectratio=169]{beamer} \\textheight",
        );

        // LaTeX article on letter paper
        self.seed(
            "tex_letter_width",
            4.77376504773765,
            "\\documentclass{article} \\linewidth, letter paper",
        );
        self.seed(
            "tex_letter_height",
            7.610350076103501,
            "\\documentclass{article} \\textheight, letter paper",
        );
        self.seed(
            "tex_letter_twocol_width",
            3.1755915317559156,
            "\\documentclass[twocolumn]{article} \\linewidth, letter paper",
        );
        self.seed(
            "tex_letter_twocol_height",
            7.610350076103501,
            "\\documentclass[twocolumn]{article} \\textheight, letter paper",
        );
    }
}

/// Add or overwrite a unit in the process-wide table
pub fn register_unit(name: &str, inches: f64, description: &str) -> Result<(), UnitError> {
    UNITS
        .write()
        .expect("unit table lock poisoned")
        .register(name, inches, description)
}

/// Resolve a size expression against the process-wide table
pub fn resolve(expression: &str) -> Result<f64, UnitError> {
    UNITS
        .read()
        .expect("unit table lock poisoned")
        .resolve(expression)
}
