use crate::core::models::molecule::Molecule;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QChemInputError {
    #[error("The $rem section is missing the required key '{0}'")]
    MissingRemKey(&'static str),
    #[error("Failed to write input file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A scalar value in a Q-Chem keyword section.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            // Whole floats keep their decimal point so `0.0` does not turn into an integer keyword.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl FromStr for ParameterValue {
    type Err = std::convert::Infallible;

    /// Infers the narrowest type: integer, then float, then boolean, then text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Self::Int(v));
        }
        if let Ok(v) = s.parse::<f64>() {
            return Ok(Self::Float(v));
        }
        match s {
            "true" => Ok(Self::Bool(true)),
            "false" => Ok(Self::Bool(false)),
            _ => Ok(Self::Text(s.to_string())),
        }
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// An ordered `key = value` keyword section such as `$rem` or `$smx`.
///
/// Keys are matched case-insensitively, as Q-Chem does, but written back in
/// the case and order they were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSection {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<ParameterValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces `key`. Replacing keeps the original position.
    pub fn set(&mut self, key: &str, value: impl Into<ParameterValue>) {
        let value = value.into();
        match self.position(key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ParameterValue> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    fn render(&self, name: &str, out: &mut String) {
        out.push('$');
        out.push_str(name);
        out.push('\n');
        for (key, value) in &self.entries {
            out.push_str(&format!("   {key} = {value}\n"));
        }
        out.push_str("$end\n");
    }
}

fn signed_coordinate(value: f64) -> String {
    if value.is_sign_negative() {
        format!("{value:.10}")
    } else {
        format!(" {value:.10}")
    }
}

/// A complete Q-Chem input file: molecule plus keyword sections.
#[derive(Debug, Clone, PartialEq)]
pub struct QChemInput {
    molecule: Molecule,
    rem: ParameterSection,
    smx: Option<ParameterSection>,
    geom_opt: Option<ParameterSection>,
}

impl QChemInput {
    /// Creates an input from a molecule and its `$rem` section.
    ///
    /// # Errors
    ///
    /// Returns [`QChemInputError::MissingRemKey`] when `job_type`, `basis`, or
    /// both `method` and `exchange` are absent; Q-Chem refuses such input.
    pub fn new(molecule: Molecule, rem: ParameterSection) -> Result<Self, QChemInputError> {
        if !rem.contains_key("job_type") {
            return Err(QChemInputError::MissingRemKey("job_type"));
        }
        if !rem.contains_key("basis") {
            return Err(QChemInputError::MissingRemKey("basis"));
        }
        if !rem.contains_key("method") && !rem.contains_key("exchange") {
            return Err(QChemInputError::MissingRemKey("method"));
        }
        Ok(Self {
            molecule,
            rem,
            smx: None,
            geom_opt: None,
        })
    }

    pub fn with_smx(mut self, smx: ParameterSection) -> Self {
        self.smx = (!smx.is_empty()).then_some(smx);
        self
    }

    pub fn with_geom_opt(mut self, geom_opt: ParameterSection) -> Self {
        self.geom_opt = (!geom_opt.is_empty()).then_some(geom_opt);
        self
    }

    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    pub fn rem(&self) -> &ParameterSection {
        &self.rem
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("$molecule\n");
        out.push_str(&format!(
            " {} {}\n",
            self.molecule.charge(),
            self.molecule.spin_multiplicity()
        ));
        for atom in self.molecule.atoms() {
            out.push_str(&format!(
                " {}     {}     {}     {}\n",
                atom.element.symbol(),
                signed_coordinate(atom.position.x),
                signed_coordinate(atom.position.y),
                signed_coordinate(atom.position.z)
            ));
        }
        out.push_str("$end\n\n");

        self.rem.render("rem", &mut out);
        if let Some(smx) = &self.smx {
            out.push('\n');
            smx.render("smx", &mut out);
        }
        if let Some(geom_opt) = &self.geom_opt {
            out.push('\n');
            geom_opt.render("geom_opt", &mut out);
        }
        out
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), QChemInputError> {
        std::fs::write(path, self.render()).map_err(|e| QChemInputError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

impl fmt::Display for QChemInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
