use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const USER_INPUT_HEADER: &str = "User input:";
const FINAL_BASIS_ENERGY: &str = "Total energy in the final basis set =";
const TOTAL_ENERGY: &str = "Total energy =";
const OPT_STEP_ENERGY: &str = "Energy is";
const OPT_FINAL_ENERGY: &str = "Final energy is";
const OPT_CONVERGED: &str = "**  OPTIMIZATION CONVERGED  **";
const OPT_MAX_CYCLES: &str = "MAXIMUM OPTIMIZATION CYCLES REACHED";
const SCF_FAILED: &str = "SCF failed to converge";
const STANDARD_ORIENTATION: &str = "Standard Nuclear Orientation (Angstroms)";
const OPTIMIZED_COORDINATES: &str = "Coordinates (Angstroms)";
const MULLIKEN_HEADER: &str = "Mulliken Net Atomic Charges";
const RESP_HEADER: &str = "Merz-Kollman RESP Net Atomic Charges";
const FREQUENCY: &str = "Frequency:";
const JOB_TIME: &str = "Total job time:";
const COMPLETION: &str = "Thank you very much for using Q-Chem";

#[derive(Debug, Error)]
pub enum QChemOutputError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Output contains no job records")]
    Empty,
}

/// Problems Q-Chem reported (or failed to report) while running a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobError {
    OutOfOptCycles,
    ScfFailedToConverge,
    PrematureEnd,
}

/// The parsed contents of one Q-Chem job.
///
/// Geometries are Cartesian coordinates in Angstroms, one `[x, y, z]` per atom
/// in input order. Energies are in Hartree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QChemOutput {
    pub completion: bool,
    pub errors: Vec<JobError>,
    pub job_type: Option<String>,
    pub method: Option<String>,
    pub basis: Option<String>,
    pub charge: Option<i32>,
    pub multiplicity: Option<u32>,
    pub species: Vec<String>,
    pub initial_geometry: Vec<[f64; 3]>,
    pub rem: BTreeMap<String, String>,
    pub scf_energies: Vec<f64>,
    pub energy_trajectory: Vec<f64>,
    pub final_energy: Option<f64>,
    pub optimization_converged: Option<bool>,
    pub geometries: Vec<Vec<[f64; 3]>>,
    pub optimized_geometry: Option<Vec<[f64; 3]>>,
    pub mulliken_charges: Option<Vec<f64>>,
    pub resp_charges: Option<Vec<f64>>,
    pub frequencies: Vec<f64>,
    pub walltime_seconds: Option<f64>,
    pub cputime_seconds: Option<f64>,
}

fn parse_error(line: usize, message: impl Into<String>) -> QChemOutputError {
    QChemOutputError::Parse {
        line,
        message: message.into(),
    }
}

/// Parses a finite number. `NaN` and `inf` are errors because JSON has no
/// representation for them.
fn parse_f64(value: &str, line: usize) -> Result<f64, QChemOutputError> {
    let value = value.trim();
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(parse_error(line, format!("non-finite number '{value}'"))),
        Err(_) => Err(parse_error(line, format!("invalid number '{value}'"))),
    }
}

fn is_dashed(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 4 && t.chars().all(|c| c == '-')
}

/// True for the `Running Job 2 of 3 input.qin` banners Q-Chem writes between
/// the jobs of a multi-job input.
fn is_job_separator(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    while tokens.peek() == Some(&"Running") {
        tokens.next();
    }
    matches!(
        (tokens.next(), tokens.next(), tokens.next(), tokens.next()),
        (Some("Job"), Some(i), Some("of"), Some(n))
            if i.parse::<usize>().is_ok() && n.parse::<usize>().is_ok()
    )
}

/// Splits the lines of a multi-job output into per-job slices, paired with
/// the 1-based line number each slice starts at.
///
/// Separator banners are dropped. A whitespace-only leading chunk (text before
/// the first banner) is discarded; anything else before it counts as a job.
pub fn split_jobs<'a>(lines: &'a [&'a str]) -> Vec<(usize, &'a [&'a str])> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, line) in lines.iter().enumerate() {
        if is_job_separator(line) {
            chunks.push((start, &lines[start..i]));
            start = i + 1;
        }
    }
    chunks.push((start, &lines[start..]));

    let blank_preamble = chunks.len() > 1 && chunks[0].1.iter().all(|l| l.trim().is_empty());
    if blank_preamble {
        chunks.remove(0);
    }
    chunks
        .into_iter()
        .map(|(offset, chunk)| (offset + 1, chunk))
        .collect()
}

/// Reads rows between the first dashed rule at or after `start` and the
/// following dashed rule. Returns the rows (with line numbers) and the index
/// just past the closing rule.
fn dashed_table<'a>(lines: &[&'a str], start: usize) -> (Vec<(usize, &'a str)>, usize) {
    let mut i = start;
    while i < lines.len() && !is_dashed(lines[i]) {
        i += 1;
    }
    i += 1;
    let mut rows = Vec::new();
    while i < lines.len() && !is_dashed(lines[i]) {
        if !lines[i].trim().is_empty() {
            rows.push((i, lines[i]));
        }
        i += 1;
    }
    (rows, i + 1)
}

impl QChemOutput {
    pub fn from_path(path: &Path) -> Result<Self, QChemOutputError> {
        let text = read_text(path)?;
        Self::parse(&text)
    }

    /// Parses every job record in a file that may hold several concatenated jobs.
    pub fn multiple_from_path(path: &Path) -> Result<Vec<Self>, QChemOutputError> {
        let text = read_text(path)?;
        Self::parse_multiple(&text)
    }

    pub fn parse(text: &str) -> Result<Self, QChemOutputError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(QChemOutputError::Empty);
        }
        Self::parse_lines(&lines, 1)
    }

    pub fn parse_multiple(text: &str) -> Result<Vec<Self>, QChemOutputError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(QChemOutputError::Empty);
        }
        split_jobs(&lines)
            .into_iter()
            .map(|(first_line, chunk)| Self::parse_lines(chunk, first_line))
            .collect()
    }

    fn parse_lines(lines: &[&str], first_line: usize) -> Result<Self, QChemOutputError> {
        let mut out = Self::default();
        let line_no = |i: usize| first_line + i;
        let mut converged_seen = false;
        let mut i = 0;

        while i < lines.len() {
            let raw = lines[i];
            let line = raw.trim();

            if line == USER_INPUT_HEADER {
                i = out.parse_user_input(lines, i + 1, first_line)?;
                continue;
            }
            if let Some(rest) = line.strip_prefix(FINAL_BASIS_ENERGY) {
                out.scf_energies.push(parse_f64(rest, line_no(i))?);
            } else if let Some(rest) = line.strip_prefix(TOTAL_ENERGY) {
                out.scf_energies.push(parse_f64(rest, line_no(i))?);
            } else if let Some(rest) = line.strip_prefix(OPT_FINAL_ENERGY) {
                out.final_energy = Some(parse_f64(rest, line_no(i))?);
            } else if let Some(rest) = line.strip_prefix(OPT_STEP_ENERGY) {
                out.energy_trajectory.push(parse_f64(rest, line_no(i))?);
            } else if line.contains(OPT_CONVERGED) {
                converged_seen = true;
                out.optimization_converged = Some(true);
            } else if line.contains(OPT_MAX_CYCLES) {
                out.optimization_converged = Some(false);
                out.push_error(JobError::OutOfOptCycles);
            } else if line.contains(SCF_FAILED) {
                out.push_error(JobError::ScfFailedToConverge);
            } else if line == STANDARD_ORIENTATION {
                let (rows, next) = dashed_table(lines, i + 1);
                let geometry = rows
                    .iter()
                    .map(|(j, row)| parse_geometry_row(row, line_no(*j)))
                    .collect::<Result<Vec<_>, _>>()?;
                out.geometries.push(geometry);
                i = next;
                continue;
            } else if line == OPTIMIZED_COORDINATES && converged_seen {
                let (geometry, next) = parse_optimized_block(lines, i + 1, first_line)?;
                out.optimized_geometry = Some(geometry);
                i = next;
                continue;
            } else if line.contains(MULLIKEN_HEADER) {
                let (charges, next) = parse_charge_table(lines, i + 1, first_line)?;
                out.mulliken_charges = Some(charges);
                i = next;
                continue;
            } else if line.contains(RESP_HEADER) {
                let (charges, next) = parse_charge_table(lines, i + 1, first_line)?;
                out.resp_charges = Some(charges);
                i = next;
                continue;
            } else if let Some(rest) = line.strip_prefix(FREQUENCY) {
                for value in rest.split_whitespace() {
                    out.frequencies.push(parse_f64(value, line_no(i))?);
                }
            } else if let Some(rest) = line.strip_prefix(JOB_TIME) {
                out.parse_job_time(rest, line_no(i))?;
            } else if line.contains(COMPLETION) {
                out.completion = true;
            }
            i += 1;
        }

        if out.final_energy.is_none() {
            out.final_energy = out.scf_energies.last().copied();
        }
        if out.optimization_converged.is_none()
            && out.job_type.as_deref().is_some_and(|t| t == "opt" || t == "optimization")
        {
            out.optimization_converged = Some(false);
        }
        if !out.completion && out.errors.is_empty() {
            out.errors.push(JobError::PrematureEnd);
        }
        Ok(out)
    }

    fn push_error(&mut self, error: JobError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    /// Reads the echoed input between the dashed rules after `User input:`.
    fn parse_user_input(
        &mut self,
        lines: &[&str],
        start: usize,
        first_line: usize,
    ) -> Result<usize, QChemOutputError> {
        let mut i = start;
        if i < lines.len() && is_dashed(lines[i]) {
            i += 1;
        }
        let mut section: Option<String> = None;
        let mut molecule_header_seen = false;

        while i < lines.len() && !is_dashed(lines[i]) {
            let line = lines[i].split('!').next().unwrap_or("").trim();
            let lower = line.to_ascii_lowercase();
            i += 1;
            if line.is_empty() {
                continue;
            }
            if lower == "$end" {
                section = None;
                continue;
            }
            if let Some(name) = lower.strip_prefix('$') {
                section = Some(name.to_string());
                molecule_header_seen = false;
                continue;
            }

            match section.as_deref() {
                Some("molecule") if !molecule_header_seen => {
                    molecule_header_seen = true;
                    let fields: Vec<&str> = line.split_whitespace().collect();
                    if let [charge, multiplicity] = fields[..] {
                        self.charge = charge.parse().ok();
                        self.multiplicity = multiplicity.parse().ok();
                    }
                }
                Some("molecule") => {
                    let line_num = first_line + i - 1;
                    let fields: Vec<&str> = line.split_whitespace().collect();
                    if fields.len() < 4 {
                        return Err(parse_error(line_num, "malformed $molecule atom line"));
                    }
                    self.species.push(fields[0].to_string());
                    self.initial_geometry.push([
                        parse_f64(fields[1], line_num)?,
                        parse_f64(fields[2], line_num)?,
                        parse_f64(fields[3], line_num)?,
                    ]);
                }
                Some("rem") => {
                    let (key, value) = match line.split_once('=') {
                        Some((k, v)) => (k.trim(), v.trim()),
                        None => line.split_once(char::is_whitespace).map_or((line, ""), |(k, v)| {
                            (k.trim(), v.trim())
                        }),
                    };
                    let key = key.to_ascii_lowercase();
                    let value = value.to_ascii_lowercase();
                    match key.as_str() {
                        "job_type" | "jobtype" => self.job_type = Some(value.clone()),
                        "method" | "exchange" if self.method.is_none() || key == "method" => {
                            self.method = Some(value.clone())
                        }
                        "basis" => self.basis = Some(value.clone()),
                        _ => {}
                    }
                    self.rem.insert(key, value);
                }
                _ => {}
            }
        }
        Ok(i + 1)
    }

    fn parse_job_time(&mut self, rest: &str, line: usize) -> Result<(), QChemOutputError> {
        for part in rest.split(',') {
            let part = part.trim();
            if let Some(wall) = part.strip_suffix("s(wall)") {
                self.walltime_seconds = Some(parse_f64(wall, line)?);
            } else if let Some(cpu) = part.strip_suffix("s(cpu)") {
                self.cputime_seconds = Some(parse_f64(cpu, line)?);
            }
        }
        Ok(())
    }
}

fn read_text(path: &Path) -> Result<String, QChemOutputError> {
    std::fs::read_to_string(path).map_err(|e| QChemOutputError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

/// `I  Atom  X  Y  Z` rows of a standard-orientation table.
fn parse_geometry_row(row: &str, line: usize) -> Result<[f64; 3], QChemOutputError> {
    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(parse_error(line, "malformed geometry row"));
    }
    Ok([
        parse_f64(fields[2], line)?,
        parse_f64(fields[3], line)?,
        parse_f64(fields[4], line)?,
    ])
}

/// The coordinate block printed after `OPTIMIZATION CONVERGED`: a column
/// header line, then `index symbol x y z` rows until the first line that is
/// not a row.
fn parse_optimized_block(
    lines: &[&str],
    start: usize,
    first_line: usize,
) -> Result<(Vec<[f64; 3]>, usize), QChemOutputError> {
    let mut i = start;
    if i < lines.len() && lines[i].trim().starts_with("ATOM") {
        i += 1;
    }
    let mut geometry = Vec::new();
    while i < lines.len() {
        let fields: Vec<&str> = lines[i].split_whitespace().collect();
        if fields.len() < 5 || fields[0].parse::<usize>().is_err() {
            break;
        }
        geometry.push(parse_geometry_row(lines[i], first_line + i)?);
        i += 1;
    }
    Ok((geometry, i))
}

/// `index symbol charge [spin]` rows of a population-analysis table.
fn parse_charge_table(
    lines: &[&str],
    start: usize,
    first_line: usize,
) -> Result<(Vec<f64>, usize), QChemOutputError> {
    let (rows, next) = dashed_table(lines, start);
    let charges = rows
        .iter()
        .map(|(j, row)| {
            let fields: Vec<&str> = row.split_whitespace().collect();
            if fields.len() < 3 {
                return Err(parse_error(first_line + j, "malformed charge row"));
            }
            parse_f64(fields[2], first_line + j)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((charges, next))
}
