//! Readers for the plain-text integral files
//!
//! Every file is a whitespace separated list of numbers. One-electron and
//! two-electron files come in two layouts, see [`IntegralFormat`]. Orbital
//! indices in the indexed layout are 1-based.

use crate::eri::TwoElectronIntegrals;
use crate::error::IntegralError;
use crate::molecule::Atom;
use nalgebra::{DMatrix, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Layout of the one- and two-electron integral files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegralFormat {
    /// Bare values: nao^2 row-major entries for a matrix, or the packed
    /// two-electron array in quad-index order.
    #[default]
    Flat,
    /// One record per line, `mu nu value` or `mu nu lambda sigma value`.
    Indexed,
}

/// Locations of the files that make up one data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralSources {
    #[serde(default)]
    pub format: IntegralFormat,
    pub geometry: PathBuf,
    /// Optional file with the nuclear repulsion energy; computed from the
    /// geometry when absent.
    #[serde(default)]
    pub nuclear_repulsion: Option<PathBuf>,
    pub overlap: PathBuf,
    pub kinetic: PathBuf,
    pub potential: PathBuf,
    pub two_electron: PathBuf,
}

impl IntegralSources {
    /// Make relative paths relative to `base` instead of the working directory.
    pub fn resolve_against(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.geometry);
        join(&mut self.overlap);
        join(&mut self.kinetic);
        join(&mut self.potential);
        join(&mut self.two_electron);
        if let Some(ref mut p) = self.nuclear_repulsion {
            join(p);
        }
        self
    }
}

fn read_text(path: &Path) -> Result<String, IntegralError> {
    fs::read_to_string(path).map_err(|source| IntegralError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Non-empty lines with their 1-based line numbers. `#` starts a comment.
fn records(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> + '_ {
    text.lines().enumerate().filter_map(|(n, line)| {
        let content = line.split('#').next().unwrap_or("");
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.is_empty() {
            None
        } else {
            Some((n + 1, tokens))
        }
    })
}

fn parse_real(path: &Path, line: usize, token: &str) -> Result<f64, IntegralError> {
    let value = token
        .parse::<f64>()
        .map_err(|_| IntegralError::format(path, Some(line), format!("'{}' is not a number", token)))?;
    if !value.is_finite() {
        return Err(IntegralError::format(
            path,
            Some(line),
            format!("'{}' is not a finite number", token),
        ));
    }
    Ok(value)
}

/// Parse a 1-based orbital index and shift it to 0-based.
fn parse_orbital(path: &Path, line: usize, token: &str, nao: usize) -> Result<usize, IntegralError> {
    let index = token
        .parse::<usize>()
        .map_err(|_| IntegralError::format(path, Some(line), format!("'{}' is not an orbital index", token)))?;
    if index == 0 || index > nao {
        return Err(IntegralError::format(
            path,
            Some(line),
            format!("orbital index {} outside 1..={}", index, nao),
        ));
    }
    Ok(index - 1)
}

fn flat_values(path: &Path, text: &str) -> Result<Vec<f64>, IntegralError> {
    let mut values = Vec::new();
    for (line, tokens) in records(text) {
        for token in tokens {
            values.push(parse_real(path, line, token)?);
        }
    }
    Ok(values)
}

fn expect_fields(path: &Path, line: usize, tokens: &[&str], n: usize) -> Result<(), IntegralError> {
    if tokens.len() != n {
        return Err(IntegralError::format(
            path,
            Some(line),
            format!("expected {} fields, found {}", n, tokens.len()),
        ));
    }
    Ok(())
}

pub(crate) fn parse_geometry(path: &Path, text: &str) -> Result<Vec<Atom>, IntegralError> {
    let mut lines = records(text);
    let (line, header) = lines
        .next()
        .ok_or_else(|| IntegralError::format(path, None, "empty geometry file"))?;
    expect_fields(path, line, &header, 1)?;
    let natom = header[0]
        .parse::<usize>()
        .map_err(|_| IntegralError::format(path, Some(line), format!("'{}' is not an atom count", header[0])))?;

    let mut atoms = Vec::with_capacity(natom);
    for (line, tokens) in lines {
        expect_fields(path, line, &tokens, 4)?;
        let charge = parse_real(path, line, tokens[0])?;
        let x = parse_real(path, line, tokens[1])?;
        let y = parse_real(path, line, tokens[2])?;
        let z = parse_real(path, line, tokens[3])?;
        atoms.push(Atom::new(charge, Vector3::new(x, y, z)));
    }

    if atoms.len() != natom {
        return Err(IntegralError::format(
            path,
            None,
            format!("header announces {} atoms but {} were listed", natom, atoms.len()),
        ));
    }
    Ok(atoms)
}

pub(crate) fn parse_scalar(path: &Path, text: &str) -> Result<f64, IntegralError> {
    let values = flat_values(path, text)?;
    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(IntegralError::format(
            path,
            None,
            format!("expected a single value, found {}", values.len()),
        )),
    }
}

pub(crate) fn parse_one_electron(
    path: &Path,
    text: &str,
    nao: usize,
    format: IntegralFormat,
) -> Result<DMatrix<f64>, IntegralError> {
    match format {
        IntegralFormat::Flat => {
            let values = flat_values(path, text)?;
            if values.len() != nao * nao {
                return Err(IntegralError::format(
                    path,
                    None,
                    format!("expected {} values for a {}x{} matrix, found {}", nao * nao, nao, nao, values.len()),
                ));
            }
            Ok(DMatrix::from_row_slice(nao, nao, &values))
        }
        IntegralFormat::Indexed => {
            let mut matrix = DMatrix::zeros(nao, nao);
            for (line, tokens) in records(text) {
                expect_fields(path, line, &tokens, 3)?;
                let mu = parse_orbital(path, line, tokens[0], nao)?;
                let nu = parse_orbital(path, line, tokens[1], nao)?;
                let value = parse_real(path, line, tokens[2])?;
                matrix[(mu, nu)] = value;
                matrix[(nu, mu)] = value;
            }
            Ok(matrix)
        }
    }
}

pub(crate) fn parse_two_electron(
    path: &Path,
    text: &str,
    nao: usize,
    format: IntegralFormat,
) -> Result<TwoElectronIntegrals, IntegralError> {
    match format {
        IntegralFormat::Flat => {
            let values = flat_values(path, text)?;
            TwoElectronIntegrals::from_packed(nao, values).map_err(|e| IntegralError::format(path, None, e.to_string()))
        }
        IntegralFormat::Indexed => {
            let mut eri = TwoElectronIntegrals::zeros(nao);
            for (line, tokens) in records(text) {
                expect_fields(path, line, &tokens, 5)?;
                let i = parse_orbital(path, line, tokens[0], nao)?;
                let j = parse_orbital(path, line, tokens[1], nao)?;
                let k = parse_orbital(path, line, tokens[2], nao)?;
                let l = parse_orbital(path, line, tokens[3], nao)?;
                let value = parse_real(path, line, tokens[4])?;
                eri.set(i, j, k, l, value);
            }
            Ok(eri)
        }
    }
}

/// Atom count followed by one `Z x y z` record per atom (bohr).
pub fn read_geometry(path: &Path) -> Result<Vec<Atom>, IntegralError> {
    parse_geometry(path, &read_text(path)?)
}

pub fn read_scalar(path: &Path) -> Result<f64, IntegralError> {
    parse_scalar(path, &read_text(path)?)
}

pub fn read_one_electron(path: &Path, nao: usize, format: IntegralFormat) -> Result<DMatrix<f64>, IntegralError> {
    parse_one_electron(path, &read_text(path)?, nao, format)
}

pub fn read_two_electron(
    path: &Path,
    nao: usize,
    format: IntegralFormat,
) -> Result<TwoElectronIntegrals, IntegralError> {
    parse_two_electron(path, &read_text(path)?, nao, format)
}
