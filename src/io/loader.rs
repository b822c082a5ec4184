//! TSPLIB-style CVRP instance parsing.
//!
//! Recognised lines:
//!
//! ```text
//! DIMENSION : <n>          node count including the depot
//! CAPACITY : <q>           vehicle capacity
//! NODE_COORD_SECTION       then "<id> <x> <y>" per node, ids 1-based
//! DEMAND_SECTION           then "<id> <demand>" per node
//! EOF                      end of input
//! ```
//!
//! Everything else is ignored. Section lines that do not parse, whose id
//! falls outside `1..=DIMENSION`, whose coordinates are not finite or exceed
//! [`MAX_COORDINATE`] in magnitude, or whose demand is negative, are skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Instance, Node};

/// Errors raised while loading an instance.
#[derive(Debug)]
pub enum InstanceError {
    /// The file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A required header never appeared.
    MissingField(&'static str),
    /// A header was present but its value did not parse.
    InvalidHeader { field: &'static str, value: String },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            InstanceError::MissingField(field) => write!(f, "missing {field} header"),
            InstanceError::InvalidHeader { field, value } => {
                write!(f, "invalid {field} value {value:?}")
            }
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstanceError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Largest accepted coordinate magnitude.
pub const MAX_COORDINATE: f64 = 1e9;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Coords,
    Demands,
}

/// Reads and parses an instance file.
pub fn load_instance<P: AsRef<Path>>(path: P) -> Result<Instance, InstanceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| InstanceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_instance(&text)
}

/// Parses instance text.
///
/// Nodes are re-indexed from 0 (file id − 1); node 0 is the depot and its
/// demand is forced to zero. Nodes missing from a section keep coordinates
/// `(0, 0)` or demand 0.
///
/// # Examples
///
/// ```
/// use u_cvrp::io::parse_instance;
///
/// let text = "\
/// NAME : tiny
/// DIMENSION : 3
/// CAPACITY : 50
/// NODE_COORD_SECTION
/// 1 0 0
/// 2 3 4
/// 3 6 8
/// DEMAND_SECTION
/// 1 0
/// 2 10
/// 3 20
/// EOF
/// ";
/// let instance = parse_instance(text).unwrap();
/// assert_eq!(instance.dimension(), 3);
/// assert_eq!(instance.capacity(), 50);
/// assert_eq!(instance.demand(2), 20);
/// assert_eq!(instance.dist(0, 2), 10);
/// ```
pub fn parse_instance(text: &str) -> Result<Instance, InstanceError> {
    let mut dimension: Option<usize> = None;
    let mut capacity: Option<i32> = None;
    let mut coords: Vec<(f64, f64)> = Vec::new();
    let mut demands: Vec<i32> = Vec::new();
    let mut section = Section::Header;

    for line in text.lines() {
        let line = line.trim();
        if line.starts_with("EOF") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        if line.starts_with("NODE_COORD_SECTION") {
            section = Section::Coords;
            continue;
        }
        if line.starts_with("DEMAND_SECTION") {
            section = Section::Demands;
            continue;
        }
        if line.starts_with("DIMENSION") {
            let n: usize = header_value(line, "DIMENSION")?;
            if n == 0 {
                return Err(InstanceError::InvalidHeader {
                    field: "DIMENSION",
                    value: "0".to_string(),
                });
            }
            coords = vec![(0.0, 0.0); n];
            demands = vec![0; n];
            dimension = Some(n);
            continue;
        }
        if line.starts_with("CAPACITY") {
            capacity = Some(header_value(line, "CAPACITY")?);
            continue;
        }

        match section {
            Section::Header => {}
            Section::Coords => match parse_coord(line, coords.len()) {
                Some((idx, x, y)) => coords[idx] = (x, y),
                None => log::debug!("skipping coordinate line {line:?}"),
            },
            Section::Demands => match parse_demand(line, demands.len()) {
                Some((idx, d)) => demands[idx] = d,
                None => log::debug!("skipping demand line {line:?}"),
            },
        }
    }

    let dimension = dimension.ok_or(InstanceError::MissingField("DIMENSION"))?;
    let capacity = capacity.ok_or(InstanceError::MissingField("CAPACITY"))?;

    let nodes: Vec<Node> = (0..dimension)
        .map(|i| {
            let (x, y) = coords[i];
            if i == 0 {
                Node::depot(x, y)
            } else {
                Node::new(i, x, y, demands[i])
            }
        })
        .collect();

    Ok(Instance::new(capacity, nodes))
}

fn parse_coord(line: &str, len: usize) -> Option<(usize, f64, f64)> {
    let mut parts = line.split_whitespace();
    let idx = slot(parts.next()?.parse().ok()?, len)?;
    let x = coordinate(parts.next()?)?;
    let y = coordinate(parts.next()?)?;
    Some((idx, x, y))
}

fn coordinate(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= MAX_COORDINATE)
}

fn parse_demand(line: &str, len: usize) -> Option<(usize, i32)> {
    let mut parts = line.split_whitespace();
    let idx = slot(parts.next()?.parse().ok()?, len)?;
    let demand = parts.next()?.parse::<i32>().ok().filter(|&d| d >= 0)?;
    Some((idx, demand))
}

/// 0-based slot for a 1-based file id, if it is in range.
fn slot(id: usize, len: usize) -> Option<usize> {
    id.checked_sub(1).filter(|&idx| idx < len)
}

/// Parses the value after `:`, or after the keyword if there is no colon.
fn header_value<T: std::str::FromStr>(line: &str, field: &'static str) -> Result<T, InstanceError> {
    let raw = match line.find(':') {
        Some(pos) => &line[pos + 1..],
        None => &line[field.len()..],
    };
    let raw = raw.trim();
    raw.parse().map_err(|_| InstanceError::InvalidHeader {
        field,
        value: raw.to_string(),
    })
}
