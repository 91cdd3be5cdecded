//! Workload traces: parsing recorded traces and generating synthetic ones.
//!
//! # Generators
//! - `random` - uniform over `0..=max_page`
//! - `sequential` - cyclic `0, 1, .., max_page, 0, 1, ..`
//! - `locality` - 80% of steps stay within `max_page / 4` of the current
//!   page (clamped to bounds), 20% jump anywhere
//!
//! Generators take the RNG as a parameter, so a seeded `StdRng` gives a
//! reproducible trace.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use log::warn;
use rand::Rng;

use crate::common::config::{LOCALITY_DIVISOR, LOCALITY_PROBABILITY};
use crate::common::{Error, PageId, Result, TenantId, TenantPage};

/// Synthetic trace shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Random,
    Sequential,
    Locality,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkloadKind::Random => "random",
            WorkloadKind::Sequential => "sequential",
            WorkloadKind::Locality => "locality",
        };
        f.write_str(name)
    }
}

impl FromStr for WorkloadKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(WorkloadKind::Random),
            "sequential" => Ok(WorkloadKind::Sequential),
            "locality" => Ok(WorkloadKind::Locality),
            _ => Err(Error::UnknownWorkloadType(s.to_string())),
        }
    }
}

/// Extract page numbers from delimited text.
///
/// Tokens are separated by whitespace or commas. Anything that isn't a
/// plain non-negative integer (signs, decimals, words) is ignored. Page
/// numbers are `u32`; a digit token above `u32::MAX` is dropped with a
/// warning.
///
/// # Example
/// ```
/// use pagesim::workload::parse_str;
/// use pagesim::PageId;
///
/// let trace = parse_str("1, 2\n3 x -4 5.0,6");
/// assert_eq!(trace, vec![PageId::new(1), PageId::new(2), PageId::new(3), PageId::new(6)]);
/// ```
pub fn parse_str(content: &str) -> Vec<PageId> {
    content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| match token.parse::<u32>() {
            Ok(id) => Some(PageId::new(id)),
            Err(_) => {
                warn!("page number {} out of range, skipping", token);
                None
            }
        })
        .collect()
}

/// Read a trace file.
///
/// # Errors
/// `Error::Io` if the file can't be read.
pub fn read_workload(path: impl AsRef<Path>) -> Result<Vec<PageId>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_str(&content))
}

/// Read a trace file, degrading every failure to an empty trace.
///
/// Callers treat an empty trace as "nothing to simulate".
pub fn parse_workload(path: impl AsRef<Path>) -> Vec<PageId> {
    let path = path.as_ref();
    match read_workload(path) {
        Ok(trace) if trace.is_empty() => {
            warn!(
                "workload file '{}' is empty or has invalid format",
                path.display()
            );
            trace
        }
        Ok(trace) => trace,
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            warn!("workload file not found at '{}'", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("error parsing workload file '{}': {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Generate `length` page references over `0..=max_page`.
pub fn generate<R: Rng>(
    kind: WorkloadKind,
    length: usize,
    max_page: u32,
    rng: &mut R,
) -> Vec<PageId> {
    match kind {
        WorkloadKind::Random => (0..length)
            .map(|_| PageId::new(rng.gen_range(0..=max_page)))
            .collect(),
        WorkloadKind::Sequential => {
            let span = max_page as u64 + 1;
            (0..length as u64)
                .map(|i| PageId::new((i % span) as u32))
                .collect()
        }
        WorkloadKind::Locality => generate_locality(length, max_page, rng),
    }
}

fn generate_locality<R: Rng>(length: usize, max_page: u32, rng: &mut R) -> Vec<PageId> {
    if length == 0 {
        return Vec::new();
    }

    let window = (max_page / LOCALITY_DIVISOR).max(1) as i64;
    let mut current = rng.gen_range(0..=max_page);
    let mut trace = Vec::with_capacity(length);
    trace.push(PageId::new(current));

    for _ in 1..length {
        current = if rng.gen_bool(LOCALITY_PROBABILITY) {
            let offset = rng.gen_range(-window..=window);
            (current as i64 + offset).clamp(0, max_page as i64) as u32
        } else {
            rng.gen_range(0..=max_page)
        };
        trace.push(PageId::new(current));
    }
    trace
}

/// Generate an interleaved trace of `length` requests from `num_processes`
/// tenants (ids `1..=num_processes`).
///
/// Each tenant has its own sub-trace of `length` pages. Every position picks
/// a tenant uniformly and takes its next page; if that tenant has run dry
/// the next tenant (wrapping) is tried once.
///
/// # Errors
/// `Error::InvalidConfiguration` if `num_processes` is 0.
pub fn generate_multiprocess<R: Rng>(
    kind: WorkloadKind,
    length: usize,
    num_processes: usize,
    max_page: u32,
    rng: &mut R,
) -> Result<Vec<TenantPage>> {
    if num_processes == 0 {
        return Err(Error::invalid("number of processes must be positive"));
    }

    let sub_traces: Vec<Vec<PageId>> = (0..num_processes)
        .map(|_| generate(kind, length, max_page, &mut *rng))
        .collect();
    let mut cursors = vec![0usize; num_processes];
    let mut trace = Vec::with_capacity(length);

    for _ in 0..length {
        let chosen = rng.gen_range(0..num_processes);
        let idx = if cursors[chosen] < length {
            chosen
        } else {
            (chosen + 1) % num_processes
        };
        if cursors[idx] < length {
            let page = sub_traces[idx][cursors[idx]];
            trace.push(TenantPage {
                tenant: TenantId::new(idx as u32 + 1),
                page,
            });
            cursors[idx] += 1;
        }
    }

    trace.truncate(length);
    Ok(trace)
}
