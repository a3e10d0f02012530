//! Geography header files: raw row reading and the (state, logrecno) →
//! geoid index every data row is resolved through.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{AcsError, Result};
use crate::schema::tables::{GEO_FIELD_COUNT, GEO_GEOID, GEO_LOGRECNO, GEO_STUSAB};

/// Lookup from (lowercased state abbreviation, logical record number) to
/// the canonical geoid. Built while scanning geography files, then
/// consulted read-only during data loading.
#[derive(Debug, Default)]
pub struct GeoIndex {
    map: HashMap<(String, String), String>,
}

impl GeoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the join key of every geography row.
    pub fn index_rows(&mut self, rows: &[Vec<String>]) {
        for row in rows {
            self.map.insert(
                (
                    row[GEO_STUSAB].to_ascii_lowercase(),
                    row[GEO_LOGRECNO].clone(),
                ),
                row[GEO_GEOID].clone(),
            );
        }
    }

    /// Resolve a data row's geoid. The state abbreviation is lowercased on
    /// this side too, so both halves of the key agree regardless of how a
    /// source file cases it.
    pub fn resolve(&self, stusab: &str, logrecno: &str) -> Result<&str> {
        self.map
            .get(&(stusab.to_ascii_lowercase(), logrecno.to_string()))
            .map(String::as_str)
            .ok_or_else(|| AcsError::UnknownGeography {
                stusab: stusab.to_string(),
                logrecno: logrecno.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Read one geography file. ACS geography extracts are Latin-1 encoded,
/// and every row must carry all 53 positional fields; these records are
/// the foundation of every later join, so a short row is fatal rather
/// than skipped.
pub fn read_geo_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path)?;
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != GEO_FIELD_COUNT {
            return Err(AcsError::FieldCount {
                path: path.display().to_string(),
                expected: GEO_FIELD_COUNT,
                got: record.len(),
            });
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}
