//! Turns one estimate/MOE record into a sequence-table row.

use rusqlite::Statement;

use crate::error::{AcsError, Result};
use crate::geo::GeoIndex;

/// Number of positional header fields leading every estimate/MOE record:
/// fileid, filetype, stusab, chariter, seq, logrecno.
pub const DATA_HEADER_FIELDS: usize = 6;

/// Field position of the sequence number within a data record.
pub const DATA_SEQ_FIELD: usize = 4;

const DATA_STUSAB_FIELD: usize = 2;
const DATA_LOGRECNO_FIELD: usize = 5;

/// A value ready to bind into an insert statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

/// Coerce one measure field. Empty and `.` mark not-applicable or
/// suppressed values and become NULL; anything else must parse as a float.
pub fn parse_measure(raw: &str) -> Result<SqlValue> {
    if raw.is_empty() || raw == "." {
        return Ok(SqlValue::Null);
    }
    raw.parse::<f64>()
        .map(SqlValue::Real)
        .map_err(|_| AcsError::BadValue {
            value: raw.to_string(),
        })
}

/// Extract the sequence number that routes a record to its table.
pub fn record_sequence(record: &csv::StringRecord) -> Result<u32> {
    let raw = record.get(DATA_SEQ_FIELD).unwrap_or("");
    raw.parse().map_err(|_| AcsError::BadSequenceNumber {
        value: raw.to_string(),
    })
}

/// Map one estimate/MOE record onto a sequence-table row: the six header
/// fields as text, the geoid resolved through the geography index, then
/// every measure with null sentinels coerced.
pub fn parse_data_record(
    path: &str,
    record: &csv::StringRecord,
    geo: &GeoIndex,
) -> Result<Vec<SqlValue>> {
    if record.len() < DATA_HEADER_FIELDS {
        return Err(AcsError::FieldCount {
            path: path.to_string(),
            expected: DATA_HEADER_FIELDS,
            got: record.len(),
        });
    }

    let geoid = geo
        .resolve(&record[DATA_STUSAB_FIELD], &record[DATA_LOGRECNO_FIELD])?
        .to_string();

    let mut values: Vec<SqlValue> = record
        .iter()
        .take(DATA_HEADER_FIELDS)
        .map(|field| SqlValue::Text(field.to_string()))
        .collect();
    values.push(SqlValue::Text(geoid));
    for field in record.iter().skip(DATA_HEADER_FIELDS) {
        values.push(parse_measure(field)?);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{GEO_FIELD_COUNT, GEO_GEOID, GEO_LOGRECNO, GEO_STUSAB};

    fn index() -> GeoIndex {
        let mut row = vec![String::new(); GEO_FIELD_COUNT];
        row[GEO_STUSAB] = "AL".into();
        row[GEO_LOGRECNO] = "0000001".into();
        row[GEO_GEOID] = "04000US01".into();

        let mut geo = GeoIndex::new();
        geo.index_rows(&[row]);
        geo
    }

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_null_sentinels() {
        assert_eq!(parse_measure("").unwrap(), SqlValue::Null);
        assert_eq!(parse_measure(".").unwrap(), SqlValue::Null);
        assert_eq!(parse_measure("1234").unwrap(), SqlValue::Real(1234.0));
        assert_eq!(parse_measure("-2.5").unwrap(), SqlValue::Real(-2.5));
    }

    #[test]
    fn test_malformed_measure_is_fatal() {
        assert!(matches!(
            parse_measure("n/a"),
            Err(AcsError::BadValue { .. })
        ));
    }

    #[test]
    fn test_parses_full_record() {
        let rec = record(&[
            "ACSSF", "2018e5", "al", "000", "0001", "0000001", "100", ".", "300",
        ]);
        let values = parse_data_record("e.txt", &rec, &index()).unwrap();

        assert_eq!(values.len(), 10);
        assert_eq!(values[2], SqlValue::Text("al".into()));
        assert_eq!(values[6], SqlValue::Text("04000US01".into()));
        assert_eq!(values[7], SqlValue::Real(100.0));
        assert_eq!(values[8], SqlValue::Null);
        assert_eq!(values[9], SqlValue::Real(300.0));
    }

    #[test]
    fn test_state_casing_does_not_break_lookup() {
        let rec = record(&["ACSSF", "2018e5", "AL", "000", "0001", "0000001", "7"]);
        let values = parse_data_record("e.txt", &rec, &index()).unwrap();
        assert_eq!(values[6], SqlValue::Text("04000US01".into()));
    }

    #[test]
    fn test_unknown_geography_is_fatal() {
        let rec = record(&["ACSSF", "2018e5", "zz", "000", "0001", "0000099", "7"]);
        assert!(matches!(
            parse_data_record("e.txt", &rec, &index()),
            Err(AcsError::UnknownGeography { .. })
        ));
    }

    #[test]
    fn test_short_record_is_fatal() {
        let rec = record(&["ACSSF", "2018e5", "al"]);
        assert!(matches!(
            parse_data_record("e.txt", &rec, &index()),
            Err(AcsError::FieldCount { expected: 6, .. })
        ));
    }

    #[test]
    fn test_record_sequence() {
        let rec = record(&["ACSSF", "2018e5", "al", "000", "0042", "0000001"]);
        assert_eq!(record_sequence(&rec).unwrap(), 42);

        let bad = record(&["ACSSF", "2018e5", "al", "000", "x", "0000001"]);
        assert!(matches!(
            record_sequence(&bad),
            Err(AcsError::BadSequenceNumber { .. })
        ));
    }
}
