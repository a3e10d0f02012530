//! Parser for the ACS sequence/table-number lookup file.
//!
//! The lookup file drives everything downstream: it yields the logical
//! table metadata (grouped by table id) and the physical column layout of
//! every sequence table (the same rows regrouped by sequence number).

use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AcsError, Result};

/// Length of the "Universe:  " label prefixing every universe row title.
const UNIVERSE_LABEL_LEN: usize = 11;

#[derive(Debug, Deserialize)]
struct LookupRecord {
    #[serde(rename = "Sequence Number")]
    sequence_number: String,
    #[serde(rename = "Table ID")]
    table_id: String,
    #[serde(rename = "Table Title")]
    table_title: String,
    #[serde(rename = "Subject Area")]
    subject_area: String,
    #[serde(rename = "Line Number")]
    line_number: String,
}

/// One reportable column of a logical table.
#[derive(Debug, Clone)]
pub struct ColumnMetadata {
    pub sequence_number: u32,
    pub table_id: String,
    pub line_number: u32,
    pub column_id: String,
    pub column_title: String,
}

/// One logical census table with its ordered column list.
#[derive(Debug, Clone)]
pub struct TableMetadata {
    pub table_id: String,
    pub table_title: String,
    pub subject_area: String,
    pub universe: String,
    pub columns: Vec<ColumnMetadata>,
}

/// The reportable column ids a physical sequence carries, in lookup order.
#[derive(Debug, Clone)]
pub struct SequenceGroup {
    pub number: u32,
    pub column_ids: Vec<String>,
}

/// Everything derived from one pass over the lookup file. Immutable once
/// built; the schema builder and data loader only read from it.
#[derive(Debug)]
pub struct Lookup {
    pub tables: Vec<TableMetadata>,
    pub sequences: Vec<SequenceGroup>,
}

/// Read the lookup file and run both grouping passes over it.
pub fn read_lookup(path: &Path) -> Result<Lookup> {
    parse_lookup(csv::Reader::from_path(path)?)
}

fn parse_lookup<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Lookup> {
    let records: Vec<LookupRecord> = reader
        .deserialize()
        .collect::<std::result::Result<_, _>>()?;

    Ok(Lookup {
        tables: group_tables(&records)?,
        sequences: group_sequences(&records)?,
    })
}

/// Synthesize the globally unique column id: table id plus the zero-padded
/// three-digit line number.
pub fn column_id(table_id: &str, line_number: u32) -> String {
    format!("{}{:03}", table_id, line_number)
}

/// Order-preserving group-by. Rows with the same key merge into one group
/// even when they are not adjacent, so the result does not depend on the
/// source file being pre-sorted.
fn group_by<'a, K, F>(records: &'a [LookupRecord], key: F) -> Vec<(K, Vec<&'a LookupRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&LookupRecord) -> K,
{
    let mut groups: Vec<(K, Vec<&LookupRecord>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![record]));
            }
        }
    }

    groups
}

fn group_tables(records: &[LookupRecord]) -> Result<Vec<TableMetadata>> {
    let mut tables = Vec::new();

    for (table_id, rows) in group_by(records, |r| r.table_id.clone()) {
        // First row carries the title, second the universe label.
        let [title_row, universe_row, ..] = rows.as_slice() else {
            return Err(AcsError::TruncatedTable { table_id });
        };
        let universe = universe_row
            .table_title
            .get(UNIVERSE_LABEL_LEN..)
            .unwrap_or("")
            .to_string();

        let mut columns = Vec::new();
        for row in &rows[2..] {
            // `.5` line numbers label median annotations; blanks mark a
            // table continuing into another sequence. Neither is a column.
            if row.line_number.is_empty() || row.line_number.ends_with(".5") {
                continue;
            }
            let line_number = parse_line_number(&table_id, &row.line_number)?;
            columns.push(ColumnMetadata {
                sequence_number: parse_sequence_number(&row.sequence_number)?,
                table_id: table_id.clone(),
                line_number,
                column_id: column_id(&table_id, line_number),
                column_title: row.table_title.clone(),
            });
        }

        tables.push(TableMetadata {
            table_id: table_id.clone(),
            table_title: title_row.table_title.clone(),
            subject_area: title_row.subject_area.clone(),
            universe,
            columns,
        });
    }

    Ok(tables)
}

fn group_sequences(records: &[LookupRecord]) -> Result<Vec<SequenceGroup>> {
    let mut sequences = Vec::new();

    for (raw_number, rows) in group_by(records, |r| r.sequence_number.clone()) {
        let number = parse_sequence_number(&raw_number)?;

        let mut column_ids = Vec::new();
        for row in rows {
            // Only whole line numbers become physical columns.
            if row.line_number.is_empty() || row.line_number.contains('.') {
                continue;
            }
            let line_number = parse_line_number(&row.table_id, &row.line_number)?;
            column_ids.push(column_id(&row.table_id, line_number));
        }

        sequences.push(SequenceGroup { number, column_ids });
    }

    Ok(sequences)
}

fn parse_line_number(table_id: &str, raw: &str) -> Result<u32> {
    raw.parse().map_err(|_| AcsError::BadLineNumber {
        table_id: table_id.to_string(),
        value: raw.to_string(),
    })
}

fn parse_sequence_number(raw: &str) -> Result<u32> {
    raw.parse().map_err(|_| AcsError::BadSequenceNumber {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP: &str = "\
Table ID,Sequence Number,Line Number,Table Title,Subject Area
B01001,1,,SEX BY AGE,Age-Sex
B01001,1,,Universe:  Total population,
B01001,1,1,Total:,
B01001,1,2,Male:,
B01001,1,2.5,Median age,
B01001,1,3,Female:,
B19013,1,,MEDIAN HOUSEHOLD INCOME,Income
B19013,1,,Universe:  Households,
B19013,1,1,Median household income,
B99999,2,,SPANNING TABLE,Test
B99999,2,,Universe:  Things,
B99999,2,1,First:,
B99999,3,2,Second:,
";

    fn parse(text: &str) -> Result<Lookup> {
        parse_lookup(csv::Reader::from_reader(text.as_bytes()))
    }

    #[test]
    fn test_groups_tables() {
        let lookup = parse(LOOKUP).unwrap();
        assert_eq!(lookup.tables.len(), 3);

        let b01001 = &lookup.tables[0];
        assert_eq!(b01001.table_id, "B01001");
        assert_eq!(b01001.table_title, "SEX BY AGE");
        assert_eq!(b01001.subject_area, "Age-Sex");
        assert_eq!(b01001.universe, "Total population");

        // 2.5 (median annotation) is excluded; 1, 2, 3 survive.
        let ids: Vec<_> = b01001.columns.iter().map(|c| c.column_id.as_str()).collect();
        assert_eq!(ids, ["B01001001", "B01001002", "B01001003"]);
    }

    #[test]
    fn test_zero_padded_column_ids() {
        assert_eq!(column_id("B19013", 1), "B19013001");
        assert_eq!(column_id("B01001", 49), "B01001049");
        assert_eq!(column_id("C02003", 123), "C02003123");
    }

    #[test]
    fn test_groups_sequences_in_first_seen_order() {
        let lookup = parse(LOOKUP).unwrap();
        let numbers: Vec<_> = lookup.sequences.iter().map(|s| s.number).collect();
        assert_eq!(numbers, [1, 2, 3]);

        // Sequence 1 serves two logical tables.
        assert_eq!(
            lookup.sequences[0].column_ids,
            ["B01001001", "B01001002", "B01001003", "B19013001"]
        );
        assert_eq!(lookup.sequences[1].column_ids, ["B99999001"]);
        assert_eq!(lookup.sequences[2].column_ids, ["B99999002"]);
    }

    #[test]
    fn test_table_spanning_sequences() {
        let lookup = parse(LOOKUP).unwrap();
        let spanning = &lookup.tables[2];
        assert_eq!(spanning.table_id, "B99999");
        let seqs: Vec<_> = spanning.columns.iter().map(|c| c.sequence_number).collect();
        assert_eq!(seqs, [2, 3]);
    }

    #[test]
    fn test_merges_noncontiguous_groups() {
        let text = "\
Table ID,Sequence Number,Line Number,Table Title,Subject Area
B00001,1,,TABLE ONE,A
B00001,1,,Universe:  One,
B00002,1,,TABLE TWO,B
B00002,1,,Universe:  Two,
B00001,1,1,Total:,
";
        let lookup = parse(text).unwrap();
        assert_eq!(lookup.tables.len(), 2);
        assert_eq!(lookup.tables[0].columns.len(), 1);
        assert_eq!(lookup.tables[0].columns[0].column_id, "B00001001");
    }

    #[test]
    fn test_bad_line_number_is_fatal() {
        let text = "\
Table ID,Sequence Number,Line Number,Table Title,Subject Area
B00001,1,,TABLE ONE,A
B00001,1,,Universe:  One,
B00001,1,abc,Total:,
";
        assert!(matches!(
            parse(text),
            Err(AcsError::BadLineNumber { .. })
        ));
    }

    #[test]
    fn test_table_block_needs_two_rows() {
        let text = "\
Table ID,Sequence Number,Line Number,Table Title,Subject Area
B00001,1,,TABLE ONE,A
";
        assert!(matches!(
            parse(text),
            Err(AcsError::TruncatedTable { .. })
        ));
    }

    #[test]
    fn test_short_universe_row_yields_empty_universe() {
        let text = "\
Table ID,Sequence Number,Line Number,Table Title,Subject Area
B00001,1,,TABLE ONE,A
B00001,1,,Short,
";
        let lookup = parse(text).unwrap();
        assert_eq!(lookup.tables[0].universe, "");
    }
}
