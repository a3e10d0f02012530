//! Derived per-sequence estimate and margin-of-error table schemas.

use crate::metadata::SequenceGroup;

use super::types::{Column, ColumnType, TableSchema};

/// Suffix distinguishing margin-of-error twins from estimate tables.
pub const MOE_SUFFIX: &str = "_moe";

pub fn sequence_table_name(number: u32) -> String {
    format!("seq{:04}", number)
}

pub fn moe_table_name(number: u32) -> String {
    format!("seq{:04}{}", number, MOE_SUFFIX)
}

/// The fixed header prefix every sequence table starts with. `geoid` is
/// the primary key, so a sequence table holds at most one row per
/// geography.
fn header_columns() -> Vec<Column> {
    vec![
        Column::new("fileid", ColumnType::Text),
        Column::new("filetype", ColumnType::Text),
        Column::new("stusab", ColumnType::Text),
        Column::new("chariter", ColumnType::Text),
        Column::new("seq", ColumnType::Text),
        Column::new("logrecno", ColumnType::Integer),
        Column::new("geoid", ColumnType::Text),
    ]
}

/// Estimate table: the header prefix plus one REAL column per reportable
/// line of the sequence.
pub fn estimate_schema(group: &SequenceGroup) -> TableSchema {
    let mut columns = header_columns();
    columns.extend(
        group
            .column_ids
            .iter()
            .map(|id| Column::new(id.clone(), ColumnType::Real)),
    );

    TableSchema {
        name: sequence_table_name(group.number),
        columns,
        primary_key: Some("geoid".into()),
    }
}

/// Margin-of-error twin: the same columns with `_moe` suffixed to every
/// derived column.
pub fn moe_schema(group: &SequenceGroup) -> TableSchema {
    let mut columns = header_columns();
    columns.extend(
        group
            .column_ids
            .iter()
            .map(|id| Column::new(format!("{}{}", id, MOE_SUFFIX), ColumnType::Real)),
    );

    TableSchema {
        name: moe_table_name(group.number),
        columns,
        primary_key: Some("geoid".into()),
    }
}
