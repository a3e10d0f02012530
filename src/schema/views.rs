//! Per-table view plans reassembling logical tables out of the sequence
//! tables their columns are physically scattered across.

use crate::metadata::TableMetadata;

use super::sequence::{moe_table_name, sequence_table_name, MOE_SUFFIX};

/// A projection of `geoid` plus `columns` over `tables`, joined on geoid
/// equality starting from the first table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPlan {
    pub name: String,
    pub columns: Vec<String>,
    pub tables: Vec<String>,
}

/// Plain estimate view. Join order follows the first appearance of each
/// sequence among the table's columns, which keeps rendered definitions
/// reproducible run to run.
pub fn estimate_view(table: &TableMetadata) -> ViewPlan {
    let mut columns = Vec::new();
    let mut tables = Vec::new();

    for column in &table.columns {
        columns.push(column.column_id.clone());
        push_unique(&mut tables, sequence_table_name(column.sequence_number));
    }

    ViewPlan {
        name: table.table_id.clone(),
        columns,
        tables,
    }
}

/// Combined view: each estimate column is followed by its `_moe` twin, and
/// each sequence table by its twin, in the same first-seen order.
pub fn moe_view(table: &TableMetadata) -> ViewPlan {
    let mut columns = Vec::new();
    let mut tables = Vec::new();

    for column in &table.columns {
        columns.push(column.column_id.clone());
        columns.push(format!("{}{}", column.column_id, MOE_SUFFIX));

        let sequence = sequence_table_name(column.sequence_number);
        if !tables.contains(&sequence) {
            tables.push(sequence);
            tables.push(moe_table_name(column.sequence_number));
        }
    }

    ViewPlan {
        name: format!("{}{}", table.table_id, MOE_SUFFIX),
        columns,
        tables,
    }
}

fn push_unique(tables: &mut Vec<String>, name: String) {
    if !tables.contains(&name) {
        tables.push(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ColumnMetadata;

    fn column(table_id: &str, line: u32, sequence: u32) -> ColumnMetadata {
        ColumnMetadata {
            sequence_number: sequence,
            table_id: table_id.to_string(),
            line_number: line,
            column_id: crate::metadata::column_id(table_id, line),
            column_title: String::new(),
        }
    }

    fn table(table_id: &str, columns: Vec<ColumnMetadata>) -> TableMetadata {
        TableMetadata {
            table_id: table_id.to_string(),
            table_title: String::new(),
            subject_area: String::new(),
            universe: String::new(),
            columns,
        }
    }

    #[test]
    fn test_single_sequence_plan() {
        let t = table(
            "B01001",
            vec![column("B01001", 1, 1), column("B01001", 2, 1)],
        );
        let plan = estimate_view(&t);
        assert_eq!(plan.name, "B01001");
        assert_eq!(plan.columns, ["B01001001", "B01001002"]);
        assert_eq!(plan.tables, ["seq0001"]);
    }

    #[test]
    fn test_spanning_plan_keeps_first_seen_order() {
        let t = table(
            "B99999",
            vec![
                column("B99999", 1, 5),
                column("B99999", 2, 2),
                column("B99999", 3, 5),
            ],
        );
        let plan = estimate_view(&t);
        // Sequence 5 appears first among the columns, so it leads the join.
        assert_eq!(plan.tables, ["seq0005", "seq0002"]);
    }

    #[test]
    fn test_moe_plan_interleaves() {
        let t = table(
            "B99999",
            vec![column("B99999", 1, 2), column("B99999", 2, 3)],
        );
        let plan = moe_view(&t);
        assert_eq!(plan.name, "B99999_moe");
        assert_eq!(
            plan.columns,
            ["B99999001", "B99999001_moe", "B99999002", "B99999002_moe"]
        );
        assert_eq!(
            plan.tables,
            ["seq0002", "seq0002_moe", "seq0003", "seq0003_moe"]
        );
    }
}
