//! The fixed relations: census table/column metadata and the geography
//! header, which every sequence table joins against by geoid.

use super::types::{Column, ColumnType, TableSchema};

/// Number of positional fields in an ACS geography record.
pub const GEO_FIELD_COUNT: usize = 53;
/// Field position of the state abbreviation.
pub const GEO_STUSAB: usize = 1;
/// Field position of the logical record number.
pub const GEO_LOGRECNO: usize = 4;
/// Field position of the canonical geographic identifier.
pub const GEO_GEOID: usize = 48;

/// The 53 positional columns of an ACS geography record, in layout order.
const GEOHEADER_FIELDS: [&str; GEO_FIELD_COUNT] = [
    "fileid", "stusab", "sumlevel", "component", "logrecno", "us", "region", "division",
    "statece", "state", "county", "cousub", "place", "tract", "blkgrp", "concit", "aianhh",
    "aianhhfp", "aihhtli", "aitsce", "aits", "anrc", "cbsa", "csa", "metdiv", "macc", "memi",
    "necta", "cnecta", "nectadiv", "ua", "blank1", "cdcurr", "sldu", "sldl", "blank2", "blank3",
    "zcta5", "submcd", "sdelm", "sdsec", "sduni", "ur", "pci", "blank5", "blank6", "puma5",
    "blank7", "geoid", "name", "bttr", "btbg", "blank8",
];

pub fn table_metadata_schema() -> TableSchema {
    TableSchema {
        name: "census_table_metadata".into(),
        columns: vec![
            Column::new("table_id", ColumnType::Text),
            Column::new("table_title", ColumnType::Text),
            Column::new("simple_table_title", ColumnType::Text),
            Column::new("subject_area", ColumnType::Text),
            Column::new("universe", ColumnType::Text),
            Column::new("denominator_column_id", ColumnType::Text),
            Column::new("topics", ColumnType::Text),
        ],
        primary_key: Some("table_id".into()),
    }
}

pub fn column_metadata_schema() -> TableSchema {
    TableSchema {
        name: "census_column_metadata".into(),
        columns: vec![
            Column::new("table_id", ColumnType::Text),
            Column::new("line_number", ColumnType::Real),
            Column::new("column_id", ColumnType::Text),
            Column::new("column_title", ColumnType::Text),
            Column::new("indent", ColumnType::Integer),
            Column::new("parent_column_id", ColumnType::Text),
        ],
        primary_key: Some("column_id".into()),
    }
}

pub fn geoheader_schema() -> TableSchema {
    let columns = GEOHEADER_FIELDS
        .iter()
        .map(|&name| {
            let col_type = match name {
                "sumlevel" | "logrecno" => ColumnType::Integer,
                _ => ColumnType::Text,
            };
            Column::new(name, col_type)
        })
        .collect();

    TableSchema {
        name: "geoheader".into(),
        columns,
        primary_key: Some("geoid".into()),
    }
}
