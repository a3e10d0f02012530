//! SQLite writer and the load orchestrator. All schema and data mutations
//! for one release happen inside a single transaction owned here; the
//! import steps themselves only see a `&Connection`.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::discover::{self, DataKind};
use crate::error::{AcsError, Result};
use crate::geo::{self, GeoIndex};
use crate::metadata::{self, Lookup};
use crate::parser::{parse_data_record, record_sequence, SqlValue};
use crate::schema::sequence::{estimate_schema, moe_schema};
use crate::schema::tables::{column_metadata_schema, geoheader_schema, table_metadata_schema};
use crate::schema::types::TableSchema;
use crate::schema::views::{estimate_view, moe_view};

use super::schema_gen::{generate_create_table, generate_create_view, generate_insert};

/// Totals reported after a completed load.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadStats {
    pub tables: usize,
    pub columns: usize,
    pub geographies: u64,
    pub sequences: usize,
    pub data_rows: u64,
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (or create) the target database. An existing populated
    /// database is left in place: loading into it again fails on the
    /// first schema collision instead of silently duplicating rows.
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(db_path)?)
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // Tuned for bulk insert.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;
        Ok(Self { conn })
    }

    /// Load a complete release in one transaction: base tables, metadata,
    /// geography, sequence tables, views, then data. Any failure rolls
    /// the database back to its pre-run state.
    pub fn load_release(&mut self, input_dir: &Path, lookup_filename: &str) -> Result<LoadStats> {
        let tx = self.conn.transaction()?;
        let stats = run_load(&tx, input_dir, lookup_filename)?;
        tx.commit()?;
        info!("done");
        Ok(stats)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn run_load(conn: &Connection, input_dir: &Path, lookup_filename: &str) -> Result<LoadStats> {
    let mut stats = LoadStats::default();

    create_base_tables(conn)?;
    info!("created base tables");

    let lookup = metadata::read_lookup(&input_dir.join(lookup_filename))?;
    insert_metadata(conn, &lookup, &mut stats)?;
    info!(
        "imported metadata for {} tables ({} columns)",
        stats.tables, stats.columns
    );

    let geo_index = import_geographies(conn, input_dir, &mut stats)?;
    info!("imported {} geoheader rows", stats.geographies);

    let sequence_schemas = create_sequence_tables(conn, &lookup)?;
    stats.sequences = sequence_schemas.len();
    info!("created {} sequence table pairs", stats.sequences);

    create_views(conn, &lookup)?;
    info!("created table views");

    import_data_files(conn, input_dir, &geo_index, &sequence_schemas, &mut stats)?;
    info!("imported {} data rows", stats.data_rows);

    Ok(stats)
}

fn create_base_tables(conn: &Connection) -> Result<()> {
    for schema in [
        table_metadata_schema(),
        column_metadata_schema(),
        geoheader_schema(),
    ] {
        conn.execute(&generate_create_table(&schema)?, [])?;
    }
    Ok(())
}

fn insert_metadata(conn: &Connection, lookup: &Lookup, stats: &mut LoadStats) -> Result<()> {
    let mut table_stmt = conn.prepare(
        "INSERT INTO census_table_metadata (table_id, table_title, subject_area, universe)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut column_stmt = conn.prepare(
        "INSERT INTO census_column_metadata (table_id, line_number, column_id, column_title)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    for table in &lookup.tables {
        table_stmt.execute(rusqlite::params![
            table.table_id,
            table.table_title,
            table.subject_area,
            table.universe,
        ])?;
        stats.tables += 1;

        for column in &table.columns {
            column_stmt.execute(rusqlite::params![
                column.table_id,
                column.line_number,
                column.column_id,
                column.column_title,
            ])?;
            stats.columns += 1;
        }
    }

    Ok(())
}

fn import_geographies(
    conn: &Connection,
    input_dir: &Path,
    stats: &mut LoadStats,
) -> Result<GeoIndex> {
    let insert_sql = generate_insert(&geoheader_schema())?;
    let mut index = GeoIndex::new();

    for path in discover::geo_files(input_dir)? {
        let rows = geo::read_geo_rows(&path)?;
        index.index_rows(&rows);

        let mut stmt = conn.prepare_cached(&insert_sql)?;
        for row in &rows {
            for (idx, field) in row.iter().enumerate() {
                stmt.raw_bind_parameter(idx + 1, field.as_str())?;
            }
            stmt.raw_execute()?;
        }

        stats.geographies += rows.len() as u64;
        info!("imported geography file {}", path.display());
    }

    Ok(index)
}

fn create_sequence_tables(
    conn: &Connection,
    lookup: &Lookup,
) -> Result<HashMap<u32, (TableSchema, TableSchema)>> {
    let mut schemas = HashMap::new();

    for group in &lookup.sequences {
        let estimate = estimate_schema(group);
        let moe = moe_schema(group);
        conn.execute(&generate_create_table(&estimate)?, [])?;
        conn.execute(&generate_create_table(&moe)?, [])?;
        schemas.insert(group.number, (estimate, moe));
    }

    Ok(schemas)
}

fn create_views(conn: &Connection, lookup: &Lookup) -> Result<()> {
    for table in &lookup.tables {
        conn.execute(&generate_create_view(&estimate_view(table))?, [])?;
        conn.execute(&generate_create_view(&moe_view(table))?, [])?;
    }
    Ok(())
}

fn import_data_files(
    conn: &Connection,
    input_dir: &Path,
    geo_index: &GeoIndex,
    schemas: &HashMap<u32, (TableSchema, TableSchema)>,
    stats: &mut LoadStats,
) -> Result<()> {
    for file in discover::data_files(input_dir)? {
        let path_text = file.path.display().to_string();
        info!("importing data from {}", path_text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&file.path)?;

        // Build the complete row list before touching the database; every
        // row of one file belongs to a single sequence table.
        let mut sequence = None;
        let mut rows: Vec<Vec<SqlValue>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if sequence.is_none() {
                sequence = Some(record_sequence(&record)?);
            }
            rows.push(parse_data_record(&path_text, &record, geo_index)?);
        }

        let Some(sequence) = sequence else {
            continue;
        };

        let (estimate, moe) = schemas
            .get(&sequence)
            .ok_or_else(|| AcsError::UnknownSequence {
                path: path_text.clone(),
                seq: sequence,
            })?;
        let schema = match file.kind {
            DataKind::Estimate => estimate,
            DataKind::Moe => moe,
        };

        let mut stmt = conn.prepare_cached(&generate_insert(schema)?)?;
        for row in &rows {
            if row.len() != schema.columns.len() {
                return Err(AcsError::FieldCount {
                    path: path_text.clone(),
                    expected: schema.columns.len(),
                    got: row.len(),
                });
            }
            for (idx, value) in row.iter().enumerate() {
                value.bind_to(idx + 1, &mut stmt)?;
            }
            stmt.raw_execute()?;
            stats.data_rows += 1;
        }
    }

    Ok(())
}

/// Load a release directory into a SQLite database at `output_db`.
pub fn load_release(input_dir: &Path, output_db: &Path, lookup_filename: &str) -> Result<LoadStats> {
    let mut writer = SqliteWriter::open(output_db)?;
    writer.load_release(input_dir, lookup_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SequenceGroup;

    fn seq_group() -> SequenceGroup {
        SequenceGroup {
            number: 1,
            column_ids: vec!["B01001001".into()],
        }
    }

    #[test]
    fn test_duplicate_geoid_violates_primary_key() {
        let writer = SqliteWriter::in_memory().unwrap();
        let conn = writer.connection();

        let schema = estimate_schema(&seq_group());
        conn.execute(&generate_create_table(&schema).unwrap(), [])
            .unwrap();

        let insert = generate_insert(&schema).unwrap();
        let row = rusqlite::params![
            "ACSSF", "2018e5", "al", "000", "0001", "0000001", "04000US01", 7.0
        ];
        conn.execute(&insert, row).unwrap();
        assert!(conn.execute(&insert, row).is_err());
    }

    #[test]
    fn test_base_tables_create_once() {
        let writer = SqliteWriter::in_memory().unwrap();
        let conn = writer.connection();

        create_base_tables(conn).unwrap();
        // A second run collides instead of silently recreating.
        assert!(create_base_tables(conn).is_err());
    }
}
