//! SQL text rendering. Table, view, and column names all originate in
//! release files, so every identifier funnels through `validate_identifier`
//! before it reaches DDL or DML.

use crate::error::{AcsError, Result};
use crate::schema::types::TableSchema;
use crate::schema::views::ViewPlan;

/// Accept `[A-Za-z_][A-Za-z0-9_]*` only.
pub fn validate_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(AcsError::BadIdentifier(name.to_string()))
    }
}

/// Generate CREATE TABLE SQL for a table schema.
pub fn generate_create_table(schema: &TableSchema) -> Result<String> {
    let mut sql = format!("CREATE TABLE {} (\n", validate_identifier(&schema.name)?);
    let mut columns = Vec::new();

    for col in &schema.columns {
        let pk = if schema.primary_key.as_deref() == Some(col.name.as_str()) {
            " PRIMARY KEY"
        } else {
            ""
        };
        columns.push(format!(
            "    {} {}{}",
            validate_identifier(&col.name)?,
            col.col_type.sql(),
            pk
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    Ok(sql)
}

/// Generate INSERT SQL with one placeholder per column.
pub fn generate_insert(schema: &TableSchema) -> Result<String> {
    let mut names = Vec::new();
    for col in &schema.columns {
        names.push(validate_identifier(&col.name)?);
    }
    let placeholders: Vec<&str> = names.iter().map(|_| "?").collect();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        validate_identifier(&schema.name)?,
        names.join(", "),
        placeholders.join(", ")
    ))
}

/// Generate CREATE VIEW SQL for a view plan: `geoid` plus the plan's
/// columns, joined across its tables on geoid.
pub fn generate_create_view(plan: &ViewPlan) -> Result<String> {
    let (first, rest) = plan
        .tables
        .split_first()
        .ok_or_else(|| AcsError::EmptyView(plan.name.clone()))?;

    let mut sql = format!("CREATE VIEW {} AS SELECT geoid", validate_identifier(&plan.name)?);
    for column in &plan.columns {
        sql.push_str(", ");
        sql.push_str(validate_identifier(column)?);
    }

    sql.push_str(" FROM ");
    sql.push_str(validate_identifier(first)?);
    for table in rest {
        sql.push_str(" JOIN ");
        sql.push_str(validate_identifier(table)?);
        sql.push_str(" USING (geoid)");
    }

    Ok(sql)
}
