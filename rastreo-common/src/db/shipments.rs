//! Shipment queries and mutations
//!
//! Every operation is a single statement against the `envios` table. User
//! values are always bound parameters; column names in dynamic statements
//! come only from the `ShipmentField` allow-list.

use sqlx::sqlite::SqliteArguments;
use sqlx::SqlitePool;

use crate::db::models::{FieldValue, Shipment, ShipmentField};
use crate::Result;

/// Column list shared by every query endpoint (bookkeeping columns excluded)
const SELECT_SHIPMENT: &str = "SELECT id, numero_seguimiento, codigo_ddp, nombre_receptor, peso, \
     contenido, empresa_transporte, proveedor, fecha_recepcion, fecha_envio, \
     costo, moneda_costo, imagen_link, estado FROM envios";

/// Exact match on tracking number
pub async fn by_tracking(pool: &SqlitePool, tracking: &str) -> Result<Vec<Shipment>> {
    let sql = format!("{} WHERE numero_seguimiento = ? ORDER BY id", SELECT_SHIPMENT);
    Ok(sqlx::query_as::<_, Shipment>(&sql)
        .bind(tracking)
        .fetch_all(pool)
        .await?)
}

/// Exact match on the digit-only DDP code
pub async fn by_ddp(pool: &SqlitePool, ddp: &str) -> Result<Vec<Shipment>> {
    let sql = format!("{} WHERE codigo_ddp = ? ORDER BY id", SELECT_SHIPMENT);
    Ok(sqlx::query_as::<_, Shipment>(&sql)
        .bind(ddp)
        .fetch_all(pool)
        .await?)
}

/// Case-insensitive substring match on recipient name
pub async fn by_receptor(pool: &SqlitePool, name: &str) -> Result<Vec<Shipment>> {
    let sql = format!("{} WHERE nombre_receptor LIKE ? ORDER BY id", SELECT_SHIPMENT);
    Ok(sqlx::query_as::<_, Shipment>(&sql)
        .bind(format!("%{}%", name))
        .fetch_all(pool)
        .await?)
}

/// Exact match on id
pub async fn by_id(pool: &SqlitePool, id: i64) -> Result<Vec<Shipment>> {
    let sql = format!("{} WHERE id = ?", SELECT_SHIPMENT);
    Ok(sqlx::query_as::<_, Shipment>(&sql)
        .bind(id)
        .fetch_all(pool)
        .await?)
}

/// Exact match on status label
pub async fn by_state(pool: &SqlitePool, state: &str) -> Result<Vec<Shipment>> {
    let sql = format!("{} WHERE estado = ? ORDER BY id", SELECT_SHIPMENT);
    Ok(sqlx::query_as::<_, Shipment>(&sql)
        .bind(state)
        .fetch_all(pool)
        .await?)
}

/// Every record, insertion order (admin bulk table)
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Shipment>> {
    let sql = format!("{} ORDER BY id", SELECT_SHIPMENT);
    Ok(sqlx::query_as::<_, Shipment>(&sql).fetch_all(pool).await?)
}

/// Update one column of one row; returns rows affected (0 or 1)
pub async fn update_field(
    pool: &SqlitePool,
    id: i64,
    field: ShipmentField,
    value: &FieldValue,
) -> Result<u64> {
    // field.column() is a static string from the allow-list, never user text
    let sql = format!(
        "UPDATE envios SET {} = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        field.column()
    );
    let query = bind_field(sqlx::query(&sql), value).bind(id);
    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

/// Replace every mutable column of one row in a single statement
pub async fn update_full(
    pool: &SqlitePool,
    id: i64,
    values: &[(ShipmentField, FieldValue)],
) -> Result<u64> {
    let assignments: Vec<String> = values
        .iter()
        .map(|(field, _)| format!("{} = ?", field.column()))
        .collect();
    let sql = format!(
        "UPDATE envios SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        assignments.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for (_, value) in values {
        query = bind_field(query, value);
    }
    let result = query.bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Insert a new record; returns the assigned id
pub async fn create(pool: &SqlitePool, values: &[(ShipmentField, FieldValue)]) -> Result<i64> {
    let columns: Vec<&str> = values.iter().map(|(field, _)| field.column()).collect();
    let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
    let sql = format!(
        "INSERT INTO envios ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for (_, value) in values {
        query = bind_field(query, value);
    }
    let result = query.execute(pool).await?;
    Ok(result.last_insert_rowid())
}

/// Delete at most one row by id; returns rows affected (0 or 1)
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM envios WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Bind a normalized value as the next statement parameter
fn bind_field<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    value: &'q FieldValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match value {
        FieldValue::Null => query.bind(None::<String>),
        FieldValue::Text(s) => query.bind(s.as_str()),
        FieldValue::Real(f) => query.bind(*f),
        FieldValue::Date(d) => query.bind(d.format("%Y-%m-%d").to_string()),
    }
}
