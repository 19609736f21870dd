//! Database initialization
//!
//! Creates the database file and the `envios` table on first run; safe to
//! call repeatedly (all statements are IF NOT EXISTS).

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create the schema if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while a write is in flight
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_envios_table(&pool).await?;

    Ok(pool)
}

/// Create the envios table
///
/// One row per tracked package. Dates are stored as YYYY-MM-DD text, with
/// NULL meaning "not applicable". `estado` holds one of the closed status
/// labels; legacy rows may have it unset.
pub async fn create_envios_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS envios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numero_seguimiento TEXT,
            codigo_ddp TEXT,
            nombre_receptor TEXT,
            peso REAL NOT NULL DEFAULT 0,
            contenido TEXT,
            empresa_transporte TEXT,
            proveedor TEXT,
            fecha_recepcion TEXT,
            fecha_envio TEXT,
            costo REAL NOT NULL DEFAULT 0,
            moneda_costo TEXT NOT NULL DEFAULT 'USD',
            imagen_link TEXT,
            estado TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for the search dispatch paths
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_envios_seguimiento ON envios(numero_seguimiento)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_envios_ddp ON envios(codigo_ddp)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_envios_estado ON envios(estado)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_envios_receptor ON envios(nombre_receptor)")
        .execute(pool)
        .await?;

    Ok(())
}
