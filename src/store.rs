//! Read-only queries against the `sites` table.
//!
//! Exactly one site exists per key; [`site_by_key`] returns `None` rather
//! than erroring when the key is unknown so callers can decide how to
//! surface it (the web layer turns it into a 404).

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::models::Site;

pub async fn all_sites(pool: &SqlitePool) -> Result<Vec<Site>> {
    let rows = sqlx::query(
        "SELECT id, key, name, description, dump_date FROM sites ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(site_from_row).collect())
}

pub async fn site_by_key(pool: &SqlitePool, key: &str) -> Result<Option<Site>> {
    let row = sqlx::query("SELECT id, key, name, description, dump_date FROM sites WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(site_from_row))
}

fn site_from_row(row: &sqlx::sqlite::SqliteRow) -> Site {
    Site {
        id: row.get("id"),
        key: row.get("key"),
        name: row.get("name"),
        description: row.get("description"),
        dump_date: row.get("dump_date"),
    }
}
