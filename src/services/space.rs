//! Space service — the groupings vaults are created under.

use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("space not found: {0}")]
    NotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Create a space.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_space(pool: &PgPool, name: &str, description: &str) -> Result<SpaceRow, SpaceError> {
    let (id, created_at) = sqlx::query_as::<_, (i32, OffsetDateTime)>(
        "INSERT INTO spaces (name, description) VALUES ($1, $2) RETURNING id, created_at",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(SpaceRow { id, name: name.to_owned(), description: description.to_owned(), created_at })
}

/// Fetch one space by ID.
///
/// # Errors
///
/// Returns `NotFound` if no such space exists, or a database error.
pub async fn get_space(pool: &PgPool, space_id: i32) -> Result<SpaceRow, SpaceError> {
    let row = sqlx::query_as::<_, (i32, String, String, OffsetDateTime)>(
        "SELECT id, name, description, created_at FROM spaces WHERE id = $1",
    )
    .bind(space_id)
    .fetch_optional(pool)
    .await?
    .ok_or(SpaceError::NotFound(space_id))?;

    Ok(SpaceRow { id: row.0, name: row.1, description: row.2, created_at: row.3 })
}

/// List all spaces, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_spaces(pool: &PgPool) -> Result<Vec<SpaceRow>, SpaceError> {
    let rows = sqlx::query_as::<_, (i32, String, String, OffsetDateTime)>(
        "SELECT id, name, description, created_at FROM spaces ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, description, created_at)| SpaceRow { id, name, description, created_at })
        .collect())
}

#[cfg(test)]
#[path = "space_test.rs"]
mod tests;
