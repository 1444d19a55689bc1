//! Provider Repository

use super::{RepoError, RepoResult};
use shared::models::Provider;
use shared::util::now_millis;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct ProviderRow {
    id: i64,
    name: String,
}

impl From<ProviderRow> for Provider {
    fn from(row: ProviderRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Provider>> {
    let row = sqlx::query_as::<_, ProviderRow>("SELECT id, name FROM provider WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Provider::from))
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM provider WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Insert the provider, or rename it if the id already exists
pub async fn upsert(pool: &SqlitePool, id: i64, name: &str) -> RepoResult<Provider> {
    sqlx::query(
        "INSERT INTO provider (id, name, created_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(id) DO UPDATE SET name = excluded.name",
    )
    .bind(id)
    .bind(name)
    .bind(now_millis())
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert provider".into()))
}
