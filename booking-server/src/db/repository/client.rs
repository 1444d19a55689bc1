//! Client Repository

use super::{RepoError, RepoResult};
use shared::models::{Client, ClientCreate};
use shared::util::now_millis;
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: i64,
    name: String,
    phone: String,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Client>> {
    let row = sqlx::query_as::<_, ClientRow>("SELECT id, name, phone FROM client WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Client::from))
}

pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Option<Client>> {
    let row = sqlx::query_as::<_, ClientRow>(
        "SELECT id, name, phone FROM client WHERE phone = ? LIMIT 1",
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Client::from))
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM client WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Create a client; a phone already on file yields `RepoError::Duplicate`
pub async fn create(pool: &SqlitePool, data: ClientCreate) -> RepoResult<Client> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO client (name, phone, created_at) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create client".into()))
}
