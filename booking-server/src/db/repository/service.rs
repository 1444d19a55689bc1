//! Service Catalog Repository

use super::{RepoError, RepoResult};
use rust_decimal::Decimal;
use shared::models::{ServiceCreate, ServiceKind, ServiceOffering};
use sqlx::SqlitePool;
use std::str::FromStr;

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    kind: String,
    name: String,
    price: String,
    duration_minutes: i32,
    is_active: bool,
}

impl TryFrom<ServiceRow> for ServiceOffering {
    type Error = RepoError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let kind = ServiceKind::parse(&row.kind)
            .ok_or_else(|| RepoError::Database(format!("Unknown service kind: {}", row.kind)))?;
        let price = Decimal::from_str(&row.price)
            .map_err(|e| RepoError::Database(format!("Invalid price '{}': {e}", row.price)))?;
        Ok(Self {
            id: row.id,
            kind,
            name: row.name,
            price,
            duration_minutes: row.duration_minutes,
            active: row.is_active,
        })
    }
}

/// Active services in catalog order
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<ServiceOffering>> {
    let rows = sqlx::query_as::<_, ServiceRow>(
        "SELECT id, kind, name, price, duration_minutes, is_active FROM service \
         WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(ServiceOffering::try_from).collect()
}

/// Insert an active offering
pub async fn create(pool: &SqlitePool, data: ServiceCreate) -> RepoResult<ServiceOffering> {
    let row = sqlx::query_as::<_, ServiceRow>(
        "INSERT INTO service (kind, name, price, duration_minutes, is_active) \
         VALUES (?1, ?2, ?3, ?4, 1) \
         RETURNING id, kind, name, price, duration_minutes, is_active",
    )
    .bind(data.kind.as_str())
    .bind(data.name)
    .bind(data.price.to_string())
    .bind(data.duration_minutes)
    .fetch_one(pool)
    .await?;
    ServiceOffering::try_from(row)
}
