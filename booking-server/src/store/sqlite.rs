//! SQLite-backed stores (delegates to `db::repository`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{
    Appointment, AppointmentCreate, AppointmentStatus, Client, ClientCreate, Provider,
    ScheduleEntry, ServiceCreate, ServiceOffering, Weekday,
};
use sqlx::SqlitePool;

use super::{BookingStore, DirectoryStore, RepoResult, ScheduleStore};
use crate::db::repository::{appointment, client, provider, schedule, service};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleStore for SqliteStore {
    async fn entries_for_provider(&self, provider_id: i64) -> RepoResult<Vec<ScheduleEntry>> {
        schedule::find_by_provider(&self.pool, provider_id).await
    }

    async fn entry_for_weekday(
        &self,
        provider_id: i64,
        weekday: Weekday,
    ) -> RepoResult<Option<ScheduleEntry>> {
        schedule::find_by_weekday(&self.pool, provider_id, weekday).await
    }

    async fn upsert_entry(&self, entry: ScheduleEntry) -> RepoResult<()> {
        schedule::upsert(&self.pool, &entry).await
    }

    async fn upsert_entries(&self, entries: Vec<ScheduleEntry>) -> RepoResult<()> {
        schedule::upsert_many(&self.pool, &entries).await
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn insert(&self, data: AppointmentCreate) -> RepoResult<Appointment> {
        appointment::create(&self.pool, &data).await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Appointment>> {
        appointment::find_by_id(&self.pool, id).await
    }

    async fn set_status(&self, id: i64, status: AppointmentStatus) -> RepoResult<Appointment> {
        appointment::update_status(&self.pool, id, status).await
    }

    async fn move_to(&self, id: i64, when_utc: DateTime<Utc>) -> RepoResult<Appointment> {
        appointment::update_when(&self.pool, id, when_utc).await
    }

    async fn active_in_range(
        &self,
        provider_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>> {
        appointment::find_active_in_range(&self.pool, provider_id, start, end).await
    }

    async fn list_for_provider(
        &self,
        provider_id: i64,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> RepoResult<Vec<Appointment>> {
        appointment::find_by_provider(&self.pool, provider_id, range).await
    }

    async fn active_for_client_from(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>> {
        appointment::find_active_for_client_from(&self.pool, client_id, from).await
    }
}

#[async_trait]
impl DirectoryStore for SqliteStore {
    async fn find_client(&self, id: i64) -> RepoResult<Option<Client>> {
        client::find_by_id(&self.pool, id).await
    }

    async fn find_client_by_phone(&self, phone: &str) -> RepoResult<Option<Client>> {
        client::find_by_phone(&self.pool, phone).await
    }

    async fn create_client(&self, data: ClientCreate) -> RepoResult<Client> {
        client::create(&self.pool, data).await
    }

    async fn client_exists(&self, id: i64) -> RepoResult<bool> {
        client::exists(&self.pool, id).await
    }

    async fn provider_exists(&self, id: i64) -> RepoResult<bool> {
        provider::exists(&self.pool, id).await
    }

    async fn upsert_provider(&self, id: i64, name: &str) -> RepoResult<Provider> {
        provider::upsert(&self.pool, id, name).await
    }

    async fn active_services(&self) -> RepoResult<Vec<ServiceOffering>> {
        service::find_active(&self.pool).await
    }

    async fn create_service(&self, data: ServiceCreate) -> RepoResult<ServiceOffering> {
        service::create(&self.pool, data).await
    }
}
