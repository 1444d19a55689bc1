//! Store seams
//!
//! The engines only talk to storage through these traits. Two backends:
//! [`MemoryStore`] (tests, demo) and [`SqliteStore`] (production).
//!
//! Both backends enforce "one non-cancelled appointment per
//! (provider_id, when_utc)" inside the write itself and report a violation
//! as [`RepoError::Duplicate`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{
    Appointment, AppointmentCreate, AppointmentStatus, Client, ClientCreate, Provider,
    ScheduleEntry, ServiceCreate, ServiceOffering, Weekday,
};

pub use crate::db::repository::{RepoError, RepoResult};

/// Weekly working windows, one entry per (provider, weekday)
#[async_trait]
pub trait ScheduleStore: Send + Sync + std::fmt::Debug {
    /// All entries of a provider, ordered by weekday
    async fn entries_for_provider(&self, provider_id: i64) -> RepoResult<Vec<ScheduleEntry>>;

    async fn entry_for_weekday(
        &self,
        provider_id: i64,
        weekday: Weekday,
    ) -> RepoResult<Option<ScheduleEntry>>;

    /// Insert or replace the entry for (provider, weekday)
    async fn upsert_entry(&self, entry: ScheduleEntry) -> RepoResult<()>;

    /// Upsert several entries; all of them are written or none
    async fn upsert_entries(&self, entries: Vec<ScheduleEntry>) -> RepoResult<()>;
}

/// Appointment persistence
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug {
    /// Insert as PENDING; `Duplicate` when the slot is already held
    async fn insert(&self, data: AppointmentCreate) -> RepoResult<Appointment>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Appointment>>;

    /// `Duplicate` when re-activating into a held slot
    async fn set_status(&self, id: i64, status: AppointmentStatus) -> RepoResult<Appointment>;

    /// `Duplicate` when the target slot is already held
    async fn move_to(&self, id: i64, when_utc: DateTime<Utc>) -> RepoResult<Appointment>;

    /// Non-cancelled appointments of a provider in `[start, end)`
    async fn active_in_range(
        &self,
        provider_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>>;

    /// Every appointment of a provider (any status), optionally limited to
    /// `[start, end)`, ordered by time
    async fn list_for_provider(
        &self,
        provider_id: i64,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> RepoResult<Vec<Appointment>>;

    /// Non-cancelled appointments of a client at or after `from`, ascending
    async fn active_for_client_from(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>>;
}

/// Clients, providers and the service catalog
#[async_trait]
pub trait DirectoryStore: Send + Sync + std::fmt::Debug {
    async fn find_client(&self, id: i64) -> RepoResult<Option<Client>>;

    async fn find_client_by_phone(&self, phone: &str) -> RepoResult<Option<Client>>;

    /// `Duplicate` when the phone is already registered
    async fn create_client(&self, data: ClientCreate) -> RepoResult<Client>;

    async fn client_exists(&self, id: i64) -> RepoResult<bool>;

    async fn provider_exists(&self, id: i64) -> RepoResult<bool>;

    async fn upsert_provider(&self, id: i64, name: &str) -> RepoResult<Provider>;

    /// Active offerings ordered by id
    async fn active_services(&self) -> RepoResult<Vec<ServiceOffering>>;

    /// New active offering
    async fn create_service(&self, data: ServiceCreate) -> RepoResult<ServiceOffering>;
}
