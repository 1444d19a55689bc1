//! Directory Service
//!
//! Client registry, provider records, service catalog and weekly schedule
//! configuration. Plain CRUD with input validation in front of the stores.

use rust_decimal::Decimal;
use shared::models::{
    Client, ClientCreate, Provider, ScheduleEntry, ScheduleEntryUpsert, ServiceCreate,
    ServiceOffering,
};
use std::collections::HashSet;
use shared::util::normalize_phone;
use std::sync::Arc;

use crate::store::{DirectoryStore, RepoError, ScheduleStore};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_client_name, validate_phone, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
pub struct DirectoryService {
    directory: Arc<dyn DirectoryStore>,
    schedule: Arc<dyn ScheduleStore>,
}

impl DirectoryService {
    pub fn new(directory: Arc<dyn DirectoryStore>, schedule: Arc<dyn ScheduleStore>) -> Self {
        Self {
            directory,
            schedule,
        }
    }

    /// Look a client up by chat id / phone (normalized to digits)
    pub async fn find_client_by_phone(&self, phone: &str) -> AppResult<Option<Client>> {
        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return Ok(None);
        }
        Ok(self.directory.find_client_by_phone(&phone).await?)
    }

    pub async fn get_client(&self, id: i64) -> AppResult<Client> {
        self.directory.find_client(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::ClientNotFound, format!("Client {id} not found"))
        })
    }

    /// Register a client; a phone already on file is `ClientAlreadyExists`
    pub async fn create_client(&self, name: &str, phone: &str) -> AppResult<Client> {
        let name = validate_client_name(name)?;
        let phone = normalize_phone(phone);
        validate_phone(&phone)?;

        match self
            .directory
            .create_client(ClientCreate {
                name,
                phone: phone.clone(),
            })
            .await
        {
            Ok(client) => {
                tracing::info!(client_id = client.id, "Client registered");
                Ok(client)
            }
            Err(RepoError::Duplicate(_)) => Err(AppError::with_message(
                ErrorCode::ClientAlreadyExists,
                format!("Client with phone {phone} already exists"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn client_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.directory.client_exists(id).await?)
    }

    pub async fn provider_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.directory.provider_exists(id).await?)
    }

    /// Create the provider record if missing, or rename it
    pub async fn ensure_provider(&self, id: i64, name: &str) -> AppResult<Provider> {
        validate_required_text(name, "provider name", MAX_NAME_LEN)?;
        Ok(self.directory.upsert_provider(id, name.trim()).await?)
    }

    /// Active services, catalog order
    pub async fn list_services(&self) -> AppResult<Vec<ServiceOffering>> {
        Ok(self.directory.active_services().await?)
    }

    /// Add an offering to the catalog; price and duration must be positive
    pub async fn create_service(&self, data: ServiceCreate) -> AppResult<ServiceOffering> {
        validate_required_text(&data.name, "service name", MAX_NAME_LEN)?;
        if data.price <= Decimal::ZERO {
            return Err(AppError::validation("price must be greater than zero"));
        }
        if data.duration_minutes <= 0 {
            return Err(AppError::validation("duration_minutes must be greater than zero"));
        }
        let data = ServiceCreate {
            name: data.name.trim().to_string(),
            ..data
        };
        let service = self.directory.create_service(data).await?;
        tracing::info!(
            service_id = service.id,
            kind = service.kind.as_str(),
            "Service created"
        );
        Ok(service)
    }

    pub async fn get_schedule(&self, provider_id: i64) -> AppResult<Vec<ScheduleEntry>> {
        self.require_provider(provider_id).await?;
        Ok(self.schedule.entries_for_provider(provider_id).await?)
    }

    /// Validate and insert/replace one weekday entry
    pub async fn upsert_schedule_entry(&self, entry: ScheduleEntry) -> AppResult<ScheduleEntry> {
        entry.validate()?;
        self.require_provider(entry.provider_id).await?;
        self.schedule.upsert_entry(entry.clone()).await?;
        tracing::info!(
            provider_id = entry.provider_id,
            weekday = entry.weekday,
            active = entry.active,
            "Schedule entry saved"
        );
        Ok(entry)
    }

    /// Replace several weekdays of one provider at once
    ///
    /// Every entry is validated before anything is written; a weekday may
    /// appear only once per batch.
    pub async fn upsert_schedule_entries(
        &self,
        provider_id: i64,
        entries: Vec<ScheduleEntryUpsert>,
    ) -> AppResult<Vec<ScheduleEntry>> {
        if entries.is_empty() {
            return Err(AppError::validation("schedule batch is empty"));
        }
        let mut seen = HashSet::new();
        let entries: Vec<ScheduleEntry> = entries
            .into_iter()
            .map(|upsert| upsert.into_entry(provider_id))
            .collect();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.weekday) {
                return Err(AppError::validation(format!(
                    "weekday {} appears more than once",
                    entry.weekday
                ))
                .with_detail("weekday", entry.weekday));
            }
        }
        self.require_provider(provider_id).await?;
        self.schedule.upsert_entries(entries.clone()).await?;
        tracing::info!(provider_id, count = entries.len(), "Schedule entries saved");
        Ok(entries)
    }

    async fn require_provider(&self, provider_id: i64) -> AppResult<()> {
        if !self.directory.provider_exists(provider_id).await? {
            return Err(AppError::with_message(
                ErrorCode::ProviderNotFound,
                format!("Provider {provider_id} not found"),
            ));
        }
        Ok(())
    }
}
