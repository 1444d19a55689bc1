//! In-memory stores
//!
//! Everything lives behind one `parking_lot::Mutex`; every write checks and
//! mutates within a single critical section, so the active-slot index can
//! never hold two appointments for the same key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{
    Appointment, AppointmentCreate, AppointmentStatus, Client, ClientCreate, Provider,
    ScheduleEntry, ServiceCreate, ServiceKind, ServiceOffering, Weekday,
};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::{BookingStore, DirectoryStore, RepoError, RepoResult, ScheduleStore};

type SlotKey = (i64, DateTime<Utc>);

#[derive(Debug, Default)]
struct Inner {
    providers: HashMap<i64, Provider>,
    clients: BTreeMap<i64, Client>,
    next_client_id: i64,
    services: Vec<ServiceOffering>,
    schedule: BTreeMap<(i64, Weekday), ScheduleEntry>,
    appointments: BTreeMap<i64, Appointment>,
    next_appointment_id: i64,
    /// (provider_id, when_utc) of every non-cancelled appointment
    active_slots: HashSet<SlotKey>,
}

impl Inner {
    fn appointment_mut(&mut self, id: i64) -> RepoResult<&mut Appointment> {
        self.appointments
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Appointment {id} not found")))
    }
}

/// Process-local implementation of every store trait
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with the default service catalog
    pub fn new() -> Self {
        let services = [
            (1, ServiceKind::Cut, "Corte de Cabelo", 5000, 60),
            (2, ServiceKind::Beard, "Barba", 3000, 30),
            (3, ServiceKind::CutAndBeard, "Corte + Barba", 7000, 90),
        ]
        .into_iter()
        .map(|(id, kind, name, cents, minutes)| ServiceOffering {
            id,
            kind,
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            duration_minutes: minutes,
            active: true,
        })
        .collect();

        Self {
            inner: Mutex::new(Inner {
                services,
                next_client_id: 1,
                next_appointment_id: 1,
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn entries_for_provider(&self, provider_id: i64) -> RepoResult<Vec<ScheduleEntry>> {
        let inner = self.inner.lock();
        Ok(inner
            .schedule
            .range((provider_id, 0)..=(provider_id, Weekday::MAX))
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn entry_for_weekday(
        &self,
        provider_id: i64,
        weekday: Weekday,
    ) -> RepoResult<Option<ScheduleEntry>> {
        Ok(self.inner.lock().schedule.get(&(provider_id, weekday)).cloned())
    }

    async fn upsert_entry(&self, entry: ScheduleEntry) -> RepoResult<()> {
        self.inner
            .lock()
            .schedule
            .insert((entry.provider_id, entry.weekday), entry);
        Ok(())
    }

    async fn upsert_entries(&self, entries: Vec<ScheduleEntry>) -> RepoResult<()> {
        let mut inner = self.inner.lock();
        for entry in entries {
            inner
                .schedule
                .insert((entry.provider_id, entry.weekday), entry);
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, data: AppointmentCreate) -> RepoResult<Appointment> {
        let mut inner = self.inner.lock();
        if !inner.providers.contains_key(&data.provider_id) {
            return Err(RepoError::NotFound(format!(
                "Provider {} not found",
                data.provider_id
            )));
        }
        if !inner.clients.contains_key(&data.client_id) {
            return Err(RepoError::NotFound(format!(
                "Client {} not found",
                data.client_id
            )));
        }
        if !inner.active_slots.insert((data.provider_id, data.when_utc)) {
            return Err(RepoError::Duplicate(format!(
                "Slot {} already booked for provider {}",
                data.when_utc, data.provider_id
            )));
        }

        let id = inner.next_appointment_id;
        inner.next_appointment_id += 1;
        let appointment = Appointment {
            id,
            provider_id: data.provider_id,
            client_id: data.client_id,
            when_utc: data.when_utc,
            service: data.service,
            status: AppointmentStatus::Pending,
        };
        inner.appointments.insert(id, appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Appointment>> {
        Ok(self.inner.lock().appointments.get(&id).cloned())
    }

    async fn set_status(&self, id: i64, status: AppointmentStatus) -> RepoResult<Appointment> {
        let mut inner = self.inner.lock();
        let current = inner.appointment_mut(id)?.clone();
        let key = (current.provider_id, current.when_utc);

        match (current.status.is_active(), status.is_active()) {
            (true, false) => {
                inner.active_slots.remove(&key);
            }
            (false, true) => {
                if !inner.active_slots.insert(key) {
                    return Err(RepoError::Duplicate(format!(
                        "Slot {} already booked for provider {}",
                        current.when_utc, current.provider_id
                    )));
                }
            }
            _ => {}
        }

        let appointment = inner.appointment_mut(id)?;
        appointment.status = status;
        Ok(appointment.clone())
    }

    async fn move_to(&self, id: i64, when_utc: DateTime<Utc>) -> RepoResult<Appointment> {
        let mut inner = self.inner.lock();
        let current = inner.appointment_mut(id)?.clone();

        if current.status.is_active() && current.when_utc != when_utc {
            if !inner.active_slots.insert((current.provider_id, when_utc)) {
                return Err(RepoError::Duplicate(format!(
                    "Slot {} already booked for provider {}",
                    when_utc, current.provider_id
                )));
            }
            inner
                .active_slots
                .remove(&(current.provider_id, current.when_utc));
        }

        let appointment = inner.appointment_mut(id)?;
        appointment.when_utc = when_utc;
        Ok(appointment.clone())
    }

    async fn active_in_range(
        &self,
        provider_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>> {
        let inner = self.inner.lock();
        let mut found: Vec<_> = inner
            .appointments
            .values()
            .filter(|a| {
                a.provider_id == provider_id
                    && a.status.is_active()
                    && a.when_utc >= start
                    && a.when_utc < end
            })
            .cloned()
            .collect();
        found.sort_by_key(|a| a.when_utc);
        Ok(found)
    }

    async fn list_for_provider(
        &self,
        provider_id: i64,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> RepoResult<Vec<Appointment>> {
        let inner = self.inner.lock();
        let mut found: Vec<_> = inner
            .appointments
            .values()
            .filter(|a| a.provider_id == provider_id)
            .filter(|a| range.is_none_or(|(start, end)| a.when_utc >= start && a.when_utc < end))
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.when_utc, a.id));
        Ok(found)
    }

    async fn active_for_client_from(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>> {
        let inner = self.inner.lock();
        let mut found: Vec<_> = inner
            .appointments
            .values()
            .filter(|a| a.client_id == client_id && a.is_upcoming(from))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.when_utc);
        Ok(found)
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn find_client(&self, id: i64) -> RepoResult<Option<Client>> {
        Ok(self.inner.lock().clients.get(&id).cloned())
    }

    async fn find_client_by_phone(&self, phone: &str) -> RepoResult<Option<Client>> {
        Ok(self
            .inner
            .lock()
            .clients
            .values()
            .find(|c| c.phone == phone)
            .cloned())
    }

    async fn create_client(&self, data: ClientCreate) -> RepoResult<Client> {
        let mut inner = self.inner.lock();
        if inner.clients.values().any(|c| c.phone == data.phone) {
            return Err(RepoError::Duplicate(format!(
                "Client with phone {} already exists",
                data.phone
            )));
        }
        let id = inner.next_client_id;
        inner.next_client_id += 1;
        let client = Client {
            id,
            name: data.name,
            phone: data.phone,
        };
        inner.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn client_exists(&self, id: i64) -> RepoResult<bool> {
        Ok(self.inner.lock().clients.contains_key(&id))
    }

    async fn provider_exists(&self, id: i64) -> RepoResult<bool> {
        Ok(self.inner.lock().providers.contains_key(&id))
    }

    async fn upsert_provider(&self, id: i64, name: &str) -> RepoResult<Provider> {
        let provider = Provider {
            id,
            name: name.to_string(),
        };
        self.inner.lock().providers.insert(id, provider.clone());
        Ok(provider)
    }

    async fn active_services(&self) -> RepoResult<Vec<ServiceOffering>> {
        Ok(self
            .inner
            .lock()
            .services
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect())
    }

    async fn create_service(&self, data: ServiceCreate) -> RepoResult<ServiceOffering> {
        let mut inner = self.inner.lock();
        let id = inner.services.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let offering = ServiceOffering {
            id,
            kind: data.kind,
            name: data.name,
            price: data.price,
            duration_minutes: data.duration_minutes,
            active: true,
        };
        inner.services.push(offering.clone());
        Ok(offering)
    }
}
