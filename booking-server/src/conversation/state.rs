//! Conversation states
//!
//! Each state carries exactly the data the next turn needs: a time can only
//! be selected with a date in hand, a date only with a service, and so on.

use chrono::{NaiveDate, NaiveTime};
use shared::models::{Appointment, Client, ServiceOffering, Slot};

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    /// Entry point: any input resolves the client and routes
    Start,
    AwaitingRegistrationName,
    MainMenu {
        client: Client,
    },
    ExistingAppointmentMenu {
        client: Client,
        appointment: Appointment,
    },
    AwaitingServiceSelection {
        client: Client,
        services: Vec<ServiceOffering>,
    },
    AwaitingDaySelection {
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
    },
    AwaitingTimeSelection {
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
        date: NaiveDate,
        slots: Vec<Slot>,
    },
    Confirmation {
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
        date: NaiveDate,
        time: NaiveTime,
    },
}

impl ConversationState {
    /// Stable name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::AwaitingRegistrationName => "AWAITING_REGISTRATION_NAME",
            Self::MainMenu { .. } => "MAIN_MENU",
            Self::ExistingAppointmentMenu { .. } => "EXISTING_APPOINTMENT_MENU",
            Self::AwaitingServiceSelection { .. } => "AWAITING_SERVICE_SELECTION",
            Self::AwaitingDaySelection { .. } => "AWAITING_DAY_SELECTION",
            Self::AwaitingTimeSelection { .. } => "AWAITING_TIME_SELECTION",
            Self::Confirmation { .. } => "CONFIRMATION",
        }
    }

    /// Client bound to the session, once known
    pub fn client(&self) -> Option<&Client> {
        match self {
            Self::Start | Self::AwaitingRegistrationName => None,
            Self::MainMenu { client }
            | Self::ExistingAppointmentMenu { client, .. }
            | Self::AwaitingServiceSelection { client, .. }
            | Self::AwaitingDaySelection { client, .. }
            | Self::AwaitingTimeSelection { client, .. }
            | Self::Confirmation { client, .. } => Some(client),
        }
    }
}

/// Per-user conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Chat user id as delivered by the transport
    pub user_id: String,
    pub state: ConversationState,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            state: ConversationState::Start,
        }
    }

    pub fn with_state(user_id: impl Into<String>, state: ConversationState) -> Self {
        Self {
            user_id: user_id.into(),
            state,
        }
    }
}
