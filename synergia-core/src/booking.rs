use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::repository::StoreError;
use crate::{CoreError, CoreResult};

/// Storage-assigned identifier of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookingId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| StoreError::InvalidId {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub name: String,
    pub email: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Overwrites every field present in `patch`. Required fields are not
    /// re-checked, so an update may leave `name` empty.
    pub fn apply(&mut self, patch: BookingPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(event) = patch.event {
            self.event = event;
        }
        if let Some(ticket_type) = patch.ticket_type {
            self.ticket_type = ticket_type;
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
    }
}

/// Body of `POST /api/bookings` as received, before presence checks.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event: Option<String>,
    pub ticket_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateBookingRequest {
    /// Empty strings count as missing.
    pub fn validate(self) -> CoreResult<NewBooking> {
        match (non_empty(self.name), non_empty(self.email), non_empty(self.event)) {
            (Some(name), Some(email), Some(event)) => Ok(NewBooking {
                name,
                email,
                event,
                ticket_type: self.ticket_type,
                created_at: self.created_at,
            }),
            _ => Err(CoreError::ValidationError(
                "name, email and event are required".to_string(),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A booking that passed presence checks and has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub event: String,
    pub ticket_type: Option<String>,
    /// `None` lets the store stamp the creation time.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewBooking {
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            name: self.name,
            email: self.email,
            event: self.event,
            ticket_type: self.ticket_type,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Body of `PUT /api/bookings/{id}`. Absent keys are left untouched;
/// `ticketType: null` clears the ticket type. Unknown keys, `id` included,
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub ticket_type: Option<Option<String>>,
    pub created_at: Option<DateTime<Utc>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Case-insensitive substring test shared by every repository.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
