use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ContractStatus, InvoiceStatus, JobStage, TemplateKey};
use crate::ids::{BusinessId, ClientId, ContractId, InvoiceId, JobId};
use crate::schedule::WeekSchedule;

/// Tenant-like root record. All dependent entities are scoped to a business
/// via their `business_id` foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub active: bool,
    pub currency: String,
    pub tax_rate: f64,
    /// Enum-backed text, see `TemplateKey`.
    pub default_template_key: String,
    /// Payment-processor account identifier, if connected.
    pub payment_account_id: Option<String>,
    pub schedule: WeekSchedule,
    pub created_at: DateTime<Utc>,
}

impl Business {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BusinessId::new(),
            name: name.into(),
            active: false,
            currency: "USD".to_string(),
            tax_rate: 0.0,
            default_template_key: TemplateKey::default().as_str().to_string(),
            payment_account_id: None,
            schedule: WeekSchedule::default(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub business_id: BusinessId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(business_id: BusinessId, name: impl Into<String>) -> Self {
        Self {
            id: ClientId::new(),
            business_id,
            name: name.into(),
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }
}

/// Upload bookkeeping for the out-of-scope document-sync collaborator.
/// None of this state is meaningful across a schema boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub pending_upload: bool,
    pub in_flight: bool,
    pub last_error: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub uploaded_hash: Option<String>,
    pub uploaded_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub business_id: BusinessId,
    pub number: i64,
    /// Enum-backed text, see `InvoiceStatus`.
    pub status: String,
    /// Optional per-invoice template override. Empty means inherit from the
    /// owning business; an override is never substituted with a default.
    pub override_template_key: Option<String>,
    pub total_cents: i64,
    pub issued_at: DateTime<Utc>,
    /// Set when the invoice was generated from an external booking.
    pub linked_booking_id: Option<String>,
    pub sync: SyncState,
}

impl Invoice {
    pub fn new(business_id: BusinessId, number: i64) -> Self {
        Self {
            id: InvoiceId::new(),
            business_id,
            number,
            status: InvoiceStatus::default().as_str().to_string(),
            override_template_key: None,
            total_cents: 0,
            issued_at: Utc::now(),
            linked_booking_id: None,
            sync: SyncState::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub business_id: BusinessId,
    pub title: String,
    /// Enum-backed text, see `ContractStatus`.
    pub status: String,
    pub sync: SyncState,
}

impl Contract {
    pub fn new(business_id: BusinessId, title: impl Into<String>) -> Self {
        Self {
            id: ContractId::new(),
            business_id,
            title: title.into(),
            status: ContractStatus::default().as_str().to_string(),
            sync: SyncState::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub business_id: BusinessId,
    pub title: String,
    /// Enum-backed text, see `JobStage`.
    pub stage: String,
    /// Set when the job was created from an external booking flow.
    pub source_origin_id: Option<String>,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(business_id: BusinessId, title: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            id: JobId::new(),
            business_id,
            title: title.into(),
            stage: JobStage::default().as_str().to_string(),
            source_origin_id: None,
            start_date,
            created_at: Utc::now(),
        }
    }

    /// Whether this job came from an automated booking flow. Empty string is
    /// not a valid "set" value in this model.
    pub fn has_booking_origin(&self) -> bool {
        self.source_origin_id
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }
}
