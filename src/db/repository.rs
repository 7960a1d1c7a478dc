//! Lead repository over the key-value store.
//!
//! Each lead is one JSON document under `lead:<id>` in the private scope.
//! There is no locking: concurrent writers to the same id are last-write-wins.

use std::sync::Arc;

use chrono::Utc;

use crate::errors::{AppError, DuplicateField};
use crate::models::{normalized_email, normalized_phone, Lead, LeadBook, LeadUpdate, NewLead};
use crate::store::{KeyValueStore, Scope};

/// Key prefix shared by every lead record.
pub const LEAD_KEY_PREFIX: &str = "lead:";

const LEAD_SCOPE: Scope = Scope::Private;

fn lead_key(id: &str) -> String {
    format!("{}{}", LEAD_KEY_PREFIX, id)
}

/// Repository for lead records.
#[derive(Clone)]
pub struct LeadRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LeadRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load every lead in store order.
    ///
    /// Records that fail to parse, or vanish between listing and reading,
    /// are skipped with a warning. Store failures fail the whole listing.
    pub async fn list_all(&self) -> Result<LeadBook, AppError> {
        let keys = self.store.list(LEAD_KEY_PREFIX, LEAD_SCOPE).await?;
        let mut leads = Vec::with_capacity(keys.len());

        for key in keys {
            let Some(raw) = self.store.get(&key, LEAD_SCOPE).await? else {
                tracing::warn!("Lead record {} disappeared during listing", key);
                continue;
            };
            match serde_json::from_str::<Lead>(&raw) {
                Ok(lead) => leads.push(lead),
                Err(e) => tracing::warn!("Skipping corrupt lead record {}: {}", key, e),
            }
        }

        tracing::debug!("Loaded {} leads", leads.len());
        Ok(LeadBook::new(leads))
    }

    /// Get a lead by ID.
    pub async fn get(&self, id: &str) -> Result<Lead, AppError> {
        let raw = self
            .store
            .get(&lead_key(id), LEAD_SCOPE)
            .await?
            .ok_or_else(|| AppError::lead_not_found(id))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Create a new lead.
    ///
    /// Fails with `Duplicate` when the email (case-insensitive) or the phone
    /// digits match an existing lead.
    pub async fn create(&self, new_lead: NewLead) -> Result<Lead, AppError> {
        let existing = self.list_all().await?;
        if let Some(field) = find_duplicate(&existing, &new_lead) {
            tracing::info!("Rejected duplicate lead on {}", field.as_str());
            return Err(AppError::duplicate(field));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let lead = new_lead.into_lead(id, Utc::now());
        self.write(&lead).await?;

        tracing::info!(
            "Created lead {} for {} from {}",
            lead.id,
            lead.manager,
            lead.source.as_str()
        );
        Ok(lead)
    }

    /// Replace a lead. `id`, `created_at` and `kpi` keep their stored values.
    pub async fn update(&self, id: &str, record: LeadUpdate) -> Result<Lead, AppError> {
        let existing = self.get(id).await?;

        let lead = record.apply_to(existing);
        self.write(&lead).await?;

        tracing::info!("Updated lead {} (status {})", id, lead.status.as_str());
        Ok(lead)
    }

    /// Delete a lead. Deleting a missing id is `NotFound`.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let key = lead_key(id);
        if self.store.get(&key, LEAD_SCOPE).await?.is_none() {
            return Err(AppError::lead_not_found(id));
        }

        self.store.delete(&key, LEAD_SCOPE).await?;
        tracing::info!("Deleted lead {}", id);
        Ok(())
    }

    async fn write(&self, lead: &Lead) -> Result<(), AppError> {
        let value = serde_json::to_string(lead)?;
        self.store
            .set(&lead_key(&lead.id), &value, LEAD_SCOPE)
            .await?;
        Ok(())
    }
}

/// First contact field of `candidate` already used by another lead.
fn find_duplicate(existing: &[Lead], candidate: &NewLead) -> Option<DuplicateField> {
    if let Some(email) = normalized_email(&candidate.email) {
        if existing
            .iter()
            .any(|l| normalized_email(&l.email).as_deref() == Some(email.as_str()))
        {
            return Some(DuplicateField::Email);
        }
    }

    if let Some(phone) = normalized_phone(&candidate.phone) {
        if existing
            .iter()
            .any(|l| normalized_phone(&l.phone).as_deref() == Some(phone.as_str()))
        {
            return Some(DuplicateField::Phone);
        }
    }

    None
}
