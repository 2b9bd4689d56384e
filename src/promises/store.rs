use chrono::Utc;
use tracing::info;

use crate::entity_store::{Entity, EntityStore, generate_id};
use crate::error::{PortalError, PortalResult};
use crate::promises::export::promises_to_csv;
use crate::promises::seed::seed_promises;
use crate::promises::types::{NewPromise, Promise, PromiseCategory, PromiseStatus, PromiseUpdate};

impl Entity for Promise {
    const COLLECTION: &'static str = "promises";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed_promises()
    }
}

pub type PromiseStore = EntityStore<Promise>;

impl EntityStore<Promise> {
    pub fn create(&mut self, input: NewPromise) -> Promise {
        let now = Utc::now();
        let promise = Promise {
            id: generate_id(),
            title: input.title,
            description: input.description,
            amount: input.amount,
            currency: input.currency,
            category: input.category,
            status: input.status,
            due_date: input.due_date,
            fulfilled_at: (input.status == PromiseStatus::Fulfilled).then_some(now),
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
            notes: input.notes,
        };
        info!(id = %promise.id, title = %promise.title, status = %promise.status, "promise created");
        self.push(promise)
    }

    pub fn update(&mut self, id: &str, changes: PromiseUpdate) -> PortalResult<Promise> {
        let missing = id.to_string();
        self.modify(id, move || PortalError::PromiseNotFound(missing), |promise| {
            changes.apply_to(promise, Utc::now());
            Ok(())
        })
    }

    /// Moves the promise to fulfilled; `notes` replaces any existing notes,
    /// and `None` clears them.
    pub fn mark_as_fulfilled(&mut self, id: &str, notes: Option<String>) -> PortalResult<Promise> {
        self.update(
            id,
            PromiseUpdate {
                status: Some(PromiseStatus::Fulfilled),
                notes: Some(notes),
                ..PromiseUpdate::default()
            },
        )
    }

    pub fn filter_by_status(&self, status: PromiseStatus) -> Vec<Promise> {
        self.filter(|p| p.status == status)
    }

    pub fn filter_by_category(&self, category: PromiseCategory) -> Vec<Promise> {
        self.filter(|p| p.category == category)
    }

    pub fn export_csv(&self) -> String {
        promises_to_csv(self.list())
    }
}
