use chrono::Utc;
use tracing::info;

use crate::entity_store::{Entity, EntityStore, generate_id};
use crate::error::{PortalError, PortalResult};
use crate::trips::seed::seed_trips;
use crate::trips::types::{
    ChecklistCategory, ChecklistItem, ChecklistItemUpdate, NewChecklistItem, NewTrip, Trip,
    TripStatus, TripUpdate,
};

impl Entity for Trip {
    const COLLECTION: &'static str = "trips";

    fn id(&self) -> &str {
        &self.id
    }

    fn seed() -> Vec<Self> {
        seed_trips()
    }
}

pub type TripStore = EntityStore<Trip>;

fn trip_not_found(id: &str) -> impl FnOnce() -> PortalError {
    let id = id.to_string();
    move || PortalError::TripNotFound(id)
}

impl EntityStore<Trip> {
    pub fn create(&mut self, input: NewTrip) -> Trip {
        let now = Utc::now();
        let checklist = input
            .checklist
            .into_iter()
            .map(|item| item.into_item(generate_id(), now))
            .collect();
        let trip = Trip {
            id: generate_id(),
            title: input.title,
            description: input.description,
            destination: input.destination,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status,
            checklist,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        info!(id = %trip.id, title = %trip.title, "trip created");
        self.push(trip)
    }

    pub fn update(&mut self, id: &str, changes: TripUpdate) -> PortalResult<Trip> {
        self.modify(id, trip_not_found(id), |trip| {
            changes.apply_to(trip);
            trip.updated_at = Utc::now();
            Ok(())
        })
    }

    pub fn add_checklist_item(&mut self, trip_id: &str, item: NewChecklistItem) -> PortalResult<Trip> {
        self.modify(trip_id, trip_not_found(trip_id), |trip| {
            let now = Utc::now();
            trip.checklist.push(item.into_item(generate_id(), now));
            trip.updated_at = now;
            Ok(())
        })
    }

    pub fn update_checklist_item(
        &mut self,
        trip_id: &str,
        item_id: &str,
        changes: ChecklistItemUpdate,
    ) -> PortalResult<Trip> {
        self.modify(trip_id, trip_not_found(trip_id), |trip| {
            let item = trip
                .checklist
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| PortalError::ChecklistItemNotFound(item_id.to_string()))?;
            let now = Utc::now();
            changes.apply_to(item, now);
            trip.updated_at = now;
            Ok(())
        })
    }

    pub fn filter_by_status(&self, status: TripStatus) -> Vec<Trip> {
        self.filter(|trip| trip.status == status)
    }

    pub fn checklist_by_category(
        &self,
        trip_id: &str,
        category: ChecklistCategory,
    ) -> PortalResult<Vec<ChecklistItem>> {
        let trip = self
            .get_by_id(trip_id)
            .ok_or_else(trip_not_found(trip_id))?;
        Ok(trip
            .checklist
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }

    pub fn completed_count(&self, trip_id: &str) -> PortalResult<usize> {
        self.get_by_id(trip_id)
            .map(Trip::completed_count)
            .ok_or_else(trip_not_found(trip_id))
    }

    pub fn progress_percentage(&self, trip_id: &str) -> PortalResult<u8> {
        self.get_by_id(trip_id)
            .map(Trip::progress_percentage)
            .ok_or_else(trip_not_found(trip_id))
    }
}
