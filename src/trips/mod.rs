//! Donor trips and their checklists.

mod seed;
pub mod store;
pub mod types;

pub use store::TripStore;
pub use types::{
    ChecklistCategory, ChecklistItem, ChecklistItemUpdate, NewChecklistItem, NewTrip, Priority,
    Trip, TripStatus, TripUpdate,
};
