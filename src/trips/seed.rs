use crate::entity_store::calendar_date;
use crate::trips::types::{ChecklistCategory, ChecklistItem, Priority, Trip, TripStatus};

pub(crate) fn seed_trips() -> Vec<Trip> {
    vec![
        Trip {
            id: "1".to_string(),
            title: "Kenya Educational Visit".to_string(),
            description: "Visit schools and educational facilities in Kenya".to_string(),
            destination: "Nairobi, Kenya".to_string(),
            start_date: calendar_date(2024, 3, 15),
            end_date: calendar_date(2024, 3, 25),
            status: TripStatus::Planning,
            checklist: seed_checklist(),
            created_by: "donor@amani.org".to_string(),
            created_at: calendar_date(2024, 1, 15),
            updated_at: calendar_date(2024, 1, 15),
        },
        Trip {
            id: "2".to_string(),
            title: "Tanzania Water Project Visit".to_string(),
            description: "Inspect water well installations and meet beneficiaries".to_string(),
            destination: "Arusha, Tanzania".to_string(),
            start_date: calendar_date(2024, 5, 10),
            end_date: calendar_date(2024, 5, 20),
            status: TripStatus::Active,
            checklist: seed_checklist(),
            created_by: "donor@amani.org".to_string(),
            created_at: calendar_date(2024, 2, 1),
            updated_at: calendar_date(2024, 2, 15),
        },
    ]
}

fn seed_checklist() -> Vec<ChecklistItem> {
    vec![
        ChecklistItem {
            id: "1".to_string(),
            title: "Get Travel Visa".to_string(),
            description: "Apply for and obtain travel visa".to_string(),
            category: ChecklistCategory::Documentation,
            is_completed: false,
            due_date: Some(calendar_date(2024, 2, 15)),
            completed_at: None,
            priority: Priority::High,
        },
        ChecklistItem {
            id: "2".to_string(),
            title: "Book Flights".to_string(),
            description: "Book round-trip flights".to_string(),
            category: ChecklistCategory::Travel,
            is_completed: true,
            due_date: None,
            completed_at: Some(calendar_date(2024, 1, 20)),
            priority: Priority::High,
        },
        ChecklistItem {
            id: "3".to_string(),
            title: "Get Vaccinations".to_string(),
            description: "Required vaccinations for travel".to_string(),
            category: ChecklistCategory::Health,
            is_completed: false,
            due_date: Some(calendar_date(2024, 2, 28)),
            completed_at: None,
            priority: Priority::Medium,
        },
        ChecklistItem {
            id: "4".to_string(),
            title: "Pack Equipment".to_string(),
            description: "Pack camera and recording equipment".to_string(),
            category: ChecklistCategory::Preparation,
            is_completed: false,
            due_date: None,
            completed_at: None,
            priority: Priority::Low,
        },
    ]
}
