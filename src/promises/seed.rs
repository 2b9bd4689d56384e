use crate::entity_store::calendar_date;
use crate::promises::types::{Promise, PromiseCategory, PromiseStatus};

pub(crate) fn seed_promises() -> Vec<Promise> {
    vec![
        Promise {
            id: "1".to_string(),
            title: "Monthly Donation".to_string(),
            description: "Regular monthly donation of $500".to_string(),
            amount: Some(500.0),
            currency: Some("USD".to_string()),
            category: PromiseCategory::Financial,
            status: PromiseStatus::Fulfilled,
            due_date: Some(calendar_date(2024, 2, 1)),
            fulfilled_at: Some(calendar_date(2024, 1, 28)),
            created_by: "donor@amani.org".to_string(),
            created_at: calendar_date(2024, 1, 1),
            updated_at: calendar_date(2024, 1, 28),
            notes: Some("Fulfilled via bank transfer".to_string()),
        },
        Promise {
            id: "2".to_string(),
            title: "Volunteer Time".to_string(),
            description: "Commit 20 hours of volunteer work".to_string(),
            amount: None,
            currency: None,
            category: PromiseCategory::Volunteer,
            status: PromiseStatus::InProgress,
            due_date: Some(calendar_date(2024, 3, 31)),
            fulfilled_at: None,
            created_by: "donor@amani.org".to_string(),
            created_at: calendar_date(2024, 1, 15),
            updated_at: calendar_date(2024, 2, 1),
            notes: Some("8 hours completed so far".to_string()),
        },
        Promise {
            id: "3".to_string(),
            title: "Equipment Donation".to_string(),
            description: "Donate 10 laptops for educational program".to_string(),
            amount: None,
            currency: None,
            category: PromiseCategory::Resource,
            status: PromiseStatus::Pending,
            due_date: Some(calendar_date(2024, 4, 15)),
            fulfilled_at: None,
            created_by: "donor@amani.org".to_string(),
            created_at: calendar_date(2024, 2, 1),
            updated_at: calendar_date(2024, 2, 1),
            notes: None,
        },
        Promise {
            id: "4".to_string(),
            title: "Social Media Promotion".to_string(),
            description: "Share organization posts on social media".to_string(),
            amount: None,
            currency: None,
            category: PromiseCategory::Advocacy,
            status: PromiseStatus::Fulfilled,
            due_date: None,
            fulfilled_at: Some(calendar_date(2024, 1, 20)),
            created_by: "donor@amani.org".to_string(),
            created_at: calendar_date(2024, 1, 10),
            updated_at: calendar_date(2024, 1, 20),
            notes: None,
        },
    ]
}
