//! Flat CSV rendering of a promise collection.

use chrono::{DateTime, Utc};

use crate::promises::types::Promise;

pub const CSV_HEADERS: [&str; 9] = [
    "Title",
    "Description",
    "Category",
    "Status",
    "Amount",
    "Currency",
    "Due Date",
    "Fulfilled Date",
    "Notes",
];

/// Header row first, then one row per promise. Every field is double-quoted
/// and embedded quotes are doubled; rows are joined with `\n`.
pub fn promises_to_csv(promises: &[Promise]) -> String {
    let header = CSV_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    std::iter::once(header)
        .chain(promises.iter().map(promise_row))
        .map(|row| {
            row.iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn promise_row(p: &Promise) -> Vec<String> {
    vec![
        p.title.clone(),
        p.description.clone(),
        p.category.to_string(),
        p.status.to_string(),
        p.amount.map(|a| a.to_string()).unwrap_or_default(),
        p.currency.clone().unwrap_or_default(),
        p.due_date.as_ref().map(short_date).unwrap_or_default(),
        p.fulfilled_at.as_ref().map(short_date).unwrap_or_default(),
        p.notes.clone().unwrap_or_default(),
    ]
}

/// `M/D/YYYY`, no zero padding.
fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promises::seed::seed_promises;

    #[test]
    fn empty_collection_is_just_the_header() {
        assert_eq!(
            promises_to_csv(&[]),
            r#""Title","Description","Category","Status","Amount","Currency","Due Date","Fulfilled Date","Notes""#
        );
    }

    #[test]
    fn renders_seed_rows() {
        let csv = promises_to_csv(&seed_promises());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[1],
            r#""Monthly Donation","Regular monthly donation of $500","financial","fulfilled","500","USD","2/1/2024","1/28/2024","Fulfilled via bank transfer""#
        );
        assert_eq!(
            lines[2],
            r#""Volunteer Time","Commit 20 hours of volunteer work","volunteer","in-progress","","","3/31/2024","","8 hours completed so far""#
        );
    }

    #[test]
    fn fractional_amounts_and_quotes() {
        let mut p = seed_promises().remove(0);
        p.amount = Some(12.5);
        p.notes = Some(r#"said "thanks""#.into());
        let csv = promises_to_csv(&[p]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(r#","12.5","#));
        assert!(row.ends_with(r#""said ""thanks""""#));
    }
}
