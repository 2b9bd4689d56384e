//! Donation promises.

pub mod export;
mod seed;
pub mod store;
pub mod types;

pub use export::{CSV_HEADERS, promises_to_csv};
pub use store::PromiseStore;
pub use types::{NewPromise, Promise, PromiseCategory, PromiseStatus, PromiseUpdate};
