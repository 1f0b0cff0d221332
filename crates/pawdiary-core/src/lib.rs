//! pawdiary-core - Core library for Pawdiary
//!
//! This crate contains the shared models, the remote document-store seam,
//! the live collection synchronizers, and the mutation/edit-session logic
//! used by every Pawdiary interface. Rendering, form widgets, and charting
//! are the host application's business; everything here is UI-agnostic.

pub mod age;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
pub mod sync;
pub mod view;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use models::{Category, CategoryFilter, FoodRecord, RecordId, ShoppingItem, WeightRecord};
