//! Web handlers module
//!
//! HTTP request handlers organized by domain. Each handler validates its
//! input and delegates to [`crate::services::ListingService`].

pub mod categories;
pub mod health;
pub mod images;
pub mod index;
pub mod items;
