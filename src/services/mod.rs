//! Service layer
//!
//! Business rules that span more than one repository or the image store
//! live here, keeping HTTP handlers thin.

pub mod listing;

pub use listing::ListingService;
