//! Centralized error handling for the listing service
//!
//! Errors are split by layer: repositories report [`RepositoryError`], and
//! everything that can reach an HTTP handler is folded into [`AppError`],
//! which knows how to render itself as a `{"message": ...}` response.
//!
//! ```rust
//! use mercari_listing::errors::{AppError, AppResult};
//!
//! fn lookup(id: i64) -> AppResult<String> {
//!     Err(AppError::not_found("Item", id.to_string()))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;
