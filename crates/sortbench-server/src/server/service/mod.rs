//! Request handling for the sort endpoints.
//!
//! ## Structure
//!
//! - [`router`] - Builds the axum [`Router`](axum::Router) and its layers.
//! - [`handler`] - Parses the body, times the sort and builds the response.
//! - [`error`] - Maps failures to JSON error responses.

pub mod error;
pub mod handler;
pub mod router;
