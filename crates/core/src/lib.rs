//! Core business logic for circles.
//!
//! Every circle-scoped rule (membership, ownership, admin role, order state)
//! is enforced here; repositories below this layer only move rows.

pub mod services;

pub use services::*;
