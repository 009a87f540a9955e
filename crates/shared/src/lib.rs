//! Shared utilities for the bookings backend.
//!
//! - Access token verification
//! - Query parameter validation helpers

pub mod jwt;
pub mod validation;
