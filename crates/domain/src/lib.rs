//! Domain layer for the bookings backend.
//!
//! This crate contains:
//! - Domain models (Membership, Team, Booking, TeamGroupMapping)
//! - Business logic services (accessible users, booking rows and actions,
//!   team-group-mapping authorization)
//! - Domain error types

pub mod models;
pub mod services;
