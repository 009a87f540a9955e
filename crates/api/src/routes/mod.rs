//! HTTP route handlers.

pub mod bookings;
pub mod health;
pub mod organizations;
pub mod team_group_mappings;
