//! # eventdesk-entity
//!
//! Domain entity models for EventDesk. Database entities derive
//! `sqlx::FromRow`; value objects that leave the core (profiles, token
//! pairs) never carry password hashes or raw store fields.

pub mod token;
pub mod user;
