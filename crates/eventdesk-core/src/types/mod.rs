//! Core type definitions used across the EventDesk workspace.

pub mod id;

pub use id::*;
