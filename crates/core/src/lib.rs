//! Core business logic for sceau.

pub mod access;
pub mod metadata;
pub mod roles;
pub mod services;
pub mod status;

pub use services::*;
