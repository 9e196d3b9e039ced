//! Infrastructure layer - adapters for the domain ports

pub mod logging;
pub mod user;
