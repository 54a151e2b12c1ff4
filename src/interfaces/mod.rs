//! Adapters between the host's file formats and the registry.

pub mod csv;
pub mod json;
