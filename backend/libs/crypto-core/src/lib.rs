//! Shared token handling for Lectern services.
pub mod jwt;
