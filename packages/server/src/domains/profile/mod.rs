//! Profile domain - per-identity profile records
//!
//! Profiles are created lazily and carry the linked phone number. The
//! linking operation itself lives in the auth domain.

pub mod actions;
pub mod data;
pub mod models;
