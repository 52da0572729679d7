//! Chambers domain - the service-provider directory
//!
//! A chamber is a professional offering services in the marketplace.
//! Profiles go through an admin approval workflow before appearing in the
//! public directory; reviews maintain rating aggregates on the chamber row.

pub mod actions;
pub mod data;
pub mod models;
