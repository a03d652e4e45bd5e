//! Villa rental operations dashboard: the villa record lifecycle, its
//! summary statistics, and the form and deletion flows around them.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod store;

pub use dashboard::{Aggregates, DeletionFlow, FormSession, VillaRepository, ViewRouter};
pub use error::DashboardError;
pub use models::{NewVilla, Villa, VillaId};
