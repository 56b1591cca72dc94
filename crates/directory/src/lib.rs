//! Core of the student directory.
//!
//! This crate provides:
//! - [`Person`] records and their closed-set attributes
//! - The query engine ([`query`]) that filters and sorts a roster
//! - Access rules: [`Role`] to [`Permission`] lookup and the sign-up email gate
//! - Display [`Preferences`] resolved by the application at start-up

pub mod access;
pub mod error;
pub mod person;
pub mod preferences;
pub mod query;
pub mod summary;

pub use access::{EmailDomainPolicy, Permission, Role};
pub use common::PersonId;
pub use error::{DirectoryError, Result};
pub use person::{AffiliationGroup, Person, Status};
pub use preferences::{Layout, Motion, Preferences, Theme};
pub use query::{QueryState, SortKey, query};
pub use summary::{DirectorySummary, summarize};
