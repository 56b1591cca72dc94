//! Roster store for the student directory.
//!
//! This crate owns the stateful side of the directory:
//! - [`PeopleProvider`] trait for the external source of person records
//! - [`RosterStore`] holding the roster, the query state, and the derived result
//! - [`Subscription`] handles for observers of the derived result

pub mod error;
pub mod provider;
pub mod store;
pub mod subscription;

pub use error::{FetchFailure, ProviderError, Result};
pub use provider::{InMemoryPeopleProvider, PeopleProvider, PeopleResponse};
pub use store::{DerivedResult, LoadOutcome, LoadState, RosterStatus, RosterStore};
pub use subscription::{Subscription, SubscriptionId};
