//! Shared types used across the student directory crates.

pub mod types;

pub use types::PersonId;
