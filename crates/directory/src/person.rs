//! Person records held in the roster.

use common::PersonId;
use serde::{Deserialize, Serialize};

/// The house a person is sorted into.
///
/// Closed set: every person belongs to exactly one of the four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AffiliationGroup {
    Gryffindor,
    Hufflepuff,
    Ravenclaw,
    Slytherin,
}

impl AffiliationGroup {
    /// All groups, in display order.
    pub const ALL: [AffiliationGroup; 4] = [
        AffiliationGroup::Gryffindor,
        AffiliationGroup::Hufflepuff,
        AffiliationGroup::Ravenclaw,
        AffiliationGroup::Slytherin,
    ];

    /// Returns the group name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AffiliationGroup::Gryffindor => "Gryffindor",
            AffiliationGroup::Hufflepuff => "Hufflepuff",
            AffiliationGroup::Ravenclaw => "Ravenclaw",
            AffiliationGroup::Slytherin => "Slytherin",
        }
    }
}

impl std::fmt::Display for AffiliationGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a person is currently enrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

/// A single roster entry.
///
/// Records are immutable once fetched from the provider. Free-text fields
/// that the provider omits deserialize to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    /// Roster number, digits as text.
    #[serde(default)]
    pub roll: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hometown: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub contact_handle: String,
    #[serde(default)]
    pub avatar_ref: String,
    pub affiliation_group: AffiliationGroup,
    /// Roll number within the affiliation group.
    #[serde(default)]
    pub affiliation_roll: String,
    #[serde(default)]
    pub status: Status,
}

impl Person {
    /// Creates an active person with the given id, roll and name.
    ///
    /// The remaining attributes start empty and can be filled in with the
    /// `with_*` methods.
    pub fn new(
        id: impl Into<PersonId>,
        roll: impl Into<String>,
        name: impl Into<String>,
        affiliation_group: AffiliationGroup,
    ) -> Self {
        Self {
            id: id.into(),
            roll: roll.into(),
            name: name.into(),
            hometown: String::new(),
            phone: String::new(),
            blood_group: String::new(),
            contact_handle: String::new(),
            avatar_ref: String::new(),
            affiliation_group,
            affiliation_roll: String::new(),
            status: Status::Active,
        }
    }

    pub fn with_hometown(mut self, hometown: impl Into<String>) -> Self {
        self.hometown = hometown.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_blood_group(mut self, blood_group: impl Into<String>) -> Self {
        self.blood_group = blood_group.into();
        self
    }

    pub fn with_contact_handle(mut self, handle: impl Into<String>) -> Self {
        self.contact_handle = handle.into();
        self
    }

    pub fn with_affiliation_roll(mut self, roll: impl Into<String>) -> Self {
        self.affiliation_roll = roll.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// The roll's decimal digits without leading zeros, or `None` if the
    /// trimmed roll is empty or contains anything but ASCII digits.
    ///
    /// Unlike [`numeric_roll`](Self::numeric_roll) this has no upper bound,
    /// so it is what roll ordering is built on.
    pub fn roll_digits(&self) -> Option<&str> {
        let roll = self.roll.trim();
        if roll.is_empty() || !roll.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let significant = roll.trim_start_matches('0');
        Some(if significant.is_empty() { "0" } else { significant })
    }

    /// Numeric value of the roll.
    ///
    /// `None` if the roll is not all digits (see [`roll_digits`](Self::roll_digits))
    /// or does not fit in a `u64`.
    pub fn numeric_roll(&self) -> Option<u64> {
        self.roll_digits()?.parse().ok()
    }

    /// Returns true if the person is currently active.
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}
