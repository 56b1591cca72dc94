//! Query engine: free-text filtering and stable sorting over a roster.
//!
//! Every view of the roster goes through [`query`], so the store and the
//! HTTP routes can never disagree about what a query means.

use std::str::FromStr;

use feruca::Collator;
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::person::Person;

/// Field the result is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Numeric order of the roll number.
    #[default]
    Roll,
    Name,
    BloodGroup,
    Hometown,
}

impl SortKey {
    /// Returns the key as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Roll => "roll",
            SortKey::Name => "name",
            SortKey::BloodGroup => "bloodGroup",
            SortKey::Hometown => "hometown",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DirectoryError;

    /// Parses a sort key, ignoring case and `_`/`-` separators.
    ///
    /// Unknown keys are an error rather than a silent fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "roll" => Ok(SortKey::Roll),
            "name" => Ok(SortKey::Name),
            "bloodgroup" => Ok(SortKey::BloodGroup),
            "hometown" => Ok(SortKey::Hometown),
            _ => Err(DirectoryError::InvalidSortKey(s.to_string())),
        }
    }
}

/// The current free-text filter and sort key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    /// Case-insensitive substring filter; empty matches everyone.
    pub free_text_query: String,
    pub sort_key: SortKey,
}

impl QueryState {
    /// Creates the default state: no filter, sorted by roll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text filter.
    pub fn free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text_query = text.into();
        self
    }

    /// Sets the sort key.
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// The normalized needle, or `None` when the filter is blank.
    fn needle(&self) -> Option<String> {
        let trimmed = self.free_text_query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

/// Returns true if `person` matches the lowercased `needle` in any
/// searchable field.
fn matches(person: &Person, needle: &str) -> bool {
    [
        &person.name,
        &person.roll,
        &person.blood_group,
        &person.hometown,
        &person.phone,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Roll ordering key: `None` (non-numeric roll) orders before every number,
/// and digit strings compare by length before lexically.
fn roll_key(person: &Person) -> Option<(usize, String)> {
    person
        .roll_digits()
        .map(|digits| (digits.len(), digits.to_string()))
}

fn sort_text(person: &Person, key: SortKey) -> &str {
    match key {
        SortKey::Roll => &person.roll,
        SortKey::Name => &person.name,
        SortKey::BloodGroup => &person.blood_group,
        SortKey::Hometown => &person.hometown,
    }
}

/// Filters and sorts `roster` according to `state`.
///
/// The result is a fresh vector; the roster is not modified. Persons with
/// equal sort keys keep their roster order. Never fails: an empty roster or a
/// filter that matches nothing yields an empty vector.
///
/// Text keys are ordered with the Unicode Collation Algorithm (CLDR root
/// collation), so accented letters sort next to their base letter. Texts
/// that collate equal fall back to a byte comparison.
pub fn query(roster: &[Person], state: &QueryState) -> Vec<Person> {
    let mut result: Vec<Person> = match state.needle() {
        None => roster.to_vec(),
        Some(needle) => roster
            .iter()
            .filter(|p| matches(p, &needle))
            .cloned()
            .collect(),
    };

    // both sorts are stable
    match state.sort_key {
        SortKey::Roll => result.sort_by_cached_key(roll_key),
        key => {
            let mut collator = Collator::default();
            result.sort_by(|a, b| {
                let (a, b) = (sort_text(a, key), sort_text(b, key));
                collator.collate(a, b).then_with(|| a.cmp(b))
            });
        }
    }
    result
}
