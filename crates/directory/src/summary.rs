//! Headcounts for the directory landing page.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::person::{AffiliationGroup, Person};

/// Counts over a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Headcount per affiliation group; every group is present, even at zero.
    pub per_group: BTreeMap<AffiliationGroup, usize>,
}

/// Computes the summary for `roster`.
pub fn summarize(roster: &[Person]) -> DirectorySummary {
    let mut per_group: BTreeMap<AffiliationGroup, usize> =
        AffiliationGroup::ALL.iter().map(|g| (*g, 0)).collect();
    let mut active = 0;

    for person in roster {
        *per_group.entry(person.affiliation_group).or_default() += 1;
        if person.is_active() {
            active += 1;
        }
    }

    DirectorySummary {
        total: roster.len(),
        active,
        inactive: roster.len() - active,
        per_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Status;

    #[test]
    fn empty_roster_has_all_groups_at_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.per_group.len(), 4);
        assert!(summary.per_group.values().all(|n| *n == 0));
    }

    #[test]
    fn counts_groups_and_status() {
        let roster = vec![
            Person::new("1", "1", "Harry", AffiliationGroup::Gryffindor),
            Person::new("2", "2", "Hermione", AffiliationGroup::Gryffindor),
            Person::new("3", "3", "Luna", AffiliationGroup::Ravenclaw)
                .with_status(Status::Inactive),
        ];
        let summary = summarize(&roster);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.per_group[&AffiliationGroup::Gryffindor], 2);
        assert_eq!(summary.per_group[&AffiliationGroup::Ravenclaw], 1);
        assert_eq!(summary.per_group[&AffiliationGroup::Slytherin], 0);
    }
}
