use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Badge, UnknownLabel};

/// A set of selected badges
///
/// Membership only: duplicates collapse and iteration follows vocabulary
/// order regardless of the order the badges were picked in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeSet(BTreeSet<Badge>);

impl BadgeSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses user-supplied labels, failing on the first unknown one
    pub fn parse<S: AsRef<str>>(labels: &[S]) -> Result<Self, UnknownLabel> {
        labels
            .iter()
            .map(|label| label.as_ref().parse::<Badge>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, badge: Badge) -> bool {
        self.0.contains(&badge)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Badge> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Badge> {
        self.iter().collect()
    }
}

impl FromIterator<Badge> for BadgeSet {
    fn from_iter<I: IntoIterator<Item = Badge>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
