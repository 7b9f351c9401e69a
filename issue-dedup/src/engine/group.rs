//! Duplicate group types.

use crate::issue::IssueRecord;
use crate::similarity::SimilarityBreakdown;

/// An issue judged to duplicate a group's primary.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMember<'a> {
    /// The duplicate issue.
    pub issue: &'a IssueRecord,

    /// Overall similarity to the primary.
    pub score: f64,

    /// Per-feature similarity to the primary.
    pub breakdown: SimilarityBreakdown,
}

/// A primary issue and the issues matched against it.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup<'a> {
    /// Representative issue of the group.
    pub primary: &'a IssueRecord,

    /// Matched duplicates, in input order.
    pub members: Vec<DuplicateMember<'a>>,
}

impl<'a> DuplicateGroup<'a> {
    /// Opens an empty group around `primary`.
    #[must_use]
    pub fn new(primary: &'a IssueRecord) -> Self {
        Self {
            primary,
            members: Vec::new(),
        }
    }

    /// Number of duplicates in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if no duplicate was matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Issue numbers of the duplicates, in match order.
    #[must_use]
    pub fn member_numbers(&self) -> Vec<u64> {
        self.members.iter().map(|m| m.issue.number).collect()
    }
}
