//! Many-to-many relationships persisted alongside design objects.
//!
//! Setters that configure relationships do not mutate a field; they fill
//! [`AssociationSets`] buckets that the store applies as set operations when
//! the owning object is saved.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Relationship family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssociationType {
    /// Templates a content type may be rendered with.
    ContentTypeTemplate,
    /// `(content type, template)` pairs allowed in a slot.
    SlotContent,
    /// Content types a workflow is allowed for.
    WorkflowContentType,
}

impl fmt::Display for AssociationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContentTypeTemplate => "content-type-template",
            Self::SlotContent => "slot-content",
            Self::WorkflowContentType => "workflow-content-type",
        })
    }
}

/// Set operation requested for an association.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssociationOp {
    /// Add members that are not yet present.
    Merge,
    /// Remove members that are present.
    Delete,
}

/// Members related to one owning object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Name of the owning object.
    pub owner: String,
    /// Related object names.
    pub members: Vec<String>,
}

/// Separator used to encode a pair member.
const PAIR_SEPARATOR: char = ':';

impl Association {
    /// Encode a pair member such as a slot's `(content type, template)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propsetter::association::Association;
    ///
    /// assert_eq!(Association::pair_member("Article", "Snippet"), "Article:Snippet");
    /// ```
    #[must_use]
    pub fn pair_member(first: &str, second: &str) -> String {
        format!("{first}{PAIR_SEPARATOR}{second}")
    }
}

/// MERGE and DELETE buckets for every association type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssociationSets {
    buckets: BTreeMap<(AssociationType, AssociationOp), Vec<Association>>,
}

impl AssociationSets {
    /// Queue `members` of `owner` for `op`. Empty member lists are ignored.
    ///
    /// Returns `true` when anything was queued.
    pub fn push(
        &mut self,
        kind: AssociationType,
        op: AssociationOp,
        owner: &str,
        members: Vec<String>,
    ) -> bool {
        if members.is_empty() {
            return false;
        }
        self.buckets.entry((kind, op)).or_default().push(Association {
            owner: owner.to_owned(),
            members,
        });
        true
    }

    /// Associations queued for `kind` and `op`.
    #[must_use]
    pub fn bucket(&self, kind: AssociationType, op: AssociationOp) -> &[Association] {
        self.buckets.get(&(kind, op)).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` when no association is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Apply every bucket to `table`: merges add members, deletes remove them.
    ///
    /// Merges run before deletes so a member that is both added and removed
    /// in one save ends up absent.
    pub fn apply_to(&self, table: &mut AssociationTable) {
        for ((kind, op), associations) in &self.buckets {
            for association in associations {
                let members = table
                    .entry(*kind)
                    .or_default()
                    .entry(association.owner.clone())
                    .or_default();
                match op {
                    AssociationOp::Merge => members.extend(association.members.iter().cloned()),
                    AssociationOp::Delete => {
                        for member in &association.members {
                            members.remove(member);
                        }
                    }
                }
            }
        }
        for owners in table.values_mut() {
            owners.retain(|_, members| !members.is_empty());
        }
        table.retain(|_, owners| !owners.is_empty());
    }
}

/// Persisted associations: type, then owner, then members.
pub type AssociationTable = BTreeMap<AssociationType, BTreeMap<String, BTreeSet<String>>>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn merge_then_delete_leaves_the_difference() {
        let mut sets = AssociationSets::default();
        let kind = AssociationType::ContentTypeTemplate;
        assert!(sets.push(kind, AssociationOp::Merge, "Article", vec!["Page".into(), "Snippet".into()]));
        assert!(sets.push(kind, AssociationOp::Delete, "Article", vec!["Snippet".into()]));
        assert!(!sets.push(kind, AssociationOp::Delete, "Article", Vec::new()));

        let mut table = AssociationTable::new();
        sets.apply_to(&mut table);
        let members: Vec<&str> = table[&kind]["Article"].iter().map(String::as_str).collect();
        assert_eq!(members, ["Page"]);
    }

    #[rstest]
    fn emptied_owners_are_pruned() {
        let kind = AssociationType::WorkflowContentType;
        let mut table = AssociationTable::new();
        let mut add = AssociationSets::default();
        add.push(kind, AssociationOp::Merge, "Editorial", vec!["Article".into()]);
        add.apply_to(&mut table);

        let mut remove = AssociationSets::default();
        remove.push(kind, AssociationOp::Delete, "Editorial", vec!["Article".into()]);
        remove.apply_to(&mut table);
        assert!(table.is_empty());
    }
}
