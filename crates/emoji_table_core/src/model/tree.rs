//! Ordered group → subgroup → entries container.
//!
//! # Invariants
//! - Iteration order equals insertion order at every level.
//! - Entries can only be pushed into the most recently opened subgroup of
//!   the most recently opened group.
//! - Re-opening an existing group or subgroup name appends to it instead of
//!   resetting it.

use indexmap::IndexMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ordered subgroup name → entries of one group.
pub type Subgroups<T> = IndexMap<String, Vec<T>>;

/// Structural misuse of [`GroupTree`] while building it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// A subgroup or entry arrived before any group was opened.
    NoOpenGroup,
    /// An entry arrived before any subgroup was opened in the current group.
    NoOpenSubgroup,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOpenGroup => write!(f, "no group header seen yet"),
            Self::NoOpenSubgroup => write!(f, "no subgroup header seen yet in current group"),
        }
    }
}

impl Error for TreeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    group: usize,
    subgroup: Option<usize>,
}

/// Ordered two-level taxonomy of emoji records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTree<T> {
    groups: IndexMap<String, Subgroups<T>>,
    cursor: Option<Cursor>,
}

impl<T> Default for GroupTree<T> {
    fn default() -> Self {
        Self {
            groups: IndexMap::new(),
            cursor: None,
        }
    }
}

impl<T> GroupTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or re-opens) a group; subsequent subgroups belong to it.
    pub fn open_group(&mut self, name: impl Into<String>) {
        let entry = self.groups.entry(name.into());
        let group = entry.index();
        entry.or_default();
        self.cursor = Some(Cursor {
            group,
            subgroup: None,
        });
    }

    /// Opens (or re-opens) a subgroup inside the current group.
    pub fn open_subgroup(&mut self, name: impl Into<String>) -> Result<(), TreeError> {
        let cursor = self.cursor.as_mut().ok_or(TreeError::NoOpenGroup)?;
        let (_, subgroups) = self
            .groups
            .get_index_mut(cursor.group)
            .ok_or(TreeError::NoOpenGroup)?;
        let entry = subgroups.entry(name.into());
        cursor.subgroup = Some(entry.index());
        entry.or_default();
        Ok(())
    }

    /// Appends an entry to the current subgroup.
    pub fn push(&mut self, item: T) -> Result<(), TreeError> {
        let cursor = self.cursor.ok_or(TreeError::NoOpenGroup)?;
        let subgroup = cursor.subgroup.ok_or(TreeError::NoOpenSubgroup)?;
        let (_, subgroups) = self
            .groups
            .get_index_mut(cursor.group)
            .ok_or(TreeError::NoOpenGroup)?;
        let (_, entries) = subgroups
            .get_index_mut(subgroup)
            .ok_or(TreeError::NoOpenSubgroup)?;
        entries.push(item);
        Ok(())
    }

    /// Iterates groups in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &Subgroups<T>)> {
        self.groups
            .iter()
            .map(|(name, subgroups)| (name.as_str(), subgroups))
    }

    /// Iterates every entry in traversal order (group, subgroup, entry).
    pub fn iter_entries(&self) -> impl Iterator<Item = &T> {
        self.groups
            .values()
            .flat_map(|subgroups| subgroups.values())
            .flatten()
    }

    /// Mutable variant of [`GroupTree::iter_entries`]; same order.
    pub fn iter_entries_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.groups
            .values_mut()
            .flat_map(|subgroups| subgroups.values_mut())
            .flatten()
    }

    /// Transforms every entry while keeping the whole structure and order.
    ///
    /// Stops at the first error.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<GroupTree<U>, E> {
        let mut groups = IndexMap::with_capacity(self.groups.len());
        for (group_name, subgroups) in self.groups {
            let mut mapped = IndexMap::with_capacity(subgroups.len());
            for (subgroup_name, entries) in subgroups {
                let entries = entries
                    .into_iter()
                    .map(&mut f)
                    .collect::<Result<Vec<U>, E>>()?;
                mapped.insert(subgroup_name, entries);
            }
            groups.insert(group_name, mapped);
        }
        Ok(GroupTree {
            groups,
            cursor: self.cursor,
        })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn subgroup_count(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    pub fn entry_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(|subgroups| subgroups.values())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupTree, TreeError};

    fn sample() -> GroupTree<u32> {
        let mut tree = GroupTree::new();
        tree.open_group("B");
        tree.open_subgroup("b2").unwrap();
        tree.push(1).unwrap();
        tree.open_subgroup("b1").unwrap();
        tree.push(2).unwrap();
        tree.push(3).unwrap();
        tree.open_group("A");
        tree.open_subgroup("a1").unwrap();
        tree.push(4).unwrap();
        tree
    }

    #[test]
    fn traversal_follows_insertion_order() {
        let tree = sample();
        let order: Vec<u32> = tree.iter_entries().copied().collect();
        assert_eq!(order, vec![1, 2, 3, 4]);

        let names: Vec<&str> = tree.groups().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn push_without_headers_is_rejected() {
        let mut tree = GroupTree::new();
        assert_eq!(tree.push(1), Err(TreeError::NoOpenGroup));
        assert_eq!(tree.open_subgroup("x"), Err(TreeError::NoOpenGroup));

        tree.open_group("g");
        assert_eq!(tree.push(1), Err(TreeError::NoOpenSubgroup));
    }

    #[test]
    fn reopened_subgroup_appends() {
        let mut tree = sample();
        tree.open_group("B");
        tree.open_subgroup("b2").unwrap();
        tree.push(5).unwrap();
        let order: Vec<u32> = tree.iter_entries().copied().collect();
        assert_eq!(order, vec![1, 5, 2, 3, 4]);
    }

    #[test]
    fn try_map_preserves_structure_and_stops_on_error() {
        let tree = sample();
        assert_eq!(tree.group_count(), 2);
        assert_eq!(tree.subgroup_count(), 3);
        assert_eq!(tree.entry_count(), 4);

        let doubled = tree
            .clone()
            .try_map(|value| Ok::<_, ()>(value * 2))
            .unwrap();
        let order: Vec<u32> = doubled.iter_entries().copied().collect();
        assert_eq!(order, vec![2, 4, 6, 8]);
        assert_eq!(doubled.subgroup_count(), 3);

        let failed = tree.try_map(|value| if value == 3 { Err(value) } else { Ok(value) });
        assert_eq!(failed.unwrap_err(), 3);
    }
}
