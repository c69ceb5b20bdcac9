//! Result-column and parameter layout of compiled statements.

use std::collections::btree_map;
use std::collections::BTreeMap;

use super::text::BoundParameter;

/// A logical member of a statement: a class member or a surrogate column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MappingKey {
    /// Class member by absolute member number.
    Member(usize),
    /// Datastore (surrogate) identity.
    DatastoreId,
    /// Surrogate version.
    Version,
    /// Multitenancy discriminator.
    Tenant,
    /// Soft-delete flag.
    SoftDelete,
    /// Class discriminator.
    Discriminator,
}

/// Layout of one logical member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementMapping {
    /// 1-based result-column positions to read, one per datastore column.
    pub column_positions: Vec<usize>,
    /// Each occurrence of the member as a bound value, listing the 1-based
    /// parameter positions it covers.
    pub param_occurrences: Vec<Vec<usize>>,
}

/// Per-member layout of a compiled statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementMappingIndex {
    mappings: BTreeMap<MappingKey, StatementMapping>,
}

impl StatementMappingIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// Records the result-column positions of a member.
    pub fn set_columns(&mut self, key: MappingKey, positions: Vec<usize>) {
        self.mappings.entry(key).or_default().column_positions = positions;
    }

    /// Records parameter positions from rendered parameters.
    ///
    /// Parameters are numbered from 1 in the given order. A parameter
    /// covering column `0` opens a new occurrence of its member; later
    /// columns extend the member's latest occurrence.
    pub fn record_parameters(&mut self, params: &[BoundParameter]) {
        for (i, param) in params.iter().enumerate() {
            let mapping = self.mappings.entry(param.key).or_default();
            match mapping.param_occurrences.last_mut() {
                Some(occurrence) if param.column > 0 => occurrence.push(i + 1),
                _ => mapping.param_occurrences.push(vec![i + 1]),
            }
        }
    }

    /// Returns the layout of a member.
    #[must_use]
    pub fn mapping(&self, key: MappingKey) -> Option<&StatementMapping> {
        self.mappings.get(&key)
    }

    /// Iterates over all members in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, MappingKey, StatementMapping> {
        self.mappings.iter()
    }

    /// Class members with result columns, in member-number order.
    #[must_use]
    pub fn result_members(&self) -> Vec<usize> {
        self.mappings
            .iter()
            .filter_map(|(key, mapping)| match key {
                MappingKey::Member(n) if !mapping.column_positions.is_empty() => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Total number of parameter positions across all occurrences.
    #[must_use]
    pub fn param_width(&self) -> usize {
        self.mappings
            .values()
            .flat_map(|m| m.param_occurrences.iter())
            .map(Vec::len)
            .sum()
    }
}

impl<'a> IntoIterator for &'a StatementMappingIndex {
    type Item = (&'a MappingKey, &'a StatementMapping);
    type IntoIter = btree_map::Iter<'a, MappingKey, StatementMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Statement layout of a class, with nested layouts for related objects
/// whose identity is read from the same row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementClassMapping {
    /// Class name.
    pub class_name: String,
    /// Members read or bound for this class.
    pub index: StatementMappingIndex,
    /// Related-object layouts by member number.
    pub children: BTreeMap<usize, StatementClassMapping>,
}

impl StatementClassMapping {
    /// Creates an empty class layout.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            index: StatementMappingIndex::new(),
            children: BTreeMap::new(),
        }
    }

    /// Adds the layout of a related object.
    pub fn add_child(&mut self, member: usize, child: Self) {
        self.children.insert(member, child);
    }

    /// Returns the layout of a related object.
    #[must_use]
    pub fn child(&self, member: usize) -> Option<&Self> {
        self.children.get(&member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_column_member_groups_into_one_occurrence() {
        let params = vec![
            BoundParameter::deferred(MappingKey::Member(1), 0),
            BoundParameter::deferred(MappingKey::Member(1), 1),
            BoundParameter::deferred(MappingKey::Member(3), 0),
            BoundParameter::deferred(MappingKey::Tenant, 0),
        ];
        let mut index = StatementMappingIndex::new();
        index.record_parameters(&params);
        assert_eq!(
            index.mapping(MappingKey::Member(1)).unwrap().param_occurrences,
            vec![vec![1, 2]]
        );
        assert_eq!(
            index.mapping(MappingKey::Member(3)).unwrap().param_occurrences,
            vec![vec![3]]
        );
        assert_eq!(index.param_width(), 4);
    }

    #[test]
    fn test_repeated_member_gets_two_occurrences() {
        let params = vec![
            BoundParameter::deferred(MappingKey::Member(0), 0),
            BoundParameter::deferred(MappingKey::Member(0), 0),
        ];
        let mut index = StatementMappingIndex::new();
        index.record_parameters(&params);
        assert_eq!(
            index.mapping(MappingKey::Member(0)).unwrap().param_occurrences,
            vec![vec![1], vec![2]]
        );
    }

    #[test]
    fn test_result_members() {
        let mut index = StatementMappingIndex::new();
        index.set_columns(MappingKey::Member(4), vec![2]);
        index.set_columns(MappingKey::Version, vec![1]);
        index.set_columns(MappingKey::Member(2), vec![3, 4]);
        assert_eq!(index.result_members(), vec![2, 4]);
        let mut keys = Vec::new();
        for (key, _) in &index {
            keys.push(*key);
        }
        assert_eq!(
            keys,
            vec![MappingKey::Member(2), MappingKey::Member(4), MappingKey::Version]
        );
    }
}
