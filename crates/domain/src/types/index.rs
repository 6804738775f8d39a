//! Remote rows of the target cluster, grouped per lookup table.
//!
//! The index doubles as the deletion candidate set of a run: the upload phase
//! removes every key it attempts (whether or not the upsert succeeds) and the
//! prune phase deletes whatever is left. Mutation therefore needs `&mut`
//! access during upload and ownership during prune, so two phases can never
//! touch the same table map concurrently.

use std::collections::BTreeMap;

use crate::types::record::{ClusterServiceRecord, IdentityKey};

/// Rows of one table keyed by identity.
pub type TableRows = BTreeMap<IdentityKey, ClusterServiceRecord>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRowIndex {
    tables: BTreeMap<String, TableRows>,
}

impl RemoteRowIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the rows of `table_id` that belong to `target_cluster`.
    ///
    /// Rows of other clusters are dropped here and stay invisible to the rest
    /// of the run. The table entry is created even when no row matches.
    /// Returns the number of rows retained.
    pub fn insert_rows<I>(&mut self, table_id: &str, target_cluster: &str, rows: I) -> usize
    where
        I: IntoIterator<Item = ClusterServiceRecord>,
    {
        let table = self.tables.entry(table_id.to_string()).or_default();
        let before = table.len();
        for row in rows.into_iter().filter(|row| row.cluster == target_cluster) {
            table.insert(row.identity_key(), row);
        }
        table.len() - before
    }

    pub fn contains_table(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    /// Ids of the indexed tables, in sorted order.
    pub fn table_ids(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn rows(&self, table_id: &str) -> Option<&TableRows> {
        self.tables.get(table_id)
    }

    /// Take `key` out of the deletion candidates of `table_id`.
    pub fn remove(&mut self, table_id: &str, key: &IdentityKey) -> Option<ClusterServiceRecord> {
        self.tables.get_mut(table_id).and_then(|rows| rows.remove(key))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn row_count(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for RemoteRowIndex {
    type Item = (String, TableRows);
    type IntoIter = std::collections::btree_map::IntoIter<String, TableRows>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
