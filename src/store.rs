//! Immutable set of branch records plus the derived client directory.

use crate::types::BranchRecord;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<BranchRecord>,
    clients: Vec<String>,
}

impl RecordStore {
    pub fn new(records: Vec<BranchRecord>) -> Self {
        // BTreeSet gives sorted, deduplicated names in one pass.
        let clients: BTreeSet<&str> = records.iter().map(|r| r.client_name.as_str()).collect();
        let clients = clients.into_iter().map(str::to_string).collect();
        Self { records, clients }
    }

    pub fn all_records(&self) -> &[BranchRecord] {
        &self.records
    }

    /// Client names sorted ascending, without duplicates.
    pub fn distinct_clients(&self) -> &[String] {
        &self.clients
    }

    /// Branches of `name` in their original relative order. Unknown clients
    /// give an empty vector.
    pub fn records_for_client(&self, name: &str) -> Vec<&BranchRecord> {
        self.records
            .iter()
            .filter(|r| r.client_name == name)
            .collect()
    }

    pub fn contains_client(&self, name: &str) -> bool {
        self.clients
            .binary_search_by(|c| c.as_str().cmp(name))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
