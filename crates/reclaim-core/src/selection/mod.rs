//! Budget-capped receipt selection.

mod knapsack;

pub use knapsack::SubsetSelector;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One selectable ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionItem {
    /// Ledger sequence number (`No.`).
    pub id: u32,
    /// Validated amount.
    pub amount: u64,
}

impl SelectionItem {
    pub fn new(id: u32, amount: u64) -> Self {
        Self { id, amount }
    }
}

/// The chosen subset and its total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Largest achievable total not exceeding the ceiling.
    pub total: u64,
    /// Sequence numbers of the receipts to submit.
    pub included: BTreeSet<u32>,
}

impl SelectionResult {
    /// Sequence numbers in `all` that were not selected.
    pub fn excluded(&self, all: impl IntoIterator<Item = u32>) -> BTreeSet<u32> {
        all.into_iter().filter(|id| !self.included.contains(id)).collect()
    }

    pub fn is_included(&self, id: u32) -> bool {
        self.included.contains(&id)
    }
}
