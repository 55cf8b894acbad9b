//! 0/1 subset-sum maximization under a ceiling.

use tracing::debug;

use super::{SelectionItem, SelectionResult};

/// Picks the subset of items whose total is as large as possible without
/// exceeding the ceiling.
///
/// Among subsets reaching the same total, the one with fewer receipts is kept,
/// so fewer originals have to accompany the claim. Equal-size ties keep
/// whichever subset was found first in item order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetSelector {
    ceiling: u64,
}

impl SubsetSelector {
    pub fn new(ceiling: u64) -> Self {
        Self { ceiling }
    }

    /// Run the selection. Never fails; an empty input selects nothing.
    ///
    /// `best[s]` holds the smallest known id set summing to exactly `s`. The
    /// table is bounded by the ceiling and by the sum of all amounts, so time
    /// and memory are O(items x bound).
    pub fn select(&self, items: &[SelectionItem]) -> SelectionResult {
        let total = items.iter().fold(0u64, |acc, i| acc.saturating_add(i.amount));
        let bound = self.ceiling.min(total) as usize;

        let mut best: Vec<Option<Vec<u32>>> = vec![None; bound + 1];
        best[0] = Some(Vec::new());

        for item in items {
            let amount = item.amount as usize;
            if amount > bound {
                debug!(id = item.id, amount = item.amount, ceiling = self.ceiling, "item can never fit");
                continue;
            }
            if amount == 0 {
                continue;
            }

            // Descending, so each item is used at most once.
            for sum in (0..=bound - amount).rev() {
                let Some(ids) = best[sum].as_ref() else {
                    continue;
                };
                let target = sum + amount;
                let improves = best[target]
                    .as_ref()
                    .is_none_or(|current| ids.len() + 1 < current.len());
                if improves {
                    let mut candidate = ids.clone();
                    candidate.push(item.id);
                    best[target] = Some(candidate);
                }
            }
        }

        let (sum, ids) = best
            .into_iter()
            .enumerate()
            .rev()
            .find_map(|(sum, ids)| ids.map(|ids| (sum, ids)))
            .unwrap_or_default();

        debug!(total = sum, count = ids.len(), ceiling = self.ceiling, "selection complete");

        SelectionResult {
            total: sum as u64,
            included: ids.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn items(amounts: &[u64]) -> Vec<SelectionItem> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| SelectionItem::new(i as u32 + 1, amount))
            .collect()
    }

    fn ids(ids: &[u32]) -> BTreeSet<u32> {
        ids.iter().copied().collect()
    }

    /// Best total and the smallest subset size reaching it, by enumeration.
    fn brute_force(amounts: &[u64], ceiling: u64) -> (u64, usize) {
        let mut best = (0u64, 0usize);
        for mask in 0u32..(1 << amounts.len()) {
            let sum: u64 = (0..amounts.len())
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| amounts[i])
                .sum();
            let count = mask.count_ones() as usize;
            if sum <= ceiling && (sum > best.0 || (sum == best.0 && count < best.1)) {
                best = (sum, count);
            }
        }
        best
    }

    #[test]
    fn test_prefers_fewer_receipts_on_equal_sum() {
        let result = SubsetSelector::new(15_000).select(&items(&[5000, 7000, 12_000]));
        assert_eq!(result.total, 12_000);
        assert_eq!(result.included, ids(&[3]));
    }

    #[test]
    fn test_exact_fit_uses_everything() {
        let result = SubsetSelector::new(15_000).select(&items(&[5000, 7000, 3000]));
        assert_eq!(result.total, 15_000);
        assert_eq!(result.included, ids(&[1, 2, 3]));
    }

    #[test]
    fn test_empty_ledger() {
        let result = SubsetSelector::new(100_000).select(&[]);
        assert_eq!(result, SelectionResult::default());
    }

    #[test]
    fn test_oversized_item_is_always_excluded() {
        let result = SubsetSelector::new(10_000).select(&items(&[25_000, 4000, 5000]));
        assert_eq!(result.total, 9000);
        assert_eq!(result.included, ids(&[2, 3]));
        assert_eq!(result.excluded(1..=3), ids(&[1]));
    }

    #[test]
    fn test_nothing_fits() {
        let result = SubsetSelector::new(999).select(&items(&[1000, 2000]));
        assert_eq!(result.total, 0);
        assert!(result.included.is_empty());
    }

    #[test]
    fn test_equal_size_tie_keeps_first_found() {
        // {1,2} and {3,4} both reach 10000 with two receipts; {1,2} is found first.
        let result = SubsetSelector::new(10_000).select(&items(&[4000, 6000, 3000, 7000]));
        assert_eq!(result.total, 10_000);
        assert_eq!(result.included, ids(&[1, 2]));
    }

    #[test]
    fn test_selection_is_repeatable() {
        let ledger = items(&[3100, 4500, 12_000, 8800, 2300, 9900]);
        let selector = SubsetSelector::new(30_000);
        assert_eq!(selector.select(&ledger), selector.select(&ledger));
    }

    #[test]
    fn test_matches_brute_force() {
        // Deterministic pseudo-random ledgers.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = |modulo: u64| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % modulo
        };

        for _ in 0..60 {
            let len = 1 + next(10) as usize;
            let amounts: Vec<u64> = (0..len).map(|_| 1000 + next(9) * 500).collect();
            let ceiling = 1000 + next(25) * 700;

            let result = SubsetSelector::new(ceiling).select(&items(&amounts));
            let (best_total, fewest) = brute_force(&amounts, ceiling);

            let chosen: u64 = result.included.iter().map(|&id| amounts[id as usize - 1]).sum();
            assert!(result.total <= ceiling);
            assert_eq!(result.total, best_total, "amounts {amounts:?}, ceiling {ceiling}");
            assert_eq!(chosen, result.total);
            assert_eq!(result.included.len(), fewest);
            assert!(result.included.iter().all(|&id| id >= 1 && id as usize <= len));
        }
    }
}
