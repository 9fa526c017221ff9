//! Flower stock, split by size class.
//!
//! Counts are signed. The fulfillment pass checks the listed quantities
//! before padding is added, so a padded order can draw a species below zero;
//! the table records that rather than clamping it.

use crate::{Size, Species};
use serde::Serialize;
use std::collections::BTreeMap;

/// Stock of one size class, keyed by species.
pub type StockSlice = BTreeMap<Species, i64>;

/// Available flowers per size class and species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    small: StockSlice,
    large: StockSlice,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock for one size class.
    pub fn slice(&self, size: Size) -> &StockSlice {
        match size {
            Size::Small => &self.small,
            Size::Large => &self.large,
        }
    }

    fn slice_mut(&mut self, size: Size) -> &mut StockSlice {
        match size {
            Size::Small => &mut self.small,
            Size::Large => &mut self.large,
        }
    }

    /// Count one more flower of `species` in `size`.
    pub fn add(&mut self, size: Size, species: Species) {
        *self.slice_mut(size).entry(species).or_insert(0) += 1;
    }

    /// Current count, `None` if the species was never stocked in that size.
    pub fn count(&self, size: Size, species: Species) -> Option<i64> {
        self.slice(size).get(&species).copied()
    }

    /// Remove `quantity` flowers of `species` from `size`. Saturates at `i64::MIN`.
    pub fn take(&mut self, size: Size, species: Species, quantity: u64) {
        let quantity = i64::try_from(quantity).unwrap_or(i64::MAX);
        let count = self.slice_mut(size).entry(species).or_insert(0);
        *count = count.saturating_sub(quantity);
    }

    /// Total flowers left across both size classes, ignoring negative counts.
    pub fn remaining(&self) -> i64 {
        Size::ALL.iter().flat_map(|&size| self.slice(size).values()).map(|&n| n.max(0)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.small.is_empty() && self.large.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(c: char) -> Species {
        Species::new(c).unwrap()
    }

    #[test]
    fn add_counts_per_size_and_species() {
        let mut inv = Inventory::new();
        inv.add(Size::Small, sp('a'));
        inv.add(Size::Small, sp('a'));
        inv.add(Size::Large, sp('a'));

        assert_eq!(inv.count(Size::Small, sp('a')), Some(2));
        assert_eq!(inv.count(Size::Large, sp('a')), Some(1));
        assert_eq!(inv.count(Size::Large, sp('b')), None);
        assert_eq!(inv.remaining(), 3);
        assert!(!inv.is_empty());
        assert!(Inventory::new().is_empty());
    }

    #[test]
    fn take_can_go_negative() {
        let mut inv = Inventory::new();
        inv.add(Size::Large, sp('b'));
        inv.take(Size::Large, sp('b'), 4);

        assert_eq!(inv.count(Size::Large, sp('b')), Some(-3));
        assert_eq!(inv.remaining(), 0);
    }

    #[test]
    fn serializes_as_small_and_large_maps() {
        let mut inv = Inventory::new();
        inv.add(Size::Small, sp('c'));
        let value = serde_json::to_value(&inv).unwrap();
        assert_eq!(value["small"]["c"], 1);
        assert!(value["large"].as_object().unwrap().is_empty());
    }
}
