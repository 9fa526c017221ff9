//! Order fulfillment.
//!
//! Orders are allocated one by one, in input order, against a single
//! exclusively borrowed [`Inventory`]:
//!
//! ```text
//! for each bouquet:
//!   slice = inventory[size]
//!   every listed species must pass the stock threshold   (else INVENTORY_NOT_ENOUGH)
//!   spread padding round-robin over the listed species
//!   subtract the padded totals from slice
//!   output = "<total><species>"*, design = name + size code + output
//! ```
//!
//! Feasibility only looks at the listed quantities, before padding.

use super::inventory::{Inventory, StockSlice};
use crate::error::FulfillmentError;
use crate::{BouquetRequest, FlowerCount, FulfilledOrder, Options, OrderOutcome, Species};
use serde::Serialize;
use tracing::debug;

/// Comparison used to decide whether a species has enough stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockThreshold {
    /// Stock must be strictly greater than the requested quantity.
    /// An exact match is reported as `INVENTORY_NOT_ENOUGH`.
    #[default]
    Exceeds,
    /// Stock must be at least the requested quantity.
    AtLeast,
}

impl StockThreshold {
    /// `available` is `None` when the species was never stocked in that size.
    pub fn admits(self, available: Option<i64>, requested: u64) -> bool {
        // Non-positive stock never passes; positive stock always fits a u64.
        let Some(available) = available.and_then(|n| u64::try_from(n).ok()).filter(|&n| n > 0) else {
            return false;
        };
        match self {
            StockThreshold::Exceeds => available > requested,
            StockThreshold::AtLeast => available >= requested,
        }
    }
}

pub(crate) fn fill_bouquets(
    bouquets: Vec<BouquetRequest>,
    inventory: &mut Inventory,
    options: &Options,
) -> Vec<OrderOutcome> {
    bouquets
        .into_iter()
        .enumerate()
        .map(|(index, bouquet)| fill_bouquet(index, bouquet, inventory, options.stock_threshold))
        .collect()
}

fn fill_bouquet(
    index: usize,
    mut bouquet: BouquetRequest,
    inventory: &mut Inventory,
    threshold: StockThreshold,
) -> OrderOutcome {
    let missing = shortfalls(&bouquet.list, inventory.slice(bouquet.size), threshold);

    if !missing.is_empty() {
        debug!(index, design = %bouquet.initial_design, ?missing, "not enough stock");
        return Err(FulfillmentError::InventoryNotEnough { bouquet: Box::new(bouquet), index, missing });
    }

    distribute_padding(&mut bouquet.list, bouquet.padding);

    for item in &bouquet.list {
        inventory.take(bouquet.size, item.species, item.total);
    }

    let output: String = bouquet.list.iter().map(FlowerCount::to_string).collect();
    let design = format!("{}{}{}", bouquet.name, bouquet.size_code(), output);
    debug!(index, from = %bouquet.initial_design, to = %design, padding = bouquet.padding, "bouquet fulfilled");

    Ok(FulfilledOrder { request: bouquet, output, design })
}

/// Species whose stock does not pass `threshold`.
///
/// Every item is checked; the order is feasible only when the fold ends with
/// no shortfall.
fn shortfalls(list: &[FlowerCount], stock: &StockSlice, threshold: StockThreshold) -> Vec<Species> {
    list.iter().fold(Vec::new(), |mut missing, item| {
        if !threshold.admits(stock.get(&item.species).copied(), item.total) {
            debug!(species = %item.species, requested = item.total, available = ?stock.get(&item.species), "shortfall");
            missing.push(item.species);
        }
        missing
    })
}

/// Spread `padding` over `list` one unit at a time, cycling in list order.
///
/// Closed form of the cycle: every item gets `padding / k`, the first
/// `padding % k` items get one more.
pub(crate) fn distribute_padding(list: &mut [FlowerCount], padding: u64) {
    if list.is_empty() || padding == 0 {
        return;
    }

    let k = list.len() as u64;
    let (share, extra) = (padding / k, padding % k);
    for (i, item) in list.iter_mut().enumerate() {
        item.total += share + u64::from((i as u64) < extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse_rule;
    use crate::{CatalogedError, Size};

    fn sp(c: char) -> Species {
        Species::new(c).unwrap()
    }

    fn stock(size: Size, flowers: &[(char, usize)]) -> Inventory {
        let mut inv = Inventory::new();
        for &(c, n) in flowers {
            for _ in 0..n {
                inv.add(size, sp(c));
            }
        }
        inv
    }

    fn fill(lines: &[&str], inv: &mut Inventory) -> Vec<OrderOutcome> {
        let bouquets = lines.iter().map(|l| parse_rule(l).unwrap()).collect();
        fill_bouquets(bouquets, inv, &Options::default())
    }

    #[test]
    fn threshold_is_strict_by_default() {
        assert!(!StockThreshold::default().admits(Some(3), 3));
        assert!(StockThreshold::default().admits(Some(4), 3));
        assert!(StockThreshold::AtLeast.admits(Some(3), 3));
        assert!(!StockThreshold::AtLeast.admits(None, 1));
        assert!(!StockThreshold::AtLeast.admits(Some(-2), 1));
        assert!(!StockThreshold::AtLeast.admits(Some(0), 0));
        assert!(StockThreshold::default().admits(Some(i64::MAX), 5_000_000_000));
    }

    #[test]
    fn padding_goes_round_robin() {
        let mut list = vec![
            FlowerCount { species: sp('a'), total: 3 },
            FlowerCount { species: sp('b'), total: 2 },
            FlowerCount { species: sp('c'), total: 1 },
        ];
        distribute_padding(&mut list, 5);
        let totals: Vec<u64> = list.iter().map(|f| f.total).collect();
        assert_eq!(totals, vec![5, 4, 2]);
    }

    #[test]
    fn fulfils_and_consumes_stock() {
        let mut inv = stock(Size::Large, &[('a', 11), ('b', 16), ('c', 6)]);
        let out = fill(&["AL10a15b5c30"], &mut inv);

        let order = out[0].as_ref().unwrap();
        assert_eq!(order.output, "10a15b5c");
        assert_eq!(order.design, "AL10a15b5c");
        assert_eq!(inv.count(Size::Large, sp('a')), Some(1));
        assert_eq!(inv.count(Size::Large, sp('b')), Some(1));
        assert_eq!(inv.count(Size::Large, sp('c')), Some(1));
    }

    #[test]
    fn padded_design() {
        let mut inv = stock(Size::Small, &[('a', 10), ('b', 10)]);
        let out = fill(&["AS3a2b10"], &mut inv);

        let order = out[0].as_ref().unwrap();
        assert_eq!(order.design, "AS6a4b");
        assert_eq!(order.request.padding, 5);
        assert_eq!(inv.count(Size::Small, sp('a')), Some(4));
        assert_eq!(inv.count(Size::Small, sp('b')), Some(6));
    }

    #[test]
    fn padding_beyond_u32() {
        let mut inv = stock(Size::Small, &[('a', 3)]);
        let out = fill(&["AS1a5000000000"], &mut inv);

        assert_eq!(out[0].as_ref().unwrap().design, "AS5000000000a");
        assert_eq!(inv.count(Size::Small, sp('a')), Some(3 - 5_000_000_000));
    }

    #[test]
    fn exact_stock_is_not_enough() {
        let mut inv = stock(Size::Small, &[('a', 3), ('b', 2)]);
        let out = fill(&["5S3a2b10"], &mut inv);

        let err = out[0].as_ref().unwrap_err();
        assert_eq!(err.name(), "INVENTORY_NOT_ENOUGH");
        assert_eq!(err.bouquet().initial_design, "5S3a2b10");
        assert_eq!(err.data().unwrap()["index"], 0);
        assert_eq!(inv.count(Size::Small, sp('a')), Some(3));
        assert_eq!(inv.count(Size::Small, sp('b')), Some(2));
    }

    #[test]
    fn every_shortfall_is_reported() {
        let mut inv = stock(Size::Small, &[('b', 9)]);
        let out = fill(&["AS1a1b1c3"], &mut inv);
        match out[0].as_ref().unwrap_err() {
            FulfillmentError::InventoryNotEnough { missing, .. } => assert_eq!(missing, &vec![sp('a'), sp('c')]),
        }
    }

    #[test]
    fn sizes_do_not_share_stock() {
        let mut inv = stock(Size::Large, &[('a', 10)]);
        let out = fill(&["ABS1a1"], &mut inv);
        assert!(out[0].is_err());
    }

    #[test]
    fn earlier_orders_win() {
        let mut inv = stock(Size::Small, &[('a', 3)]);
        let out = fill(&["XYS2a2", "YZS2a2"], &mut inv);
        assert!(out[0].is_ok());
        assert!(out[1].is_err());
        assert_eq!(inv.count(Size::Small, sp('a')), Some(1));
    }

    #[test]
    fn at_least_accepts_exact_stock() {
        let mut inv = stock(Size::Small, &[('a', 3), ('b', 2)]);
        let bouquets = vec![parse_rule("AS3a2b5").unwrap()];
        let options = Options { stock_threshold: StockThreshold::AtLeast };
        let out = fill_bouquets(bouquets, &mut inv, &options);

        assert_eq!(out[0].as_ref().unwrap().design, "AS3a2b");
        assert_eq!(inv.count(Size::Small, sp('a')), Some(0));
    }
}
