//! Bouquet order parsing and fulfillment.
//!
//! An input stream holds two blocks separated by one blank line: bouquet
//! orders, one per line, then the flower inventory, one flower per line.
//!
//! ```text
//! AL10a15b5c30      <- order: name A, large, 10a 15b 5c, total 30
//! AS10a10b25        <- order: padding of 5 spread over a and b
//!
//! aL                <- one large flower of species a
//! bS
//! ```
//!
//! [`parse_input_stream`] tallies the inventory, runs every order line
//! through [`parse_rule`] and then allocates the valid orders, in input
//! order, against the shrinking inventory.
//!
//! ```
//! use bouquet_factory::parse_input_stream;
//!
//! let report = parse_input_stream("AS2a2b6\n\naS\naS\naS\nbS\nbS\nbS").unwrap();
//! let order = report.orders[0].as_ref().unwrap();
//! assert_eq!(order.design, "AS3a3b");
//! ```

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod grammar;

pub use api::{
    Options, StreamReportVerbose, fill_bouquets, fill_bouquets_with, parse_input_bytes, parse_input_stream,
    parse_input_stream_verbose, parse_input_stream_with, parse_rule,
};
pub use engine::{Inventory, RunMetrics, StageMetrics, StockSlice, StockThreshold};
pub use error::{CatalogedError, ErrorKind, ErrorLevel, FulfillmentError, RuleError, StreamError};

// --- Flowers ------------------------------------------------------------------

/// A flower kind: one lowercase ASCII letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Species(char);

impl Species {
    /// Returns `None` unless `letter` is in `a..=z`.
    pub fn new(letter: char) -> Option<Self> {
        letter.is_ascii_lowercase().then_some(Species(letter))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Size class of a bouquet or a flower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Large,
}

impl Size {
    pub const ALL: [Size; 2] = [Size::Small, Size::Large];

    /// Parse an input code (`S` or `L`).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'S' => Some(Size::Small),
            'L' => Some(Size::Large),
            _ => None,
        }
    }

    /// Input code: `S` or `L`.
    pub fn code(self) -> char {
        match self {
            Size::Small => 'S',
            Size::Large => 'L',
        }
    }

    /// Semantic name: `small` or `large`.
    pub fn name(self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Large => "large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A quantity of one species inside a bouquet. Serialized as `{ "type", "total" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlowerCount {
    #[serde(rename = "type")]
    pub species: Species,
    pub total: u64,
}

impl fmt::Display for FlowerCount {
    /// `<total><species>`, e.g. `10a`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.total, self.species)
    }
}

// --- Orders -------------------------------------------------------------------

/// One parsed order line.
///
/// Invariant: `list` is non-empty, strictly increasing by species, every
/// `total` is positive and `requested() + padding == total`.
///
/// Serialized with the order-line field names: `initialDesign`, `type`,
/// `size`, `sizeCode`, `total`, `input`, `list`, `padding`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BouquetRequest {
    /// The order line exactly as read.
    pub initial_design: String,
    /// Designator preceding the size code.
    pub name: String,
    pub size: Size,
    /// Requested number of flowers in the bouquet.
    pub total: u64,
    /// The raw flower run, e.g. `10a15b5c`.
    pub input: String,
    pub list: Vec<FlowerCount>,
    /// Flowers beyond the listed quantities.
    pub padding: u64,
}

impl BouquetRequest {
    pub fn size_code(&self) -> char {
        self.size.code()
    }

    /// Sum of the listed quantities.
    pub fn requested(&self) -> u64 {
        self.list.iter().fold(0u64, |sum, f| sum.saturating_add(f.total))
    }
}

impl Serialize for BouquetRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BouquetRequest", 8)?;
        state.serialize_field("initialDesign", &self.initial_design)?;
        state.serialize_field("type", &self.name)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("sizeCode", &self.size_code())?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("input", &self.input)?;
        state.serialize_field("list", &self.list)?;
        state.serialize_field("padding", &self.padding)?;
        state.end()
    }
}

/// An order that was allocated from the inventory.
///
/// `request.list` holds the padded quantities; `request.padding` still
/// reports how many extra flowers were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfilledOrder {
    #[serde(flatten)]
    pub request: BouquetRequest,
    /// Per-species breakdown after padding, e.g. `12a18b`.
    pub output: String,
    /// `name + size code + output`, e.g. `AS12a18b`.
    pub design: String,
}

/// Outcome of allocating one parsed order.
pub type OrderOutcome = Result<FulfilledOrder, FulfillmentError>;

/// Write each outcome as the order or the error itself, without a `Ok`/`Err` tag.
fn serialize_outcomes<S: Serializer>(orders: &[OrderOutcome], serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(untagged)]
    enum Outcome<'a> {
        Fulfilled(&'a FulfilledOrder),
        Unfulfilled(&'a FulfillmentError),
    }

    serializer.collect_seq(orders.iter().map(|outcome| match outcome {
        Ok(order) => Outcome::Fulfilled(order),
        Err(err) => Outcome::Unfulfilled(err),
    }))
}

/// An order line the rule parser rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedOrder {
    /// The raw line.
    pub design: String,
    pub error: RuleError,
}

/// Result of one stream run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamReport {
    /// One outcome per valid order line, in input order.
    #[serde(serialize_with = "serialize_outcomes")]
    pub orders: Vec<OrderOutcome>,
    /// Lines that failed to parse, in input order.
    pub errors: Vec<RejectedOrder>,
    /// Inventory left after all allocations.
    pub inventory: Inventory,
}

impl StreamReport {
    pub fn fulfilled(&self) -> impl Iterator<Item = &FulfilledOrder> {
        self.orders.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn unfulfilled(&self) -> impl Iterator<Item = &FulfillmentError> {
        self.orders.iter().filter_map(|o| o.as_ref().err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_accepts_only_lowercase_ascii() {
        assert_eq!(Species::new('a').map(Species::as_char), Some('a'));
        assert!(Species::new('A').is_none());
        assert!(Species::new('1').is_none());
        assert!(Species::new('é').is_none());
    }

    #[test]
    fn size_codes_round_trip() {
        for size in Size::ALL {
            assert_eq!(Size::from_code(size.code()), Some(size));
        }
        assert_eq!(Size::from_code('M'), None);
        assert_eq!(Size::Large.name(), "large");
    }

    #[test]
    fn flower_count_displays_quantity_then_species() {
        let count = FlowerCount { species: Species::new('c').unwrap(), total: 12 };
        assert_eq!(count.to_string(), "12c");
    }

    #[test]
    fn request_serializes_with_order_line_field_names() {
        let a = Species::new('a').unwrap();
        let request = BouquetRequest {
            initial_design: "AS3a5".into(),
            name: "A".into(),
            size: Size::Small,
            total: 5,
            input: "3a".into(),
            list: vec![FlowerCount { species: a, total: 3 }],
            padding: 2,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "initialDesign": "AS3a5",
                "type": "A",
                "size": "small",
                "sizeCode": "S",
                "total": 5,
                "input": "3a",
                "list": [{ "type": "a", "total": 3 }],
                "padding": 2,
            })
        );
    }

    #[test]
    fn outcomes_serialize_without_result_tags() {
        let a = Species::new('a').unwrap();
        let request = BouquetRequest {
            initial_design: "XYS2a2".into(),
            name: "XY".into(),
            size: Size::Small,
            total: 2,
            input: "2a".into(),
            list: vec![FlowerCount { species: a, total: 2 }],
            padding: 0,
        };
        let fulfilled = FulfilledOrder { request: request.clone(), output: "2a".into(), design: "XYS2a".into() };
        let missing = FulfillmentError::InventoryNotEnough { bouquet: Box::new(request), index: 1, missing: vec![a] };
        let report = StreamReport {
            orders: vec![Ok(fulfilled), Err(missing)],
            errors: Vec::new(),
            inventory: Inventory::new(),
        };

        assert_eq!(report.fulfilled().count(), 1);
        assert_eq!(report.unfulfilled().map(|e| e.bouquet().name.as_str()).collect::<Vec<_>>(), vec!["XY"]);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["orders"][0]["design"], "XYS2a");
        assert_eq!(value["orders"][0]["sizeCode"], "S");
        assert_eq!(value["orders"][1]["name"], "INVENTORY_NOT_ENOUGH");
        assert_eq!(value["orders"][1]["data"]["bouquet"]["type"], "XY");
        assert!(value["orders"][0].get("Ok").is_none());
    }
}
