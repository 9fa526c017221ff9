//! Input stream parser.
//!
//! Splits the raw input into its two blocks, tallies the inventory block,
//! parses every order line and hands the valid orders to the fulfillment pass.
//!
//! ```text
//! "AL10a15b5c30\nAS10a10b25\n\naL\nbS\n"
//!   │ drop one trailing '\n'
//!   │ split on "\n\n"          -> exactly 2 blocks, else INVALID_STREAM
//!   │ split each block on '\n'
//!   ├─ orders:    ["AL10a15b5c30", "AS10a10b25"]
//!   └─ inventory: ["aL", "bS"]
//! ```
//!
//! The two blocks fail differently: one malformed inventory line rejects the
//! whole stream, one malformed order line only lands in `errors`.

use super::fulfill::fill_bouquets;
use super::inventory::Inventory;
use super::metrics::{RunMetrics, RunResult, StageMetrics};
use super::rule::parse_rule;
use crate::error::StreamError;
use crate::grammar::{self, BLOCK_SEPARATOR, LINE_SEPARATOR};
use crate::{BouquetRequest, Options, RejectedOrder, Size, Species, StreamReport};
use std::time::Instant;
use tracing::{debug, info};

/// A stream split into order lines and inventory lines, ready to run.
///
/// Usage: `StreamParser::new(contents)?.run(&options)`.
#[derive(Debug, Clone)]
pub(crate) struct StreamParser<'a> {
    orders: Vec<&'a str>,
    flowers: Vec<&'a str>,
}

impl<'a> StreamParser<'a> {
    /// Split `contents` into its two blocks.
    ///
    /// One trailing `'\n'` is dropped first, so a file that ends with a newline
    /// does not leave an empty inventory line behind.
    pub fn new(contents: &'a str) -> Result<Self, StreamError> {
        let contents = contents.strip_suffix(LINE_SEPARATOR).unwrap_or(contents);
        let blocks: Vec<&str> = contents.split(BLOCK_SEPARATOR).collect();

        let [orders, flowers] = blocks[..] else {
            return Err(StreamError::InvalidStream { blocks: blocks.len() });
        };

        if orders.is_empty() {
            return Err(StreamError::EmptyBouquetStream);
        }
        if flowers.is_empty() {
            return Err(StreamError::EmptyFlowerList);
        }

        Ok(StreamParser {
            orders: orders.split(LINE_SEPARATOR).collect(),
            flowers: flowers.split(LINE_SEPARATOR).collect(),
        })
    }

    /// Tally the inventory, parse the orders and fulfil them.
    pub fn run(self, options: &Options) -> Result<StreamReport, StreamError> {
        self.run_with_metrics(options).map(|run| run.report)
    }

    /// Same as [`run`](Self::run), keeping per-stage timings.
    pub fn run_with_metrics(self, options: &Options) -> Result<RunResult, StreamError> {
        let total_start = Instant::now();

        let start = Instant::now();
        let mut inventory = tally_inventory(&self.flowers)?;
        let inventory_stage = StageMetrics { duration: start.elapsed(), processed: self.flowers.len(), rejected: 0 };

        let start = Instant::now();
        let (bouquets, errors) = parse_orders(&self.orders);
        let rules_stage =
            StageMetrics { duration: start.elapsed(), processed: self.orders.len(), rejected: errors.len() };

        let start = Instant::now();
        let processed = bouquets.len();
        let orders = fill_bouquets(bouquets, &mut inventory, options);
        let rejected = orders.iter().filter(|o| o.is_err()).count();
        let fulfillment_stage = StageMetrics { duration: start.elapsed(), processed, rejected };

        info!(
            orders = self.orders.len(),
            malformed = errors.len(),
            fulfilled = processed - rejected,
            unfulfilled = rejected,
            flowers = self.flowers.len(),
            "stream processed"
        );

        let metrics = RunMetrics {
            total: total_start.elapsed(),
            inventory: inventory_stage,
            rules: rules_stage,
            fulfillment: fulfillment_stage,
        };

        Ok(RunResult { report: StreamReport { orders, errors, inventory }, metrics })
    }
}

/// Count the inventory lines. All-or-nothing: the first bad line aborts.
fn tally_inventory(lines: &[&str]) -> Result<Inventory, StreamError> {
    let mut inventory = Inventory::new();

    for (index, &line) in lines.iter().enumerate() {
        let flower = grammar::inventory_line().captures(line).and_then(|caps| {
            let species = caps.get(1)?.as_str().chars().next().and_then(Species::new)?;
            let size = caps.get(2)?.as_str().chars().next().and_then(Size::from_code)?;
            Some((size, species))
        });

        let Some((size, species)) = flower else {
            debug!(index, line, "invalid inventory line");
            return Err(StreamError::InvalidFlowerStream { line: line.to_string(), index });
        };
        inventory.add(size, species);
    }

    debug!(small = inventory.slice(Size::Small).len(), large = inventory.slice(Size::Large).len(), "inventory tallied");
    Ok(inventory)
}

/// Parse every order line independently.
fn parse_orders(lines: &[&str]) -> (Vec<BouquetRequest>, Vec<RejectedOrder>) {
    let mut bouquets = Vec::new();
    let mut errors = Vec::new();

    for &line in lines {
        match parse_rule(line) {
            Ok(bouquet) => bouquets.push(bouquet),
            Err(error) => {
                debug!(line, %error, "rejected order line");
                errors.push(RejectedOrder { design: line.to_string(), error });
            }
        }
    }

    (bouquets, errors)
}
