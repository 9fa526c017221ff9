//! Parsing and fulfillment engine.
//!
//! A stream run is a short pipeline:
//!
//! ```text
//! contents ── StreamParser::new ──┬── order lines
//!            (stream.rs)          └── inventory lines
//!                                        │
//!                          tally_inventory (stream.rs)
//!                                        │  any bad line aborts the run
//!                                        v
//! order lines ── parse_rule (rule.rs) ───┬── Vec<BouquetRequest>
//!                                        └── Vec<RejectedOrder>
//!                                        │
//!                                        v
//!                    fill_bouquets (fulfill.rs)
//!                      - feasibility against the size slice
//!                      - round-robin padding
//!                      - subtract from Inventory (inventory.rs)
//!                                        │
//!                                        v
//!                                  StreamReport
//! ```
//!
//! The fulfillment pass is sequential. Every order sees the stock
//! left by the orders before it, so reordering the input changes which orders
//! succeed.
//!
//! ## Responsibilities by module
//!
//! - `rule.rs`: one order line to a `BouquetRequest` or a `RuleError`.
//! - `stream.rs`: block splitting, inventory tally, per-line dispatch.
//! - `fulfill.rs`: feasibility, padding and inventory consumption.
//! - `inventory.rs`: per-size stock tables.
//! - `metrics.rs`: per-stage timings for verbose runs.
//!
//! ## Debugging
//!
//! Every stage emits `tracing` events; run the CLI with
//! `RUST_LOG=bouquet_factory=debug` to see them.

#[path = "engine/fulfill.rs"]
mod fulfill;
#[path = "engine/inventory.rs"]
mod inventory;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rule.rs"]
mod rule;
#[path = "engine/stream.rs"]
mod stream;

pub use fulfill::StockThreshold;
pub(crate) use fulfill::fill_bouquets;
pub use inventory::{Inventory, StockSlice};
pub use metrics::{RunMetrics, StageMetrics};
pub(crate) use rule::parse_rule;
pub(crate) use stream::StreamParser;
