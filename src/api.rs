use crate::engine::{self, Inventory, RunMetrics, StockThreshold, StreamParser};
use crate::{BouquetRequest, OrderOutcome, RuleError, StreamError, StreamReport};
use serde::Serialize;

/// Options that affect fulfillment.
///
/// By default a species needs strictly more stock than an order asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub stock_threshold: StockThreshold,
}

/// Result from [`parse_input_stream_verbose`].
#[derive(Debug, Clone, Serialize)]
pub struct StreamReportVerbose {
    pub report: StreamReport,
    pub metrics: RunMetrics,
}

/// Parse one order line into a [`BouquetRequest`].
///
/// # Example
/// ```
/// use bouquet_factory::parse_rule;
///
/// let bouquet = parse_rule("AL10a15b5c30").unwrap();
/// assert_eq!(bouquet.name, "A");
/// assert_eq!(bouquet.list.len(), 3);
/// assert_eq!(bouquet.padding, 0);
/// ```
pub fn parse_rule(line: &str) -> Result<BouquetRequest, RuleError> {
    engine::parse_rule(line)
}

/// Parse a whole input stream and fulfil its orders with default [`Options`].
///
/// Malformed order lines and unfulfillable orders are reported inside the
/// [`StreamReport`]; only stream-level problems return `Err`.
pub fn parse_input_stream(contents: &str) -> Result<StreamReport, StreamError> {
    parse_input_stream_with(contents, &Options::default())
}

/// Parse a whole input stream with the provided `options`.
pub fn parse_input_stream_with(contents: &str, options: &Options) -> Result<StreamReport, StreamError> {
    StreamParser::new(contents)?.run(options)
}

/// Parse raw bytes, as read from a file. Non-UTF-8 input is `INVALID_STREAM`.
pub fn parse_input_bytes(bytes: &[u8]) -> Result<StreamReport, StreamError> {
    let contents = std::str::from_utf8(bytes)?;
    parse_input_stream(contents)
}

/// Parse a whole input stream and keep per-stage timings and counts.
pub fn parse_input_stream_verbose(contents: &str, options: &Options) -> Result<StreamReportVerbose, StreamError> {
    let run = StreamParser::new(contents)?.run_with_metrics(options)?;
    Ok(StreamReportVerbose { report: run.report, metrics: run.metrics })
}

/// Fulfil already-parsed orders against `inventory`, in order.
///
/// `inventory` is updated in place as orders consume stock.
pub fn fill_bouquets(bouquets: Vec<BouquetRequest>, inventory: &mut Inventory) -> Vec<OrderOutcome> {
    fill_bouquets_with(bouquets, inventory, &Options::default())
}

/// Fulfil already-parsed orders with the provided `options`.
pub fn fill_bouquets_with(
    bouquets: Vec<BouquetRequest>,
    inventory: &mut Inventory,
    options: &Options,
) -> Vec<OrderOutcome> {
    engine::fill_bouquets(bouquets, inventory, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogedError, ErrorKind, Size, Species};

    const SAMPLE: &str = "AL10a15b5c30\nAS10a10b25\nBL15b1c21\nbad line\n\naL\naL\naL\naL\naL\naL\naL\naL\naL\naL\naL\n\
bL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\nbL\ncL\ncL\ncL\ncL\ncL\ncL\naS\n";

    #[test]
    fn parse_input_stream_returns_report() {
        let report = parse_input_stream(SAMPLE).unwrap();

        assert_eq!(report.orders.len(), 3);
        assert_eq!(report.orders[0].as_ref().unwrap().design, "AL10a15b5c");
        assert_eq!(report.orders[1].as_ref().unwrap_err().kind(), ErrorKind::InventoryNotEnough);
        // The first order left one b and one c.
        assert_eq!(report.orders[2].as_ref().unwrap_err().kind(), ErrorKind::InventoryNotEnough);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].design, "bad line");
        assert_eq!(report.errors[0].error.kind(), ErrorKind::InvalidRule);

        let a = Species::new('a').unwrap();
        assert_eq!(report.inventory.count(Size::Large, a), Some(1));
        assert_eq!(report.inventory.count(Size::Small, a), Some(1));
    }

    #[test]
    fn parse_input_bytes_rejects_non_utf8() {
        let err = parse_input_bytes(b"AS1a2b10\n\na\xffS").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStream);
    }

    #[test]
    fn parse_input_bytes_matches_str_entry() {
        assert_eq!(parse_input_bytes(SAMPLE.as_bytes()).unwrap(), parse_input_stream(SAMPLE).unwrap());
    }

    #[test]
    fn verbose_includes_metrics() {
        let res = parse_input_stream_verbose(SAMPLE, &Options::default()).unwrap();

        assert_eq!(res.report, parse_input_stream(SAMPLE).unwrap());
        assert_eq!(res.metrics.rules.processed, 4);
        assert_eq!(res.metrics.rules.rejected, 1);
        assert_eq!(res.metrics.fulfillment.rejected, 2);
        assert!(res.metrics.inventory.duration <= res.metrics.total);
    }

    #[test]
    fn fill_bouquets_updates_caller_inventory() {
        let mut inventory = Inventory::new();
        for _ in 0..5 {
            inventory.add(Size::Small, Species::new('d').unwrap());
        }

        let orders = fill_bouquets(vec![parse_rule("XYS2d3").unwrap()], &mut inventory);
        assert_eq!(orders[0].as_ref().unwrap().design, "XYS3d");
        assert_eq!(inventory.count(Size::Small, Species::new('d').unwrap()), Some(2));
    }

    #[test]
    fn stream_errors_are_returned_not_raised() {
        let err = parse_input_stream("AS1a2b10").unwrap_err();
        assert_eq!(err.name(), "INVALID_STREAM");
        assert_eq!(err.code(), 100);
    }
}
