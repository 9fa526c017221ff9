use bouquet_factory::{
    CatalogedError, FulfilledOrder, FulfillmentError, Inventory, RejectedOrder, RunMetrics, Size, StreamError,
    StreamReport,
};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

bitflags::bitflags! {
    /// Sections of the text report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ReportSections: u8 {
        const ORDERS    = 1 << 0;
        const ERRORS    = 1 << 1;
        const INVENTORY = 1 << 2;
        const TIMING    = 1 << 3;
    }
}

impl Default for ReportSections {
    fn default() -> Self {
        ReportSections::ORDERS | ReportSections::ERRORS
    }
}

pub fn print_report(report: &StreamReport, metrics: &RunMetrics, sections: ReportSections, color: bool) {
    let palette = ansi::Palette::new(color);

    if sections.contains(ReportSections::ORDERS) {
        println!("\n{}", palette.paint("━━━ Order output ━━━", ansi::GRAY));
        if report.orders.is_empty() {
            println!("{}", palette.dim("  No valid orders to show"));
        }
        for outcome in &report.orders {
            match outcome {
                Ok(order) => print_fulfilled(order, &palette),
                Err(err) => print_unfulfilled(err, &palette),
            }
        }
        if !report.orders.is_empty() {
            println!(
                "  {} fulfilled  │  {} short of stock",
                palette.paint(report.fulfilled().count().to_string(), ansi::GREEN),
                palette.paint(report.unfulfilled().count().to_string(), ansi::RED),
            );
        }
    }

    if sections.contains(ReportSections::ERRORS) {
        println!("\n{}", palette.paint("━━━ Order errors ━━━", ansi::GRAY));
        if report.errors.is_empty() {
            println!("{}", palette.dim("  No malformed orders"));
        }
        for rejected in &report.errors {
            print_rejected(rejected, &palette);
        }
    }

    if sections.contains(ReportSections::INVENTORY) {
        println!("\n{}", palette.paint("━━━ Remaining inventory ━━━", ansi::GRAY));
        print_inventory(&report.inventory, &palette);
    }

    if sections.contains(ReportSections::TIMING) {
        println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
        println!(
            "  Total: {}  │  Inventory: {}  │  Rules: {}  │  Fulfillment: {}",
            palette.paint(format!("{:?}", metrics.total), ansi::GREEN),
            palette.dim(format!("{:?}", metrics.inventory.duration)),
            palette.paint(format!("{:?}", metrics.rules.duration), ansi::CYAN),
            palette.dim(format!("{:?}", metrics.fulfillment.duration)),
        );
    }
    println!();
}

pub fn print_stream_error(err: &StreamError, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("{}", palette.bold(palette.paint("Input stream rejected", ansi::RED)));
    for line in error_lines(err, &palette) {
        eprintln!("{line}");
    }
}

fn print_fulfilled(order: &FulfilledOrder, palette: &ansi::Palette) {
    println!(
        "  {} {} {}",
        palette.paint(&order.request.initial_design, ansi::YELLOW),
        palette.paint("->", ansi::BLUE),
        palette.bold(palette.paint(&order.design, ansi::GREEN)),
    );
    if order.request.padding > 0 {
        println!("      {} {}", palette.dim("extra flowers:"), palette.dim(order.request.padding.to_string()));
    }
}

fn print_unfulfilled(err: &FulfillmentError, palette: &ansi::Palette) {
    let FulfillmentError::InventoryNotEnough { bouquet, missing, .. } = err;
    let missing: Vec<String> = missing.iter().map(ToString::to_string).collect();
    println!(
        "  {} {} {}",
        palette.paint(&bouquet.initial_design, ansi::YELLOW),
        palette.paint("->", ansi::BLUE),
        palette.paint(format!("{} (short of {})", err.name(), missing.join(", ")), ansi::RED),
    );
}

fn print_rejected(rejected: &RejectedOrder, palette: &ansi::Palette) {
    println!("  {} {}", palette.bold(palette.paint("DESIGN:", ansi::RED)), palette.paint(&rejected.design, ansi::RED));
    for line in error_lines(&rejected.error, palette) {
        println!("{line}");
    }
}

fn error_lines(err: &dyn CatalogedError, palette: &ansi::Palette) -> Vec<String> {
    let field = |label: &str, value: String| {
        format!("    {} {}", palette.bold(palette.paint(label, ansi::RED)), palette.paint(value, ansi::RED))
    };

    let mut lines = vec![
        field("ERROR MESSAGE:", err.message().to_string()),
        field("ERROR CODE:", err.code().to_string()),
        field("ERROR NAME:", err.name().to_string()),
    ];
    if let Some(data) = err.data() {
        lines.push(field("ERROR DATA:", data.to_string()));
    }
    lines.push(field("DETAIL:", err.to_string()));
    lines
}

fn print_inventory(inventory: &Inventory, palette: &ansi::Palette) {
    if inventory.is_empty() {
        println!("{}", palette.dim("  No flowers stocked"));
        return;
    }
    for size in Size::ALL {
        let stock: Vec<String> = inventory.slice(size).iter().map(|(species, n)| format!("{species}:{n}")).collect();
        let stock = if stock.is_empty() { palette.dim("empty") } else { stock.join(" ") };
        println!("  {} {}", palette.paint(format!("{:<6}", size.name()), ansi::BLUE), stock);
    }
    println!("  {} {}", palette.dim("flowers left:"), palette.bold(inventory.remaining().to_string()));
}
