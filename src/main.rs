use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use order_pricing::application::orders::OrderService;
use order_pricing::application::pricing::OrderPricingEngine;
use order_pricing::domain::ean::Ean13;
use order_pricing::domain::order::{OrderAdjustments, OrderDraft, SupplierId};
use order_pricing::domain::payment::{PaymentConfig, PaymentMethod};
use order_pricing::domain::ports::OrderStoreBox;
use order_pricing::infrastructure::in_memory::InMemoryOrderStore;
use order_pricing::interfaces::csv::line_item_reader::LineItemReader;
use order_pricing::interfaces::csv::quote_writer::QuoteWriter;
use order_pricing::interfaces::lenient::parse_amount;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price an order from a line items CSV file and print the result
    Quote {
        /// Line items CSV file (product_id, sku, quantity, unit_price)
        input: PathBuf,

        #[command(flatten)]
        pricing: PricingArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Price a purchase order and persist it
    Submit {
        /// Line items CSV file (product_id, sku, quantity, unit_price)
        input: PathBuf,

        #[command(flatten)]
        pricing: PricingArgs,

        /// Supplier the order is placed with
        #[arg(long)]
        supplier: Option<SupplierId>,

        /// Mark the order as grouped
        #[arg(long)]
        grouped: bool,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long, env = "ORDER_PRICING_DB_PATH")]
        db_path: Option<PathBuf>,
    },
    /// EAN-13 barcode helpers
    Ean(EanArgs),
}

#[derive(Args)]
struct PricingArgs {
    /// Order discount
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    discount: Decimal,

    /// Shipping cost
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    shipping: Decimal,

    /// Other costs added to the order
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    other_costs: Decimal,

    /// Payment method: pix, card or cash
    #[arg(long, default_value = "pix")]
    method: PaymentMethod,

    /// Installment day offsets, e.g. "30,60,90". Omit to pay in full.
    #[arg(long)]
    installments: Option<String>,

    /// Order date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    order_date: Option<NaiveDate>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct EanArgs {
    /// Generate a random code starting with these digits
    #[arg(long)]
    prefix: Option<String>,

    /// Append the check digit to a 12-digit payload
    #[arg(long)]
    complete: Option<String>,

    /// Validate a full 13-digit code
    #[arg(long)]
    validate: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Quote {
            input,
            pricing,
            format,
        } => {
            let draft = read_draft(input, &pricing)?;
            let quote = OrderPricingEngine::price_order(
                draft.items(),
                &draft.adjustments,
                &draft.payment,
                draft.order_date,
            );
            info!(
                items_total = %quote.items_total,
                grand_total = %quote.grand_total,
                pieces = quote.total_pieces,
                skus = quote.total_skus,
                cost_per_piece = %quote.cost_per_piece,
                installments = quote.installments.len(),
                "Order priced"
            );

            let stdout = io::stdout();
            match format {
                OutputFormat::Csv => {
                    let mut writer = QuoteWriter::new(stdout.lock());
                    writer.write_quote(&quote).into_diagnostic()?;
                }
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(stdout.lock(), &quote).into_diagnostic()?;
                    println!();
                }
            }
        }
        Command::Submit {
            input,
            pricing,
            supplier,
            grouped,
            db_path,
        } => {
            let mut draft = read_draft(input, &pricing)?;
            draft.supplier = supplier;
            draft.grouped = grouped;

            let service = OrderService::new(open_store(db_path)?);
            let order = service.submit(draft).await.into_diagnostic()?;

            serde_json::to_writer_pretty(io::stdout().lock(), &order).into_diagnostic()?;
            println!();
        }
        Command::Ean(args) => {
            let code = match (args.prefix, args.complete, args.validate) {
                (Some(prefix), _, _) => Ean13::generate(&prefix, &mut rand::thread_rng()),
                (_, Some(payload), _) => Ean13::complete(&payload),
                (_, _, Some(code)) => Ean13::parse(&code),
                (None, None, None) => return Err(miette::miette!("No EAN option given")),
            }
            .into_diagnostic()?;
            println!("{}", code);
        }
    }

    Ok(())
}

/// Reads the items file into a draft carrying the pricing flags.
///
/// Rows that cannot be read are reported and skipped. Repeated products are
/// reported and kept, so submission rejects the order.
fn read_draft(input: PathBuf, pricing: &PricingArgs) -> Result<OrderDraft> {
    let file = File::open(input).into_diagnostic()?;
    let reader = LineItemReader::new(file);

    let mut items = Vec::new();
    let mut seen = HashSet::new();
    for item_result in reader.items() {
        match item_result {
            Ok(item) => {
                if !seen.insert(item.product_id.clone()) {
                    warn!(product_id = %item.product_id, "Product listed more than once");
                }
                items.push(item);
            }
            Err(e) => warn!("Error reading line item: {}", e),
        }
    }

    let order_date = pricing
        .order_date
        .unwrap_or_else(|| Local::now().date_naive());
    let mut draft = OrderDraft::with_items(order_date, items);
    draft.adjustments =
        OrderAdjustments::new(pricing.discount, pricing.shipping, pricing.other_costs);
    draft.payment = match &pricing.installments {
        Some(schedule) => PaymentConfig::installments(pricing.method, schedule.as_str()),
        None => PaymentConfig::pay_in_full(pricing.method),
    };
    Ok(draft)
}

fn open_store(db_path: Option<PathBuf>) -> Result<OrderStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            use order_pricing::infrastructure::rocksdb::RocksDBOrderStore;
            let store = RocksDBOrderStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryOrderStore::new()))
        }
        None => Ok(Box::new(InMemoryOrderStore::new())),
    }
}
