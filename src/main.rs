use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payroute::application::payment_service::PaymentService;
use payroute::bootstrap::{self, Payroute};
use payroute::config::PayrouteConfig;
use payroute::domain::callback::CallbackUpdate;
use payroute::domain::merged::MergedTransaction;
use payroute::interfaces::csv::instruction_reader::{InstructionReader, PaymentInstruction};
use payroute::interfaces::json::view_writer::MergedViewWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payment instructions CSV file (type, gateway, amount, outcome)
    input: PathBuf,

    /// JSON configuration file. Without one, gateway_a (JSON callbacks) and
    /// gateway_b (XML callbacks) are registered.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deadline for each gateway call in milliseconds. Overrides the config file.
    #[arg(long)]
    gateway_timeout_ms: Option<u64>,
}

/// Submits one payment and, if the row asks for it, plays back the gateway's
/// callback in that gateway's own wire format.
async fn submit(
    payments: &PaymentService,
    instruction: PaymentInstruction,
) -> payroute::error::Result<String> {
    let tx = payments
        .process_payment(instruction.amount, instruction.r#type, &instruction.gateway)
        .await?;

    if let Some(outcome) = instruction.outcome() {
        let codec = payments.callback_codec(&tx.gateway)?;
        let body = codec.encode(&CallbackUpdate::new(&tx.id, outcome)?)?;
        let content_type = codec.format().content_type();
        if let Err(e) = payments
            .handle_callback_with_content_type(&tx.gateway, &body, Some(content_type))
            .await
        {
            eprintln!("Error processing callback: {}", e);
        }
    }

    Ok(tx.id)
}

async fn merged_view(core: &Payroute, id: &str) -> payroute::error::Result<MergedTransaction> {
    let tx = core.payments.get_transaction(id).await?;
    core.merger.merge(&tx).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PayrouteConfig::load(path)?,
        None => PayrouteConfig::default(),
    };
    if let Some(ms) = cli.gateway_timeout_ms {
        config.gateway_timeout_ms = Some(ms);
    }
    let core = bootstrap::build(&config)?;

    // Submit instructions in file order
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = InstructionReader::new(file);
    let mut created = Vec::new();
    for instruction in reader.instructions() {
        match instruction {
            Ok(instruction) => match submit(&core.payments, instruction).await {
                Ok(id) => created.push(id),
                Err(e) => eprintln!("Error processing payment: {}", e),
            },
            Err(e) => {
                eprintln!("Error reading instruction: {}", e);
            }
        }
    }

    // Output the merged view of every created transaction
    let mut views = Vec::with_capacity(created.len());
    for id in &created {
        match merged_view(&core, id).await {
            Ok(view) => views.push(view),
            Err(e) => eprintln!("Error merging transaction: {}", e),
        }
    }

    let stdout = io::stdout();
    let mut writer = MergedViewWriter::new(stdout.lock());
    writer.write_all(&views)?;

    Ok(())
}
