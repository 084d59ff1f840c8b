use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quote_relayer::models::parse_amount;
use quote_relayer::{save_to_file, Address, Relayer, RelayerConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "relayer.json";

#[derive(Parser)]
#[command(name = "quote-relayer", about = "Priority-routed swap quotes")]
struct Cli {
    /// Relayer configuration file
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote AMOUNT of TOKEN_IN into TOKEN_OUT
    Quote {
        token_in: Address,
        amount: String,
        token_out: Address,
    },
    /// Print the routing table; with two tokens, also the tier that answers
    Routes {
        token_in: Option<Address>,
        token_out: Option<Address>,
    },
    /// Ask every registered wrapper whether it has a pool for the pair
    Available { token_a: Address, token_b: Address },
    /// Write the routing table to a JSON file
    ExportRoutes { path: String },
}

#[derive(Serialize)]
struct QuoteOutput {
    token_in: Address,
    token_out: Address,
    amount_in: String,
    amount_out: String,
    tier: String,
    wrapper: Address,
    protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_bps: Option<u32>,
}

#[derive(Serialize)]
struct AvailabilityOutput {
    wrapper: Address,
    protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_bps: Option<u32>,
    available: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quote_relayer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RelayerConfig::load(&cli.config)?;
    let relayer = config.build()?;

    match cli.command {
        Command::Quote {
            token_in,
            amount,
            token_out,
        } => quote(&relayer, token_in, &amount, token_out).await,
        Command::Routes {
            token_in,
            token_out,
        } => routes(&relayer, token_in, token_out),
        Command::Available { token_a, token_b } => available(&relayer, token_a, token_b).await,
        Command::ExportRoutes { path } => {
            save_to_file(&relayer.routing_table(), &path)?;
            info!(%path, "routing table exported");
            Ok(())
        }
    }
}

async fn quote(relayer: &Relayer, token_in: Address, amount: &str, token_out: Address) -> Result<()> {
    let amount_in = parse_amount(amount).map_err(anyhow::Error::msg)?;
    let routed = relayer
        .quote_with_route(token_in, amount_in, token_out)
        .await
        .with_context(|| format!("quoting {} {} -> {}", amount_in, token_in, token_out))?;

    let output = QuoteOutput {
        token_in,
        token_out,
        amount_in: amount_in.to_string(),
        amount_out: routed.amount_out.to_string(),
        tier: routed.tier.to_string(),
        wrapper: routed.wrapper,
        protocol: routed.protocol,
        fee_bps: routed.fee.map(|fee| fee.bps()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn routes(relayer: &Relayer, token_in: Option<Address>, token_out: Option<Address>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&relayer.routing_table())?);
    if let (Some(token_in), Some(token_out)) = (token_in, token_out) {
        match relayer.selected_wrapper(token_in, token_out) {
            Some((tier, wrapper)) => eprintln!(
                "{} -> {}: {} rule, wrapper {}",
                token_in.short(),
                token_out.short(),
                tier,
                wrapper
            ),
            None => eprintln!("{} -> {}: no wrapper", token_in.short(), token_out.short()),
        }
    }
    Ok(())
}

async fn available(relayer: &Relayer, token_a: Address, token_b: Address) -> Result<()> {
    let mut rows = Vec::new();
    for id in relayer.wrapper_ids() {
        let Some(wrapper) = relayer.wrapper(id) else {
            continue;
        };
        let available = wrapper
            .is_available(token_a, token_b)
            .await
            .with_context(|| format!("checking wrapper {}", id))?;
        rows.push(AvailabilityOutput {
            wrapper: id,
            protocol: wrapper.protocol_name().to_string(),
            fee_bps: wrapper.fee().map(|fee| fee.bps()),
            available,
        });
    }
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
