//! Injector transfer - signs a self-transfer and broadcasts it through the
//! injector endpoint. Configuration comes from the environment, see
//! `injector_transfer::config`.

use anyhow::{Context, Result};
use injector_transfer::chain::ChainProvider;
use injector_transfer::injector::InjectorClient;
use injector_transfer::report::Console;
use injector_transfer::tx::TransferSigner;
use injector_transfer::{Settings, TransferReceipt, TransferWorkflow};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    init_logging();

    info!("Starting injector transfer v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(receipt) => {
            info!(
                "Transfer of nonce {} on chain {} complete: {:?}",
                receipt.chain_state.nonce, receipt.chain_state.chain_id, receipt.tx_hash
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Transfer failed: {:#}", e);
            // the logging filter may hide the line above
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<TransferReceipt> {
    // Load configuration before touching the network
    let settings = Settings::load().context("Failed to load configuration")?;
    info!(
        "Read endpoint {}, injector {}, timeout {:?}",
        settings.jsonrpc_url, settings.injector_url, settings.rpc_timeout
    );

    let signer = TransferSigner::new(&settings.private_key).context("Failed to load sender key")?;
    let reader = ChainProvider::new(&settings.jsonrpc_url, settings.rpc_timeout)?;
    let injector = InjectorClient::new(settings.injector_url.clone(), settings.rpc_timeout)?;

    let workflow = TransferWorkflow::new(reader, injector, signer, settings.gas);
    let mut console = Console::new(io::stdout());

    let receipt = workflow.run(&mut console).await.context("Transfer workflow failed")?;
    Ok(receipt)
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,injector_transfer=debug,hyper=warn,reqwest=warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout carries the report, logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}
