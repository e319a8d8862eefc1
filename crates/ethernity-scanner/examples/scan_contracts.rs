use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use ethernity_rpc::{EthernityRpcClient, RpcConfig};
use ethernity_scanner::{report, BytecodeScanner, Registry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    if args.iter().any(|a| a == "--list") {
        for signature in Registry::list() {
            println!("{:<24} {:<9} {}", signature.key(), signature.severity.to_string(), signature.name);
        }
        return Ok(());
    }

    // Endpoint opcional; sem ele usa MAINNET_RPC
    let has_endpoint = args
        .first()
        .map(|a| a.starts_with("http") || a.starts_with("ws"))
        .unwrap_or(false);
    let config = if has_endpoint {
        RpcConfig::from_env().with_endpoint(args.remove(0))
    } else {
        RpcConfig::from_env()
    };

    if args.is_empty() {
        eprintln!("Uso: {} [--json] [--list] [RPC_ENDPOINT] <ENDERECO>...", program);
        std::process::exit(1);
    }

    info!("Conectando a {}", config.endpoint);
    let client = EthernityRpcClient::new(config)
        .await
        .context("falha ao conectar ao node")?;
    let scanner = BytecodeScanner::new(Arc::new(client), None);

    let batch = scanner.analyze_batch(&args).await;

    if json {
        println!("{}", report::render_json(&batch).context("falha ao serializar resultados")?);
    } else if batch.len() == 1 {
        println!("{}", report::render(&batch.results[0]));
    } else {
        println!("{}", report::render_batch(&batch));
    }

    Ok(())
}
