use areal::{Config, Store};
use areal_server::run_server;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3001)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Directory holding the manifest and dataset files
    #[arg(short, long, default_value = "data")]
    data_root: String,

    /// Manifest file name, relative to the data root
    #[arg(long, default_value = "datasets.json")]
    manifest: String,

    /// Digit precision for quantizing query windows
    #[arg(long, default_value_t = 0)]
    bbox_digits: u8,

    /// Simplification tolerance in degrees (0 disables)
    #[arg(long, default_value_t = 0.001)]
    simplify_tolerance: f64,

    /// Number of window results kept in the LRU cache
    #[arg(long, default_value_t = 64)]
    cache_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "areal_server=info,areal=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let config = Config {
        data_root: args.data_root.into(),
        manifest_file: args.manifest,
        bbox_digits: args.bbox_digits,
        simplify_tolerance: args.simplify_tolerance,
        cache_capacity: args.cache_capacity,
    };

    info!("Opening store over {}", config.data_root.display());
    let store = Store::open(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl_c signal");
    };

    run_server(addr, Arc::new(store), shutdown).await?;

    Ok(())
}
