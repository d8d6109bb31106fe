//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = geofab_cli::run().await {
        eprintln!("geofab: {err}");
        std::process::exit(1);
    }
}
