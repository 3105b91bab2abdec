use std::error::Error;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod pipeline;
mod workspace;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, when one exists; a fully
    // exported environment is just as valid.
    if dotenvy::dotenv().is_err() {
        eprintln!("no .env file found; relying on exported environment");
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,structure_indexer=info"))
        .unwrap();

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = match config::CliArgs::parse(std::env::args()) {
        Ok(args) => args,
        Err(reason) => {
            eprintln!("{reason}");
            eprintln!(
                "usage: repo-scribe --repo-path <path> [--force-reanalyze] [--force-recomment]"
            );
            std::process::exit(2);
        }
    };
    let app_config = config::AppConfig::from_env()?;

    pipeline::run(&args, &app_config).await?;

    Ok(())
}
