//! # Metadata Builder CLI
//!
//! Builds protocol metadata artifacts and synchronizes the registry source
//! file.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin metadata_builder -- --protocols aave-v2,compound-v2 --chains ethereum
//! ```
//!
//! Without filters, every registered adapter runs. On a checksum violation the
//! offending values are printed to stderr and the run aborts before writing
//! the artifact or touching the registry.

use clap::Parser;
use defi_metadata_sdk::{
    adapters::supported_adapters, file_writer::DefaultFormatter, BuildFilters, BuildOrchestrator,
    Chain, MetadataBuildError, Protocol, Settings,
};
use std::collections::HashSet;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "metadata_builder",
    about = "Builds protocol metadata artifacts and keeps the registry source file in sync"
)]
struct Cli {
    /// Comma-separated protocol ids to build (default: all)
    #[arg(long, value_delimiter = ',')]
    protocols: Vec<String>,

    /// Comma-separated chain names to build (default: all)
    #[arg(long, value_delimiter = ',')]
    chains: Vec<String>,
}

fn parse_filters(cli: &Cli) -> Result<BuildFilters, String> {
    let protocols = if cli.protocols.is_empty() {
        None
    } else {
        Some(
            cli.protocols
                .iter()
                .map(|p| p.parse::<Protocol>())
                .collect::<Result<HashSet<_>, _>>()?,
        )
    };
    let chains = if cli.chains.is_empty() {
        None
    } else {
        Some(
            cli.chains
                .iter()
                .map(|c| c.parse::<Chain>())
                .collect::<Result<HashSet<_>, _>>()?,
        )
    };
    Ok(BuildFilters { protocols, chains })
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let filters = match parse_filters(&cli) {
        Ok(filters) => filters,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    match run(&filters).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(MetadataBuildError::ChecksumViolation(values)) => {
            eprintln!("error: metadata payload contains non-checksummed addresses:");
            for value in values {
                eprintln!("  {value}");
            }
            eprintln!("Fix the adapter to emit EIP-55 checksummed addresses, then rerun the build.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(filters: &BuildFilters) -> Result<(), MetadataBuildError> {
    let settings = Settings::new().map_err(|e| MetadataBuildError::Adapter(e.into()))?;
    let providers = settings.provider_registry()?;
    let adapters = supported_adapters(&providers)?;

    let orchestrator = BuildOrchestrator::new(
        adapters,
        Path::new(&settings.output_root),
        Path::new(&settings.registry_path),
        Arc::new(DefaultFormatter),
    );
    orchestrator.run(filters).await?;
    Ok(())
}
