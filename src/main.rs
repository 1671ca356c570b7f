use std::io;

use anyhow::Result;
use clap::Parser;

use image_rev::{confirm, Outcome, RegistryConfig, ResolveError};

#[derive(Parser)]
#[command(name = "image-rev")]
struct Cli {
    /// A Docker tag (or digest) indicating the version of the
    /// civiform/civiform image to deploy.
    #[arg(long)]
    tag: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RegistryConfig::default();
    let stdin = io::stdin();
    let outcome = image_rev::run(
        &config,
        &cli.tag,
        confirm::skip_warn_set(),
        &mut stdin.lock(),
        &mut io::stderr(),
    )
    .await;

    match outcome {
        Ok(Outcome::Resolved(commit)) => {
            println!("{commit}");
            Ok(())
        }
        Ok(Outcome::Declined) => std::process::exit(1),
        Err(err) => match err.downcast_ref::<ResolveError>() {
            Some(friendly) => {
                eprintln!("Error: {friendly}");
                std::process::exit(1);
            }
            // Auth failures, transport faults and malformed responses fail
            // loudly with the full error chain.
            None => Err(err),
        },
    }
}
