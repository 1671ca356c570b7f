use std::io::{BufRead, Write};

use anyhow::Result;

pub mod confirm;
pub mod registry;
pub mod tag;

pub use registry::{RegistryConfig, ResolveError};

/// Result of one resolution run. A declined confirmation is a controlled
/// outcome, not an error; resolution failures surface through the `Result`.
#[derive(Debug)]
pub enum Outcome {
    Resolved(String),
    Declined,
}

/// Resolves a tag or digest reference to the git commit SHA recorded in the
/// image configuration. Each registry call fetches its own token.
pub async fn resolve_commit(config: &RegistryConfig, reference: &str) -> Result<String> {
    let digest = registry::resolve_digest(config, reference).await?;
    registry::extract_commit(config, reference, &digest).await
}

/// Full run: classify, confirm, then resolve. No registry call is made
/// unless the confirmation gate passes.
pub async fn run(
    config: &RegistryConfig,
    reference: &str,
    skip_warn: bool,
    input: &mut impl BufRead,
    diag: &mut impl Write,
) -> Result<Outcome> {
    let classification = tag::classify(reference);
    if !confirm::authorize(reference, classification, skip_warn, input, diag)? {
        return Ok(Outcome::Declined);
    }

    let commit = resolve_commit(config, reference).await?;
    Ok(Outcome::Resolved(commit))
}
