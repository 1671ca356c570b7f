use std::collections::HashMap;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// The two resolution failures that get a friendly one-line message. Both
/// carry the reference the caller typed, never an internal digest. Anything
/// else (auth rejections, transport faults, malformed JSON) propagates raw.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("\"{0}\" could not be found in Docker Hub.")]
    NotFound(String),

    #[error("Git commit information could not be obtained for \"{0}\"")]
    NoCommitInfo(String),
}

/// Registry identity and endpoints. The defaults bake in the repository this
/// tool deploys; the `with_*` overrides exist for tests.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    pub registry_url: String,
    pub auth_url: String,
    pub auth_service: String,
    pub repository: String,
    pub commit_label: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_url: "https://registry-1.docker.io/v2".to_string(),
            auth_url: "https://auth.docker.io/token".to_string(),
            auth_service: "registry.docker.io".to_string(),
            repository: "civiform/civiform".to_string(),
            commit_label: "civiform.git.commit_sha".to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
struct ManifestResponse {
    config: ManifestConfig,
}

#[derive(Debug, Deserialize)]
struct ManifestConfig {
    digest: String,
}

#[derive(Debug, Deserialize)]
struct ConfigBlob {
    config: BlobConfig,
}

#[derive(Debug, Deserialize)]
struct BlobConfig {
    #[serde(rename = "Labels", default)]
    labels: Option<HashMap<String, String>>,
}

/// Fetches a pull-scoped bearer token for the configured repository. A
/// response without a `token` field yields an empty token rather than an
/// error; the registry then rejects the next call itself.
pub async fn get_token(config: &RegistryConfig) -> Result<String> {
    let client = reqwest::Client::new();
    let url = format!(
        "{}?scope=repository:{}:pull&service={}",
        config.auth_url, config.repository, config.auth_service
    );

    let resp = client.get(&url).send().await?;
    if !resp.status().is_success() {
        anyhow::bail!("unexpected status {} retrieving an auth token", resp.status());
    }

    let body: TokenResponse = resp.json().await?;
    Ok(body.token)
}

/// Resolves a tag or digest reference to the digest of the image
/// configuration via the manifest endpoint. A digest-form reference goes
/// through the same lookup, which doubles as an existence check.
pub async fn resolve_digest(config: &RegistryConfig, reference: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let token = get_token(config).await?;

    let url = format!(
        "{}/{}/manifests/{}",
        config.registry_url, config.repository, reference
    );
    let resp = client
        .get(&url)
        .bearer_auth(&token)
        .header(header::ACCEPT, MANIFEST_V2_MEDIA_TYPE)
        .send()
        .await?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(ResolveError::NotFound(reference.to_string()).into());
    }
    let resp = resp.error_for_status()?;

    let manifest: ManifestResponse = resp.json().await?;
    Ok(manifest.config.digest)
}

/// Fetches the image configuration blob and extracts the commit label.
/// Any HTTP failure here reports the reference the caller typed, not the
/// digest the fetch was keyed by.
pub async fn extract_commit(
    config: &RegistryConfig,
    reference: &str,
    digest: &str,
) -> Result<String> {
    let client = reqwest::Client::new();
    let token = get_token(config).await?;

    let url = format!(
        "{}/{}/blobs/{}",
        config.registry_url, config.repository, digest
    );
    let resp = client.get(&url).bearer_auth(&token).send().await?;

    if !resp.status().is_success() {
        return Err(ResolveError::NotFound(reference.to_string()).into());
    }

    let blob: ConfigBlob = resp.json().await?;
    let commit = blob
        .config
        .labels
        .as_ref()
        .and_then(|labels| labels.get(&config.commit_label))
        .filter(|sha| !sha.is_empty());

    match commit {
        Some(sha) => Ok(sha.clone()),
        None => Err(ResolveError::NoCommitInfo(reference.to_string()).into()),
    }
}
