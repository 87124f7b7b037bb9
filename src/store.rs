//! Remote log store client
//! Lists honeypot folders and downloads raw log bodies over HTTP

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error_handling::{ErrorContext, HoneypotError, HoneypotResult};

const LISTING_MEDIA_TYPE: &str = "application/vnd.github+json";
// Encoded (base64 JSON) bodies are capped far below real log sizes
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const CACHE_BUST_PARAM: &str = "_";

/// Read access to the dated log repository
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Names of the entries in `folder`; a failed listing aborts the run
    async fn list_files(&self, folder: &str) -> HoneypotResult<Vec<String>>;

    async fn try_fetch_content(&self, folder: &str, file: &str) -> HoneypotResult<String>;

    /// Body of one log file, empty when it could not be retrieved
    async fn fetch_content(&self, folder: &str, file: &str) -> String {
        match self.try_fetch_content(folder, file).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Skipping {}/{}: {}", folder, file, e);
                String::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// GitHub-style contents API client
pub struct GithubLogStore {
    client: Client,
    config: StoreConfig,
}

impl GithubLogStore {
    pub fn new(config: StoreConfig) -> HoneypotResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .with_network_context(|| "Failed to create HTTP client".to_string())?;

        Ok(Self { client, config })
    }

    /// Folder URL with the ref and a fresh cache-busting token
    fn request_url(&self, folder: &str, file: Option<&str>) -> HoneypotResult<Url> {
        let mut url = Url::parse(&self.config.contents_url(folder))
            .with_network_context(|| format!("Invalid store URL for folder '{}'", folder))?;

        if let Some(file) = file {
            url.path_segments_mut()
                .map_err(|_| HoneypotError::configuration("Store base URL cannot carry a path"))?
                .push(file);
        }

        {
            let mut query = url.query_pairs_mut();
            if let Some(git_ref) = &self.config.git_ref {
                query.append_pair("ref", git_ref);
            }
            query.append_pair(CACHE_BUST_PARAM, &cache_buster());
        }

        Ok(url)
    }
}

/// Unique per request so no intermediate cache can answer with stale data
fn cache_buster() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl LogStore for GithubLogStore {
    async fn list_files(&self, folder: &str) -> HoneypotResult<Vec<String>> {
        let url = self.request_url(folder, None)?;
        debug!("Listing {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, LISTING_MEDIA_TYPE)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .with_network_context(|| format!("Failed to list folder '{}'", folder))?;

        let status = response.status();
        if !status.is_success() {
            error!("Listing of '{}' failed with status {}", folder, status);
            return Err(HoneypotError::listing(folder, status));
        }

        let body = response
            .text()
            .await
            .with_network_context(|| format!("Failed to read listing of '{}'", folder))?;

        let entries: Vec<ContentEntry> = serde_json::from_str(&body)
            .with_decode_context(|| format!("Listing of '{}' is not a directory array", folder))?;

        let names: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.kind.as_deref().map_or(true, |kind| kind == "file"))
            .map(|entry| entry.name)
            .collect();

        debug!("Folder '{}' holds {} files", folder, names.len());
        Ok(names)
    }

    async fn try_fetch_content(&self, folder: &str, file: &str) -> HoneypotResult<String> {
        let url = self.request_url(folder, Some(file))?;

        let response = self
            .client
            .get(url)
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .with_network_context(|| format!("Failed to fetch {}/{}", folder, file))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HoneypotError::network(format!(
                "Fetch of {}/{} failed with status {}",
                folder, file, status
            )));
        }

        response
            .text()
            .await
            .with_network_context(|| format!("Failed to read body of {}/{}", folder, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GithubLogStore {
        let config = StoreConfig::new("acme", "logs")
            .with_base_url("http://127.0.0.1:9")
            .with_ref("main");
        GithubLogStore::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GithubLogStore::new(StoreConfig::default()).is_err());
    }

    #[test]
    fn test_request_urls_are_unique() {
        let store = store();
        let first = store.request_url("fortipot", None).unwrap();
        let second = store.request_url("fortipot", None).unwrap();

        assert_eq!(first.path(), "/repos/acme/logs/contents/fortipot");
        assert_ne!(first, second);
        assert!(first.query_pairs().any(|(k, v)| k == "ref" && v == "main"));
    }

    #[test]
    fn test_file_names_are_path_encoded() {
        let url = store()
            .request_url("fortipot", Some("2026-02-18_a b#1.log"))
            .unwrap();
        assert_eq!(url.path(), "/repos/acme/logs/contents/fortipot/2026-02-18_a%20b%231.log");
    }

    #[tokio::test]
    async fn test_unreachable_content_degrades_to_empty() {
        let config = StoreConfig::new("acme", "logs")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout_ms(500);
        let store = GithubLogStore::new(config).unwrap();

        assert_eq!(store.fetch_content("fortipot", "2026-02-18_a.log").await, "");
        let err = store.list_files("fortipot").await.unwrap_err();
        assert_eq!(err.error_code(), "NETWORK_ERROR");
    }
}
