use log::{info, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};

use crate::engine::ReleaseSource;
use crate::engine::models::ReleaseInfo;
use crate::env;

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const GITHUB_JSON: &str = "application/vnd.github+json";
const ZIP_CONTENT: &str = "application/zip";

#[derive(Clone)]
pub struct NetworkClient {
    client: Client,
    token: String,
}

impl NetworkClient {
    pub fn new(token: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(env::user_agent())
            .build()
            .unwrap_or_else(|err| {
                warn!("network: falling back to default HTTP client configuration ({err})");
                Client::new()
            });
        Self {
            client,
            token: token.into(),
        }
    }

    fn github_get(&self, url: &str, accept: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .header(API_VERSION_HEADER, env::GITHUB_API_VERSION);
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    /// Fetch the latest published release of the upstream repository.
    pub async fn fetch_latest_release(&self) -> Result<ReleaseInfo, String> {
        self.fetch_release_from(&env::latest_release_url()).await
    }

    async fn fetch_release_from(&self, url: &str) -> Result<ReleaseInfo, String> {
        info!("network: querying {url}");
        let resp = self
            .github_get(url, GITHUB_JSON)
            .send()
            .await
            .map_err(|e| format!("could not fetch latest version: {e}"))?
            .error_for_status()
            .map_err(|e| format!("could not fetch latest version: {e}"))?;
        let text = resp
            .text()
            .await
            .map_err(|e| format!("release body error: {e}"))?;
        parse_release(&text)
    }

    /// Download the whole archive at `url` into memory.
    pub async fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, String> {
        info!("network: downloading {url}");
        let resp = self
            .github_get(url, ZIP_CONTENT)
            .send()
            .await
            .map_err(|e| format!("could not download zip file: {e}"))?
            .error_for_status()
            .map_err(|e| format!("download status error: {e}"))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| format!("error reading response body: {e}"))?;
        Ok(bytes.to_vec())
    }
}

impl ReleaseSource for NetworkClient {
    async fn latest_release(&mut self) -> Result<ReleaseInfo, String> {
        self.fetch_latest_release().await
    }

    async fn download(&mut self, url: &str) -> Result<Vec<u8>, String> {
        self.fetch_archive(url).await
    }
}

fn parse_release(text: &str) -> Result<ReleaseInfo, String> {
    serde_json::from_str(text).map_err(|e| format!("release parse error: {e}"))
}
