use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Metadata, RegionResponse};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no metadata document available in {path}")]
    MetadataUnavailable { path: String },
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(
        base: &str,
        timeout_seconds: u64,
        proxy: Option<&str>,
    ) -> Result<Self, FetchError> {
        let base = base.trim().trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base).is_err() {
            return Err(FetchError::InvalidBaseUrl { url: base });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "crowrank/",
                env!("CARGO_PKG_VERSION")
            )),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_seconds.max(1)));

        if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| FetchError::ProxySetup {
                proxy: proxy.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::ClientBuild { source: e })?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn metadata_url(&self) -> String {
        format!("{}/metadata", self.base)
    }

    pub fn region_url(&self, region_code: i64) -> String {
        format!("{}/growth-top-players?regionCode={region_code}", self.base)
    }

    pub async fn fetch_metadata(&self) -> Result<Metadata, FetchError> {
        self.get_json(&self.metadata_url()).await
    }

    pub async fn fetch_region_records(&self, region_code: i64) -> Result<RegionResponse, FetchError> {
        self.get_json(&self.region_url(region_code)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "non-success response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;
        decode(url, &body)
    }
}

/// Where record sets come from: the live API or JSON snapshots on disk.
///
/// A file source pointing at a directory reads `metadata.json` and
/// `<region code>.json` from it; pointing at a single file, that file is
/// served for every region and no metadata is available.
#[derive(Clone, Debug)]
pub enum Source {
    Http(ApiClient),
    File(PathBuf),
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::Http(client) => client.base().to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    pub async fn fetch_metadata(&self) -> Result<Metadata, FetchError> {
        match self {
            Source::Http(client) => client.fetch_metadata().await,
            Source::File(path) => {
                if !path.is_dir() {
                    return Err(FetchError::MetadataUnavailable {
                        path: path.display().to_string(),
                    });
                }
                read_json(&path.join("metadata.json")).await
            }
        }
    }

    pub async fn fetch_region_records(&self, region_code: i64) -> Result<RegionResponse, FetchError> {
        match self {
            Source::Http(client) => client.fetch_region_records(region_code).await,
            Source::File(path) if path.is_dir() => {
                read_json(&path.join(format!("{region_code}.json"))).await
            }
            Source::File(path) => read_json(path).await,
        }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
    debug!(path = %path.display(), "reading snapshot");
    let body = tokio::fs::read(path)
        .await
        .map_err(|e| FetchError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
    decode(&path.display().to_string(), &body)
}

pub fn decode<T: DeserializeOwned>(origin: &str, body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        url: origin.to_string(),
        source: e,
    })
}
