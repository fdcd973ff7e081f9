use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dsocial_types::ContentHash;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Public IPFS RPC endpoint used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://ipfs.infura.io:5001";

/// Connection settings for [`IpfsHttpStore`].
#[derive(Clone, Debug)]
pub struct IpfsConfig {
    /// Base URL of the IPFS HTTP RPC API (without `/api/v0`).
    pub api_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Message")]
    message: String,
}

/// Blob store backed by an IPFS node's HTTP RPC API.
///
/// `put` maps to `POST /api/v0/add` with a multipart `file` field and `cat`
/// maps to `POST /api/v0/cat?arg=<hash>`.
#[derive(Clone, Debug)]
pub struct IpfsHttpStore {
    client: Client,
    api_base: Url,
}

impl IpfsHttpStore {
    pub fn new(config: &IpfsConfig) -> StoreResult<Self> {
        let mut api_base = Url::parse(&config.api_url)
            .map_err(|error| StoreError::Http(format!("invalid api url {}: {error}", config.api_url)))?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| StoreError::Http(error.to_string()))?;

        Ok(Self { client, api_base })
    }

    /// The base URL requests are issued against.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn endpoint(&self, command: &str) -> StoreResult<Url> {
        self.api_base
            .join(&format!("api/v0/{command}"))
            .map_err(|error| StoreError::Http(error.to_string()))
    }

    async fn gateway_error(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|error| error.message)
            .unwrap_or(body);
        StoreError::Gateway { status, message }
    }
}

#[async_trait]
impl BlobStore for IpfsHttpStore {
    async fn put(&self, data: Bytes) -> StoreResult<ContentHash> {
        let size = data.len();
        let form = Form::new().part("file", Part::bytes(data.to_vec()).file_name("blob"));
        let response = self
            .client
            .post(self.endpoint("add")?)
            .multipart(form)
            .send()
            .await
            .map_err(|error| StoreError::Http(error.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        let added: AddResponse = response
            .json()
            .await
            .map_err(|error| StoreError::InvalidResponse(error.to_string()))?;
        let hash = ContentHash::parse(&added.hash)?;
        debug!(hash = %hash, size, "ipfs add");
        Ok(hash)
    }

    async fn cat(&self, hash: &ContentHash) -> StoreResult<Bytes> {
        let response = self
            .client
            .post(self.endpoint("cat")?)
            .query(&[("arg", hash.as_str())])
            .send()
            .await
            .map_err(|error| StoreError::Http(error.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(hash.clone()));
        }
        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        let data = response
            .bytes()
            .await
            .map_err(|error| StoreError::Http(error.to_string()))?;
        debug!(hash = %hash, size = data.len(), "ipfs cat");
        Ok(data)
    }
}
